//! PDF exporter — composes the CV onto A4 pages in the template's palette.
//!
//! The composer thinks in millimeters from the top-left corner, the same
//! coordinate system the layout constants are calibrated in; conversion to
//! PDF user space happens at the lowest level. Underneath sits a writer for
//! the handful of PDF 1.4 primitives a text-only artifact needs: two Type1
//! base fonts, one content stream per page, a cross-reference table. No
//! layout decision lives down there.

use bytes::Bytes;
use chrono::Utc;

use crate::errors::AppError;
use crate::export::metrics::HELVETICA;
use crate::export::template::{template_colors, Rgb, TemplateColors};
use crate::export::{
    section_labels, DocumentExporter, ExportArtifact, ExportFormat, SectionLabels,
};
use crate::models::content::ContentDocument;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 20.0;
const MARGIN_RIGHT_MM: f32 = 20.0;
const TOP_MM: f32 = 25.0;
/// A cursor past this line starts a new page.
const BOTTOM_MM: f32 = 272.0;
const FOOTER_Y_MM: f32 = 285.0;
const MM_TO_PT: f32 = 72.0 / 25.4;

const BODY_GRAY: Rgb = (60, 60, 60);

pub struct PdfExporter;

impl DocumentExporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn export(
        &self,
        document: &ContentDocument,
        lang: &str,
        template: &str,
    ) -> Result<ExportArtifact, AppError> {
        let colors = template_colors(template);
        let labels = section_labels(lang);
        let footer = format!("{} {}", labels.generated, Utc::now().format("%Y-%m-%d"));

        let pages = compose(document, colors, &labels, &footer);
        let bytes = build_pdf(&pages);

        Ok(ExportArtifact {
            format: ExportFormat::Pdf,
            file_name: format!("cv_{lang}.pdf"),
            bytes: Bytes::from(bytes),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page composition
// ────────────────────────────────────────────────────────────────────────────

fn compose(
    document: &ContentDocument,
    colors: &TemplateColors,
    labels: &SectionLabels,
    footer: &str,
) -> Vec<String> {
    let mut page = Composer::new();

    // Header at fixed coordinates: name, title, divider.
    page.text_at(MARGIN_LEFT_MM, 25.0, 24.0, true, colors.primary, &document.about.name);
    page.text_at(MARGIN_LEFT_MM, 35.0, 16.0, false, colors.secondary, &document.about.title);
    page.set_cursor(40.0);
    page.rule(colors.primary);
    page.advance(10.0);

    page.heading(labels.profile, colors.primary);
    page.paragraph(12.0, BODY_GRAY, &document.about.description);
    if !document.about.location.is_empty() {
        page.text_line(11.0, false, colors.secondary, &document.about.location);
    }

    if !document.experience.is_empty() {
        page.heading(labels.experience, colors.primary);
        for entry in &document.experience {
            page.ensure_room(18.0);
            page.text_line(13.0, true, colors.secondary, &entry.title);
            page.text_line(
                11.0,
                false,
                colors.secondary,
                &format!("{} | {}", entry.company, entry.period),
            );
            for bullet in &entry.description {
                page.paragraph(11.0, BODY_GRAY, &format!("- {bullet}"));
            }
            page.advance(4.0);
        }
    }

    if !document.skills.is_empty() {
        page.heading(labels.skills, colors.primary);
        page.paragraph(11.0, BODY_GRAY, &document.skills.join(", "));
    }

    if !document.tools.is_empty() {
        page.heading(labels.tools, colors.primary);
        for category in &document.tools {
            page.ensure_room(12.0);
            page.text_line(12.0, true, colors.secondary, &category.category);
            let items: Vec<&str> = category.items.iter().map(|item| item.name.as_str()).collect();
            page.paragraph(11.0, BODY_GRAY, &items.join(", "));
            page.advance(2.0);
        }
    }

    if !document.projects.is_empty() {
        page.heading(labels.projects, colors.primary);
        for project in &document.projects {
            page.ensure_room(16.0);
            page.text_line(13.0, true, colors.secondary, &project.title);
            page.paragraph(11.0, BODY_GRAY, &project.description);
            if !project.link.is_empty() {
                page.text_line(10.0, false, colors.accent, &project.link);
            }
            page.advance(4.0);
        }
    }

    if !document.about.email.is_empty() {
        page.heading(labels.contact, colors.primary);
        page.text_line(11.0, false, colors.accent, &document.about.email);
    }

    page.finish(footer, colors.secondary)
}

/// Cursor-based page builder. Text baselines sit at the cursor; every write
/// advances it, and writes that would cross the bottom margin open a new page.
struct Composer {
    pages: Vec<String>,
    stream: String,
    y_mm: f32,
}

impl Composer {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            stream: String::new(),
            y_mm: TOP_MM,
        }
    }

    fn set_cursor(&mut self, y_mm: f32) {
        self.y_mm = y_mm;
    }

    fn advance(&mut self, mm: f32) {
        self.y_mm += mm;
    }

    fn ensure_room(&mut self, needed_mm: f32) {
        if self.y_mm + needed_mm > BOTTOM_MM {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.stream));
        self.y_mm = TOP_MM;
    }

    fn heading(&mut self, text: &str, color: Rgb) {
        self.ensure_room(14.0);
        self.advance(4.0);
        self.text_line(18.0, true, color, text);
        self.advance(2.0);
    }

    /// One line at the cursor, then advance by the size-proportional leading.
    fn text_line(&mut self, size_pt: f32, bold: bool, color: Rgb, text: &str) {
        let line_height_mm = size_pt * 0.5;
        self.ensure_room(line_height_mm);
        self.text_at(MARGIN_LEFT_MM, self.y_mm, size_pt, bold, color, text);
        self.advance(line_height_mm);
    }

    /// Word-wrapped body text across the full text width.
    fn paragraph(&mut self, size_pt: f32, color: Rgb, text: &str) {
        let width_mm = PAGE_WIDTH_MM - MARGIN_LEFT_MM - MARGIN_RIGHT_MM;
        let width_em = width_mm * MM_TO_PT / size_pt;
        for line in HELVETICA.wrap_text(text, width_em) {
            self.text_line(size_pt, false, color, &line);
        }
    }

    /// Raw positioned text; does not move the cursor.
    fn text_at(&mut self, x_mm: f32, y_mm: f32, size_pt: f32, bold: bool, color: Rgb, text: &str) {
        let font = if bold { "/F2" } else { "/F1" };
        let (r, g, b) = normalize(color);
        let x = x_mm * MM_TO_PT;
        let y = (PAGE_HEIGHT_MM - y_mm) * MM_TO_PT;
        self.stream.push_str(&format!(
            "{r:.3} {g:.3} {b:.3} rg\nBT {font} {size_pt} Tf 1 0 0 1 {x:.2} {y:.2} Tm ({}) Tj ET\n",
            escape_pdf_text(text)
        ));
    }

    /// Full-width horizontal divider at the cursor.
    fn rule(&mut self, color: Rgb) {
        let (r, g, b) = normalize(color);
        let y = (PAGE_HEIGHT_MM - self.y_mm) * MM_TO_PT;
        let x1 = MARGIN_LEFT_MM * MM_TO_PT;
        let x2 = (PAGE_WIDTH_MM - MARGIN_RIGHT_MM) * MM_TO_PT;
        self.stream.push_str(&format!(
            "{r:.3} {g:.3} {b:.3} RG 1.42 w {x1:.2} {y:.2} m {x2:.2} {y:.2} l S\n"
        ));
    }

    /// Closes the last page and stamps the footer onto every page.
    fn finish(mut self, footer: &str, color: Rgb) -> Vec<String> {
        self.pages.push(std::mem::take(&mut self.stream));
        let mut stamp = Composer::new();
        stamp.text_at(MARGIN_LEFT_MM, FOOTER_Y_MM, 9.0, false, color, footer);
        let footer_ops = stamp.stream;
        for page in &mut self.pages {
            page.push_str(&footer_ops);
        }
        self.pages
    }
}

fn normalize(color: Rgb) -> (f32, f32, f32) {
    (
        f32::from(color.0) / 255.0,
        f32::from(color.1) / 255.0,
        f32::from(color.2) / 255.0,
    )
}

/// Escapes a string for a PDF literal. The fonts are declared with
/// WinAnsiEncoding, so Latin-1 codepoints are written as octal escapes and
/// anything beyond degrades to '?'.
fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => out.push(' '),
            c if c.is_ascii() => out.push(c),
            c if (c as u32) <= 0xFF => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => out.push('?'),
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// PDF primitives
// ────────────────────────────────────────────────────────────────────────────

/// Assembles a complete document from per-page content streams.
///
/// Object layout: 1 catalog, 2 page tree, 3/4 the regular and bold fonts,
/// then one (page, contents) object pair per page.
fn build_pdf(pages: &[String]) -> Vec<u8> {
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 5 + 2 * i))
        .collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    for (i, stream) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595.28 841.89] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            6 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    out.into_bytes()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
