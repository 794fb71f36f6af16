//! DOCX exporter — a WordprocessingML package written through the `zip`
//! crate: content types, package relationships, core properties, and one
//! `word/document.xml` carrying the CV in the template's palette.

use std::io::{Cursor, Write};

use bytes::Bytes;
use chrono::Utc;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::errors::AppError;
use crate::export::template::{template_colors, Rgb, TemplateColors};
use crate::export::{
    section_labels, DocumentExporter, ExportArtifact, ExportFormat, SectionLabels,
};
use crate::models::content::ContentDocument;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

pub struct DocxExporter;

impl DocumentExporter for DocxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn export(
        &self,
        document: &ContentDocument,
        lang: &str,
        template: &str,
    ) -> Result<ExportArtifact, AppError> {
        let colors = template_colors(template);
        let labels = section_labels(lang);

        let bytes = write_package(document, colors, &labels)
            .map_err(|err| AppError::Export(format!("docx package: {err}")))?;

        Ok(ExportArtifact {
            format: ExportFormat::Docx,
            file_name: format!("cv_{lang}.docx"),
            bytes: Bytes::from(bytes),
        })
    }
}

fn write_package(
    document: &ContentDocument,
    colors: &TemplateColors,
    labels: &SectionLabels,
) -> Result<Vec<u8>, zip::result::ZipError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("docProps/core.xml", core_properties(document)),
        ("word/document.xml", document_xml(document, colors, labels)),
    ];
    for (name, contents) in parts {
        writer.start_file(name, options)?;
        writer.write_all(contents.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

fn core_properties(document: &ContentDocument) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>{title}</dc:title>
<dc:creator>{creator}</dc:creator>
<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>
</cp:coreProperties>"#,
        title = escape_xml(&document.about.title),
        creator = escape_xml(&document.about.name),
        created = Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
    )
}

fn document_xml(
    document: &ContentDocument,
    colors: &TemplateColors,
    labels: &SectionLabels,
) -> String {
    let primary = hex(colors.primary);
    let secondary = hex(colors.secondary);
    let accent = hex(colors.accent);

    let mut body = String::new();
    body.push_str(&paragraph(&document.about.name, Run::new(48).bold().color(&primary)));
    body.push_str(&paragraph(&document.about.title, Run::new(32).color(&secondary)));

    body.push_str(&paragraph(labels.profile, Run::new(28).bold().color(&primary)));
    body.push_str(&paragraph(&document.about.description, Run::new(22)));
    if !document.about.location.is_empty() {
        body.push_str(&paragraph(&document.about.location, Run::new(22).color(&secondary)));
    }

    if !document.experience.is_empty() {
        body.push_str(&paragraph(labels.experience, Run::new(28).bold().color(&primary)));
        for entry in &document.experience {
            body.push_str(&paragraph(&entry.title, Run::new(24).bold().color(&secondary)));
            body.push_str(&paragraph(
                &format!("{} | {}", entry.company, entry.period),
                Run::new(22).color(&secondary),
            ));
            for bullet in &entry.description {
                body.push_str(&paragraph(&format!("- {bullet}"), Run::new(22)));
            }
        }
    }

    if !document.skills.is_empty() {
        body.push_str(&paragraph(labels.skills, Run::new(28).bold().color(&primary)));
        body.push_str(&paragraph(&document.skills.join(", "), Run::new(22)));
    }

    if !document.tools.is_empty() {
        body.push_str(&paragraph(labels.tools, Run::new(28).bold().color(&primary)));
        for category in &document.tools {
            body.push_str(&paragraph(&category.category, Run::new(24).bold().color(&secondary)));
            let items: Vec<&str> = category.items.iter().map(|item| item.name.as_str()).collect();
            body.push_str(&paragraph(&items.join(", "), Run::new(22)));
        }
    }

    if !document.projects.is_empty() {
        body.push_str(&paragraph(labels.projects, Run::new(28).bold().color(&primary)));
        for project in &document.projects {
            body.push_str(&paragraph(&project.title, Run::new(24).bold().color(&secondary)));
            body.push_str(&paragraph(&project.description, Run::new(22)));
            if !project.link.is_empty() {
                body.push_str(&paragraph(&project.link, Run::new(20).color(&accent)));
            }
        }
    }

    if !document.about.email.is_empty() {
        body.push_str(&paragraph(labels.contact, Run::new(28).bold().color(&primary)));
        body.push_str(&paragraph(&document.about.email, Run::new(22).color(&accent)));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}<w:sectPr/></w:body>
</w:document>"#
    )
}

/// Run properties for one single-run paragraph. Sizes are half-points, the
/// unit WordprocessingML uses.
struct Run<'a> {
    size: u32,
    bold: bool,
    color: Option<&'a str>,
}

impl<'a> Run<'a> {
    fn new(size: u32) -> Self {
        Self {
            size,
            bold: false,
            color: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn color(mut self, hex: &'a str) -> Self {
        self.color = Some(hex);
        self
    }
}

fn paragraph(text: &str, run: Run<'_>) -> String {
    let mut properties = String::new();
    if run.bold {
        properties.push_str("<w:b/>");
    }
    if let Some(color) = run.color {
        properties.push_str(&format!(r#"<w:color w:val="{color}"/>"#));
    }
    properties.push_str(&format!(
        r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#,
        size = run.size
    ));
    format!(
        r#"<w:p><w:r><w:rPr>{properties}</w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape_xml(text)
    )
}

fn hex(color: Rgb) -> String {
    format!("{:02X}{:02X}{:02X}", color.0, color.1, color.2)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
