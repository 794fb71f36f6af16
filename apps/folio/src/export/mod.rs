//! Document export: turns a resolved content document into a downloadable
//! artifact. Exports are one-shot, user-initiated, and never retried
//! automatically; failures surface as [`AppError::Export`] for the
//! initiating layer to report.

pub mod docx;
pub mod metrics;
pub mod pdf;
pub mod template;

use bytes::Bytes;

use crate::errors::AppError;
use crate::models::content::ContentDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

/// A finished artifact, ready to be written or served as a download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Bytes,
}

/// The export contract: document + language code + cosmetic template name
/// in, binary artifact out. Unknown template names use the default template.
///
/// Implementations are CPU-bound; callers run them under `spawn_blocking`.
pub trait DocumentExporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn export(
        &self,
        document: &ContentDocument,
        lang: &str,
        template: &str,
    ) -> Result<ExportArtifact, AppError>;
}

/// Localized fixed strings the exporters print as section headings.
/// Unknown codes read as the default language.
pub(crate) struct SectionLabels {
    pub profile: &'static str,
    pub experience: &'static str,
    pub skills: &'static str,
    pub tools: &'static str,
    pub projects: &'static str,
    pub contact: &'static str,
    pub generated: &'static str,
}

pub(crate) fn section_labels(lang: &str) -> SectionLabels {
    match lang {
        "en" => SectionLabels {
            profile: "Professional Profile",
            experience: "Experience",
            skills: "Skills",
            tools: "Tools",
            projects: "Projects",
            contact: "Contact",
            generated: "Generated",
        },
        _ => SectionLabels {
            profile: "Perfil Profesional",
            experience: "Experiencia",
            skills: "Habilidades",
            tools: "Herramientas",
            projects: "Proyectos",
            contact: "Contacto",
            generated: "Generado",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_labels_localize_and_default_to_spanish() {
        assert_eq!(section_labels("en").experience, "Experience");
        assert_eq!(section_labels("es").experience, "Experiencia");
        assert_eq!(section_labels("pt").experience, "Experiencia");
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
        assert_eq!(ExportFormat::Docx.extension(), "docx");
    }
}
