use serde::{Deserialize, Serialize};

/// One localized CV content document, as served from `data/lang/<code>.json`.
///
/// Sections the source does not provide deserialize to their empty defaults,
/// so a sparse document still renders and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub about: About,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<ToolCategory>,
    #[serde(default)]
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub email: String,
}

/// One position, newest first in the source documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub period: String,
    /// Bullet points describing the position.
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub icon: String,
    /// Display text for the link.
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCategory {
    pub category: String,
    #[serde(default)]
    pub items: Vec<ToolItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolItem {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

/// Localized labels for the contact section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name_field: String,
    #[serde(default)]
    pub email_field: String,
    #[serde(default)]
    pub message_field: String,
    #[serde(default)]
    pub send: String,
}

impl ContentDocument {
    /// Number of non-empty sections besides `about`, handy for log summaries.
    pub fn section_count(&self) -> usize {
        [
            !self.experience.is_empty(),
            !self.projects.is_empty(),
            !self.skills.is_empty(),
            !self.tools.is_empty(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_document() {
        let json = r#"{
            "about": {
                "name": "Ada Example",
                "title": "Data Engineer",
                "location": "Madrid",
                "description": "Builds pipelines.",
                "email": "ada@example.com"
            },
            "experience": [
                {
                    "title": "Lead",
                    "company": "Acme",
                    "period": "2020 - 2024",
                    "description": ["Did the thing", "Did it again"]
                }
            ],
            "projects": [
                {
                    "title": "ETL kit",
                    "description": "Toolkit",
                    "link": "https://example.com",
                    "icon": "fas fa-code",
                    "text": "Repo"
                }
            ],
            "skills": ["SQL", "Rust"],
            "tools": [
                {
                    "category": "Cloud",
                    "items": [{"name": "GCP", "icon": "fab fa-google"}]
                }
            ],
            "contact": {
                "name_field": "Nombre",
                "email_field": "Email",
                "message_field": "Mensaje",
                "send": "Enviar"
            }
        }"#;

        let document: ContentDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document.about.name, "Ada Example");
        assert_eq!(document.experience[0].description.len(), 2);
        assert_eq!(document.tools[0].items[0].name, "GCP");
        assert_eq!(document.section_count(), 4);
    }

    #[test]
    fn test_sparse_document_uses_defaults() {
        let json = r#"{
            "about": {
                "name": "Ada Example",
                "title": "Data Engineer",
                "description": "Builds pipelines."
            }
        }"#;

        let document: ContentDocument = serde_json::from_str(json).unwrap();
        assert!(document.about.location.is_empty());
        assert!(document.experience.is_empty());
        assert!(document.skills.is_empty());
        assert_eq!(document.contact, Contact::default());
        assert_eq!(document.section_count(), 0);
    }

    #[test]
    fn test_document_without_about_is_rejected() {
        let err = serde_json::from_str::<ContentDocument>(r#"{"skills": []}"#);
        assert!(err.is_err());
    }
}
