use crate::models::content::{About, Contact, ContentDocument};

/// Minimal built-in document for the default language — the terminal step of
/// the fallback chain, so a caller is never left without renderable content.
pub fn builtin_document() -> ContentDocument {
    ContentDocument {
        about: About {
            name: "Jose Carlos Castillo (PepeCharly)".to_string(),
            title: "Líder Técnico | Data Engineer especializado en ETL, Big Data & GCP"
                .to_string(),
            location: String::new(),
            description: "Profesional altamente calificado en ingeniería de datos con más de \
                          10 años de experiencia en diseño y operación de pipelines ETL."
                .to_string(),
            email: String::new(),
        },
        experience: Vec::new(),
        projects: Vec::new(),
        skills: Vec::new(),
        tools: Vec::new(),
        contact: Contact::default(),
    }
}
