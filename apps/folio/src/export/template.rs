//! Cosmetic export templates: named color triples applied by the exporters.
//! Templates change nothing but colors; layout is identical across them.

/// RGB color triple.
pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateColors {
    pub name: &'static str,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
}

pub const DEFAULT_TEMPLATE: &str = "professional";

// The default template is the first entry; unknown names resolve to it.
const TEMPLATES: &[TemplateColors] = &[
    TemplateColors {
        name: "professional",
        primary: (52, 152, 219),
        secondary: (44, 62, 80),
        accent: (231, 76, 60),
    },
    TemplateColors {
        name: "modern",
        primary: (108, 92, 231),
        secondary: (162, 155, 254),
        accent: (230, 126, 34),
    },
    TemplateColors {
        name: "minimalist",
        primary: (0, 210, 211),
        secondary: (10, 189, 227),
        accent: (46, 204, 113),
    },
];

/// Resolves a template by name; unknown names fall back to the default.
pub fn template_colors(name: &str) -> &'static TemplateColors {
    TEMPLATES
        .iter()
        .find(|template| template.name == name)
        .unwrap_or(&TEMPLATES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_templates_resolve_by_name() {
        assert_eq!(template_colors("modern").name, "modern");
        assert_eq!(template_colors("minimalist").primary, (0, 210, 211));
    }

    #[test]
    fn test_unknown_template_falls_back_to_default() {
        let fallback = template_colors("corporate-zebra");
        assert_eq!(fallback.name, DEFAULT_TEMPLATE);
        assert_eq!(fallback, template_colors(DEFAULT_TEMPLATE));
    }
}
