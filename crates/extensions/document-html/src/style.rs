//! Inline style parsing.

/// Declarations from an inline `style` attribute that affect rendering.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct InlineStyle {
    pub display: Option<String>,
    pub visibility: Option<String>,
    pub opacity: Option<f64>,
}

impl InlineStyle {
    pub fn parse(style: &str) -> Self {
        let mut out = InlineStyle::default();
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();
            match property.as_str() {
                "display" => out.display = Some(value),
                "visibility" => out.visibility = Some(value),
                "opacity" => out.opacity = value.parse::<f64>().ok().map(|o| o.clamp(0.0, 1.0)),
                _ => {}
            }
        }
        out
    }
}
