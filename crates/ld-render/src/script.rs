//! Script element writer

use serde_json::Value;
use tracing::trace;

use crate::{Error, Result};

/// MIME type of an embedded JSON-LD block
pub const SCRIPT_TYPE: &str = "application/ld+json";

/// Writer turning JSON-LD documents into script elements
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptWriter {
    pretty: bool,
}

impl ScriptWriter {
    /// Create a writer producing compact JSON
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure indented output
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize a document, keeping key order.
    ///
    /// `</` is written as `<\/` so text taken from a model can never close
    /// the surrounding script element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] when serialization fails.
    pub fn to_json(&self, document: &Value) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        }
        .map_err(|e| Error::Serialize(e.to_string()))?;

        Ok(json.replace("</", "<\\/"))
    }

    /// Serialize a document inside a script element
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] when serialization fails.
    pub fn render(&self, document: &Value) -> Result<String> {
        let json = self.to_json(document)?;
        trace!(bytes = json.len(), "Rendered JSON-LD script");
        Ok(format!(r#"<script type="{SCRIPT_TYPE}">{json}</script>"#))
    }
}

/// Render a document as a compact script element
///
/// # Errors
///
/// Returns [`Error::Serialize`] when serialization fails.
pub fn render_script(document: &Value) -> Result<String> {
    ScriptWriter::new().render(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_compact() {
        let document = json!({
            "@context": "https://schema.org",
            "@type": "PostalAddress",
            "postalCode": "SW1A"
        });

        assert_eq!(
            render_script(&document).unwrap(),
            concat!(
                r#"<script type="application/ld+json">"#,
                r#"{"@context":"https://schema.org","@type":"PostalAddress","postalCode":"SW1A"}"#,
                "</script>"
            )
        );
    }

    #[test]
    fn test_render_pretty() {
        let document = json!({"@context": "https://schema.org", "@type": "Thing"});

        let script = ScriptWriter::new().pretty(true).render(&document).unwrap();
        assert!(script.starts_with("<script type=\"application/ld+json\">{\n  \"@context\""));
        assert!(script.ends_with("}</script>"));
    }

    #[test]
    fn test_closing_tag_is_escaped() {
        let document = json!({"name": "</script><script>alert(1)</script>"});

        let json = ScriptWriter::new().to_json(&document).unwrap();
        assert!(!json.contains("</"));

        let decoded: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn test_slashes_are_not_escaped() {
        let json = ScriptWriter::new()
            .to_json(&json!({"@context": "https://schema.org"}))
            .unwrap();
        assert_eq!(json, r#"{"@context":"https://schema.org"}"#);
    }
}
