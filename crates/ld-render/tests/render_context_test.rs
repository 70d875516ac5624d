//! Integration test: queued schemas rendered at the end of a page body

use ld_mapping::{Interpreter, InterpretOptions, MappingDsl, MissingPathPolicy};
use ld_render::{Error, RenderContext, ScriptWriter};
use serde_json::json;
use std::sync::Arc;

const PAGE: &str = "<!DOCTYPE html>\n<html>\n<body>\n<h1>Contact</h1>\n</body>\n</html>\n";

#[test]
fn test_schemas_render_in_registration_order() -> anyhow::Result<()> {
    let address = Arc::new(MappingDsl::parse("PostalAddress:\n  - postalCode\n")?);
    let organization = Arc::new(MappingDsl::parse("Organization:\n  name: org\n")?);

    let mut context = RenderContext::new();
    context.add_schema(json!({"org": "UK Government"}), organization);
    context.add_schema(json!({"postalCode": "SW1A"}), address);

    let html = context.inject_into(PAGE)?;
    let expected = concat!(
        "<!DOCTYPE html>\n<html>\n<body>\n<h1>Contact</h1>\n",
        r#"<script type="application/ld+json">"#,
        r#"{"@context":"https://schema.org","@type":"Organization","name":"UK Government"}"#,
        "</script>",
        r#"<script type="application/ld+json">"#,
        r#"{"@context":"https://schema.org","@type":"PostalAddress","postalCode":"SW1A"}"#,
        "</script>",
        "</body>\n</html>\n"
    );
    assert_eq!(html, expected);
    Ok(())
}

#[test]
fn test_independent_contexts_do_not_share_schemas() {
    let mapping = Arc::new(MappingDsl::parse("Thing:\n  - name\n").unwrap());

    let mut first = RenderContext::new();
    first.add_schema(json!({"name": "first"}), Arc::clone(&mapping));
    let second = RenderContext::new();

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert!(first.flush().unwrap().contains("first"));
    assert_eq!(second.flush().unwrap(), "");
}

#[test]
fn test_strict_context_reports_missing_path() {
    let mapping = Arc::new(MappingDsl::parse("Thing:\n  - name\n").unwrap());

    let mut context = RenderContext::new();
    context.add_schema(json!({}), mapping);

    let err = context.flush().unwrap_err();
    assert!(matches!(
        err,
        Error::Mapping(ld_mapping::Error::PathNotFound { .. })
    ));
}

#[test]
fn test_configured_context() {
    let mapping = Arc::new(MappingDsl::parse("Thing:\n  - name\n  - url\n").unwrap());
    let interpreter = Interpreter::with_options(
        InterpretOptions::new().with_missing_path(MissingPathPolicy::Omit),
    );

    let mut context = RenderContext::new()
        .with_interpreter(interpreter)
        .with_writer(ScriptWriter::new().pretty(true));
    context.add_schema(json!({"name": "Widget"}), mapping);

    let scripts = context.flush().unwrap();
    assert!(scripts.contains("\"name\": \"Widget\""));
    assert!(!scripts.contains("url"));
}
