//! Integration test: end-to-end schema scenarios
//!
//! Compiles the fixture mappings in `tests/data` and checks the serialized
//! JSON-LD byte for byte.

use ld_mapping::{Mapping, MappingDsl, generate};
use serde_json::{Value, json};
use std::path::PathBuf;

fn load_mapping(file_name: &str) -> Mapping {
    let mapping_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(file_name);
    MappingDsl::parse_file(&mapping_path)
        .unwrap_or_else(|err| panic!("failed to parse {}: {}", mapping_path.display(), err))
}

fn address() -> Value {
    json!({
        "streetAddress": "10 Downing Street",
        "locality": "City of Westminster",
        "region": "London",
        "postalCode": "SW1A"
    })
}

fn render(model: &Value, mapping: &Mapping) -> String {
    let document = generate(model, mapping).expect("mapping should generate");
    serde_json::to_string(&document).expect("document should serialize")
}

#[test]
fn test_simple_schema() {
    let mapping = load_mapping("postal_address.yaml");

    let expected = concat!(
        r#"{"@context":"https://schema.org","#,
        r#""@type":"PostalAddress","#,
        r#""streetAddress":"10 Downing Street","#,
        r#""addressLocality":"City of Westminster","#,
        r#""addressRegion":"London","#,
        r#""postalCode":"SW1A"}"#
    );
    assert_eq!(render(&address(), &mapping), expected);
}

#[test]
fn test_nested_schema() {
    let mapping = load_mapping("government_organization.yaml");
    let model = json!({
        "org": "UK Government",
        "adr": address(),
        "tel": "+44-20-7925-0918"
    });

    let expected = concat!(
        r#"{"@context":"https://schema.org","#,
        r#""@type":"GovernmentOrganization","#,
        r#""name":"UK Government","#,
        r#""address":{"#,
        r#""@type":"PostalAddress","#,
        r#""streetAddress":"10 Downing Street","#,
        r#""addressLocality":"City of Westminster","#,
        r#""addressRegion":"London","#,
        r#""postalCode":"SW1A""#,
        r#"},"#,
        r#""telephone":"+44-20-7925-0918"}"#
    );
    assert_eq!(render(&model, &mapping), expected);
}

#[test]
fn test_enumeration_and_literal() {
    let mapping = load_mapping("product_offer.yaml");
    let model = json!({
        "name": "The Ultimate Product",
        "description": "The only product you will ever need",
        "price": 12.34,
        "currency": "GBP"
    });

    let expected = concat!(
        r#"{"@context":"https://schema.org","#,
        r#""@type":"Product","#,
        r#""name":"The Ultimate Product","#,
        r#""description":"The only product you will ever need","#,
        r#""offers":{"#,
        r#""@type":"Offer","#,
        r#""availability":"https://schema.org/InStock","#,
        r#""price":12.34,"#,
        r#""priceCurrency":"EUR""#,
        r#"}}"#
    );
    assert_eq!(render(&model, &mapping), expected);
}

#[test]
fn test_array_expansion() {
    let mapping = load_mapping("organization_alumni.yaml");
    let alumni: Vec<Value> = (1..=20)
        .map(|i| json!({"givenName": format!("Given{i}"), "familyName": format!("Family{i}")}))
        .collect();
    let model = json!({"name": "University of Somewhere", "alumni": alumni});

    let document = generate(&model, &mapping).unwrap();
    assert_eq!(document["@type"], json!("Organization"));
    assert_eq!(document["name"], json!("University of Somewhere"));

    let people = document["alumni"].as_array().expect("alumni should be an array");
    assert_eq!(people.len(), 20);
    for (i, person) in people.iter().enumerate() {
        assert_eq!(
            person,
            &json!({
                "@type": "Person",
                "givenName": format!("Given{}", i + 1),
                "familyName": format!("Family{}", i + 1)
            })
        );
        let keys: Vec<&str> = person
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["@type", "givenName", "familyName"]);
    }
}

#[test]
fn test_type_list_schema() {
    let mapping = load_mapping("organization_addresses.yaml");
    let model = json!({
        "name": "UK Government",
        "home": {"streetAddress": "10 Downing Street"},
        "work": {"streetAddress": "70 Whitehall", "postalCode": "SW1A 2AS"}
    });

    let expected = concat!(
        r#"{"@context":"https://schema.org","#,
        r#""@type":"Organization","#,
        r#""name":"UK Government","#,
        r#""address":["#,
        r#"{"@type":"PostalAddress","streetAddress":"10 Downing Street"},"#,
        r#"{"@type":"PostalAddress","streetAddress":"70 Whitehall","postalCode":"SW1A 2AS"}"#,
        r#"]}"#
    );
    assert_eq!(render(&model, &mapping), expected);
}

#[test]
fn test_mapping_from_json_text() -> anyhow::Result<()> {
    let mapping = MappingDsl::parse(
        r#"{"PostalAddress": ["streetAddress", {"addressLocality": "locality"}]}"#,
    )?;

    let document = generate(&address(), &mapping)?;
    assert_eq!(
        document,
        json!({
            "@context": "https://schema.org",
            "@type": "PostalAddress",
            "streetAddress": "10 Downing Street",
            "addressLocality": "City of Westminster"
        })
    );
    Ok(())
}

#[test]
fn test_mapping_reused_across_models() {
    let mapping = load_mapping("postal_address.yaml");
    let other = json!({
        "streetAddress": "1600 Pennsylvania Avenue NW",
        "locality": "Washington",
        "region": "DC",
        "postalCode": "20500"
    });

    let first = render(&address(), &mapping);
    let second = render(&other, &mapping);
    assert!(first.contains("SW1A"));
    assert!(second.contains("20500"));
    assert_eq!(render(&address(), &mapping), first);
}

#[test]
fn test_nested_schema_missing_branch_is_reported() {
    let mapping = load_mapping("government_organization.yaml");
    let model = json!({"org": "UK Government", "tel": "+44-20-7925-0918"});

    let err = generate(&model, &mapping).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Path 'adr.streetAddress' not found in model: no value at segment 'adr'"
    );
}

#[test]
fn test_mapping_is_shareable_across_threads() {
    let mapping = std::sync::Arc::new(load_mapping("postal_address.yaml"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mapping = std::sync::Arc::clone(&mapping);
            std::thread::spawn(move || render(&address(), &mapping))
        })
        .collect();

    let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
}
