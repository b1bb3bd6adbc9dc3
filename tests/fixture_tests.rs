use mdsite::markdown_to_html;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct FixtureCase {
    name: String,
    markdown: String,
    html: String,
}

#[test]
fn fixture_documents_render_exactly() {
    let data = fs::read_to_string("tests/data/cases.json").expect("Failed to read cases.json");
    let cases: Vec<FixtureCase> = serde_json::from_str(&data).expect("Failed to parse cases.json");

    for case in &cases {
        let html = markdown_to_html(&case.markdown)
            .unwrap_or_else(|e| panic!("case {:?} failed to convert: {}", case.name, e));
        assert_eq!(html, case.html, "case {:?} rendered wrong output", case.name);
    }
}
