use super::*;
use formpilot_document_html::HtmlDocument;

const PAGE: &str = r#"
<html><body>
  <form id="apply">
    <input id="plain">
    <input id="email" type="email" name="email">
    <input id="age" type="number" name="age" placeholder="Your age">
    <input id="dob" type="date" name="dob">
    <input id="zip" type="number" name="zip_code">
    <textarea id="letter"></textarea>
    <select id="state"><option>CA</option></select>
    <input id="agree" type="checkbox" name="agree">
  </form>
  <div class="search-form"><input id="search" type="password" placeholder="Phone number"></div>
  <div id="email_block" class="email-wrapper">contact</div>
</body></html>
"#;

fn inventory() -> ElementInventory {
    ElementInventory::new(ClassifierTables::builtin(), TextCaps::default())
}

fn ids(doc: &HtmlDocument, elements: &[ElementId]) -> Vec<String> {
    elements
        .iter()
        .map(|el| doc.attribute(*el, "id").unwrap_or_default())
        .collect()
}

#[test]
fn test_by_type_allow_list() {
    let doc = HtmlDocument::parse(PAGE);
    let found = ids(&doc, &inventory().by_type(&doc));
    assert_eq!(found, vec!["plain", "email", "letter", "state"]);
}

#[test]
fn test_by_container_context_requires_relevance() {
    let doc = HtmlDocument::parse(PAGE);
    let found = ids(&doc, &inventory().by_container_context(&doc));
    assert!(found.contains(&"zip".to_string()));
    assert!(found.contains(&"search".to_string()));
    assert!(found.contains(&"email".to_string()));
    assert!(!found.contains(&"dob".to_string()));
    assert!(!found.contains(&"age".to_string()));
}

#[test]
fn test_by_attribute_pattern_includes_non_controls() {
    let doc = HtmlDocument::parse(PAGE);
    let found = ids(&doc, &inventory().by_attribute_pattern(&doc));
    assert!(found.contains(&"email_block".to_string()));
    assert!(found.contains(&"zip".to_string()));
    assert!(!found.contains(&"plain".to_string()));
}

#[test]
fn test_discover_is_deduplicated_and_ordered() {
    let doc = HtmlDocument::parse(PAGE);
    let candidates = inventory().discover(&doc);
    let mut elements: Vec<ElementId> = candidates.iter().map(|c| c.element).collect();
    let original = elements.clone();
    elements.sort();
    elements.dedup();
    assert_eq!(elements, original);
    let email_hits = candidates.iter().filter(|c| c.id == "email").count();
    assert_eq!(email_hits, 1);
}

#[test]
fn test_discover_is_idempotent() {
    let doc = HtmlDocument::parse(PAGE);
    let inventory = inventory();
    let first = inventory.discover(&doc);
    let second = inventory.discover(&doc);
    assert_eq!(first.len(), second.len());
    assert_eq!(first, second);
}

#[test]
fn test_empty_document() {
    let doc = HtmlDocument::parse("<html><body></body></html>");
    assert!(inventory().discover(&doc).is_empty());
}
