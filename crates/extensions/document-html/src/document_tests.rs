use super::*;
use formpilot_protocols::{
    DocumentTree, ElementId, FieldPort, FileHandle, FillFeedback, InputEvent, PortError,
};

const FORM: &str = r#"
<html><body>
  <form id="apply">
    <label for="first">First name</label>
    <input id="first" name="first_name" type="text" value="Ada">
    <label>Email <input id="email" type="email" name="email"></label>
    <input id="zip" name="zip" maxlength="5">
    <input id="token" type="hidden" name="csrf" value="abc">
    <div style="display: none"><input id="ghost" name="ghost"></div>
    <input id="faded" style="opacity: 0">
    <input id="locked" readonly value="fixed">
    <select id="state" name="state">
      <option value="">Choose</option>
      <option value="CA">California</option>
      <option value="NY" selected>New York</option>
    </select>
    <fieldset disabled><input id="inside" name="inside"></fieldset>
    <textarea id="letter">  Dear team  </textarea>
    <input id="cv" type="file" name="resume">
    <script>var secret = "hidden text";</script>
  </form>
</body></html>
"#;

fn doc() -> HtmlDocument {
    HtmlDocument::parse(FORM)
}

fn id(doc: &HtmlDocument, id: &str) -> ElementId {
    doc.find_by_id(id).unwrap()
}

#[test]
fn test_parse_initial_values() {
    let doc = doc();
    assert_eq!(doc.value(id(&doc, "first")).as_deref(), Some("Ada"));
    assert_eq!(doc.value(id(&doc, "state")).as_deref(), Some("NY"));
    assert_eq!(doc.value(id(&doc, "letter")).as_deref(), Some("  Dear team  "));
    assert_eq!(doc.value(id(&doc, "email")).as_deref(), Some(""));
}

#[test]
fn test_elements_in_document_order() {
    let doc = doc();
    let elements = doc.elements();
    let first = id(&doc, "first");
    let cv = id(&doc, "cv");
    let first_pos = elements.iter().position(|e| *e == first).unwrap();
    let cv_pos = elements.iter().position(|e| *e == cv).unwrap();
    assert!(first_pos < cv_pos);
    assert_eq!(doc.tag_name(elements[0]).as_deref(), Some("html"));
}

#[test]
fn test_label_lookup() {
    let doc = doc();
    assert_eq!(doc.label_text(id(&doc, "first")).as_deref(), Some("First name"));
    assert_eq!(doc.label_text(id(&doc, "email")).as_deref(), Some("Email"));
    assert_eq!(doc.label_text(id(&doc, "zip")), None);
}

#[test]
fn test_computed_style() {
    let doc = doc();
    assert!(doc.computed_style(id(&doc, "first")).is_rendered());
    assert!(!doc.computed_style(id(&doc, "token")).is_rendered());
    assert!(!doc.computed_style(id(&doc, "ghost")).is_rendered());
    assert!(!doc.computed_style(id(&doc, "faded")).is_rendered());
}

#[test]
fn test_disabled_fieldset() {
    let doc = doc();
    assert!(doc.is_disabled(id(&doc, "inside")));
    assert!(!doc.is_disabled(id(&doc, "first")));
    assert!(doc.is_read_only(id(&doc, "locked")));
}

#[test]
fn test_text_content_skips_scripts() {
    let doc = doc();
    let form = id(&doc, "apply");
    let text = doc.text_content(form);
    assert!(text.contains("First name"));
    assert!(!text.contains("secret"));
}

#[test]
fn test_previous_siblings_nearest_first() {
    let doc = doc();
    let siblings = doc.previous_siblings(id(&doc, "first"));
    assert_eq!(siblings.len(), 1);
    assert_eq!(doc.tag_name(siblings[0]).as_deref(), Some("label"));
}

#[test]
fn test_previous_siblings_order_and_removal() {
    let mut doc = doc();
    let zip = id(&doc, "zip");
    let first = id(&doc, "first");

    let siblings = doc.previous_siblings(zip);
    assert_eq!(siblings.len(), 3);
    assert_eq!(doc.tag_name(siblings[0]).as_deref(), Some("label"));
    assert_eq!(siblings[1], first);
    assert_eq!(doc.tag_name(siblings[2]).as_deref(), Some("label"));

    doc.remove(first);
    let siblings = doc.previous_siblings(zip);
    assert_eq!(siblings.len(), 2);
    assert!(!siblings.contains(&first));
}

#[test]
fn test_set_value_truncates_to_maxlength() {
    let mut doc = doc();
    let zip = id(&doc, "zip");
    doc.set_value(zip, "9410512").unwrap();
    assert_eq!(doc.value(zip).as_deref(), Some("94105"));
}

#[test]
fn test_set_value_rejects_readonly() {
    let mut doc = doc();
    let locked = id(&doc, "locked");
    let err = doc.set_value(locked, "new").unwrap_err();
    assert!(err.to_string().contains("read-only"));
    assert_eq!(doc.value(locked).as_deref(), Some("fixed"));
}

#[test]
fn test_select_matches_value_or_text() {
    let mut doc = doc();
    let state = id(&doc, "state");
    doc.set_value(state, "california").unwrap();
    assert_eq!(doc.value(state).as_deref(), Some("CA"));
    doc.set_value(state, "NY").unwrap();
    assert_eq!(doc.value(state).as_deref(), Some("NY"));
    doc.set_value(state, "Texas").unwrap();
    assert_eq!(doc.value(state).as_deref(), Some("NY"));
    assert_eq!(doc.selected_text(state).as_deref(), Some("New York"));
    assert_eq!(doc.selected_text(id(&doc, "first")), None);
}

#[test]
fn test_locked_value_ignores_writes() {
    let mut doc = doc();
    let first = id(&doc, "first");
    doc.lock_value(first);
    doc.set_value(first, "Grace").unwrap();
    assert_eq!(doc.value(first).as_deref(), Some("Ada"));
}

#[test]
fn test_removed_element_is_gone() {
    let mut doc = doc();
    let first = id(&doc, "first");
    doc.remove(first);
    assert!(!doc.elements().contains(&first));
    assert!(matches!(
        doc.set_value(first, "x"),
        Err(PortError::ElementGone(_))
    ));
    assert_eq!(doc.value(first), None);
}

#[test]
fn test_events_are_logged() {
    let mut doc = doc();
    let email = id(&doc, "email");
    doc.focus(email).unwrap();
    assert_eq!(doc.focused(), Some(email));
    doc.dispatch(email, InputEvent::Input).unwrap();
    doc.dispatch(email, InputEvent::Change).unwrap();
    doc.blur(email).unwrap();
    assert_eq!(doc.focused(), None);
    assert_eq!(doc.events_for(email), vec![InputEvent::Input, InputEvent::Change]);
}

#[test]
fn test_set_files_only_on_file_inputs() {
    let mut doc = doc();
    let cv = id(&doc, "cv");
    let file = FileHandle {
        name: "cv.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        data: Default::default(),
        last_modified: 0,
    };
    doc.set_files(cv, vec![file.clone()]).unwrap();
    assert_eq!(doc.file_names(cv), vec!["cv.pdf".to_string()]);

    let err = doc.set_files(id(&doc, "first"), vec![file]).unwrap_err();
    assert!(matches!(err, PortError::Unsupported { .. }));
}

#[test]
fn test_feedback_marks_element() {
    let mut doc = doc();
    let email = id(&doc, "email");
    doc.show_feedback(email, FillFeedback::Success).unwrap();
    assert_eq!(doc.feedback(email), Some(FillFeedback::Success));
    assert_eq!(
        doc.attribute(email, "data-formpilot-fill").as_deref(),
        Some("success")
    );
}
