//! Whether an element can be written to right now.
//!
//! Checked during the scan and again immediately before every write, since
//! the page may change in between.

use std::fmt;

use formpilot_protocols::{DocumentTree, ElementId};

/// Structural kinds that can hold a profile value.
pub const FILLABLE_TAGS: [&str; 3] = ["input", "textarea", "select"];

/// Input types that are never filled with a profile value. `file` inputs are
/// handled by the upload classifier instead.
pub const DISALLOWED_INPUT_TYPES: [&str; 8] = [
    "hidden", "submit", "button", "reset", "file", "image", "checkbox", "radio",
];

/// Reason an element failed the fillability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFillable {
    Detached,
    Tag(String),
    InputType(String),
    NotRendered,
    Disabled,
    ReadOnly,
}

impl fmt::Display for NotFillable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFillable::Detached => write!(f, "element is no longer attached"),
            NotFillable::Tag(tag) => write!(f, "<{}> is not a form control", tag),
            NotFillable::InputType(t) => write!(f, "input type '{}' is not fillable", t),
            NotFillable::NotRendered => write!(f, "element is not rendered"),
            NotFillable::Disabled => write!(f, "element is disabled"),
            NotFillable::ReadOnly => write!(f, "element is read-only"),
        }
    }
}

/// Check every fillability rule, reporting the first that fails.
pub fn check_fillable<D>(doc: &D, element: ElementId) -> Result<(), NotFillable>
where
    D: DocumentTree + ?Sized,
{
    let Some(tag) = doc.tag_name(element) else {
        return Err(NotFillable::Detached);
    };
    if !FILLABLE_TAGS.contains(&tag.as_str()) {
        return Err(NotFillable::Tag(tag));
    }
    if tag == "input" {
        let input_type = doc
            .attribute(element, "type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if DISALLOWED_INPUT_TYPES.contains(&input_type.as_str()) {
            return Err(NotFillable::InputType(input_type));
        }
    }
    if !doc.computed_style(element).is_rendered() {
        return Err(NotFillable::NotRendered);
    }
    if doc.is_disabled(element) {
        return Err(NotFillable::Disabled);
    }
    if doc.is_read_only(element) {
        return Err(NotFillable::ReadOnly);
    }
    Ok(())
}

pub fn is_fillable<D>(doc: &D, element: ElementId) -> bool
where
    D: DocumentTree + ?Sized,
{
    check_fillable(doc, element).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formpilot_document_html::HtmlDocument;

    const PAGE: &str = r#"
<html><body><form>
  <input id="text" name="a">
  <input id="email" type="email">
  <select id="select"><option>A</option></select>
  <textarea id="area"></textarea>
  <input id="hidden" type="hidden">
  <input id="submit" type="submit">
  <input id="check" type="checkbox">
  <input id="file" type="file">
  <input id="invisible" style="visibility:hidden">
  <input id="transparent" style="opacity:0">
  <div style="display:none"><input id="nested"></div>
  <input id="disabled" disabled>
  <input id="readonly" readonly>
  <fieldset disabled><input id="fieldset"></fieldset>
  <div id="div">text</div>
</form></body></html>
"#;

    fn check(id: &str) -> Result<(), NotFillable> {
        let doc = HtmlDocument::parse(PAGE);
        let el = doc.find_by_id(id).unwrap();
        check_fillable(&doc, el)
    }

    #[test]
    fn test_allowed_kinds_pass() {
        for id in ["text", "email", "select", "area"] {
            assert_eq!(check(id), Ok(()), "{id}");
        }
    }

    #[test]
    fn test_disallowed_input_types() {
        assert_eq!(check("hidden"), Err(NotFillable::InputType("hidden".into())));
        assert_eq!(check("submit"), Err(NotFillable::InputType("submit".into())));
        assert_eq!(check("check"), Err(NotFillable::InputType("checkbox".into())));
        assert_eq!(check("file"), Err(NotFillable::InputType("file".into())));
    }

    #[test]
    fn test_not_rendered() {
        assert_eq!(check("invisible"), Err(NotFillable::NotRendered));
        assert_eq!(check("transparent"), Err(NotFillable::NotRendered));
        assert_eq!(check("nested"), Err(NotFillable::NotRendered));
    }

    #[test]
    fn test_disabled_and_readonly() {
        assert_eq!(check("disabled"), Err(NotFillable::Disabled));
        assert_eq!(check("fieldset"), Err(NotFillable::Disabled));
        assert_eq!(check("readonly"), Err(NotFillable::ReadOnly));
    }

    #[test]
    fn test_wrong_tag() {
        assert_eq!(check("div"), Err(NotFillable::Tag("div".into())));
    }

    #[test]
    fn test_detached_element() {
        let mut doc = HtmlDocument::parse(PAGE);
        let el = doc.find_by_id("text").unwrap();
        doc.remove(el);
        assert_eq!(check_fillable(&doc, el), Err(NotFillable::Detached));
        assert!(!is_fillable(&doc, el));
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(NotFillable::ReadOnly.to_string(), "element is read-only");
        assert!(NotFillable::Tag("div".into()).to_string().contains("<div>"));
    }
}
