//! Candidate elements and the static signals captured from them.

use formpilot_protocols::{DocumentTree, ElementId};

use crate::text::{compact, normalize, truncate_chars};

/// Tags that stop the context walk; their text covers the whole form.
const CONTEXT_BOUNDARY_TAGS: [&str; 3] = ["form", "body", "html"];

/// How many ancestor levels contribute context text.
const CONTEXT_ANCESTOR_LEVELS: usize = 3;

/// How many preceding siblings contribute context text.
const CONTEXT_SIBLING_COUNT: usize = 2;

/// Length caps applied to gathered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCaps {
    /// Per-ancestor cap for context text.
    pub context: usize,
    /// Per-sibling cap.
    pub sibling: usize,
}

impl Default for TextCaps {
    fn default() -> Self {
        Self {
            context: 150,
            sibling: 100,
        }
    }
}

/// One element considered as a possible field, with the signals every
/// classifier reads.
///
/// Captured once per scan. Holds only a structural reference to the element.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateElement {
    pub element: ElementId,
    pub tag: String,
    /// Lowercased `type` attribute, `None` when absent.
    pub input_type: Option<String>,
    pub name: String,
    pub id: String,
    pub class: String,
    pub placeholder: String,
    pub aria_label: String,
    pub label: String,
    /// Text of the nearest preceding sibling element.
    pub sibling_text: String,
    /// Lowercased text of up to three ancestors and two preceding siblings.
    pub context_text: String,
    /// Enclosing `<form>`, if any.
    pub form: Option<ElementId>,
}

impl CandidateElement {
    pub fn capture<D>(doc: &D, element: ElementId, caps: TextCaps) -> Self
    where
        D: DocumentTree + ?Sized,
    {
        let attr = |name: &str| doc.attribute(element, name).unwrap_or_default();
        let siblings = doc.previous_siblings(element);

        let sibling_text = siblings
            .first()
            .map(|s| truncate_chars(&doc.text_content(*s), caps.sibling).to_string())
            .unwrap_or_default();

        let mut context = Vec::new();
        for ancestor in doc.ancestors(element).into_iter().take(CONTEXT_ANCESTOR_LEVELS) {
            let tag = doc.tag_name(ancestor).unwrap_or_default();
            if CONTEXT_BOUNDARY_TAGS.contains(&tag.as_str()) {
                break;
            }
            let text = doc.text_content(ancestor);
            context.push(truncate_chars(&text, caps.context).to_string());
        }
        for sibling in siblings.iter().take(CONTEXT_SIBLING_COUNT) {
            let text = doc.text_content(*sibling);
            context.push(truncate_chars(&text, caps.sibling).to_string());
        }

        Self {
            element,
            tag: doc.tag_name(element).unwrap_or_default(),
            input_type: doc
                .attribute(element, "type")
                .map(|t| t.trim().to_ascii_lowercase()),
            name: attr("name"),
            id: attr("id"),
            class: attr("class"),
            placeholder: attr("placeholder"),
            aria_label: attr("aria-label"),
            label: doc.label_text(element).unwrap_or_default(),
            sibling_text,
            context_text: normalize(&context.join(" ")),
            form: doc.closest(element, "form"),
        }
    }

    /// Compact identifier string: each signal compacted separately, joined by
    /// spaces so no pattern can match across two signals.
    pub fn identifier(&self) -> String {
        [
            &self.name,
            &self.id,
            &self.class,
            &self.placeholder,
            &self.aria_label,
            &self.label,
            &self.sibling_text,
        ]
        .iter()
        .map(|s| compact(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Compact `name`/`id`/`class` only.
    pub fn structural_identifier(&self) -> String {
        [&self.name, &self.id, &self.class]
            .iter()
            .map(|s| compact(s))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `type` attribute with HTML's default for inputs.
    pub fn effective_input_type(&self) -> &str {
        match &self.input_type {
            Some(t) if !t.is_empty() => t,
            _ => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formpilot_document_html::HtmlDocument;

    const PAGE: &str = r#"
<html><body><form>
  <div class="row">
    <span>Contact</span>
    <label for="mail">Your e-mail</label>
    <input id="mail" name="user_email" class="form-control wide" placeholder="name@example.com" aria-label="Email">
  </div>
  <input id="bare">
</form>
<input id="outside" type="TEL">
</body></html>
"#;

    #[test]
    fn test_capture_signals() {
        let doc = HtmlDocument::parse(PAGE);
        let el = doc.find_by_id("mail").unwrap();
        let c = CandidateElement::capture(&doc, el, TextCaps::default());
        assert_eq!(c.tag, "input");
        assert_eq!(c.name, "user_email");
        assert_eq!(c.label, "Your e-mail");
        assert_eq!(c.sibling_text, "Your e-mail");
        assert!(c.context_text.contains("contact"));
        assert!(c.form.is_some());
        assert_eq!(c.effective_input_type(), "text");
    }

    #[test]
    fn test_identifier_is_compact_per_signal() {
        let doc = HtmlDocument::parse(PAGE);
        let el = doc.find_by_id("mail").unwrap();
        let c = CandidateElement::capture(&doc, el, TextCaps::default());
        let identifier = c.identifier();
        assert!(identifier.starts_with("useremail mail formcontrolwide"));
        assert!(identifier.contains("youremail"));
        assert_eq!(c.structural_identifier(), "useremail mail formcontrolwide");
    }

    #[test]
    fn test_context_stops_at_form() {
        let doc = HtmlDocument::parse(
            r#"<form><input id="lead"><p>Email address and phone</p></form>"#,
        );
        let el = doc.find_by_id("lead").unwrap();
        let c = CandidateElement::capture(&doc, el, TextCaps::default());
        assert_eq!(c.context_text, "");
    }

    #[test]
    fn test_capture_outside_form() {
        let doc = HtmlDocument::parse(PAGE);
        let el = doc.find_by_id("outside").unwrap();
        let c = CandidateElement::capture(&doc, el, TextCaps::default());
        assert_eq!(c.form, None);
        assert_eq!(c.input_type.as_deref(), Some("tel"));
    }

    #[test]
    fn test_text_caps_apply() {
        let doc = HtmlDocument::parse(PAGE);
        let el = doc.find_by_id("mail").unwrap();
        let caps = TextCaps {
            context: 4,
            sibling: 4,
        };
        let c = CandidateElement::capture(&doc, el, caps);
        assert_eq!(c.sibling_text, "Your");
    }
}
