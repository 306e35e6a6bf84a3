//! Element inventory: every element that could plausibly be a field.
//!
//! Three independent discovery strategies are unioned and deduplicated by
//! element identity. The result is sorted into document order so downstream
//! processing is deterministic.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use formpilot_protocols::{DocumentTree, ElementId};

use crate::candidate::{CandidateElement, TextCaps};
use crate::tables::ClassifierTables;
use crate::text::compact;

/// Input types discovered by the type allow-list strategy. The empty string
/// stands for an input without a `type` attribute.
const ALLOWED_INPUT_TYPES: [&str; 6] = ["text", "email", "tel", "url", "search", ""];

const CONTROL_TAGS: [&str; 3] = ["input", "textarea", "select"];

/// Walks a document and produces candidate elements.
pub struct ElementInventory {
    tables: Arc<ClassifierTables>,
    caps: TextCaps,
}

impl ElementInventory {
    pub fn new(tables: Arc<ClassifierTables>, caps: TextCaps) -> Self {
        Self { tables, caps }
    }

    /// Union of all strategies, in document order.
    pub fn discover<D>(&self, doc: &D) -> Vec<CandidateElement>
    where
        D: DocumentTree + ?Sized,
    {
        let mut found: BTreeSet<ElementId> = BTreeSet::new();
        let by_type = self.by_type(doc);
        let by_context = self.by_container_context(doc);
        let by_attribute = self.by_attribute_pattern(doc);
        debug!(
            by_type = by_type.len(),
            by_context = by_context.len(),
            by_attribute = by_attribute.len(),
            "Inventory strategies complete"
        );
        found.extend(by_type);
        found.extend(by_context);
        found.extend(by_attribute);

        found
            .into_iter()
            .map(|el| CandidateElement::capture(doc, el, self.caps))
            .collect()
    }

    /// Known-fillable control kinds.
    pub fn by_type<D>(&self, doc: &D) -> Vec<ElementId>
    where
        D: DocumentTree + ?Sized,
    {
        doc.elements()
            .into_iter()
            .filter(|el| match doc.tag_name(*el).as_deref() {
                Some("input") => {
                    let input_type = doc
                        .attribute(*el, "type")
                        .map(|t| t.trim().to_ascii_lowercase())
                        .unwrap_or_default();
                    ALLOWED_INPUT_TYPES.contains(&input_type.as_str())
                }
                Some("textarea") | Some("select") => true,
                _ => false,
            })
            .collect()
    }

    /// Controls inside a form-like container, or carrying a placeholder or
    /// aria-label, that look like a form field.
    pub fn by_container_context<D>(&self, doc: &D) -> Vec<ElementId>
    where
        D: DocumentTree + ?Sized,
    {
        doc.elements()
            .into_iter()
            .filter(|el| {
                doc.tag_name(*el)
                    .is_some_and(|tag| CONTROL_TAGS.contains(&tag.as_str()))
            })
            .filter(|el| {
                in_form_container(doc, *el)
                    || doc.has_attribute(*el, "placeholder")
                    || doc.has_attribute(*el, "aria-label")
            })
            .filter(|el| {
                let candidate = CandidateElement::capture(doc, *el, self.caps);
                self.is_likely_form_field(&candidate)
            })
            .collect()
    }

    /// Any element whose `name`, `id` or `class` contains a field-name hint.
    pub fn by_attribute_pattern<D>(&self, doc: &D) -> Vec<ElementId>
    where
        D: DocumentTree + ?Sized,
    {
        doc.elements()
            .into_iter()
            .filter(|el| {
                ["name", "id", "class"].iter().any(|attr| {
                    doc.attribute(*el, attr).is_some_and(|value| {
                        let value = compact(&value);
                        self.tables
                            .inventory_hints
                            .iter()
                            .any(|hint| value.contains(hint.as_str()))
                    })
                })
            })
            .collect()
    }

    /// Binary relevance gate: any field pattern in the identifier, or any
    /// context phrase in the surrounding text.
    pub fn is_likely_form_field(&self, candidate: &CandidateElement) -> bool {
        let identifier = candidate.identifier();
        let by_pattern = self.tables.field_patterns.iter().any(|entry| {
            entry
                .patterns
                .iter()
                .any(|p| identifier.contains(p.as_str()))
        });
        by_pattern
            || self.tables.context_phrases.iter().any(|entry| {
                entry
                    .phrases
                    .iter()
                    .any(|p| candidate.context_text.contains(p.as_str()))
            })
    }
}

/// Inside a `<form>`, an element with `role="form"`, or a container whose id
/// or class mentions "form".
fn in_form_container<D>(doc: &D, element: ElementId) -> bool
where
    D: DocumentTree + ?Sized,
{
    doc.ancestors(element).into_iter().any(|ancestor| {
        doc.tag_name(ancestor).as_deref() == Some("form")
            || doc
                .attribute(ancestor, "role")
                .is_some_and(|r| r.eq_ignore_ascii_case("form"))
            || ["id", "class"].iter().any(|attr| {
                doc.attribute(ancestor, attr)
                    .is_some_and(|v| v.to_ascii_lowercase().contains("form"))
            })
    })
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
