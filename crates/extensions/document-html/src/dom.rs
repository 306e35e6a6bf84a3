//! Arena DOM built from a scraper parse.

use std::collections::HashSet;

use scraper::{ElementRef, Html};
use tracing::debug;

use formpilot_protocols::{ComputedStyle, DocumentTree, ElementId, FillFeedback, InputEvent};

use crate::style::InlineStyle;

/// Tags whose text never counts as visible content.
const NON_TEXT_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub value: String,
    pub files: Vec<String>,
    pub feedback: Option<FillFeedback>,
    /// Writes are accepted but silently discarded, like a controlled
    /// component that re-renders its own state.
    pub value_locked: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct DomNode {
    pub kind: NodeKind,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// An event recorded by [`FieldPort::dispatch`](formpilot_protocols::FieldPort::dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub element: ElementId,
    pub event: InputEvent,
}

/// Mutable document snapshot parsed from HTML.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    pub(crate) nodes: Vec<DomNode>,
    pub(crate) detached: HashSet<usize>,
    pub(crate) focused: Option<ElementId>,
    pub(crate) events: Vec<DispatchedEvent>,
}

impl HtmlDocument {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut doc = HtmlDocument {
            nodes: Vec::new(),
            detached: HashSet::new(),
            focused: None,
            events: Vec::new(),
        };
        doc.push_element(parsed.root_element(), None);
        doc.initialize_values();
        debug!(
            "Parsed HTML document: {} nodes, {} elements",
            doc.nodes.len(),
            doc.elements().len()
        );
        doc
    }

    fn push_element(&mut self, element: ElementRef<'_>, parent: Option<usize>) -> usize {
        let value = element.value();
        let index = self.push_node(
            NodeKind::Element(ElementData {
                tag: value.name().to_ascii_lowercase(),
                attributes: value
                    .attrs()
                    .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                    .collect(),
                value: String::new(),
                files: Vec::new(),
                feedback: None,
                value_locked: false,
            }),
            parent,
        );

        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                self.push_element(child_element, Some(index));
            } else if let Some(text) = child.value().as_text() {
                let text: &str = &text.text;
                self.push_node(NodeKind::Text(text.to_string()), Some(index));
            }
        }
        index
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(DomNode {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    /// Seed control values from markup.
    fn initialize_values(&mut self) {
        for index in 0..self.nodes.len() {
            let Some(data) = self.element_data(index) else {
                continue;
            };
            let value = match data.tag.as_str() {
                "input" => attr(data, "value").unwrap_or_default().to_string(),
                "textarea" => self.raw_text(index),
                "select" => self.initial_select_value(index),
                _ => continue,
            };
            if let NodeKind::Element(data) = &mut self.nodes[index].kind {
                data.value = value;
            }
        }
    }

    fn initial_select_value(&self, select: usize) -> String {
        let options = self.options(select);
        options
            .iter()
            .find(|(index, _, _)| {
                self.element_data(*index)
                    .is_some_and(|d| attr(d, "selected").is_some())
            })
            .or_else(|| options.first())
            .map(|(_, value, _)| value.clone())
            .unwrap_or_default()
    }

    /// `(node index, value, visible text)` of every option under a select.
    pub(crate) fn options(&self, select: usize) -> Vec<(usize, String, String)> {
        self.descendants(select)
            .into_iter()
            .filter(|index| self.tag_of(*index) == Some("option"))
            .filter_map(|index| {
                let data = self.element_data(index)?;
                let text = collapse_whitespace(&self.raw_text(index));
                let value = attr(data, "value")
                    .map(str::to_string)
                    .unwrap_or_else(|| text.clone());
                Some((index, value, text))
            })
            .collect()
    }

    pub(crate) fn element_data(&self, index: usize) -> Option<&ElementData> {
        match &self.nodes.get(index)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub(crate) fn element_data_mut(&mut self, index: usize) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(index)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    /// Element data for an attached element.
    pub(crate) fn live(&self, element: ElementId) -> Option<&ElementData> {
        if self.detached.contains(&element.0) {
            return None;
        }
        self.element_data(element.0)
    }

    fn tag_of(&self, index: usize) -> Option<&str> {
        self.element_data(index).map(|d| d.tag.as_str())
    }

    fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[index].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next].children.iter().rev().copied());
        }
        out
    }

    fn raw_text(&self, index: usize) -> String {
        let mut out = String::new();
        self.collect_text(index, &mut out);
        out
    }

    fn collect_text(&self, index: usize, out: &mut String) {
        match &self.nodes[index].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(data) => {
                if NON_TEXT_TAGS.contains(&data.tag.as_str()) {
                    return;
                }
                for child in &self.nodes[index].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    // Test and CLI helpers.

    /// First attached element whose `id` attribute matches.
    pub fn find_by_id(&self, id: &str) -> Option<ElementId> {
        self.elements()
            .into_iter()
            .find(|el| self.attribute(*el, "id").as_deref() == Some(id))
    }

    /// First attached element whose `name` attribute matches.
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.elements()
            .into_iter()
            .find(|el| self.attribute(*el, "name").as_deref() == Some(name))
    }

    /// Events dispatched to one element, in order.
    pub fn events_for(&self, element: ElementId) -> Vec<InputEvent> {
        self.events
            .iter()
            .filter(|e| e.element == element)
            .map(|e| e.event)
            .collect()
    }

    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    pub fn feedback(&self, element: ElementId) -> Option<FillFeedback> {
        self.live(element).and_then(|d| d.feedback)
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Detach an element and its subtree.
    pub fn remove(&mut self, element: ElementId) {
        if self.element_data(element.0).is_none() {
            return;
        }
        self.detached.insert(element.0);
        for index in self.descendants(element.0) {
            self.detached.insert(index);
        }
    }

    /// Set or replace an attribute, as a page script would.
    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(data) = self.element_data_mut(element.0) {
            let name = name.to_ascii_lowercase();
            match data.attributes.iter_mut().find(|(n, _)| *n == name) {
                Some(existing) => existing.1 = value.to_string(),
                None => data.attributes.push((name, value.to_string())),
            }
        }
    }

    pub fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(data) = self.element_data_mut(element.0) {
            data.attributes.retain(|(n, _)| n != name);
        }
    }

    /// Make the element discard every value written to it. File inputs
    /// ignore new file lists but can still be cleared.
    pub fn lock_value(&mut self, element: ElementId) {
        if let Some(data) = self.element_data_mut(element.0) {
            data.value_locked = true;
        }
    }
}

fn attr<'a>(data: &'a ElementData, name: &str) -> Option<&'a str> {
    data.attributes
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl DocumentTree for HtmlDocument {
    fn elements(&self) -> Vec<ElementId> {
        (0..self.nodes.len())
            .filter(|index| !self.detached.contains(index))
            .filter(|index| self.element_data(*index).is_some())
            .map(ElementId)
            .collect()
    }

    fn tag_name(&self, element: ElementId) -> Option<String> {
        self.live(element).map(|d| d.tag.clone())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.live(element)
            .and_then(|d| attr(d, &name))
            .map(str::to_string)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.live(element)?;
        self.nodes[element.0].parent.map(ElementId)
    }

    fn previous_siblings(&self, element: ElementId) -> Vec<ElementId> {
        if self.live(element).is_none() {
            return Vec::new();
        }
        let Some(parent) = self.nodes[element.0].parent else {
            return Vec::new();
        };
        let mut siblings: Vec<ElementId> = self.nodes[parent]
            .children
            .iter()
            .take_while(|index| **index != element.0)
            .filter(|index| self.element_data(**index).is_some())
            .filter(|index| !self.detached.contains(*index))
            .map(|index| ElementId(*index))
            .collect();
        siblings.reverse();
        siblings
    }

    fn text_content(&self, element: ElementId) -> String {
        if self.live(element).is_none() {
            return String::new();
        }
        collapse_whitespace(&self.raw_text(element.0))
    }

    fn computed_style(&self, element: ElementId) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        let Some(data) = self.live(element) else {
            style.display = "none".to_string();
            return style;
        };
        if data.tag == "input" && attr(data, "type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")) {
            style.display = "none".to_string();
        }

        let mut visibility: Option<String> = None;
        let mut chain = vec![element.0];
        chain.extend(self.ancestors(element).into_iter().map(|el| el.0));

        for index in chain {
            let Some(node) = self.element_data(index) else {
                continue;
            };
            if attr(node, "hidden").is_some() {
                style.display = "none".to_string();
            }
            if let Some(inline) = attr(node, "style").map(InlineStyle::parse) {
                if inline.display.as_deref() == Some("none") {
                    style.display = "none".to_string();
                } else if index == element.0 {
                    if let Some(display) = inline.display {
                        style.display = display;
                    }
                }
                // Nearest declaration wins for the inherited property.
                if visibility.is_none() {
                    visibility = inline.visibility;
                }
                if let Some(opacity) = inline.opacity {
                    style.opacity *= opacity;
                }
            }
        }

        if let Some(visibility) = visibility {
            style.visibility = visibility;
        }
        style
    }

    fn label_text(&self, element: ElementId) -> Option<String> {
        self.live(element)?;
        if let Some(id) = self.attribute(element, "id").filter(|id| !id.is_empty()) {
            let by_for = self.elements().into_iter().find(|el| {
                self.tag_name(*el).as_deref() == Some("label")
                    && self.attribute(*el, "for").as_deref() == Some(id.as_str())
            });
            if let Some(label) = by_for {
                return Some(self.text_content(label));
            }
        }
        self.closest(element, "label")
            .map(|label| self.text_content(label))
    }

    fn value(&self, element: ElementId) -> Option<String> {
        self.live(element).map(|d| d.value.clone())
    }

    fn selected_text(&self, element: ElementId) -> Option<String> {
        let data = self.live(element)?;
        if data.tag != "select" {
            return None;
        }
        self.options(element.0)
            .into_iter()
            .find(|(_, value, _)| *value == data.value)
            .map(|(_, _, text)| text)
    }

    fn file_names(&self, element: ElementId) -> Vec<String> {
        self.live(element)
            .map(|d| d.files.clone())
            .unwrap_or_default()
    }

    fn is_disabled(&self, element: ElementId) -> bool {
        if self.has_attribute(element, "disabled") {
            return true;
        }
        self.ancestors(element).into_iter().any(|el| {
            self.tag_name(el).as_deref() == Some("fieldset") && self.has_attribute(el, "disabled")
        })
    }
}
