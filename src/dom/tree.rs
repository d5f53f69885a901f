//! Arena-backed HTML document model
//!
//! Every node lives in a single arena owned by [`Document`] and is addressed
//! by a copyable [`NodeId`]. Detached nodes stay allocated but are no longer
//! reachable from the document root, so they never show up in traversals or
//! serialized output.

use crate::error::{AppError, Result};
use std::fmt;

/// Handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Element name plus attributes in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementData {
    pub name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        ElementData {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(attr_name, _)| attr_name == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self
            .attrs
            .iter()
            .position(|(attr_name, _)| attr_name == name)?;
        Some(self.attrs.remove(pos).1)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Whether a whitespace-separated token list attribute contains `token`
    pub fn has_token(&self, name: &str, token: &str) -> bool {
        self.attr(name)
            .map(|value| value.split_whitespace().any(|t| t == token))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
struct NodeSlot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeSlot>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only its root node
    pub fn new() -> Self {
        Document {
            nodes: vec![NodeSlot {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|el| el.is(name))
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        let description = self.describe(id);
        let element = self
            .element_mut(id)
            .ok_or(AppError::NotAnElement(description))?;
        element.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id).and_then(|el| el.remove_attr(name))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeSlot {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.push(NodeKind::Element(data))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    pub fn create_doctype(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Doctype(name.into()))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Append `child` as the last child of `parent`, moving it if it already
    /// has a parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            parent != child && !self.ancestors(parent).any(|a| a == child),
            "appending {} under {} would create a cycle",
            child,
            parent
        );
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove a node (and its subtree) from its parent
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    /// Whether the node is reachable from the document root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root();
        id == root || self.ancestors(id).any(|a| a == root)
    }

    /// Live descendants of `scope` in document order, excluding `scope`
    ///
    /// Nested `<template>` elements are yielded but their content is inert
    /// and never entered.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();

        while let Some(next) = stack.pop() {
            out.push(next);
            if !self.is_element_named(next, "template") {
                stack.extend(self.children(next).iter().rev().copied());
            }
        }

        out
    }

    /// First live descendant element matching `pred`
    pub fn find_first(
        &self,
        scope: NodeId,
        pred: impl Fn(&ElementData) -> bool,
    ) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.element(*id).is_some_and(&pred))
    }

    /// All live descendant elements matching `pred`, in document order
    pub fn find_all(&self, scope: NodeId, pred: impl Fn(&ElementData) -> bool) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(&pred))
            .collect()
    }

    /// Nearest inclusive ancestor element matching `pred`
    pub fn closest(&self, id: NodeId, pred: impl Fn(&ElementData) -> bool) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.element(*n).is_some_and(&pred))
    }

    /// Short human-readable description used in logs and errors
    pub fn describe(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Document => "#document".to_string(),
            NodeKind::Doctype(_) => "#doctype".to_string(),
            NodeKind::Text(_) => "#text".to_string(),
            NodeKind::Comment(_) => "#comment".to_string(),
            NodeKind::Element(el) => match el.attr("id") {
                Some(html_id) => format!("<{} id=\"{}\">", el.name, html_id),
                None => format!("<{}>", el.name),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element(ElementData::new("div").with_attr("id", "outer"));
        let span = doc.create_element(ElementData::new("span").with_attr("class", "a b"));
        let text = doc.create_text("hello");
        doc.append_child(root, div);
        doc.append_child(div, span);
        doc.append_child(span, text);
        (doc, div, span, text)
    }

    #[test]
    fn test_attributes_keep_position() {
        let mut el = ElementData::new("input")
            .with_attr("name", "a")
            .with_attr("type", "text");
        el.set_attr("name", "b");
        let attrs: Vec<_> = el.attrs().collect();
        assert_eq!(attrs, vec![("name", "b"), ("type", "text")]);
        assert_eq!(el.remove_attr("name"), Some("b".to_string()));
        assert!(!el.has_attr("name"));
        assert_eq!(el.remove_attr("name"), None);
    }

    #[test]
    fn test_token_list() {
        let el = ElementData::new("div").with_attr("data-controller", "modal  collection");
        assert!(el.has_token("data-controller", "collection"));
        assert!(!el.has_token("data-controller", "collect"));
        assert!(!el.has_token("data-missing", "collection"));
    }

    #[test]
    fn test_append_and_detach() {
        let (mut doc, div, span, text) = sample();
        assert_eq!(doc.children(div), &[span]);
        assert!(doc.is_attached(text));

        doc.detach(span);
        assert!(doc.children(div).is_empty());
        assert!(!doc.is_attached(text));
        assert_eq!(doc.parent(span), None);
    }

    #[test]
    fn test_append_moves_node() {
        let (mut doc, div, span, _) = sample();
        let root = doc.root();
        doc.append_child(root, span);
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.children(root), &[div, span]);
    }

    #[test]
    fn test_descendants_skip_template_content() {
        let (mut doc, div, span, text) = sample();
        let template = doc.create_element(ElementData::new("template"));
        let inner = doc.create_element(ElementData::new("p"));
        doc.append_child(div, template);
        doc.append_child(template, inner);

        let live = doc.descendants(doc.root());
        assert_eq!(live, vec![div, span, text, template]);
        assert_eq!(doc.find_first(doc.root(), |el| el.is("p")), None);
        assert_eq!(doc.find_first(template, |el| el.is("p")), Some(inner));
    }

    #[test]
    fn test_closest_is_inclusive() {
        let (doc, div, span, text) = sample();
        assert_eq!(doc.closest(text, |el| el.is("span")), Some(span));
        assert_eq!(doc.closest(span, |el| el.is("span")), Some(span));
        assert_eq!(doc.closest(text, |el| el.has_attr("id")), Some(div));
        assert_eq!(doc.closest(text, |el| el.is("table")), None);
    }

    #[test]
    fn test_set_attr_on_text_fails() {
        let (mut doc, _, _, text) = sample();
        assert!(matches!(
            doc.set_attr(text, "x", "y"),
            Err(AppError::NotAnElement(_))
        ));
    }

    #[test]
    fn test_describe() {
        let (doc, div, span, text) = sample();
        assert_eq!(doc.describe(div), "<div id=\"outer\">");
        assert_eq!(doc.describe(span), "<span>");
        assert_eq!(doc.describe(text), "#text");
    }
}
