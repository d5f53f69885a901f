use crate::dom::tree::{Document, ElementData, NodeId};
use ego_tree::NodeRef;
use scraper::node::Element;
use scraper::{Html, Node};

/// Parse a complete HTML page into a new [`Document`]
pub fn parse_document(html: &str) -> Document {
    let parsed = Html::parse_document(html);
    let mut doc = Document::new();
    let root = doc.root();

    for id in import_children(&mut doc, parsed.tree.root()) {
        doc.append_child(root, id);
    }

    tracing::debug!("Parsed document: {} top-level nodes", doc.children(root).len());
    doc
}

/// Parse an HTML fragment (body context) into detached nodes owned by `doc`
///
/// Returns the top-level nodes in source order. Callers attach whichever of
/// them they need; the rest stay detached.
pub fn parse_fragment_into(doc: &mut Document, html: &str) -> Vec<NodeId> {
    let parsed = Html::parse_fragment(html);
    import_children(doc, *parsed.root_element())
}

fn import_children(doc: &mut Document, parent: NodeRef<'_, Node>) -> Vec<NodeId> {
    let mut imported = Vec::new();

    for child in parent.children() {
        match child.value() {
            Node::Element(element) => imported.push(import_element(doc, child, element)),
            Node::Text(text) => {
                let text: &str = text;
                imported.push(doc.create_text(text));
            }
            Node::Comment(comment) => {
                let comment: &str = comment;
                imported.push(doc.create_comment(comment));
            }
            Node::Doctype(doctype) => imported.push(doc.create_doctype(doctype.name())),
            // Template content hangs off a fragment node; it is flattened into
            // the <template> element itself
            Node::Fragment => imported.extend(import_children(doc, child)),
            Node::Document | Node::ProcessingInstruction(_) => {}
        }
    }

    imported
}

fn import_element(doc: &mut Document, node: NodeRef<'_, Node>, element: &Element) -> NodeId {
    let mut data = ElementData::new(element.name());
    for (name, value) in element.attrs.iter() {
        // Foreign attributes such as xlink:href keep their prefix
        let qualified = match &name.prefix {
            Some(prefix) => format!("{}:{}", prefix, name.local),
            None => name.local.to_string(),
        };
        let value: &str = value;
        data.set_attr(&qualified, value);
    }

    let id = doc.create_element(data);
    for child in import_children(doc, node) {
        doc.append_child(id, child);
    }
    id
}
