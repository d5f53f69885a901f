use crate::dom::{Document, NodeId, parse_fragment_into};

/// Stamp out a new item from an inert template
///
/// Every occurrence of `placeholder` in the template markup is replaced by
/// `serial` before parsing. The first element of the parsed markup becomes
/// the item; leading text or comments are dropped. The new node is detached.
pub fn instantiate(
    doc: &mut Document,
    template: NodeId,
    placeholder: &str,
    serial: u64,
) -> Option<NodeId> {
    let markup = doc
        .inner_html(template)
        .replace(placeholder, &serial.to_string());

    let nodes = parse_fragment_into(doc, &markup);
    nodes.into_iter().find(|id| doc.element(*id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn template_of(html: &str) -> (Document, NodeId) {
        let doc = parse_document(html);
        let template = doc.find_first(doc.root(), |el| el.is("template")).unwrap();
        (doc, template)
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let (mut doc, template) = template_of(
            "<template>\n  <div id=\"tag___name__\"><input name=\"tags[__name__]\"><button data-target=\"__name__\"></button></div>\n</template>",
        );
        let item = instantiate(&mut doc, template, "__name__", 7).unwrap();
        let html = doc.outer_html(item);
        assert_eq!(
            html,
            "<div id=\"tag_7\"><input name=\"tags[7]\"><button data-target=\"7\"></button></div>"
        );
        assert!(!doc.is_attached(item));
    }

    #[test]
    fn test_template_left_untouched() {
        let (mut doc, template) = template_of("<template><p>__name__</p></template>");
        instantiate(&mut doc, template, "__name__", 1).unwrap();
        assert_eq!(doc.inner_html(template), "<p>__name__</p>");
    }

    #[test]
    fn test_text_only_template() {
        let (mut doc, template) = template_of("<template>  just text  </template>");
        assert!(instantiate(&mut doc, template, "__name__", 0).is_none());
    }
}
