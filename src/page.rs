//! Rendered page hosting collection widgets
//!
//! A page owns the parsed document and one controller per collection root
//! found in it. Every collection is attached and initialized when the page
//! is loaded, in document order.

use crate::collection::{CollectionController, CollectionSnapshot};
use crate::constants::CONTROLLER_ATTR;
use crate::dom::{Document, parse_document};
use crate::error::{AppError, Result};
use crate::settings::Settings;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A user action on one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove(u64),
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("add") {
            return Ok(Action::Add);
        }

        let serial = s
            .strip_prefix("remove:")
            .or_else(|| s.strip_prefix("remove="))
            .ok_or_else(|| AppError::InvalidAction(s.to_string()))?;

        serial
            .trim()
            .parse()
            .map(Action::Remove)
            .map_err(|_| AppError::InvalidAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Add => write!(f, "add"),
            Action::Remove(serial) => write!(f, "remove:{}", serial),
        }
    }
}

pub struct Page {
    document: Document,
    collections: Vec<CollectionController>,
}

impl Page {
    /// Parse a page and attach a controller to every collection root
    pub fn parse(html: &str, settings: &Settings) -> Result<Self> {
        let mut document = parse_document(html);

        let roots = document.find_all(document.root(), |el| {
            el.has_token(CONTROLLER_ATTR, &settings.controller)
        });
        tracing::info!("Found {} collection(s)", roots.len());

        let mut collections = Vec::with_capacity(roots.len());
        for root in roots {
            collections.push(CollectionController::attach_with(
                &mut document,
                root,
                settings,
            )?);
        }

        Ok(Page {
            document,
            collections,
        })
    }

    pub fn load(path: &Path, settings: &Settings) -> Result<Self> {
        let html = std::fs::read_to_string(path)?;
        tracing::info!("Loaded page {} ({} bytes)", path.display(), html.len());
        Self::parse(&html, settings)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn collections(&self) -> &[CollectionController] {
        &self.collections
    }

    pub fn collection(&self, index: usize) -> Result<&CollectionController> {
        self.collections
            .get(index)
            .ok_or(AppError::NoSuchCollection {
                index,
                count: self.collections.len(),
            })
    }

    /// Run one action against the collection at `index`
    pub fn apply(&mut self, index: usize, action: Action) -> Result<()> {
        let count = self.collections.len();
        let controller = self
            .collections
            .get(index)
            .ok_or(AppError::NoSuchCollection { index, count })?;

        tracing::debug!("Applying {} to collection {}", action, index);
        match action {
            Action::Add => {
                controller.add(&mut self.document)?;
            }
            Action::Remove(serial) => {
                // Go through the item's own control when it has one, like a click would
                let control = controller
                    .items(&self.document)
                    .into_iter()
                    .find(|item| controller.serial_of(&self.document, *item) == Some(serial))
                    .and_then(|item| controller.remove_control(&self.document, item));

                match control {
                    Some(control) => controller.remove(&mut self.document, control)?,
                    None => controller.remove_serial(&mut self.document, serial)?,
                };
            }
        }
        Ok(())
    }

    pub fn snapshots(&self) -> Vec<CollectionSnapshot> {
        self.collections
            .iter()
            .map(|c| c.snapshot(&self.document))
            .collect()
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_COLLECTIONS: &str = concat!(
        "<html><body>",
        "<div id=\"tags\" data-controller=\"collection\" data-default-items=\"2\" data-required-items=\"1\">",
        "<ul data-collection-container></ul>",
        "<template><li><button data-target=\"__name__\">-</button></li></template>",
        "</div>",
        "<div id=\"links\" data-controller=\"tooltip collection\" data-counter=\"10\">",
        "<ul data-collection-container></ul>",
        "<template><li><button data-target=\"__name__\">-</button></li></template>",
        "</div>",
        "<div data-controller=\"tooltip\"></div>",
        "</body></html>"
    );

    #[test]
    fn test_parse_actions() {
        assert_eq!("add".parse::<Action>().unwrap(), Action::Add);
        assert_eq!(" ADD ".parse::<Action>().unwrap(), Action::Add);
        assert_eq!("remove:3".parse::<Action>().unwrap(), Action::Remove(3));
        assert_eq!("remove=12".parse::<Action>().unwrap(), Action::Remove(12));
        assert!("remove".parse::<Action>().is_err());
        assert!("remove:x".parse::<Action>().is_err());
        assert!("delete:1".parse::<Action>().is_err());
        assert_eq!(Action::Remove(4).to_string(), "remove:4");
    }

    #[test]
    fn test_all_collections_initialized() {
        let page = Page::parse(TWO_COLLECTIONS, &Settings::default()).unwrap();
        let snapshots = page.snapshots();
        assert_eq!(snapshots.len(), 2);

        assert_eq!(snapshots[0].root, "<div id=\"tags\">");
        assert_eq!(snapshots[0].items, vec![0, 1]);
        assert!(snapshots[0].removal_enabled);

        assert_eq!(snapshots[1].items, vec![10]);
        assert_eq!(snapshots[1].counter, 11);
    }

    #[test]
    fn test_collections_are_isolated() {
        let mut page = Page::parse(TWO_COLLECTIONS, &Settings::default()).unwrap();
        page.apply(0, Action::Remove(0)).unwrap();
        page.apply(1, Action::Add).unwrap();

        let snapshots = page.snapshots();
        assert_eq!(snapshots[0].items, vec![1]);
        assert!(!snapshots[0].removal_enabled);
        assert_eq!(snapshots[0].counter, 2);
        assert_eq!(snapshots[1].items, vec![10, 11]);
        assert_eq!(snapshots[1].counter, 12);
    }

    #[test]
    fn test_unknown_collection() {
        let mut page = Page::parse(TWO_COLLECTIONS, &Settings::default()).unwrap();
        assert!(matches!(
            page.apply(5, Action::Add),
            Err(AppError::NoSuchCollection { index: 5, count: 2 })
        ));
        assert!(page.collection(2).is_err());
    }

    #[test]
    fn test_custom_settings() {
        let html = concat!(
            "<div data-controller=\"tags\">",
            "<div data-collection-container></div>",
            "<template><p>[[id]]<button data-target=\"[[id]]\"></button></p></template>",
            "</div>"
        )
        .replace("[[id]]", "__tag__");
        let settings = Settings {
            controller: "tags".to_string(),
            placeholder: "__tag__".to_string(),
            disabled_value: "true".to_string(),
        };

        let page = Page::parse(&html, &settings).unwrap();
        let controller = page.collection(0).unwrap();
        let item = controller.items(page.document())[0];
        assert_eq!(page.document().outer_html(item).matches(">0<").count(), 1);

        let control = controller.remove_control(page.document(), item).unwrap();
        assert_eq!(page.document().attr(control, "disabled"), None);
    }

    #[test]
    fn test_output_reflects_mutations() {
        let mut page = Page::parse(TWO_COLLECTIONS, &Settings::default()).unwrap();
        page.apply(0, Action::Remove(1)).unwrap();
        let html = page.to_html();
        assert!(html.contains("data-counter=\"2\""));
        assert!(html.contains("<li data-item-serial=\"0\"><button data-target=\"0\" disabled=\"disabled\">-</button></li>"));
        assert!(!html.contains("data-item-serial=\"1\""));
    }

    #[test]
    fn test_nested_collections_keep_their_own_controls() {
        let html = concat!(
            "<div id=\"outer-root\" data-controller=\"collection\" data-counter=\"1\" data-required-items=\"1\">",
            "<div data-collection-container>",
            "<fieldset data-item-serial=\"0\">",
            "<div id=\"inner-root\" data-controller=\"collection\" data-counter=\"1\">",
            "<div data-collection-container>",
            "<p data-item-serial=\"0\"><button id=\"inner\" data-target=\"0\">x</button></p>",
            "</div>",
            "<template><p><button data-target=\"__name__\">x</button></p></template>",
            "</div>",
            "<button id=\"outer\" data-target=\"0\">x</button>",
            "</fieldset>",
            "</div>",
            "<template><fieldset><button data-target=\"__name__\">x</button></fieldset></template>",
            "</div>"
        );
        let mut page = Page::parse(html, &Settings::default()).unwrap();
        assert_eq!(page.collections().len(), 2);

        let doc = page.document();
        let find = |id: &str| doc.find_first(doc.root(), |el| el.attr("id") == Some(id)).unwrap();
        assert_eq!(doc.attr(find("outer"), "disabled"), Some("disabled"));
        assert_eq!(doc.attr(find("inner"), "disabled"), None);

        // Removing through the inner collection leaves the outer item alone
        page.apply(1, Action::Remove(0)).unwrap();
        let snapshots = page.snapshots();
        assert_eq!(snapshots[0].items, vec![0]);
        assert!(snapshots[1].items.is_empty());
    }

    #[test]
    fn test_page_without_collections() {
        let page = Page::parse("<p>nothing here</p>", &Settings::default()).unwrap();
        assert!(page.collections().is_empty());
        assert!(page.snapshots().is_empty());
    }
}
