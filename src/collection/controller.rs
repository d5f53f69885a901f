//! Collection widget controller
//!
//! A controller is bound to one collection root inside a [`Document`]. It
//! keeps no state of its own beyond node handles and configuration: item
//! counts, the identifier counter and control enablement are always read
//! from (and written back to) the tree.

use crate::collection::config::{CollectionConfig, read_counter};
use crate::collection::template;
use crate::constants::{
    CONTAINER_ATTR, CONTROLLER_ATTR, COUNTER_ATTR, DISABLED_ATTR, FALLBACK_COUNTER,
    ITEM_SERIAL_ATTR, TARGET_ATTR,
};
use crate::dom::{Document, NodeId};
use crate::error::{AppError, Result};
use crate::settings::Settings;
use serde::Serialize;

/// Serializable view of a collection's current state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSnapshot {
    pub root: String,
    pub counter: u64,
    pub default_items: usize,
    pub required_items: usize,
    pub items: Vec<u64>,
    pub removal_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct CollectionController {
    root: NodeId,
    container: NodeId,
    template: NodeId,
    default_items: usize,
    required_items: usize,
    controller_name: String,
    placeholder: String,
    disabled_value: String,
}

/// Nearest ancestor of `node` that is an items container, a collection root
/// or `root` itself
///
/// Markup owned by a nested collection resolves to that collection's root or
/// container, never to the outer one.
fn owner(doc: &Document, node: NodeId, root: NodeId, controller_name: &str) -> Option<NodeId> {
    doc.ancestors(node).find(|a| {
        *a == root
            || doc.element(*a).is_some_and(|el| {
                el.has_attr(CONTAINER_ATTR) || el.has_token(CONTROLLER_ATTR, controller_name)
            })
    })
}

impl CollectionController {
    /// Attach to `root` with default settings and initialize the collection
    pub fn attach(doc: &mut Document, root: NodeId) -> Result<Self> {
        Self::attach_with(doc, root, &Settings::default())
    }

    /// Attach to `root` and initialize the collection
    ///
    /// Fails when the root is not an element or lacks an items container or
    /// an item template; the widget cannot work without them.
    pub fn attach_with(doc: &mut Document, root: NodeId, settings: &Settings) -> Result<Self> {
        let description = doc.describe(root);
        let element = doc
            .element(root)
            .ok_or_else(|| AppError::NotAnElement(description.clone()))?;
        let config = CollectionConfig::from_element(element);

        let name = settings.controller.as_str();
        let own = |id: &NodeId| owner(doc, *id, root, name) == Some(root);

        let container = doc
            .find_all(root, |el| el.has_attr(CONTAINER_ATTR))
            .into_iter()
            .find(own)
            .ok_or_else(|| AppError::MissingContainer(description.clone()))?;

        let template = doc
            .find_all(root, |el| el.is("template"))
            .into_iter()
            .find(own)
            .ok_or_else(|| AppError::MissingTemplate(description.clone()))?;

        let controller = CollectionController {
            root,
            container,
            template,
            default_items: config.default_items,
            required_items: config.required_items,
            controller_name: settings.controller.clone(),
            placeholder: settings.placeholder.clone(),
            disabled_value: settings.disabled_value.clone(),
        };

        tracing::info!(
            "Attached collection {}: counter={}, default_items={}, required_items={}",
            description,
            config.counter,
            config.default_items,
            config.required_items
        );

        controller.repair_counter(doc)?;
        controller.initialize(doc)?;

        Ok(controller)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn default_items(&self) -> usize {
        self.default_items
    }

    pub fn required_items(&self) -> usize {
        self.required_items
    }

    /// Next identifier to allocate, as persisted on the root
    pub fn counter(&self, doc: &Document) -> u64 {
        doc.element(self.root)
            .map(read_counter)
            .unwrap_or(FALLBACK_COUNTER)
    }

    fn owns(&self, doc: &Document, node: NodeId) -> bool {
        owner(doc, node, self.root, &self.controller_name) == Some(self.container)
    }

    /// Items of this collection in display order
    ///
    /// Items of collections nested inside an item belong to their own
    /// container and are not counted here.
    pub fn items(&self, doc: &Document) -> Vec<NodeId> {
        doc.find_all(self.container, |el| el.has_attr(ITEM_SERIAL_ATTR))
            .into_iter()
            .filter(|item| self.owns(doc, *item))
            .collect()
    }

    pub fn serial_of(&self, doc: &Document, item: NodeId) -> Option<u64> {
        doc.attr(item, ITEM_SERIAL_ATTR)?.trim().parse().ok()
    }

    /// Identifiers of the current items in display order
    pub fn item_serials(&self, doc: &Document) -> Vec<u64> {
        self.items(doc)
            .into_iter()
            .filter_map(|item| self.serial_of(doc, item))
            .collect()
    }

    /// Whether removing an item is currently permitted
    pub fn removal_enabled(&self, doc: &Document) -> bool {
        self.items(doc).len() > self.required_items
    }

    /// The remove control owned by `item`
    ///
    /// Prefers the element whose target names the item, then the item's
    /// first button. Controls of collections nested in the item are skipped.
    pub fn remove_control(&self, doc: &Document, item: NodeId) -> Option<NodeId> {
        let serial = doc.attr(item, ITEM_SERIAL_ATTR)?.trim();
        let candidates: Vec<NodeId> = doc
            .find_all(item, |el| el.has_attr(TARGET_ATTR) || el.is("button"))
            .into_iter()
            .filter(|control| self.owns(doc, *control))
            .collect();

        candidates
            .iter()
            .copied()
            .find(|control| {
                doc.attr(*control, TARGET_ATTR)
                    .is_some_and(|target| target.trim() == serial)
            })
            .or_else(|| {
                candidates
                    .iter()
                    .copied()
                    .find(|control| doc.is_element_named(*control, "button"))
            })
    }

    /// Append a new item built from the template and return its identifier
    pub fn add(&self, doc: &mut Document) -> Result<u64> {
        let serial = self.counter(doc);
        let next = serial
            .checked_add(1)
            .ok_or_else(|| AppError::Other("Collection counter overflow".to_string()))?;

        // A broken template must not consume an identifier
        let item = template::instantiate(doc, self.template, &self.placeholder, serial)
            .ok_or_else(|| AppError::EmptyTemplate(doc.describe(self.root)))?;
        doc.set_attr(self.root, COUNTER_ATTR, next.to_string())?;
        doc.set_attr(item, ITEM_SERIAL_ATTR, serial.to_string())?;
        doc.append_child(self.container, item);

        tracing::debug!("Added item {} (counter now {})", serial, next);

        self.refresh_controls(doc)?;
        Ok(serial)
    }

    /// Handle activation of a remove control
    ///
    /// The target is read from the nearest element carrying `data-target`,
    /// starting at `trigger` itself. Returns whether an item was removed.
    pub fn remove(&self, doc: &mut Document, trigger: NodeId) -> Result<bool> {
        if trigger != self.root && !doc.ancestors(trigger).any(|a| a == self.root) {
            tracing::warn!(
                "Ignoring remove from {} outside collection {}",
                doc.describe(trigger),
                doc.describe(self.root)
            );
            return Ok(false);
        }

        let serial = doc
            .closest(trigger, |el| el.has_attr(TARGET_ATTR))
            .and_then(|control| doc.attr(control, TARGET_ATTR))
            .and_then(|target| target.trim().parse::<u64>().ok());

        match serial {
            Some(serial) => self.remove_serial(doc, serial),
            None => {
                tracing::warn!("Remove control {} has no usable target", doc.describe(trigger));
                self.refresh_controls(doc)?;
                Ok(false)
            }
        }
    }

    /// Remove the item tagged `serial` unless the collection is at its floor
    ///
    /// Unknown identifiers and refused removals are silent no-ops. Returns
    /// whether an item was removed.
    pub fn remove_serial(&self, doc: &mut Document, serial: u64) -> Result<bool> {
        let items = self.items(doc);
        let target = items
            .iter()
            .copied()
            .find(|item| self.serial_of(doc, *item) == Some(serial));

        let removed = match target {
            None => {
                tracing::warn!("No item with serial {} to remove", serial);
                false
            }
            Some(item) if items.len() > self.required_items => {
                doc.detach(item);
                tracing::debug!("Removed item {} ({} items left)", serial, items.len() - 1);
                true
            }
            Some(_) => {
                tracing::debug!(
                    "Refused to remove item {}: {} items, {} required",
                    serial,
                    items.len(),
                    self.required_items
                );
                false
            }
        };

        self.refresh_controls(doc)?;
        Ok(removed)
    }

    /// Enable every remove control when items exceed the floor, disable them
    /// otherwise
    pub fn refresh_controls(&self, doc: &mut Document) -> Result<()> {
        let items = self.items(doc);
        let enabled = items.len() > self.required_items;

        for item in &items {
            match self.remove_control(doc, *item) {
                Some(control) if enabled => {
                    doc.remove_attr(control, DISABLED_ATTR);
                }
                Some(control) => {
                    doc.set_attr(control, DISABLED_ATTR, self.disabled_value.clone())?;
                }
                None => {
                    tracing::warn!("Item {} has no remove control", doc.describe(*item));
                }
            }
        }

        tracing::debug!(
            "Remove controls {} ({} items, {} required)",
            if enabled { "enabled" } else { "disabled" },
            items.len(),
            self.required_items
        );
        Ok(())
    }

    pub fn snapshot(&self, doc: &Document) -> CollectionSnapshot {
        CollectionSnapshot {
            root: doc.describe(self.root),
            counter: self.counter(doc),
            default_items: self.default_items,
            required_items: self.required_items,
            items: self.item_serials(doc),
            removal_enabled: self.removal_enabled(doc),
        }
    }

    fn initialize(&self, doc: &mut Document) -> Result<()> {
        let existing = self.items(doc).len();

        if existing < self.default_items {
            let missing = self.default_items - existing;
            tracing::debug!(
                "Materializing {} default items ({} already rendered)",
                missing,
                existing
            );
            for _ in 0..missing {
                self.add(doc)?;
            }
        }

        self.refresh_controls(doc)
    }

    // Server-rendered items may already use identifiers at or past the
    // counter; move the counter beyond them so new items never collide.
    fn repair_counter(&self, doc: &mut Document) -> Result<()> {
        let counter = self.counter(doc);

        if let Some(highest) = self.item_serials(doc).into_iter().max()
            && highest >= counter
        {
            let repaired = highest.saturating_add(1);
            tracing::warn!(
                "Item serial {} is not below counter {}; raising counter to {}",
                highest,
                counter,
                repaired
            );
            doc.set_attr(self.root, COUNTER_ATTR, repaired.to_string())?;
        }

        Ok(())
    }
}
