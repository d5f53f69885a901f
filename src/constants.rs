//! Markup conventions and fallback values

/// Attribute listing the controllers attached to an element
pub const CONTROLLER_ATTR: &str = "data-controller";

/// Controller name that marks a collection root
pub const DEFAULT_CONTROLLER_NAME: &str = "collection";

/// Root attribute holding the next identifier to allocate
pub const COUNTER_ATTR: &str = "data-counter";

/// Root attribute holding the number of items to materialize at startup
pub const DEFAULT_ITEMS_ATTR: &str = "data-default-items";

/// Root attribute holding the minimum number of items that must remain
pub const REQUIRED_ITEMS_ATTR: &str = "data-required-items";

/// Marker attribute of the element holding the items
pub const CONTAINER_ATTR: &str = "data-collection-container";

/// Attribute tagging each item with its identifier
pub const ITEM_SERIAL_ATTR: &str = "data-item-serial";

/// Attribute on a remove control naming the item it removes
pub const TARGET_ATTR: &str = "data-target";

/// Attribute toggled on remove controls
pub const DISABLED_ATTR: &str = "disabled";

/// Default value written to the disabled attribute
pub const DEFAULT_DISABLED_VALUE: &str = "disabled";

/// Token substituted with the item identifier when instantiating the template
pub const DEFAULT_PLACEHOLDER: &str = "__name__";

/// Counter value used when the root carries none
pub const FALLBACK_COUNTER: u64 = 0;

/// Default item count used when the root carries none (or a non-positive one)
pub const FALLBACK_DEFAULT_ITEMS: usize = 1;

/// Required item count used when the root carries none
pub const FALLBACK_REQUIRED_ITEMS: usize = 0;
