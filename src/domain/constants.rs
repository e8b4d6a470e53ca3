//! Fixed vocabulary and user-facing validation strings.

/// Slugs that collide with static routes and can never be used as an entity slug,
/// at any level of the hierarchy.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "add-new-restaurant",
    "all",
    "delete",
    "edit",
    "new-item",
    "new-section",
];

/// Non-staff users may administrate at most this many restaurants (default,
/// overridable via config).
pub const MAX_RESTAURANTS_PER_USER: u32 = 3;

pub const RESERVED_KEYWORD_ERROR: &str =
    "This name is reserved and cannot be used. Please choose another name.";

pub const RESTAURANT_DUPLICATE_SLUG_ERROR: &str =
    "This name is too similar to an existing restaurant name.";

pub const MENU_DUPLICATE_SLUG_ERROR: &str =
    "This name is too similar to one of this restaurant's existing menu names.";

pub const MENUSECTION_DUPLICATE_SLUG_ERROR: &str =
    "This name is too similar to one of this menu's existing section names.";

pub const MENUITEM_DUPLICATE_SLUG_ERROR: &str =
    "This name is too similar to one of this menu's existing item names.";

pub const EMPTY_NAME_ERROR: &str = "This field is required.";

pub const MAX_RESTAURANTS_PER_USER_ERROR: &str = "You cannot register more than 3 \
restaurants. If you wish to register a new restaurant, you must first delete one of \
your existing restaurants.";
