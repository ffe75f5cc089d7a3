//! Resolved menu items.

use menus_config::ClassesConfig;
use menus_store::PageId;
use serde::Serialize;

/// Active state of a menu item relative to the current page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveClass {
    /// Not related to the current page.
    #[default]
    None,
    /// The item is the current page.
    Exact,
    /// The item is an ancestor of the current page.
    Ancestor,
}

impl ActiveClass {
    /// Class label for this state, empty for [`ActiveClass::None`].
    #[must_use]
    pub fn css(self, classes: &ClassesConfig) -> &str {
        match self {
            Self::None => "",
            Self::Exact => &classes.active,
            Self::Ancestor => &classes.ancestor,
        }
    }

    /// Whether no class applies.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::None
    }
}

/// A navigable menu entry, created fresh for every build.
///
/// `text` and `href` are always populated (`href` is empty when the target
/// cannot be routed). Nested items are the item's sub-menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Link text.
    pub text: String,
    /// Link target.
    pub href: String,
    /// Active state.
    #[serde(skip_serializing_if = "ActiveClass::is_none")]
    pub active_class: ActiveClass,
    /// Whether the item has a sub-menu.
    pub has_children_in_menu: bool,
    /// Page the item was produced from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageId>,
    /// True for the synthetic copy of a parent repeated among its children.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
    /// Sub-menu items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    /// Create an item with text and href only.
    #[must_use]
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
            active_class: ActiveClass::None,
            has_children_in_menu: false,
            page: None,
            repeated: false,
            children: Vec::new(),
        }
    }

    /// Set the active state.
    #[must_use]
    pub fn with_active_class(mut self, active_class: ActiveClass) -> Self {
        self.active_class = active_class;
        self
    }

    /// Record the source page.
    #[must_use]
    pub fn with_page(mut self, page: PageId) -> Self {
        self.page = Some(page);
        self
    }

    /// Visit this item and every nested item, depth first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a MenuItem)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}
