//! Page data model.
//!
//! A [`Page`] is a node of the content tree. Its [`PageKind`] carries the
//! variant-specific data: plain pages, pages with menu behavior, and link
//! pages that redirect to another page or to a literal URL.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page identifier, unique within a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u32);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Menu behavior attached to a page.
///
/// Only meaningful when the page has at least one menu-eligible child.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPageBehavior {
    /// Repeat a link to this page alongside its children in sub-navigation.
    #[serde(default)]
    pub repeat_in_subnav: bool,
    /// Text for the repeated item. Blank means the page title is used.
    #[serde(default)]
    pub repeated_item_text: String,
}

/// Link page data.
///
/// Exactly one of `link_page` and `link_url` must be set once the page has
/// been validated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPage {
    /// Internal page this page links to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_page: Option<PageId>,
    /// Literal URL this page links to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    /// Suffix (`#hash` or querystring) appended to the resolved URL.
    #[serde(default)]
    pub url_append: String,
}

impl LinkPage {
    /// Literal URL, ignoring blank values.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.link_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Variant-specific page data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageKind {
    /// Plain content page.
    #[default]
    Standard,
    /// Page with menu behavior.
    Menu(MenuPageBehavior),
    /// Page that redirects to another page or URL.
    Link(LinkPage),
}

impl PageKind {
    /// Initial `show_in_menus` value for a new page of this kind.
    ///
    /// Link pages exist to appear in menus, so they start visible.
    #[must_use]
    pub fn shown_in_menus_by_default(&self) -> bool {
        matches!(self, Self::Link(_))
    }
}

/// Document page data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Page identifier.
    pub id: PageId,
    /// Page title.
    pub title: String,
    /// URL segment for this page.
    pub slug: String,
    /// Depth in the tree (roots are depth 1).
    pub depth: u32,
    /// Whether the page may appear in menus.
    pub show_in_menus: bool,
    /// Whether the page is published.
    pub live: bool,
    /// Name of the specific page type (e.g., "`ContactPage`").
    pub page_type: String,
    /// Variant-specific data.
    pub kind: PageKind,
}

impl Page {
    /// Whether the page can be listed in a menu.
    #[must_use]
    pub fn is_menu_eligible(&self) -> bool {
        self.live && self.show_in_menus
    }

    /// Menu behavior, if this page has one.
    #[must_use]
    pub fn menu_behavior(&self) -> Option<&MenuPageBehavior> {
        match &self.kind {
            PageKind::Menu(behavior) => Some(behavior),
            _ => None,
        }
    }

    /// Link data, if this is a link page.
    #[must_use]
    pub fn link(&self) -> Option<&LinkPage> {
        match &self.kind {
            PageKind::Link(link) => Some(link),
            _ => None,
        }
    }

    /// Whether this is a link page.
    #[must_use]
    pub fn is_link_page(&self) -> bool {
        matches!(self.kind, PageKind::Link(_))
    }

    /// Whether a link to this page is repeated in its own sub-navigation.
    #[must_use]
    pub fn repeats_in_subnav(&self) -> bool {
        self.menu_behavior().is_some_and(|b| b.repeat_in_subnav)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(kind: PageKind) -> Page {
        Page {
            id: PageId(1),
            title: "About".to_owned(),
            slug: "about".to_owned(),
            depth: 2,
            show_in_menus: true,
            live: true,
            page_type: "Page".to_owned(),
            kind,
        }
    }

    #[test]
    fn test_menu_eligible_requires_live_and_flag() {
        let mut p = page(PageKind::Standard);
        assert!(p.is_menu_eligible());

        p.live = false;
        assert!(!p.is_menu_eligible());

        p.live = true;
        p.show_in_menus = false;
        assert!(!p.is_menu_eligible());
    }

    #[test]
    fn test_repeats_in_subnav() {
        assert!(!page(PageKind::Standard).repeats_in_subnav());
        assert!(
            page(PageKind::Menu(MenuPageBehavior {
                repeat_in_subnav: true,
                repeated_item_text: String::new(),
            }))
            .repeats_in_subnav()
        );
    }

    #[test]
    fn test_link_url_ignores_blank() {
        let link = LinkPage {
            link_page: None,
            link_url: Some(String::new()),
            url_append: String::new(),
        };
        assert!(link.url().is_none());
    }

    #[test]
    fn test_page_kind_deserializes_tagged() {
        let kind: PageKind =
            serde_json::from_str(r#"{"kind": "link", "link_url": "https://x.test"}"#).unwrap();
        assert_eq!(
            kind,
            PageKind::Link(LinkPage {
                link_page: None,
                link_url: Some("https://x.test".to_owned()),
                url_append: String::new(),
            })
        );
    }

    #[test]
    fn test_only_link_pages_shown_by_default() {
        assert!(PageKind::Link(LinkPage::default()).shown_in_menus_by_default());
        assert!(!PageKind::Standard.shown_in_menus_by_default());
        assert!(!PageKind::Menu(MenuPageBehavior::default()).shown_in_menus_by_default());
    }

    #[test]
    fn test_page_id_display() {
        assert_eq!(PageId(42).to_string(), "42");
    }
}
