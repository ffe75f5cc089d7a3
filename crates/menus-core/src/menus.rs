//! Menu definitions and their registry.

use std::borrow::Cow;

use menus_config::UseSpecific;
use menus_store::{Page, PageId, Site};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::link::{LinkTarget, Linkable};
use crate::validate::ValidationError;

fn default_true() -> bool {
    true
}

/// A configured menu entry pointing at a page or a literal URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemEntry {
    /// Internal page to link to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_page: Option<PageId>,
    /// Literal URL to link to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    /// Link text; blank means the page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    /// Suffix appended to the resolved URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url_append: String,
    /// Whether the linked page may show a sub-menu.
    #[serde(default = "default_true")]
    pub allow_subnav: bool,
}

impl MenuItemEntry {
    /// Entry linking to a page.
    #[must_use]
    pub fn page(id: PageId) -> Self {
        Self {
            link_page: Some(id),
            link_url: None,
            link_text: None,
            url_append: String::new(),
            allow_subnav: true,
        }
    }

    /// Entry linking to a literal URL.
    #[must_use]
    pub fn url(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            link_page: None,
            link_url: Some(url.into()),
            link_text: Some(text.into()),
            url_append: String::new(),
            allow_subnav: true,
        }
    }

    /// Override the link text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.link_text = Some(text.into());
        self
    }

    /// Append a suffix to the resolved URL.
    #[must_use]
    pub fn with_append(mut self, url_append: impl Into<String>) -> Self {
        self.url_append = url_append.into();
        self
    }

    /// Never show a sub-menu for this entry.
    #[must_use]
    pub fn without_subnav(mut self) -> Self {
        self.allow_subnav = false;
        self
    }

    /// Literal URL, ignoring blank values.
    #[must_use]
    pub fn link_url(&self) -> Option<&str> {
        self.link_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Link text, ignoring blank values.
    #[must_use]
    pub fn link_text(&self) -> Option<&str> {
        self.link_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Text shown for this entry given its resolved page.
    #[must_use]
    pub fn text_for(&self, page: Option<&Page>) -> String {
        self.link_text()
            .or_else(|| page.map(|p| p.title.as_str()))
            .unwrap_or_default()
            .to_owned()
    }
}

impl Linkable for MenuItemEntry {
    fn link_target(&self) -> Option<LinkTarget<'_>> {
        self.link_page
            .map(LinkTarget::Page)
            .or_else(|| self.link_url().map(LinkTarget::Url))
    }

    fn url_append(&self) -> &str {
        &self.url_append
    }
}

/// The main menu of a site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MainMenu {
    /// Host name of the owning site.
    pub site: String,
    /// Levels to render; `None` uses the configured default.
    pub max_levels: Option<u32>,
    /// Behavior lookup mode; `None` uses the configured default.
    pub use_specific: Option<UseSpecific>,
    /// Top-level entries in order.
    pub items: Vec<MenuItemEntry>,
}

impl MainMenu {
    /// Empty main menu for a site.
    #[must_use]
    pub fn empty(site: &Site) -> Self {
        Self {
            site: site.hostname.clone(),
            max_levels: None,
            use_specific: None,
            items: Vec::new(),
        }
    }
}

/// A named menu with a flat list of entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatMenu {
    /// Host name of the owning site.
    pub site: String,
    /// Title shown to editors.
    pub title: String,
    /// Handle the menu is looked up by, unique per site.
    pub handle: String,
    /// Heading shown above the menu.
    pub heading: String,
    /// Levels to render; `None` uses the configured default.
    pub max_levels: Option<u32>,
    /// Behavior lookup mode; `None` uses the configured default.
    pub use_specific: Option<UseSpecific>,
    /// Entries in order.
    pub items: Vec<MenuItemEntry>,
}

impl FlatMenu {
    /// Create an empty flat menu.
    #[must_use]
    pub fn new(site: &Site, handle: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            site: site.hostname.clone(),
            title: title.into(),
            handle: handle.into(),
            heading: String::new(),
            max_levels: None,
            use_specific: None,
            items: Vec::new(),
        }
    }
}

/// Main and flat menus of every site.
#[derive(Clone, Debug, Default)]
pub struct MenuRegistry {
    main_menus: Vec<MainMenu>,
    flat_menus: Vec<FlatMenu>,
}

impl MenuRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the main menu of a site, replacing any previous one.
    pub fn set_main_menu(&mut self, menu: MainMenu) {
        self.main_menus.retain(|m| m.site != menu.site);
        self.main_menus.push(menu);
    }

    /// Add a flat menu.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the site already has a flat menu with
    /// the same handle.
    pub fn add_flat_menu(&mut self, menu: FlatMenu) -> Result<(), ValidationError> {
        if self
            .flat_menus
            .iter()
            .any(|m| m.site == menu.site && m.handle == menu.handle)
        {
            return Err(ValidationError::field(
                "handle",
                "Site and handle must create a unique combination. A menu already exists \
                 with these same two values.",
            ));
        }
        self.flat_menus.push(menu);
        Ok(())
    }

    /// Main menu of a site, or an empty one if none is configured.
    #[must_use]
    pub fn main_menu_for(&self, site: &Site) -> Cow<'_, MainMenu> {
        self.main_menus
            .iter()
            .find(|m| m.site == site.hostname)
            .map_or_else(|| Cow::Owned(MainMenu::empty(site)), Cow::Borrowed)
    }

    /// Flat menu by handle.
    ///
    /// Looks in `site` first, then in `fallback` when given.
    #[must_use]
    pub fn flat_menu(&self, handle: &str, site: &Site, fallback: Option<&Site>) -> Option<&FlatMenu> {
        let find = |hostname: &str| {
            self.flat_menus
                .iter()
                .find(|m| m.handle == handle && m.site == hostname)
        };

        find(&site.hostname).or_else(|| {
            let fallback = fallback.filter(|f| f.hostname != site.hostname)?;
            debug!(handle, site = %fallback.hostname, "Falling back to flat menu of default site");
            find(&fallback.hostname)
        })
    }

    /// All main menus.
    #[must_use]
    pub fn main_menus(&self) -> &[MainMenu] {
        &self.main_menus
    }

    /// All flat menus.
    #[must_use]
    pub fn flat_menus(&self) -> &[FlatMenu] {
        &self.flat_menus
    }
}
