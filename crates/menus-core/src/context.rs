//! Build context and per-menu options.

use std::collections::HashSet;
use std::fmt;

use menus_config::{Config, UseSpecific};
use menus_store::{PageId, PageStore, RequestContext, Site};
use serde::Serialize;

use crate::active::ActiveStateClassifier;

/// Kind of menu being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuKind {
    /// Site-wide main menu.
    Main,
    /// Named flat menu.
    Flat,
    /// Pages below the current section root.
    Section,
    /// Children of a given page.
    Children,
    /// Nested sub-menu of another menu.
    Sub,
}

impl MenuKind {
    /// Stable name used in logs and output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Flat => "flat",
            Self::Section => "section",
            Self::Children => "children",
            Self::Sub => "sub",
        }
    }
}

impl fmt::Display for MenuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling a single menu build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuOptions {
    /// Number of levels to populate, counting the top level as 1.
    pub max_levels: u32,
    /// Compute active classes.
    pub apply_active_classes: bool,
    /// Let menu pages repeat themselves in their sub-menus.
    pub allow_repeating_parents: bool,
    /// Produce absolute URLs for pages.
    pub use_absolute_page_urls: bool,
    /// When page-type specific behavior is consulted.
    pub use_specific: UseSpecific,
}

impl MenuOptions {
    /// Configured defaults for a menu kind.
    ///
    /// Main menus do not repeat parents unless asked to.
    #[must_use]
    pub fn for_kind(kind: MenuKind, config: &Config) -> Self {
        let max_levels = match kind {
            MenuKind::Main => config.menus.main_max_levels,
            MenuKind::Flat => config.menus.flat_max_levels,
            MenuKind::Section => config.menus.section_max_levels,
            MenuKind::Children | MenuKind::Sub => config.menus.children_max_levels,
        };
        let allow_repeating_parents =
            kind != MenuKind::Main && config.defaults.allow_repeating_parents;

        Self {
            max_levels,
            apply_active_classes: config.defaults.apply_active_classes,
            allow_repeating_parents,
            use_absolute_page_urls: config.defaults.use_absolute_page_urls,
            use_specific: config.menus.use_specific,
        }
    }

    /// Whether page-type specific behavior is consulted at `level`.
    #[must_use]
    pub fn uses_specific_at(&self, level: u32) -> bool {
        match self.use_specific {
            UseSpecific::Off => false,
            UseSpecific::TopLevel => level == 1,
            UseSpecific::Auto | UseSpecific::Always => true,
        }
    }
}

/// Request-scoped inputs shared by every level of a build.
#[derive(Clone, Debug, Default)]
pub struct MenuContext<'a> {
    /// Current site.
    pub site: Option<&'a Site>,
    /// Current request.
    pub request: Option<&'a RequestContext>,
    /// Page being viewed.
    pub current_page: Option<PageId>,
    /// Ancestors of the current page.
    pub ancestor_ids: HashSet<PageId>,
}

impl<'a> MenuContext<'a> {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current site.
    #[must_use]
    pub fn with_site(mut self, site: &'a Site) -> Self {
        self.site = Some(site);
        self
    }

    /// Set the current request.
    #[must_use]
    pub fn with_request(mut self, request: &'a RequestContext) -> Self {
        self.request = Some(request);
        self
    }

    /// Set the current page and look up its ancestors once.
    #[must_use]
    pub fn with_current_page(mut self, store: &dyn PageStore, page: PageId) -> Self {
        self.current_page = Some(page);
        self.ancestor_ids = store.ancestor_ids(page).into_iter().collect();
        self
    }

    /// Classifier for this context.
    #[must_use]
    pub fn classifier(&self, apply: bool) -> ActiveStateClassifier<'_> {
        ActiveStateClassifier::new(self.current_page, &self.ancestor_ids, apply)
    }

    /// Request path, if a request is set.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.request.map(|r| r.path.as_str())
    }
}
