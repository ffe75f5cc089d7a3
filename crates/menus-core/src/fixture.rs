//! Site fixtures loaded from YAML or JSON.
//!
//! A fixture describes sites, a nested page tree and the menus of each
//! site:
//!
//! ```yaml
//! sites:
//!   - hostname: example.com
//!     root_page: 1
//!     default: true
//! pages:
//!   - id: 1
//!     title: Home
//!     children:
//!       - id: 2
//!         title: About
//!         show_in_menus: true
//!         kind: menu
//!         repeat_in_subnav: true
//! main_menus:
//!   - site: example.com
//!     menu_items:
//!       - link_page: 2
//! flat_menus:
//!   - site: example.com
//!     handle: footer
//!     title: Footer
//!     menu_items:
//!       - link_url: /contact/
//!         link_text: Contact
//! ```
//!
//! Menu entries are read from the key named by the configured items
//! relation (`menu_items` by default).

use std::collections::HashMap;
use std::path::Path;

use menus_config::{Config, ConfigError, UseSpecific};
use menus_store::{
    LinkPage, MenuPageBehavior, NewPage, PageId, PageKind, PageStore, PageTree, PageTreeBuilder,
    Site, StoreError,
};
use serde::Deserialize;
use tracing::debug;

use crate::menus::{FlatMenu, MainMenu, MenuItemEntry, MenuRegistry};
use crate::validate::{LinkPageValidator, ValidationError};

/// Fixture loading errors.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// Failed to read the fixture file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Invalid YAML.
    #[error("Invalid YAML fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid JSON.
    #[error("Invalid JSON fixture: {0}")]
    Json(#[from] serde_json::Error),

    /// Page tree could not be built.
    #[error("Invalid page tree: {0}")]
    Store(#[from] StoreError),

    /// Unknown page kind.
    #[error("Page {page} has unknown kind '{kind}'")]
    UnknownKind {
        /// Page identifier.
        page: PageId,
        /// Kind given in the fixture.
        kind: String,
    },

    /// Menu references an unknown site.
    #[error("Menu refers to unknown site '{0}'")]
    UnknownSite(String),

    /// Menu definition rejected.
    #[error("Invalid menu: {0}")]
    Menu(#[from] ValidationError),

    /// Menu option rejected by the configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    sites: Vec<Site>,
    #[serde(default)]
    pages: Vec<PageSpec>,
    #[serde(default)]
    main_menus: Vec<MenuSpec>,
    #[serde(default)]
    flat_menus: Vec<MenuSpec>,
}

fn default_live() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct PageSpec {
    id: PageId,
    title: String,
    slug: Option<String>,
    show_in_menus: Option<bool>,
    #[serde(default = "default_live")]
    live: bool,
    #[serde(rename = "type")]
    page_type: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    repeat_in_subnav: bool,
    #[serde(default)]
    repeated_item_text: String,
    link_page: Option<PageId>,
    link_url: Option<String>,
    #[serde(default)]
    url_append: String,
    #[serde(default)]
    children: Vec<PageSpec>,
}

#[derive(Debug, Deserialize)]
struct MenuSpec {
    site: String,
    title: Option<String>,
    handle: Option<String>,
    #[serde(default)]
    heading: String,
    max_levels: Option<u32>,
    use_specific: Option<UseSpecific>,
    #[serde(flatten)]
    relations: HashMap<String, serde_json::Value>,
}

impl MenuSpec {
    fn take_items(&mut self, relation: &str) -> Result<Vec<MenuItemEntry>, FixtureError> {
        match self.relations.remove(relation) {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Slug derived from a title: lowercase words joined by hyphens.
fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

impl PageSpec {
    fn kind(&self) -> Result<PageKind, FixtureError> {
        match self.kind.as_deref() {
            None | Some("standard") => Ok(PageKind::Standard),
            Some("menu") => Ok(PageKind::Menu(MenuPageBehavior {
                repeat_in_subnav: self.repeat_in_subnav,
                repeated_item_text: self.repeated_item_text.clone(),
            })),
            Some("link") => Ok(PageKind::Link(LinkPage {
                link_page: self.link_page,
                link_url: self.link_url.clone(),
                url_append: self.url_append.clone(),
            })),
            Some(other) => Err(FixtureError::UnknownKind {
                page: self.id,
                kind: other.to_owned(),
            }),
        }
    }

    fn add_to(
        self,
        builder: &mut PageTreeBuilder,
        parent: Option<usize>,
    ) -> Result<(), FixtureError> {
        let kind = self.kind()?;
        let slug = self.slug.unwrap_or_else(|| slugify(&self.title));

        let mut page = NewPage::new(self.id, self.title, slug).with_kind(kind);
        page.show_in_menus = self.show_in_menus;
        if !self.live {
            page = page.draft();
        }
        if let Some(page_type) = self.page_type {
            page = page.with_type(page_type);
        }

        let idx = builder.add_page(page, parent)?;
        for child in self.children {
            child.add_to(builder, Some(idx))?;
        }
        Ok(())
    }
}

fn entry_issues(
    validator: &LinkPageValidator<'_>,
    menu: &str,
    entries: &[MenuItemEntry],
    issues: &mut Vec<FixtureIssue>,
) {
    for (idx, entry) in entries.iter().enumerate() {
        if let Err(error) = validator.validate_entry(entry) {
            issues.push(FixtureIssue {
                subject: format!("{menu} item {}", idx + 1),
                error,
            });
        }
    }
}

/// A problem found by [`SiteFixture::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureIssue {
    /// What failed (e.g., "page 4", "flat menu 'footer' item 2").
    pub subject: String,
    /// The failure.
    pub error: ValidationError,
}

/// A loaded site: page tree plus menus.
#[derive(Debug)]
pub struct SiteFixture {
    /// Pages and sites.
    pub tree: PageTree,
    /// Main and flat menus.
    pub menus: MenuRegistry,
}

impl SiteFixture {
    /// Load a fixture file, choosing the format by extension.
    ///
    /// `.json` files are read as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if the file cannot be read or describes an
    /// inconsistent site.
    pub fn load(path: &Path, config: &Config) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|e| FixtureError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let fixture = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content, config)?
        } else {
            Self::from_yaml_str(&content, config)?
        };

        debug!(
            path = %path.display(),
            pages = fixture.tree.pages().len(),
            "Loaded site fixture"
        );
        Ok(fixture)
    }

    /// Parse a YAML fixture.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if the YAML is invalid or describes an
    /// inconsistent site.
    pub fn from_yaml_str(content: &str, config: &Config) -> Result<Self, FixtureError> {
        Self::from_file(serde_yaml::from_str(content)?, config)
    }

    /// Parse a JSON fixture.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if the JSON is invalid or describes an
    /// inconsistent site.
    pub fn from_json_str(content: &str, config: &Config) -> Result<Self, FixtureError> {
        Self::from_file(serde_json::from_str(content)?, config)
    }

    fn from_file(file: FixtureFile, config: &Config) -> Result<Self, FixtureError> {
        let mut builder = PageTreeBuilder::new();
        for page in file.pages {
            page.add_to(&mut builder, None)?;
        }
        for site in file.sites {
            builder.add_site(site);
        }
        let tree = builder.build()?;

        let site_by_host = |host: &str| {
            tree.sites()
                .iter()
                .find(|s| s.hostname == host)
                .cloned()
                .ok_or_else(|| FixtureError::UnknownSite(host.to_owned()))
        };

        let mut menus = MenuRegistry::new();
        for mut spec in file.main_menus {
            let site = site_by_host(&spec.site)?;
            if let Some(max_levels) = spec.max_levels {
                config.check_max_levels(max_levels, "main menu max_levels")?;
            }
            let mut menu = MainMenu::empty(&site);
            menu.items = spec.take_items(&config.menus.main_items_relation)?;
            menu.max_levels = spec.max_levels;
            menu.use_specific = spec.use_specific;
            menus.set_main_menu(menu);
        }
        for mut spec in file.flat_menus {
            let site = site_by_host(&spec.site)?;
            if let Some(max_levels) = spec.max_levels {
                config.check_max_levels(max_levels, "flat menu max_levels")?;
            }
            let handle = spec.handle.take().ok_or_else(|| {
                ValidationError::field("handle", "Flat menus need a handle")
            })?;
            let title = spec.title.take().unwrap_or_else(|| handle.clone());
            let mut menu = FlatMenu::new(&site, handle, title);
            menu.items = spec.take_items(&config.menus.flat_items_relation)?;
            menu.heading = std::mem::take(&mut spec.heading);
            menu.max_levels = spec.max_levels;
            menu.use_specific = spec.use_specific;
            menus.add_flat_menu(menu)?;
        }

        Ok(Self { tree, menus })
    }

    /// Validate every link page and configured menu entry.
    ///
    /// Returns all problems found, in page order then menu order.
    #[must_use]
    pub fn validate(&self) -> Vec<FixtureIssue> {
        let validator = LinkPageValidator::new(&self.tree);
        let mut issues = Vec::new();

        for page in self.tree.pages() {
            if let Err(error) = validator.validate_page(page) {
                issues.push(FixtureIssue {
                    subject: format!("page {} ({})", page.id, page.title),
                    error,
                });
            }
        }

        for menu in self.menus.main_menus() {
            let subject = format!("main menu of '{}'", menu.site);
            entry_issues(&validator, &subject, &menu.items, &mut issues);
        }
        for menu in self.menus.flat_menus() {
            let subject = format!("flat menu '{}' of '{}'", menu.handle, menu.site);
            entry_issues(&validator, &subject, &menu.items, &mut issues);
        }

        issues
    }

    /// Page by identifier.
    #[must_use]
    pub fn page(&self, id: PageId) -> Option<&menus_store::Page> {
        self.tree.page(id)
    }
}
