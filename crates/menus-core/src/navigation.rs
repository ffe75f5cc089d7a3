//! Main, flat, section and children menus.
//!
//! [`Navigation`] ties the configuration, menu definitions and page store
//! together and picks the source, options and extra output for each kind of
//! menu before handing over to [`MenuItemTreeBuilder`].

use menus_config::{Config, UseSpecific};
use menus_store::{Page, PageId, PageStore, Site, SiteResolver};
use serde::Serialize;
use tracing::debug;

use crate::behavior::BehaviorRegistry;
use crate::builder::{MenuItemTreeBuilder, MenuSource};
use crate::context::{MenuContext, MenuKind, MenuOptions};
use crate::error::MenuError;
use crate::hooks::MenuHooks;
use crate::item::{ActiveClass, MenuItem};
use crate::link::PageLinkResolver;
use crate::menus::MenuRegistry;

/// Caller overrides applied on top of configured and per-menu options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuOverrides {
    /// Levels to render.
    pub max_levels: Option<u32>,
    /// Compute active classes.
    pub apply_active_classes: Option<bool>,
    /// Let menu pages repeat themselves in sub-menus.
    pub allow_repeating_parents: Option<bool>,
    /// Produce absolute URLs.
    pub use_absolute_page_urls: Option<bool>,
    /// Behavior lookup mode.
    pub use_specific: Option<UseSpecific>,
}

/// A built menu ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedMenu {
    /// Kind of menu.
    pub kind: MenuKind,
    /// Flat menu handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Flat menu heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    /// Root of a section menu.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_root: Option<MenuItem>,
    /// Top-level items.
    pub items: Vec<MenuItem>,
}

impl RenderedMenu {
    fn new(kind: MenuKind, items: Vec<MenuItem>) -> Self {
        Self {
            kind,
            handle: None,
            heading: None,
            section_root: None,
            items,
        }
    }
}

/// Entry point for building every kind of menu.
#[derive(Clone, Copy)]
pub struct Navigation<'a> {
    store: &'a dyn PageStore,
    sites: &'a dyn SiteResolver,
    registry: &'a MenuRegistry,
    behaviors: &'a BehaviorRegistry,
    hooks: &'a MenuHooks,
    config: &'a Config,
}

impl<'a> Navigation<'a> {
    /// Create a navigation over a store and its menus.
    #[must_use]
    pub fn new(
        store: &'a dyn PageStore,
        sites: &'a dyn SiteResolver,
        registry: &'a MenuRegistry,
        behaviors: &'a BehaviorRegistry,
        hooks: &'a MenuHooks,
        config: &'a Config,
    ) -> Self {
        Self {
            store,
            sites,
            registry,
            behaviors,
            hooks,
            config,
        }
    }

    fn builder(&self) -> MenuItemTreeBuilder<'a> {
        MenuItemTreeBuilder::new(self.store, self.behaviors, self.hooks)
    }

    /// Site serving a context: the explicit site, else the request's.
    #[must_use]
    pub fn site_for<'s>(&'s self, ctx: &'s MenuContext<'_>) -> Option<&'s Site> {
        ctx.site
            .or_else(|| ctx.request.and_then(|r| self.sites.current_site_for(r)))
    }

    /// Options for a menu: configured defaults, then the menu's own
    /// settings, then caller overrides.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Config`] if the resulting `max_levels` is out of
    /// range.
    pub fn options(
        &self,
        kind: MenuKind,
        menu_max_levels: Option<u32>,
        menu_use_specific: Option<UseSpecific>,
        overrides: &MenuOverrides,
    ) -> Result<MenuOptions, MenuError> {
        let mut options = MenuOptions::for_kind(kind, self.config);
        if let Some(max_levels) = overrides.max_levels.or(menu_max_levels) {
            self.config.check_max_levels(max_levels, "max_levels")?;
            options.max_levels = max_levels;
        }
        if let Some(use_specific) = overrides.use_specific.or(menu_use_specific) {
            options.use_specific = use_specific;
        }
        if let Some(apply) = overrides.apply_active_classes {
            options.apply_active_classes = apply;
        }
        if let Some(allow) = overrides.allow_repeating_parents {
            options.allow_repeating_parents = allow;
        }
        if let Some(absolute) = overrides.use_absolute_page_urls {
            options.use_absolute_page_urls = absolute;
        }
        Ok(options)
    }

    /// Main menu of the current site.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::NoSite`] if no site serves the context, or
    /// [`MenuError::Config`] for invalid options.
    pub fn main_menu(
        &self,
        ctx: &MenuContext<'_>,
        overrides: &MenuOverrides,
    ) -> Result<RenderedMenu, MenuError> {
        let site = self.site_for(ctx).ok_or(MenuError::NoSite)?;
        let menu = self.registry.main_menu_for(site);
        let options = self.options(MenuKind::Main, menu.max_levels, menu.use_specific, overrides)?;

        let items = self.builder().build(
            MenuSource::Entries(&menu.items),
            MenuKind::Main,
            &options,
            ctx,
        );
        Ok(RenderedMenu::new(MenuKind::Main, items))
    }

    /// Flat menu by handle.
    ///
    /// With `fall_back_to_default_site` set, a handle missing on the current
    /// site is looked up on the default site.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::UnknownFlatMenu`] if no menu has the handle,
    /// [`MenuError::NoSite`] if no site serves the context, or
    /// [`MenuError::Config`] for invalid options.
    pub fn flat_menu(
        &self,
        handle: &str,
        fall_back_to_default_site: bool,
        ctx: &MenuContext<'_>,
        overrides: &MenuOverrides,
    ) -> Result<RenderedMenu, MenuError> {
        let site = self.site_for(ctx).ok_or(MenuError::NoSite)?;
        let fallback = if fall_back_to_default_site {
            self.sites.default_site()
        } else {
            None
        };
        let menu = self
            .registry
            .flat_menu(handle, site, fallback)
            .ok_or_else(|| MenuError::UnknownFlatMenu {
                handle: handle.to_owned(),
                site: site.hostname.clone(),
            })?;
        let options = self.options(MenuKind::Flat, menu.max_levels, menu.use_specific, overrides)?;

        let items = self.builder().build(
            MenuSource::Entries(&menu.items),
            MenuKind::Flat,
            &options,
            ctx,
        );

        let mut rendered = RenderedMenu::new(MenuKind::Flat, items);
        rendered.handle = Some(menu.handle.clone());
        rendered.heading = Some(menu.heading.trim())
            .filter(|h| !h.is_empty())
            .map(str::to_owned);
        Ok(rendered)
    }

    /// Section root of the current page.
    ///
    /// This is the current page's ancestor (or the page itself) at the
    /// configured section root depth.
    #[must_use]
    pub fn section_root(&self, ctx: &MenuContext<'_>) -> Option<&'a Page> {
        let current = ctx.current_page?;
        let depth = self.config.menus.section_root_depth;

        self.store
            .ancestor_ids(current)
            .into_iter()
            .chain(std::iter::once(current))
            .filter_map(|id| self.store.page(id))
            .find(|page| page.depth == depth)
    }

    /// Menu of the pages below the current section root.
    ///
    /// Returns `Ok(None)` when there is no current page or it sits above
    /// the section root depth.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Config`] for invalid options.
    pub fn section_menu(
        &self,
        ctx: &MenuContext<'_>,
        overrides: &MenuOverrides,
    ) -> Result<Option<RenderedMenu>, MenuError> {
        let Some(root) = self.section_root(ctx) else {
            debug!(current = ?ctx.current_page, "No section root for current page");
            return Ok(None);
        };
        let options = self.options(MenuKind::Section, None, None, overrides)?;

        let items = self.builder().build(
            MenuSource::ChildrenOf(root.id),
            MenuKind::Section,
            &options,
            ctx,
        );
        let section_root = self.section_root_item(root, &items, &options, ctx);

        let mut rendered = RenderedMenu::new(MenuKind::Section, items);
        rendered.section_root = Some(section_root);
        Ok(Some(rendered))
    }

    fn section_root_item(
        &self,
        root: &Page,
        items: &[MenuItem],
        options: &MenuOptions,
        ctx: &MenuContext<'_>,
    ) -> MenuItem {
        let href = PageLinkResolver::new(self.store).get_url(
            root,
            ctx.site,
            ctx.request,
            options.use_absolute_page_urls,
        );

        let active_class = if !options.apply_active_classes {
            ActiveClass::None
        } else if ctx.current_page == Some(root.id) {
            // A repeated item for the root already marks the exact match.
            let repeated_exact = options.allow_repeating_parents
                && options.uses_specific_at(1)
                && items
                    .iter()
                    .any(|i| i.active_class == ActiveClass::Exact && i.page == Some(root.id));
            if repeated_exact {
                ActiveClass::Ancestor
            } else {
                ActiveClass::Exact
            }
        } else {
            ActiveClass::Ancestor
        };

        let mut item = MenuItem::new(root.title.clone(), href)
            .with_active_class(active_class)
            .with_page(root.id);
        item.has_children_in_menu = !items.is_empty();
        item
    }

    /// Menu of the children of `parent`, or of the current page.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::MissingParent`] if neither page is given, or
    /// [`MenuError::Config`] for invalid options.
    pub fn children_menu(
        &self,
        parent: Option<PageId>,
        ctx: &MenuContext<'_>,
        overrides: &MenuOverrides,
    ) -> Result<RenderedMenu, MenuError> {
        let parent = parent
            .or(ctx.current_page)
            .ok_or(MenuError::MissingParent)?;
        let options = self.options(MenuKind::Children, None, None, overrides)?;

        let items = self.builder().build(
            MenuSource::ChildrenOf(parent),
            MenuKind::Children,
            &options,
            ctx,
        );
        Ok(RenderedMenu::new(MenuKind::Children, items))
    }
}

#[cfg(test)]
mod tests {
    use menus_store::{PageTree, RequestContext};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::menus::{FlatMenu, MainMenu, MenuItemEntry};
    use crate::testing::site_tree;

    struct Fixture {
        tree: PageTree,
        registry: MenuRegistry,
        behaviors: BehaviorRegistry,
        hooks: MenuHooks,
        config: Config,
    }

    impl Fixture {
        fn new() -> Self {
            let tree = site_tree();
            let site = tree.sites()[0].clone();
            let mut registry = MenuRegistry::new();
            let mut main = MainMenu::empty(&site);
            main.items = vec![
                MenuItemEntry::page(PageId(2)),
                MenuItemEntry::page(PageId(5)),
                MenuItemEntry::url("https://status.example.com", "Status"),
            ];
            registry.set_main_menu(main);
            let mut footer = FlatMenu::new(&site, "footer", "Footer");
            footer.heading = "Useful links".to_owned();
            footer.items = vec![MenuItemEntry::page(PageId(10))];
            registry.add_flat_menu(footer).unwrap();

            Self {
                tree,
                registry,
                behaviors: BehaviorRegistry::new(),
                hooks: MenuHooks::new(),
                config: Config::default(),
            }
        }

        fn navigation(&self) -> Navigation<'_> {
            Navigation::new(
                &self.tree,
                &self.tree,
                &self.registry,
                &self.behaviors,
                &self.hooks,
                &self.config,
            )
        }
    }

    fn texts(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn test_main_menu_uses_request_site() {
        let fixture = Fixture::new();
        let request = RequestContext::new("example.com", "/about/team/");
        let ctx = MenuContext::new()
            .with_request(&request)
            .with_current_page(&fixture.tree, PageId(3));

        let menu = fixture
            .navigation()
            .main_menu(&ctx, &MenuOverrides::default())
            .unwrap();

        assert_eq!(texts(&menu.items), vec!["About", "Services", "Status"]);
        assert_eq!(menu.items[0].active_class, ActiveClass::Ancestor);
        assert_eq!(texts(&menu.items[0].children), vec!["Team"]);
        assert_eq!(menu.items[0].children[0].active_class, ActiveClass::Exact);
    }

    #[test]
    fn test_main_menu_unknown_host_uses_default_site() {
        let fixture = Fixture::new();
        let request = RequestContext::new("unknown.test", "/");
        let ctx = MenuContext::new().with_request(&request);

        let menu = fixture
            .navigation()
            .main_menu(&ctx, &MenuOverrides::default())
            .unwrap();

        assert_eq!(menu.items.len(), 3);
    }

    #[test]
    fn test_main_menu_without_site_fails() {
        let fixture = Fixture::new();

        let err = fixture
            .navigation()
            .main_menu(&MenuContext::new(), &MenuOverrides::default())
            .unwrap_err();

        assert!(matches!(err, MenuError::NoSite));
    }

    #[test]
    fn test_flat_menu_heading_and_handle() {
        let fixture = Fixture::new();
        let site = fixture.tree.sites()[0].clone();
        let ctx = MenuContext::new().with_site(&site);

        let menu = fixture
            .navigation()
            .flat_menu("footer", false, &ctx, &MenuOverrides::default())
            .unwrap();

        assert_eq!(menu.handle.as_deref(), Some("footer"));
        assert_eq!(menu.heading.as_deref(), Some("Useful links"));
        assert_eq!(texts(&menu.items), vec!["Contact"]);
    }

    #[test]
    fn test_unknown_flat_menu() {
        let fixture = Fixture::new();
        let site = fixture.tree.sites()[0].clone();
        let ctx = MenuContext::new().with_site(&site);

        let err = fixture
            .navigation()
            .flat_menu("sidebar", true, &ctx, &MenuOverrides::default())
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "No flat menu with handle 'sidebar' on site 'example.com'"
        );
    }

    #[test]
    fn test_section_root_at_configured_depth() {
        let fixture = Fixture::new();
        let nav = fixture.navigation();

        let deep = MenuContext::new().with_current_page(&fixture.tree, PageId(7));
        assert_eq!(nav.section_root(&deep).map(|p| p.id), Some(PageId(5)));

        let root = MenuContext::new().with_current_page(&fixture.tree, PageId(1));
        assert!(nav.section_root(&root).is_none());
    }

    #[test]
    fn test_section_menu_root_item() {
        let fixture = Fixture::new();
        let ctx = MenuContext::new().with_current_page(&fixture.tree, PageId(7));

        let menu = fixture
            .navigation()
            .section_menu(&ctx, &MenuOverrides::default())
            .unwrap()
            .unwrap();

        let root = menu.section_root.unwrap();
        assert_eq!(root.text, "Services");
        assert_eq!(root.href, "/services/");
        assert_eq!(root.active_class, ActiveClass::Ancestor);
        assert_eq!(texts(&menu.items), vec!["Consulting"]);
        assert_eq!(menu.items[0].active_class, ActiveClass::Ancestor);
        assert_eq!(menu.items[0].children[0].active_class, ActiveClass::Exact);
    }

    #[test]
    fn test_section_root_exact_unless_repeated() {
        let fixture = Fixture::new();
        let nav = fixture.navigation();

        let services = MenuContext::new().with_current_page(&fixture.tree, PageId(5));
        let menu = nav
            .section_menu(&services, &MenuOverrides::default())
            .unwrap()
            .unwrap();
        assert_eq!(menu.section_root.unwrap().active_class, ActiveClass::Exact);

        let about = MenuContext::new().with_current_page(&fixture.tree, PageId(2));
        let menu = nav
            .section_menu(&about, &MenuOverrides::default())
            .unwrap()
            .unwrap();
        assert_eq!(texts(&menu.items), vec!["Overview", "Team"]);
        assert_eq!(menu.section_root.unwrap().active_class, ActiveClass::Ancestor);
    }

    #[test]
    fn test_section_menu_without_current_page() {
        let fixture = Fixture::new();

        let menu = fixture
            .navigation()
            .section_menu(&MenuContext::new(), &MenuOverrides::default())
            .unwrap();

        assert!(menu.is_none());
    }

    #[test]
    fn test_children_menu_defaults_to_current_page() {
        let fixture = Fixture::new();
        let ctx = MenuContext::new().with_current_page(&fixture.tree, PageId(5));
        let nav = fixture.navigation();

        let menu = nav.children_menu(None, &ctx, &MenuOverrides::default()).unwrap();
        assert_eq!(texts(&menu.items), vec!["Consulting"]);

        let err = nav
            .children_menu(None, &MenuContext::new(), &MenuOverrides::default())
            .unwrap_err();
        assert!(matches!(err, MenuError::MissingParent));
    }

    #[test]
    fn test_overrides_win() {
        let fixture = Fixture::new();
        let overrides = MenuOverrides {
            max_levels: Some(3),
            apply_active_classes: Some(false),
            allow_repeating_parents: Some(true),
            use_absolute_page_urls: None,
            use_specific: Some(UseSpecific::Off),
        };

        let options = fixture
            .navigation()
            .options(MenuKind::Main, Some(1), Some(UseSpecific::Always), &overrides)
            .unwrap();

        assert_eq!(options.max_levels, 3);
        assert!(!options.apply_active_classes);
        assert!(options.allow_repeating_parents);
        assert_eq!(options.use_specific, UseSpecific::Off);
    }

    #[test]
    fn test_max_levels_out_of_range() {
        let fixture = Fixture::new();
        let overrides = MenuOverrides {
            max_levels: Some(9),
            ..MenuOverrides::default()
        };

        let err = fixture
            .navigation()
            .options(MenuKind::Main, None, None, &overrides)
            .unwrap_err();

        assert!(matches!(err, MenuError::Config(_)));
    }
}
