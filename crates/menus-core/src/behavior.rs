//! Page-type specific menu behavior.
//!
//! Pages with menu behavior can customize how they appear when they have
//! sub-menus. Behavior is looked up per page type in a [`BehaviorRegistry`];
//! types without a registration use [`DefaultMenuPage`] when their page
//! carries menu behavior data.
//!
//! Implementations written against the older context-free signature can be
//! registered through [`LegacyMenuPage`]. They keep working, but a
//! deprecation warning is logged the first time each one is used.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use menus_store::{Page, PageId, PageStore, RequestContext, Site};
use tracing::warn;

use crate::context::MenuKind;
use crate::item::{ActiveClass, MenuItem};
use crate::link::PageLinkResolver;
use crate::repeat::RepeatingItemInjector;

/// Raised when a behavior cannot produce an item for the given arguments.
///
/// The caller falls back to the default repeated item built without request
/// context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{page_type}` cannot build `{capability}` with the current arguments")]
pub struct LegacyCapabilityMismatch {
    /// Page type whose behavior failed.
    pub page_type: String,
    /// Name of the capability.
    pub capability: &'static str,
}

/// Arguments passed to [`MenuPage`] capabilities.
#[derive(Clone, Copy)]
pub struct BehaviorArgs<'a> {
    /// Page store.
    pub store: &'a dyn PageStore,
    /// Current site.
    pub site: Option<&'a Site>,
    /// Current request.
    pub request: Option<&'a RequestContext>,
    /// Page being viewed.
    pub current_page: Option<PageId>,
    /// Ancestors of the current page.
    pub ancestor_ids: &'a HashSet<PageId>,
    /// Compute active classes.
    pub apply_active_classes: bool,
    /// Repetition is allowed for this build.
    pub allow_repeating_parents: bool,
    /// Produce absolute URLs.
    pub use_absolute_page_urls: bool,
    /// Kind of the menu that started the build.
    pub original_menu: MenuKind,
    /// Kind of the menu being built at this level.
    pub menu: MenuKind,
}

impl BehaviorArgs<'_> {
    /// Copy of these arguments without request context.
    #[must_use]
    pub fn without_request(&self) -> Self {
        Self {
            request: None,
            ..*self
        }
    }
}

/// Menu capabilities of a page type.
///
/// Every method has a default, so implementations override only what they
/// customize.
pub trait MenuPage: Send + Sync {
    /// Item linking to `page`, placed first among its own children.
    ///
    /// Implementations must populate `text` and `href`.
    ///
    /// # Errors
    ///
    /// Returns [`LegacyCapabilityMismatch`] if the item cannot be built for
    /// these arguments; the default item is used instead.
    fn repeated_menu_item(
        &self,
        page: &Page,
        args: &BehaviorArgs<'_>,
    ) -> Result<MenuItem, LegacyCapabilityMismatch> {
        Ok(default_repeated_item(page, args))
    }

    /// Adjust the primed sub-menu items of `page`.
    ///
    /// The default prepends the repeated item when repetition applies.
    fn modify_submenu_items(
        &self,
        page: &Page,
        items: Vec<MenuItem>,
        args: &BehaviorArgs<'_>,
    ) -> Vec<MenuItem> {
        RepeatingItemInjector::inject(self, page, items, args)
    }

    /// Whether `page` shows a sub-menu.
    ///
    /// `has_children` is whether the page has menu-eligible children.
    fn has_submenu_items(&self, page: &Page, has_children: bool, args: &BehaviorArgs<'_>) -> bool {
        let _ = (page, args);
        has_children
    }
}

/// Repeated item built from the page's own settings.
///
/// Text is the configured repeated text, falling back to the page title.
/// The URL is relative to the current site.
#[must_use]
pub fn default_repeated_item(page: &Page, args: &BehaviorArgs<'_>) -> MenuItem {
    let href = PageLinkResolver::new(args.store).get_url(page, args.site, args.request, false);
    repeated_item(page, href, args.current_page, args.apply_active_classes)
}

fn repeated_item(
    page: &Page,
    href: String,
    current_page: Option<PageId>,
    apply_active_classes: bool,
) -> MenuItem {
    let text = page
        .menu_behavior()
        .map(|b| b.repeated_item_text.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(&page.title);
    let active_class = if apply_active_classes && current_page == Some(page.id) {
        ActiveClass::Exact
    } else {
        ActiveClass::None
    };

    MenuItem::new(text, href)
        .with_active_class(active_class)
        .with_page(page.id)
}

/// Behavior for pages that carry menu data but no registered type.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultMenuPage;

impl MenuPage for DefaultMenuPage {}

/// Menu behavior using the older, context-free signature.
pub trait LegacyMenuPage: Send + Sync {
    /// Item linking to `page`, placed first among its own children.
    ///
    /// The default links to the page's context-free URL, or `""` when it has
    /// none.
    fn repeated_menu_item(
        &self,
        page: &Page,
        current_page: Option<PageId>,
        apply_active_classes: bool,
        original_menu: MenuKind,
        store: &dyn PageStore,
    ) -> MenuItem {
        let _ = original_menu;
        let href = PageLinkResolver::new(store)
            .resolve_generic(page)
            .unwrap_or_default();
        repeated_item(page, href, current_page, apply_active_classes)
    }
}

/// Adapts a [`LegacyMenuPage`] to [`MenuPage`].
#[derive(Debug)]
pub struct LegacyAdapter<T> {
    inner: T,
    page_type: String,
    warned: AtomicBool,
}

impl<T: LegacyMenuPage> LegacyAdapter<T> {
    /// Wrap a legacy implementation registered for `page_type`.
    #[must_use]
    pub fn new(page_type: impl Into<String>, inner: T) -> Self {
        Self {
            inner,
            page_type: page_type.into(),
            warned: AtomicBool::new(false),
        }
    }

    fn warn_once(&self) {
        if !self.warned.swap(true, Ordering::Relaxed) {
            warn!(
                page_type = %self.page_type,
                "repeated_menu_item without site and request context is deprecated"
            );
        }
    }
}

impl<T: LegacyMenuPage> MenuPage for LegacyAdapter<T> {
    fn repeated_menu_item(
        &self,
        page: &Page,
        args: &BehaviorArgs<'_>,
    ) -> Result<MenuItem, LegacyCapabilityMismatch> {
        self.warn_once();
        Ok(self.inner.repeated_menu_item(
            page,
            args.current_page,
            args.apply_active_classes,
            args.original_menu,
            args.store,
        ))
    }
}

/// Menu behavior by page type.
pub struct BehaviorRegistry {
    by_type: HashMap<String, Arc<dyn MenuPage>>,
    fallback: Arc<dyn MenuPage>,
}

impl BehaviorRegistry {
    /// Create a registry with no registered types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
            fallback: Arc::new(DefaultMenuPage),
        }
    }

    /// Register behavior for a page type, replacing any previous one.
    pub fn register(&mut self, page_type: impl Into<String>, behavior: impl MenuPage + 'static) {
        self.by_type.insert(page_type.into(), Arc::new(behavior));
    }

    /// Register a legacy implementation for a page type.
    pub fn register_legacy(
        &mut self,
        page_type: impl Into<String>,
        behavior: impl LegacyMenuPage + 'static,
    ) {
        let page_type = page_type.into();
        let adapter = LegacyAdapter::new(page_type.clone(), behavior);
        self.by_type.insert(page_type, Arc::new(adapter));
    }

    /// Behavior for a page.
    ///
    /// Registered types win; otherwise pages with menu data get the default
    /// behavior and all other pages get none.
    #[must_use]
    pub fn behavior_for(&self, page: &Page) -> Option<&dyn MenuPage> {
        self.by_type
            .get(&page.page_type)
            .or_else(|| page.menu_behavior().map(|_| &self.fallback))
            .map(|behavior| &**behavior)
    }

    /// Number of registered page types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether no page types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.by_type.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("BehaviorRegistry")
            .field("types", &types)
            .finish_non_exhaustive()
    }
}
