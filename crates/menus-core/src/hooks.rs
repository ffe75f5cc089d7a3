//! Extension points called during a menu build.
//!
//! Hooks run at every level: page filters decide which child pages are
//! listed, raw-entry hooks see the unresolved entries, and primed-item hooks
//! see the finished items before they are returned.

use menus_store::{Page, PageId, RequestContext, Site};

use crate::builder::MenuEntry;
use crate::context::{MenuKind, MenuOptions};
use crate::item::MenuItem;

/// Arguments passed to every hook.
#[derive(Clone, Copy, Debug)]
pub struct HookArgs<'a> {
    /// Kind of the menu being built at this level.
    pub menu: MenuKind,
    /// Kind of the menu that started the build.
    pub original_menu: MenuKind,
    /// Level being built, starting at 1.
    pub level: u32,
    /// Page whose children are listed, if any.
    pub parent_page: Option<PageId>,
    /// Current site.
    pub site: Option<&'a Site>,
    /// Current request.
    pub request: Option<&'a RequestContext>,
    /// Page being viewed.
    pub current_page: Option<PageId>,
    /// Options of the build.
    pub options: &'a MenuOptions,
}

type PageFilter = Box<dyn Fn(&Page, &HookArgs<'_>) -> bool + Send + Sync>;
type RawEntriesHook = Box<dyn Fn(Vec<MenuEntry>, &HookArgs<'_>) -> Vec<MenuEntry> + Send + Sync>;
type PrimedItemsHook = Box<dyn Fn(Vec<MenuItem>, &HookArgs<'_>) -> Vec<MenuItem> + Send + Sync>;

/// Registered hooks, run in registration order.
#[derive(Default)]
pub struct MenuHooks {
    page_filters: Vec<PageFilter>,
    raw_entries: Vec<RawEntriesHook>,
    primed_items: Vec<PrimedItemsHook>,
}

impl MenuHooks {
    /// Create an empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list pages for which `filter` returns true.
    pub fn add_page_filter(
        &mut self,
        filter: impl Fn(&Page, &HookArgs<'_>) -> bool + Send + Sync + 'static,
    ) {
        self.page_filters.push(Box::new(filter));
    }

    /// Rewrite the raw entries of each level.
    pub fn on_raw_entries(
        &mut self,
        hook: impl Fn(Vec<MenuEntry>, &HookArgs<'_>) -> Vec<MenuEntry> + Send + Sync + 'static,
    ) {
        self.raw_entries.push(Box::new(hook));
    }

    /// Rewrite the primed items of each level.
    pub fn on_primed_items(
        &mut self,
        hook: impl Fn(Vec<MenuItem>, &HookArgs<'_>) -> Vec<MenuItem> + Send + Sync + 'static,
    ) {
        self.primed_items.push(Box::new(hook));
    }

    /// Whether every page filter accepts `page`.
    #[must_use]
    pub fn accepts(&self, page: &Page, args: &HookArgs<'_>) -> bool {
        self.page_filters.iter().all(|filter| filter(page, args))
    }

    /// Run the raw-entry hooks.
    #[must_use]
    pub fn apply_raw(&self, entries: Vec<MenuEntry>, args: &HookArgs<'_>) -> Vec<MenuEntry> {
        self.raw_entries
            .iter()
            .fold(entries, |entries, hook| hook(entries, args))
    }

    /// Run the primed-item hooks.
    #[must_use]
    pub fn apply_primed(&self, items: Vec<MenuItem>, args: &HookArgs<'_>) -> Vec<MenuItem> {
        self.primed_items
            .iter()
            .fold(items, |items, hook| hook(items, args))
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.page_filters.is_empty() && self.raw_entries.is_empty() && self.primed_items.is_empty()
    }
}

impl std::fmt::Debug for MenuHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuHooks")
            .field("page_filters", &self.page_filters.len())
            .field("raw_entries", &self.raw_entries.len())
            .field("primed_items", &self.primed_items.len())
            .finish()
    }
}
