//! Menu item tree construction.
//!
//! [`MenuItemTreeBuilder`] turns a root page or a list of configured entries
//! into a tree of [`MenuItem`] values. Each level is built the same way:
//!
//! 1. Gather raw entries (menu-eligible children, or configured entries)
//! 2. Run raw-entry hooks
//! 3. Prime every entry: text, href, active state, child presence
//! 4. Recurse into pages with children while levels remain
//! 5. Let the parent's behavior adjust the level (repetition)
//! 6. Run primed-item hooks
//!
//! Builds only read from the store, so the same inputs always produce the
//! same output.

use menus_store::{Page, PageId, PageStore};
use tracing::debug;

use crate::active::ActiveStateClassifier;
use crate::behavior::{BehaviorArgs, BehaviorRegistry, MenuPage};
use crate::context::{MenuContext, MenuKind, MenuOptions};
use crate::hooks::{HookArgs, MenuHooks};
use crate::item::{ActiveClass, MenuItem};
use crate::link::PageLinkResolver;
use crate::menus::MenuItemEntry;

/// An unresolved menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    /// A page listed directly.
    Page(PageId),
    /// A configured entry.
    Item(MenuItemEntry),
}

/// Where the top level of a menu comes from.
#[derive(Clone, Copy, Debug)]
pub enum MenuSource<'a> {
    /// Menu-eligible children of a page.
    ChildrenOf(PageId),
    /// Configured entries, in order.
    Entries(&'a [MenuItemEntry]),
}

/// Builds menu item trees from a page store.
#[derive(Clone, Copy)]
pub struct MenuItemTreeBuilder<'a> {
    store: &'a dyn PageStore,
    behaviors: &'a BehaviorRegistry,
    hooks: &'a MenuHooks,
}

impl<'a> MenuItemTreeBuilder<'a> {
    /// Create a builder.
    #[must_use]
    pub fn new(
        store: &'a dyn PageStore,
        behaviors: &'a BehaviorRegistry,
        hooks: &'a MenuHooks,
    ) -> Self {
        Self {
            store,
            behaviors,
            hooks,
        }
    }

    /// Build the items of a menu.
    #[must_use]
    pub fn build(
        &self,
        source: MenuSource<'_>,
        kind: MenuKind,
        options: &MenuOptions,
        ctx: &MenuContext<'_>,
    ) -> Vec<MenuItem> {
        let run = Run {
            store: self.store,
            behaviors: self.behaviors,
            hooks: self.hooks,
            kind,
            options,
            ctx,
            classifier: ctx.classifier(options.apply_active_classes),
            resolver: PageLinkResolver::new(self.store),
        };

        let items = match source {
            MenuSource::ChildrenOf(id) => match self.store.page(id) {
                Some(root) => {
                    let behavior = run.behavior(root, 1);
                    run.children_level(root, behavior, 1)
                }
                None => {
                    debug!(page = %id, menu = %kind, "Menu root not found");
                    Vec::new()
                }
            },
            MenuSource::Entries(entries) => run.entries_level(entries),
        };

        debug!(menu = %kind, items = items.len(), "Built menu");
        items
    }
}

/// State of a single build.
struct Run<'r> {
    store: &'r dyn PageStore,
    behaviors: &'r BehaviorRegistry,
    hooks: &'r MenuHooks,
    kind: MenuKind,
    options: &'r MenuOptions,
    ctx: &'r MenuContext<'r>,
    classifier: ActiveStateClassifier<'r>,
    resolver: PageLinkResolver<'r>,
}

impl<'r> Run<'r> {
    fn menu_at(&self, level: u32) -> MenuKind {
        if level == 1 { self.kind } else { MenuKind::Sub }
    }

    fn hook_args(&self, level: u32, parent_page: Option<PageId>) -> HookArgs<'_> {
        HookArgs {
            menu: self.menu_at(level),
            original_menu: self.kind,
            level,
            parent_page,
            site: self.ctx.site,
            request: self.ctx.request,
            current_page: self.ctx.current_page,
            options: self.options,
        }
    }

    fn behavior_args(&self, level: u32) -> BehaviorArgs<'_> {
        BehaviorArgs {
            store: self.store,
            site: self.ctx.site,
            request: self.ctx.request,
            current_page: self.ctx.current_page,
            ancestor_ids: &self.ctx.ancestor_ids,
            apply_active_classes: self.options.apply_active_classes,
            allow_repeating_parents: self.options.allow_repeating_parents,
            use_absolute_page_urls: self.options.use_absolute_page_urls,
            original_menu: self.kind,
            menu: self.menu_at(level),
        }
    }

    fn behavior(&self, page: &Page, level: u32) -> Option<&'r dyn MenuPage> {
        if self.options.uses_specific_at(level) {
            self.behaviors.behavior_for(page)
        } else {
            None
        }
    }

    /// Menu-eligible children accepted by every page filter.
    fn eligible_children(&self, parent: PageId, args: &HookArgs<'_>) -> Vec<&'r Page> {
        self.store
            .children_of(parent)
            .into_iter()
            .filter(|page| self.hooks.accepts(page, args))
            .collect()
    }

    fn href(&self, page: &Page, url_append: &str) -> String {
        let href = self.resolver.get_url(
            page,
            self.ctx.site,
            self.ctx.request,
            self.options.use_absolute_page_urls,
        );
        if href.is_empty() {
            href
        } else {
            href + url_append
        }
    }

    fn entries_level(&self, entries: &[MenuItemEntry]) -> Vec<MenuItem> {
        let args = self.hook_args(1, None);
        let raw = entries.iter().cloned().map(MenuEntry::Item).collect();
        let items = self.prime_level(raw, 1, &args);
        self.hooks.apply_primed(items, &args)
    }

    /// Items for the children of `parent`, placed at `level`.
    fn children_level(
        &self,
        parent: &Page,
        behavior: Option<&dyn MenuPage>,
        level: u32,
    ) -> Vec<MenuItem> {
        let args = self.hook_args(level, Some(parent.id));
        let children = self.eligible_children(parent.id, &args);
        self.finish_children_level(parent, &children, behavior, level, &args)
    }

    fn finish_children_level(
        &self,
        parent: &Page,
        children: &[&Page],
        behavior: Option<&dyn MenuPage>,
        level: u32,
        args: &HookArgs<'_>,
    ) -> Vec<MenuItem> {
        let raw = children.iter().map(|p| MenuEntry::Page(p.id)).collect();
        let mut items = self.prime_level(raw, level, args);
        if let Some(behavior) = behavior {
            items = behavior.modify_submenu_items(parent, items, &self.behavior_args(level));
        }
        self.hooks.apply_primed(items, args)
    }

    fn prime_level(&self, raw: Vec<MenuEntry>, level: u32, args: &HookArgs<'_>) -> Vec<MenuItem> {
        self.hooks
            .apply_raw(raw, args)
            .into_iter()
            .filter_map(|entry| self.prime(entry, level, args))
            .collect()
    }

    fn prime(&self, entry: MenuEntry, level: u32, args: &HookArgs<'_>) -> Option<MenuItem> {
        match entry {
            MenuEntry::Page(id) => self.store.page(id).map(|page| self.prime_page(page, None, level)),
            MenuEntry::Item(entry) => match entry.link_page {
                Some(id) => self
                    .store
                    .page(id)
                    .filter(|page| page.is_menu_eligible() && self.hooks.accepts(page, args))
                    .map(|page| self.prime_page(page, Some(&entry), level)),
                None => self.prime_url(&entry),
            },
        }
    }

    fn prime_url(&self, entry: &MenuItemEntry) -> Option<MenuItem> {
        let url = entry.link_url()?;
        let active_class = if self.classifier.applies() && self.ctx.path() == Some(url) {
            ActiveClass::Exact
        } else {
            ActiveClass::None
        };

        Some(
            MenuItem::new(entry.text_for(None), format!("{url}{}", entry.url_append))
                .with_active_class(active_class),
        )
    }

    fn prime_page(&self, page: &Page, entry: Option<&MenuItemEntry>, level: u32) -> MenuItem {
        let text = entry.map_or_else(|| page.title.clone(), |e| e.text_for(Some(page)));
        let href = self.href(page, entry.map_or("", |e| e.url_append.as_str()));

        // Link pages never have sub-menus or active state.
        if page.is_link_page() {
            return MenuItem::new(text, href).with_page(page.id);
        }

        let behavior = self.behavior(page, level);
        let child_args = self.hook_args(level + 1, Some(page.id));
        let subnav = entry.is_none_or(|e| e.allow_subnav);
        let children = if subnav && self.store.has_menu_eligible_children(page.id) {
            self.eligible_children(page.id, &child_args)
        } else {
            Vec::new()
        };

        let mut has_children = !children.is_empty();
        if subnav && let Some(behavior) = behavior {
            has_children =
                behavior.has_submenu_items(page, has_children, &self.behavior_args(level));
        }

        let sub_items = if has_children && level < self.options.max_levels {
            self.finish_children_level(page, &children, behavior, level + 1, &child_args)
        } else {
            Vec::new()
        };

        let mut active_class = self.classifier.classify(page.id);
        if active_class == ActiveClass::Exact
            && sub_items.iter().any(|i| {
                i.repeated && i.page == Some(page.id) && i.active_class == ActiveClass::Exact
            })
        {
            // The repeated child item carries the exact match.
            active_class = ActiveClass::Ancestor;
        }

        let mut item = MenuItem::new(text, href)
            .with_active_class(active_class)
            .with_page(page.id);
        item.has_children_in_menu = has_children;
        item.children = sub_items;
        item
    }
}
