//! Menu item resolution for site navigation.
//!
//! Builds navigable menu item trees from a page store:
//!
//! - [`PageLinkResolver`] turns pages, link pages and configured entries
//!   into URLs
//! - [`ActiveStateClassifier`] marks the current page and its ancestors
//! - [`RepeatingItemInjector`] repeats a parent page at the head of its own
//!   sub-menu
//! - [`MenuItemTreeBuilder`] assembles the levels of a menu
//! - [`LinkPageValidator`] checks link pages and menu entries before they
//!   are stored
//!
//! [`Navigation`] wraps these into main, flat, section and children menus.
//!
//! # Example
//!
//! ```
//! use menus_config::Config;
//! use menus_core::{
//!     BehaviorRegistry, MenuContext, MenuHooks, MenuItemTreeBuilder, MenuKind, MenuOptions,
//!     MenuSource,
//! };
//! use menus_store::{NewPage, PageId, PageTreeBuilder, Site};
//!
//! let mut builder = PageTreeBuilder::new();
//! let home = builder.add_page(NewPage::new(PageId(1), "Home", "home"), None)?;
//! builder.add_page(NewPage::new(PageId(2), "About", "about").in_menus(), Some(home))?;
//! builder.add_site(Site::new("example.com", PageId(1)).default_site());
//! let tree = builder.build()?;
//!
//! let behaviors = BehaviorRegistry::new();
//! let hooks = MenuHooks::new();
//! let options = MenuOptions::for_kind(MenuKind::Children, &Config::default());
//! let ctx = MenuContext::new().with_current_page(&tree, PageId(2));
//!
//! let items = MenuItemTreeBuilder::new(&tree, &behaviors, &hooks).build(
//!     MenuSource::ChildrenOf(PageId(1)),
//!     MenuKind::Children,
//!     &options,
//!     &ctx,
//! );
//!
//! assert_eq!(items[0].href, "/about/");
//! # Ok::<(), menus_store::StoreError>(())
//! ```

mod active;
mod behavior;
mod builder;
mod context;
mod error;
mod fixture;
mod hooks;
mod item;
mod link;
mod menus;
mod navigation;
mod repeat;
mod validate;

#[cfg(test)]
mod testing;

pub use active::ActiveStateClassifier;
pub use behavior::{
    BehaviorArgs, BehaviorRegistry, DefaultMenuPage, LegacyAdapter, LegacyCapabilityMismatch,
    LegacyMenuPage, MenuPage, default_repeated_item,
};
pub use builder::{MenuEntry, MenuItemTreeBuilder, MenuSource};
pub use context::{MenuContext, MenuKind, MenuOptions};
pub use error::MenuError;
pub use fixture::{FixtureError, FixtureIssue, SiteFixture};
pub use hooks::{HookArgs, MenuHooks};
pub use item::{ActiveClass, MenuItem};
pub use link::{LinkError, LinkTarget, Linkable, PageLinkResolver};
pub use menus::{FlatMenu, MainMenu, MenuItemEntry, MenuRegistry};
pub use navigation::{MenuOverrides, Navigation, RenderedMenu};
pub use repeat::RepeatingItemInjector;
pub use validate::{LinkPageValidator, ValidationError};
