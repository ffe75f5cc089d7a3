//! Page tree and site collaborators for site menus.
//!
//! This crate provides the read-only content store that menu resolution is
//! layered on top of:
//!
//! - [`PageStore`] trait with `page()`, `children_of()`, `url_for()` and
//!   `ancestor_ids()` methods
//! - [`SiteResolver`] trait for mapping a request to its [`Site`]
//! - [`PageTree`], an immutable in-memory tree implementing both traits
//!
//! # Example
//!
//! ```
//! use menus_store::{NewPage, PageId, PageStore, PageTreeBuilder, Site};
//!
//! let mut builder = PageTreeBuilder::new();
//! let home = builder.add_page(NewPage::new(PageId(1), "Home", "home"), None)?;
//! builder.add_page(NewPage::new(PageId(2), "About", "about").in_menus(), Some(home))?;
//! builder.add_site(Site::new("example.com", PageId(1)).default_site());
//! let tree = builder.build()?;
//!
//! assert_eq!(tree.url_for(PageId(2), None, None, false)?, "/about/");
//! # Ok::<(), menus_store::StoreError>(())
//! ```

mod page;
mod site;
mod store;
mod tree;

pub use page::{LinkPage, MenuPageBehavior, Page, PageId, PageKind};
pub use site::{RequestContext, Site};
pub use store::{PageStore, SiteResolver, StoreError, StoreErrorKind};
pub use tree::{NewPage, PageTree, PageTreeBuilder};
