//! Store traits and error types.
//!
//! Provides the [`PageStore`] and [`SiteResolver`] traits that menu
//! resolution reads through, along with [`StoreError`] for unified error
//! handling across backends.
//!
//! # URL Convention
//!
//! Page URLs are built from slugs below the owning site's root page:
//! - `"/"` - the site root
//! - `"/about/"` - a child of the site root
//! - `"/about/team/"` - a nested page
//!
//! A relative URL is the path when the page belongs to the current site, and
//! the full URL (`http://host/path/`) when it belongs to another site.

use crate::page::{Page, PageId};
use crate::site::{RequestContext, Site};

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Page does not exist.
    NotFound,
    /// Page exists but is not published.
    Unpublished,
    /// Page is not below the root of any site.
    OutsideSite,
    /// Page identifier is used twice.
    DuplicatePage,
    /// Reference to a page that does not exist.
    InvalidReference,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Page context (if applicable).
    pub page: Option<PageId>,
    /// Backend identifier (e.g., "Tree").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            page: None,
            backend: None,
            source: None,
        }
    }

    /// Attach page context.
    #[must_use]
    pub fn with_page(mut self, page: PageId) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error for a page.
    #[must_use]
    pub fn not_found(page: PageId) -> Self {
        Self::new(StoreErrorKind::NotFound).with_page(page)
    }

    /// Whether the error means the page cannot produce a URL.
    #[must_use]
    pub fn is_unroutable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::NotFound | StoreErrorKind::Unpublished | StoreErrorKind::OutsideSite
        )
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (page: 7)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::Unpublished => "Not published",
            StoreErrorKind::OutsideSite => "Not part of any site",
            StoreErrorKind::DuplicatePage => "Duplicate page",
            StoreErrorKind::InvalidReference => "Invalid reference",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(page) = self.page {
            write!(f, " (page: {page})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read-only access to the page tree.
///
/// Implementations own the pages; callers only borrow them. All methods are
/// pure reads so a store can be shared between concurrent menu builds.
pub trait PageStore: Send + Sync {
    /// Get a page by identifier.
    fn page(&self, id: PageId) -> Option<&Page>;

    /// Menu-eligible children of a page, in sibling order.
    ///
    /// Returns an empty list for unknown pages.
    fn children_of(&self, id: PageId) -> Vec<&Page>;

    /// Whether a page has at least one menu-eligible child.
    fn has_menu_eligible_children(&self, id: PageId) -> bool {
        !self.children_of(id).is_empty()
    }

    /// Identifiers of all ancestors of a page, root first.
    ///
    /// The page itself is not included.
    fn ancestor_ids(&self, id: PageId) -> Vec<PageId>;

    /// URL of a page.
    ///
    /// When `site` is `None` the site is looked up from `request`. With
    /// `full` set the absolute URL is returned, otherwise the URL relative
    /// to the current site.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the page is unknown, unpublished, or not
    /// below any site root.
    fn url_for(
        &self,
        id: PageId,
        site: Option<&Site>,
        request: Option<&RequestContext>,
        full: bool,
    ) -> Result<String, StoreError>;

    /// URL of a page without site or request context.
    ///
    /// Older integrations only know this form. The default implementation
    /// delegates to [`PageStore::url_for`].
    ///
    /// # Errors
    ///
    /// Same as [`PageStore::url_for`].
    fn generic_url(&self, id: PageId) -> Result<String, StoreError> {
        self.url_for(id, None, None, false)
    }
}

/// Maps a request to the site serving it.
pub trait SiteResolver: Send + Sync {
    /// Site for a request, falling back to the default site.
    fn current_site_for(&self, request: &RequestContext) -> Option<&Site>;

    /// Site answering requests for unknown hosts.
    fn default_site(&self) -> Option<&Site>;
}
