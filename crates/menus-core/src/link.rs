//! Link resolution for pages, link pages and configured menu items.

use menus_store::{LinkPage, Page, PageId, PageKind, PageStore, RequestContext, Site, StoreError};
use tracing::{debug, warn};

/// Link resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// Target page is unpublished, unknown, or outside every site.
    #[error("page {0} cannot be routed")]
    UnroutablePage(PageId),
    /// The store failed for another reason.
    #[error("URL lookup for page {page} failed: {message}")]
    Store {
        /// Page being resolved.
        page: PageId,
        /// Store error message.
        message: String,
    },
    /// Neither a page nor a URL is set.
    #[error("link has no target")]
    MissingTarget,
}

/// What a link points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Internal page.
    Page(PageId),
    /// Literal URL, used as is.
    Url(&'a str),
}

/// Something that resolves to a URL.
pub trait Linkable {
    /// Link target, `None` when nothing is set.
    fn link_target(&self) -> Option<LinkTarget<'_>>;

    /// Suffix appended to the resolved URL.
    fn url_append(&self) -> &str {
        ""
    }
}

/// Classify a store failure for `page`.
fn link_error(page: PageId, err: &StoreError) -> LinkError {
    if err.is_unroutable() {
        debug!(%page, error = %err, "Page has no URL");
        LinkError::UnroutablePage(page)
    } else {
        warn!(%page, error = %err, "Page URL lookup failed");
        LinkError::Store {
            page,
            message: err.to_string(),
        }
    }
}

impl Linkable for LinkPage {
    fn link_target(&self) -> Option<LinkTarget<'_>> {
        // A literal URL wins when both are set; validation rejects that state.
        self.url()
            .map(LinkTarget::Url)
            .or_else(|| self.link_page.map(LinkTarget::Page))
    }

    fn url_append(&self) -> &str {
        &self.url_append
    }
}

impl Linkable for Page {
    fn link_target(&self) -> Option<LinkTarget<'_>> {
        match &self.kind {
            PageKind::Link(link) => link.link_target(),
            _ => Some(LinkTarget::Page(self.id)),
        }
    }

    fn url_append(&self) -> &str {
        match &self.kind {
            PageKind::Link(link) => &link.url_append,
            _ => "",
        }
    }
}

/// Resolves [`Linkable`] values to URLs through a [`PageStore`].
#[derive(Clone, Copy)]
pub struct PageLinkResolver<'a> {
    store: &'a dyn PageStore,
}

impl<'a> PageLinkResolver<'a> {
    /// Create a resolver reading from `store`.
    #[must_use]
    pub fn new(store: &'a dyn PageStore) -> Self {
        Self { store }
    }

    /// Resolve a URL.
    ///
    /// Literal URLs are returned as is, ignoring `site` and `request`. Page
    /// targets are resolved relative to the current site unless `full` is
    /// set. The entity's suffix is appended in both cases.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::UnroutablePage`] if the target page has no URL,
    /// [`LinkError::Store`] if the store fails otherwise, or
    /// [`LinkError::MissingTarget`] if nothing is set.
    pub fn resolve<L: Linkable + ?Sized>(
        &self,
        entity: &L,
        site: Option<&Site>,
        request: Option<&RequestContext>,
        full: bool,
    ) -> Result<String, LinkError> {
        let base = match entity.link_target().ok_or(LinkError::MissingTarget)? {
            LinkTarget::Url(url) => url.to_owned(),
            LinkTarget::Page(id) => self
                .store
                .url_for(id, site, request, full)
                .map_err(|e| link_error(id, &e))?,
        };
        Ok(base + entity.url_append())
    }

    /// Resolve a URL through the store's context-free lookup.
    ///
    /// For store integrations that cannot take a site or request.
    ///
    /// # Errors
    ///
    /// Same as [`PageLinkResolver::resolve`].
    pub fn resolve_generic<L: Linkable + ?Sized>(&self, entity: &L) -> Result<String, LinkError> {
        let base = match entity.link_target().ok_or(LinkError::MissingTarget)? {
            LinkTarget::Url(url) => url.to_owned(),
            LinkTarget::Page(id) => self
                .store
                .generic_url(id)
                .map_err(|e| link_error(id, &e))?,
        };
        Ok(base + entity.url_append())
    }

    /// Resolve a URL, returning an empty string when it cannot be resolved.
    ///
    /// Every [`LinkError`] is recovered here so a single bad link never
    /// aborts a menu build.
    #[must_use]
    pub fn get_url<L: Linkable + ?Sized>(
        &self,
        entity: &L,
        site: Option<&Site>,
        request: Option<&RequestContext>,
        full: bool,
    ) -> String {
        self.resolve(entity, site, request, full)
            .unwrap_or_default()
    }
}
