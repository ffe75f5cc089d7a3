//! In-memory page tree.
//!
//! Provides [`PageTree`], an immutable tree of pages and the sites served
//! from it, implementing [`PageStore`] and [`SiteResolver`].
//!
//! # Architecture
//!
//! Pages are stored in a flat `Vec<Page>` with parent/children relationships
//! tracked by indices. This provides:
//! - O(1) page lookups via the `index` `HashMap`
//! - O(d) ancestor walks where d is the page depth
//! - URL paths computed once at build time, per owning site

use std::collections::HashMap;

use tracing::debug;

use crate::page::{Page, PageId, PageKind};
use crate::site::{RequestContext, Site};
use crate::store::{PageStore, SiteResolver, StoreError, StoreErrorKind};

const BACKEND: &str = "Tree";

/// Input for adding a page to a [`PageTreeBuilder`].
#[derive(Clone, Debug)]
pub struct NewPage {
    /// Page identifier.
    pub id: PageId,
    /// Page title.
    pub title: String,
    /// URL segment.
    pub slug: String,
    /// Whether the page may appear in menus.
    ///
    /// `None` uses the default for the page kind: link pages are shown,
    /// every other page is hidden.
    pub show_in_menus: Option<bool>,
    /// Whether the page is published.
    pub live: bool,
    /// Name of the specific page type.
    pub page_type: String,
    /// Variant-specific data.
    pub kind: PageKind,
}

impl NewPage {
    /// Create a published standard page.
    #[must_use]
    pub fn new(id: PageId, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            show_in_menus: None,
            live: true,
            page_type: "Page".to_owned(),
            kind: PageKind::Standard,
        }
    }

    /// Show the page in menus.
    #[must_use]
    pub fn in_menus(mut self) -> Self {
        self.show_in_menus = Some(true);
        self
    }


    /// Mark the page as unpublished.
    #[must_use]
    pub fn draft(mut self) -> Self {
        self.live = false;
        self
    }

    /// Set the variant-specific data.
    #[must_use]
    pub fn with_kind(mut self, kind: PageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the specific page type name.
    #[must_use]
    pub fn with_type(mut self, page_type: impl Into<String>) -> Self {
        self.page_type = page_type.into();
        self
    }
}

/// Location of a page within a site.
#[derive(Clone, Debug)]
struct Route {
    site: usize,
    path: String,
}

/// Immutable page tree with efficient lookups.
///
/// Pure data structure storing pages in a flat list with parent/children
/// relationships tracked by indices.
#[derive(Debug)]
pub struct PageTree {
    pages: Vec<Page>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    index: HashMap<PageId, usize>,
    sites: Vec<Site>,
    routes: Vec<Option<Route>>,
}

/// Compute the route of every page below a site root.
///
/// Sites are processed from the shallowest root to the deepest, so a page
/// below nested site roots belongs to the closest one.
fn compute_routes(
    pages: &[Page],
    children: &[Vec<usize>],
    index: &HashMap<PageId, usize>,
    sites: &[Site],
) -> Vec<Option<Route>> {
    fn walk(
        idx: usize,
        site: usize,
        path: String,
        pages: &[Page],
        children: &[Vec<usize>],
        routes: &mut [Option<Route>],
    ) {
        for &child in &children[idx] {
            let child_path = format!("{path}{}/", pages[child].slug);
            walk(child, site, child_path, pages, children, routes);
        }
        routes[idx] = Some(Route { site, path });
    }

    let mut routes = vec![None; pages.len()];

    let mut ordered: Vec<(usize, usize)> = sites
        .iter()
        .enumerate()
        .filter_map(|(site_idx, site)| index.get(&site.root_page).map(|&i| (site_idx, i)))
        .collect();
    ordered.sort_by_key(|&(_, root)| pages[root].depth);

    for (site_idx, root) in ordered {
        walk(
            root,
            site_idx,
            "/".to_owned(),
            pages,
            children,
            &mut routes,
        );
    }

    routes
}

impl PageTree {
    /// Get all pages in insertion order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Get all sites.
    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Get the default site, if one is marked.
    #[must_use]
    pub fn default_site(&self) -> Option<&Site> {
        self.sites.iter().find(|s| s.is_default_site)
    }

    /// Find the page served at `path` on `site`.
    ///
    /// Paths are matched with or without leading and trailing slashes.
    #[must_use]
    pub fn page_for_path(&self, site: &Site, path: &str) -> Option<&Page> {
        let site_idx = self.sites.iter().position(|s| s == site)?;
        let trimmed = path.trim_matches('/');
        let wanted = if trimmed.is_empty() {
            "/".to_owned()
        } else {
            format!("/{trimmed}/")
        };

        self.routes.iter().enumerate().find_map(|(idx, route)| {
            route
                .as_ref()
                .filter(|r| r.site == site_idx && r.path == wanted)
                .map(|_| &self.pages[idx])
        })
    }

    fn route(&self, id: PageId) -> Result<(&Page, &Route), StoreError> {
        let &idx = self
            .index
            .get(&id)
            .ok_or_else(|| StoreError::not_found(id).with_backend(BACKEND))?;
        let page = &self.pages[idx];

        if !page.live {
            return Err(StoreError::new(StoreErrorKind::Unpublished)
                .with_page(id)
                .with_backend(BACKEND));
        }

        let route = self.routes[idx].as_ref().ok_or_else(|| {
            StoreError::new(StoreErrorKind::OutsideSite)
                .with_page(id)
                .with_backend(BACKEND)
        })?;

        Ok((page, route))
    }
}

impl PageStore for PageTree {
    fn page(&self, id: PageId) -> Option<&Page> {
        self.index.get(&id).map(|&i| &self.pages[i])
    }

    fn children_of(&self, id: PageId) -> Vec<&Page> {
        self.index
            .get(&id)
            .map(|&idx| {
                self.children[idx]
                    .iter()
                    .map(|&c| &self.pages[c])
                    .filter(|p| p.is_menu_eligible())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn has_menu_eligible_children(&self, id: PageId) -> bool {
        self.index.get(&id).is_some_and(|&idx| {
            self.children[idx]
                .iter()
                .any(|&c| self.pages[c].is_menu_eligible())
        })
    }

    fn ancestor_ids(&self, id: PageId) -> Vec<PageId> {
        let Some(&idx) = self.index.get(&id) else {
            return Vec::new();
        };

        let mut ancestors = Vec::new();
        let mut current = self.parents[idx];
        while let Some(i) = current {
            ancestors.push(self.pages[i].id);
            current = self.parents[i];
        }
        ancestors.reverse();
        ancestors
    }

    fn url_for(
        &self,
        id: PageId,
        site: Option<&Site>,
        request: Option<&RequestContext>,
        full: bool,
    ) -> Result<String, StoreError> {
        let (_, route) = self.route(id)?;
        let page_site = &self.sites[route.site];
        let full_url = || format!("{}{}", page_site.root_url(), route.path);

        if full {
            return Ok(full_url());
        }

        let current = site.or_else(|| request.and_then(|r| self.current_site_for(r)));
        let url = match current {
            Some(current) if current == page_site => route.path.clone(),
            Some(_) => full_url(),
            None if self.sites.len() == 1 => route.path.clone(),
            None => full_url(),
        };
        Ok(url)
    }
}

impl SiteResolver for PageTree {
    fn current_site_for(&self, request: &RequestContext) -> Option<&Site> {
        let by_host = |s: &&Site| s.hostname.eq_ignore_ascii_case(&request.hostname);

        request
            .port
            .and_then(|port| self.sites.iter().filter(by_host).find(|s| s.port == port))
            .or_else(|| self.sites.iter().find(by_host))
            .or_else(|| self.default_site())
    }

    fn default_site(&self) -> Option<&Site> {
        PageTree::default_site(self)
    }
}

/// Builder for constructing [`PageTree`] instances.
#[derive(Debug, Default)]
pub struct PageTreeBuilder {
    pages: Vec<Page>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    index: HashMap<PageId, usize>,
    sites: Vec<Site>,
}

impl PageTreeBuilder {
    /// Create a new tree builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page to the tree.
    ///
    /// # Arguments
    ///
    /// * `page` - Page data
    /// * `parent_idx` - Index of parent page, `None` for a root
    ///
    /// # Returns
    ///
    /// Index of the added page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::DuplicatePage`] if the identifier is taken,
    /// or [`StoreErrorKind::InvalidReference`] if `parent_idx` is unknown.
    pub fn add_page(
        &mut self,
        page: NewPage,
        parent_idx: Option<usize>,
    ) -> Result<usize, StoreError> {
        if self.index.contains_key(&page.id) {
            return Err(StoreError::new(StoreErrorKind::DuplicatePage)
                .with_page(page.id)
                .with_backend(BACKEND));
        }

        let depth = match parent_idx {
            Some(parent) => {
                let parent_page = self.pages.get(parent).ok_or_else(|| {
                    StoreError::new(StoreErrorKind::InvalidReference)
                        .with_page(page.id)
                        .with_backend(BACKEND)
                })?;
                parent_page.depth + 1
            }
            None => 1,
        };

        let idx = self.pages.len();
        self.index.insert(page.id, idx);
        self.pages.push(Page {
            id: page.id,
            title: page.title,
            slug: page.slug,
            depth,
            show_in_menus: page
                .show_in_menus
                .unwrap_or_else(|| page.kind.shown_in_menus_by_default()),
            live: page.live,
            page_type: page.page_type,
            kind: page.kind,
        });
        self.children.push(Vec::new());
        self.parents.push(parent_idx);

        if let Some(parent) = parent_idx {
            self.children[parent].push(idx);
        }

        Ok(idx)
    }

    /// Add a site served from the subtree below its root page.
    pub fn add_site(&mut self, site: Site) {
        self.sites.push(site);
    }

    /// Build the [`PageTree`] instance.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::InvalidReference`] if a site root or a
    /// link page target does not exist.
    pub fn build(self) -> Result<PageTree, StoreError> {
        for site in &self.sites {
            if !self.index.contains_key(&site.root_page) {
                return Err(StoreError::new(StoreErrorKind::InvalidReference)
                    .with_page(site.root_page)
                    .with_backend(BACKEND));
            }
        }

        for page in &self.pages {
            if let PageKind::Link(link) = &page.kind
                && let Some(target) = link.link_page
                && !self.index.contains_key(&target)
            {
                return Err(StoreError::new(StoreErrorKind::InvalidReference)
                    .with_page(target)
                    .with_backend(BACKEND));
            }
        }

        let routes = compute_routes(&self.pages, &self.children, &self.index, &self.sites);

        debug!(
            pages = self.pages.len(),
            sites = self.sites.len(),
            "built page tree"
        );

        Ok(PageTree {
            pages: self.pages,
            children: self.children,
            parents: self.parents,
            index: self.index,
            sites: self.sites,
            routes,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(PageTree: Send, Sync);

    /// Home > About > Team, Home > Contact (hidden), Home > Drafts (unpublished)
    fn sample_tree() -> PageTree {
        let mut builder = PageTreeBuilder::new();
        let home = builder
            .add_page(NewPage::new(PageId(1), "Home", "home"), None)
            .unwrap();
        let about = builder
            .add_page(
                NewPage::new(PageId(2), "About", "about").in_menus(),
                Some(home),
            )
            .unwrap();
        builder
            .add_page(
                NewPage::new(PageId(3), "Team", "team").in_menus(),
                Some(about),
            )
            .unwrap();
        builder
            .add_page(NewPage::new(PageId(4), "Contact", "contact"), Some(home))
            .unwrap();
        builder
            .add_page(
                NewPage::new(PageId(5), "Drafts", "drafts").in_menus().draft(),
                Some(home),
            )
            .unwrap();
        builder.add_site(Site::new("example.com", PageId(1)).default_site());
        builder.build().unwrap()
    }

    #[test]
    fn test_page_returns_page() {
        let tree = sample_tree();

        let page = tree.page(PageId(3)).unwrap();

        assert_eq!(page.title, "Team");
        assert_eq!(page.depth, 3);
    }

    #[test]
    fn test_page_not_found_returns_none() {
        let tree = sample_tree();

        assert!(tree.page(PageId(99)).is_none());
    }

    #[test]
    fn test_children_of_filters_ineligible() {
        let tree = sample_tree();

        let children: Vec<_> = tree.children_of(PageId(1)).iter().map(|p| p.id).collect();

        assert_eq!(children, vec![PageId(2)]);
    }

    #[test]
    fn test_has_menu_eligible_children() {
        let tree = sample_tree();

        assert!(tree.has_menu_eligible_children(PageId(1)));
        assert!(tree.has_menu_eligible_children(PageId(2)));
        assert!(!tree.has_menu_eligible_children(PageId(3)));
        assert!(!tree.has_menu_eligible_children(PageId(99)));
    }

    #[test]
    fn test_ancestor_ids_root_first() {
        let tree = sample_tree();

        assert_eq!(tree.ancestor_ids(PageId(3)), vec![PageId(1), PageId(2)]);
        assert!(tree.ancestor_ids(PageId(1)).is_empty());
        assert!(tree.ancestor_ids(PageId(99)).is_empty());
    }

    #[test]
    fn test_url_for_relative_paths() {
        let tree = sample_tree();
        let site = tree.default_site().cloned();

        assert_eq!(
            tree.url_for(PageId(1), site.as_ref(), None, false).unwrap(),
            "/"
        );
        assert_eq!(
            tree.url_for(PageId(3), site.as_ref(), None, false).unwrap(),
            "/about/team/"
        );
    }

    #[test]
    fn test_url_for_full() {
        let tree = sample_tree();

        assert_eq!(
            tree.url_for(PageId(2), None, None, true).unwrap(),
            "http://example.com/about/"
        );
    }

    #[test]
    fn test_url_for_unpublished_fails() {
        let tree = sample_tree();

        let err = tree.url_for(PageId(5), None, None, false).unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::Unpublished);
        assert!(err.is_unroutable());
    }

    #[test]
    fn test_url_for_unknown_fails() {
        let tree = sample_tree();

        let err = tree.url_for(PageId(99), None, None, false).unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::NotFound);
    }

    #[test]
    fn test_url_for_page_outside_sites_fails() {
        let mut builder = PageTreeBuilder::new();
        builder
            .add_page(NewPage::new(PageId(1), "Orphan", "orphan"), None)
            .unwrap();
        let tree = builder.build().unwrap();

        let err = tree.generic_url(PageId(1)).unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::OutsideSite);
    }

    fn two_site_tree() -> PageTree {
        let mut builder = PageTreeBuilder::new();
        let a = builder
            .add_page(NewPage::new(PageId(1), "A Home", "a"), None)
            .unwrap();
        builder
            .add_page(NewPage::new(PageId(2), "A News", "news").in_menus(), Some(a))
            .unwrap();
        let b = builder
            .add_page(NewPage::new(PageId(10), "B Home", "b"), None)
            .unwrap();
        builder
            .add_page(NewPage::new(PageId(11), "B Shop", "shop").in_menus(), Some(b))
            .unwrap();
        builder.add_site(Site::new("a.test", PageId(1)).default_site());
        builder.add_site(Site::new("b.test", PageId(10)).with_port(443));
        builder.build().unwrap()
    }

    #[test]
    fn test_url_for_other_site_is_absolute() {
        let tree = two_site_tree();
        let site_a = tree.sites()[0].clone();

        assert_eq!(
            tree.url_for(PageId(2), Some(&site_a), None, false).unwrap(),
            "/news/"
        );
        assert_eq!(
            tree.url_for(PageId(11), Some(&site_a), None, false)
                .unwrap(),
            "https://b.test/shop/"
        );
    }

    #[test]
    fn test_url_for_uses_request_site() {
        let tree = two_site_tree();
        let request = RequestContext::new("b.test", "/");

        assert_eq!(
            tree.url_for(PageId(11), None, Some(&request), false)
                .unwrap(),
            "/shop/"
        );
        assert_eq!(
            tree.url_for(PageId(2), None, Some(&request), false).unwrap(),
            "http://a.test/news/"
        );
    }

    #[test]
    fn test_generic_url_without_context_on_multi_site_is_absolute() {
        let tree = two_site_tree();

        assert_eq!(tree.generic_url(PageId(2)).unwrap(), "http://a.test/news/");
    }

    #[test]
    fn test_current_site_for_falls_back_to_default() {
        let tree = two_site_tree();

        let site = tree
            .current_site_for(&RequestContext::new("unknown.test", "/"))
            .unwrap();

        assert_eq!(site.hostname, "a.test");
    }

    #[test]
    fn test_current_site_for_matches_host() {
        let tree = two_site_tree();

        let site = tree
            .current_site_for(&RequestContext::new("B.TEST", "/"))
            .unwrap();

        assert_eq!(site.hostname, "b.test");
    }

    #[test]
    fn test_page_for_path() {
        let tree = sample_tree();
        let site = tree.default_site().unwrap();

        assert_eq!(tree.page_for_path(site, "/about/team/").unwrap().id, PageId(3));
        assert_eq!(tree.page_for_path(site, "about").unwrap().id, PageId(2));
        assert_eq!(tree.page_for_path(site, "").unwrap().id, PageId(1));
        assert!(tree.page_for_path(site, "/missing/").is_none());
    }

    #[test]
    fn test_second_root_owns_its_subtree() {
        let tree = two_site_tree();

        assert_eq!(tree.ancestor_ids(PageId(11)), vec![PageId(10)]);
        assert!(tree.ancestor_ids(PageId(10)).is_empty());
        assert_eq!(
            tree.url_for(PageId(11), None, None, true).unwrap(),
            "https://b.test/shop/"
        );
    }

    #[test]
    fn test_add_page_duplicate_id_fails() {
        let mut builder = PageTreeBuilder::new();
        builder
            .add_page(NewPage::new(PageId(1), "A", "a"), None)
            .unwrap();

        let err = builder
            .add_page(NewPage::new(PageId(1), "B", "b"), None)
            .unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::DuplicatePage);
    }

    #[test]
    fn test_add_page_unknown_parent_fails() {
        let mut builder = PageTreeBuilder::new();

        let err = builder
            .add_page(NewPage::new(PageId(1), "A", "a"), Some(4))
            .unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidReference);
    }

    #[test]
    fn test_build_rejects_unknown_site_root() {
        let mut builder = PageTreeBuilder::new();
        builder.add_site(Site::new("example.com", PageId(1)));

        let err = builder.build().unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidReference);
        assert_eq!(err.page, Some(PageId(1)));
    }

    #[test]
    fn test_build_rejects_unknown_link_target() {
        let mut builder = PageTreeBuilder::new();
        builder
            .add_page(
                NewPage::new(PageId(1), "Link", "link").with_kind(PageKind::Link(
                    crate::LinkPage {
                        link_page: Some(PageId(9)),
                        link_url: None,
                        url_append: String::new(),
                    },
                )),
                None,
            )
            .unwrap();

        let err = builder.build().unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidReference);
    }

    #[test]
    fn test_link_pages_shown_in_menus_by_default() {
        let mut builder = PageTreeBuilder::new();
        let home = builder
            .add_page(NewPage::new(PageId(1), "Home", "home"), None)
            .unwrap();
        let link = PageKind::Link(crate::LinkPage {
            link_page: None,
            link_url: Some("https://x.test".to_owned()),
            url_append: String::new(),
        });
        builder
            .add_page(
                NewPage::new(PageId(2), "Elsewhere", "elsewhere").with_kind(link.clone()),
                Some(home),
            )
            .unwrap();
        let mut hidden = NewPage::new(PageId(3), "Hidden", "hidden").with_kind(link);
        hidden.show_in_menus = Some(false);
        builder.add_page(hidden, Some(home)).unwrap();
        builder
            .add_page(NewPage::new(PageId(4), "Plain", "plain"), Some(home))
            .unwrap();
        let tree = builder.build().unwrap();

        let children: Vec<_> = tree.children_of(PageId(1)).iter().map(|p| p.id).collect();

        assert_eq!(children, vec![PageId(2)]);
    }
}
