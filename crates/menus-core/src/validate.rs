//! Validation of link pages and configured menu entries.

use menus_store::{LinkPage, Page, PageId, PageStore};

use crate::menus::MenuItemEntry;

/// A validation failure, optionally tied to a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Field the message belongs to, `None` for the whole record.
    pub field: Option<&'static str>,
    /// Human-readable message.
    pub message: String,
}

impl ValidationError {
    /// Error attached to a field.
    #[must_use]
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Error for the whole record.
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Validates link targets against a page store.
#[derive(Clone, Copy)]
pub struct LinkPageValidator<'a> {
    store: &'a dyn PageStore,
}

impl<'a> LinkPageValidator<'a> {
    /// Create a validator reading from `store`.
    #[must_use]
    pub fn new(store: &'a dyn PageStore) -> Self {
        Self { store }
    }

    /// Check that a link page has exactly one target and does not chain.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first problem found.
    pub fn validate(&self, link: &LinkPage) -> Result<(), ValidationError> {
        if let Some(target) = link.link_page
            && self.store.page(target).is_some_and(Page::is_link_page)
        {
            return Err(ValidationError::field(
                "link_page",
                "A link page cannot link to another link page",
            ));
        }
        self.check_target(link.link_page, link.url())
    }

    /// Validate a page, accepting anything that is not a link page.
    ///
    /// # Errors
    ///
    /// Same as [`LinkPageValidator::validate`].
    pub fn validate_page(&self, page: &Page) -> Result<(), ValidationError> {
        page.link().map_or(Ok(()), |link| self.validate(link))
    }

    /// Check a configured menu entry.
    ///
    /// Entries need exactly one target like link pages, but may point at a
    /// link page. Entries linking to a literal URL must also carry link text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first problem found.
    pub fn validate_entry(&self, entry: &MenuItemEntry) -> Result<(), ValidationError> {
        self.check_target(entry.link_page, entry.link_url())?;
        if entry.link_url().is_some() && entry.link_text().is_none() {
            return Err(ValidationError::field(
                "link_text",
                "This must be provided if you are linking to a custom URL",
            ));
        }
        Ok(())
    }

    fn check_target(
        &self,
        link_page: Option<PageId>,
        link_url: Option<&str>,
    ) -> Result<(), ValidationError> {
        if let Some(target) = link_page
            && self.store.page(target).is_none()
        {
            return Err(ValidationError::field(
                "link_page",
                format!("Page {target} does not exist"),
            ));
        }

        match (link_page, link_url) {
            (None, None) => Err(ValidationError::general(
                "Please choose an internal page or provide a custom URL",
            )),
            (Some(_), Some(_)) => Err(ValidationError::general(
                "Linking to both a page and custom URL is not permitted",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use menus_store::{NewPage, PageKind, PageTree, PageTreeBuilder, Site};
    use pretty_assertions::assert_eq;

    use super::*;

    fn link(link_page: Option<u32>, link_url: Option<&str>) -> LinkPage {
        LinkPage {
            link_page: link_page.map(PageId),
            link_url: link_url.map(str::to_owned),
            url_append: String::new(),
        }
    }

    fn tree() -> PageTree {
        let mut builder = PageTreeBuilder::new();
        let home = builder
            .add_page(NewPage::new(PageId(1), "Home", "home"), None)
            .unwrap();
        builder
            .add_page(NewPage::new(PageId(2), "About", "about"), Some(home))
            .unwrap();
        builder
            .add_page(
                NewPage::new(PageId(3), "Elsewhere", "elsewhere")
                    .with_kind(PageKind::Link(link(Some(2), None))),
                Some(home),
            )
            .unwrap();
        builder.add_site(Site::new("example.com", PageId(1)));
        builder.build().unwrap()
    }

    #[test]
    fn test_valid_targets() {
        let tree = tree();
        let validator = LinkPageValidator::new(&tree);

        assert_eq!(validator.validate(&link(Some(2), None)), Ok(()));
        assert_eq!(validator.validate(&link(None, Some("https://x.test"))), Ok(()));
    }

    #[test]
    fn test_link_to_link_page_rejected() {
        let tree = tree();
        let validator = LinkPageValidator::new(&tree);

        let err = validator.validate(&link(Some(3), None)).unwrap_err();

        assert_eq!(err.field, Some("link_page"));
        assert_eq!(err.message, "A link page cannot link to another link page");
    }

    #[test]
    fn test_no_target_rejected() {
        let tree = tree();
        let validator = LinkPageValidator::new(&tree);

        let err = validator.validate(&link(None, Some(""))).unwrap_err();

        assert_eq!(err.field, None);
        assert_eq!(
            err.to_string(),
            "Please choose an internal page or provide a custom URL"
        );
    }

    #[test]
    fn test_both_targets_rejected() {
        let tree = tree();
        let validator = LinkPageValidator::new(&tree);

        let err = validator
            .validate(&link(Some(2), Some("https://x.test")))
            .unwrap_err();

        assert_eq!(
            err.message,
            "Linking to both a page and custom URL is not permitted"
        );
    }

    #[test]
    fn test_unknown_target_rejected() {
        let tree = tree();
        let validator = LinkPageValidator::new(&tree);

        let err = validator.validate(&link(Some(99), None)).unwrap_err();

        assert_eq!(err.field, Some("link_page"));
    }

    #[test]
    fn test_validate_page_skips_plain_pages() {
        let tree = tree();
        let validator = LinkPageValidator::new(&tree);

        assert_eq!(validator.validate_page(tree.page(PageId(2)).unwrap()), Ok(()));
        assert_eq!(validator.validate_page(tree.page(PageId(3)).unwrap()), Ok(()));
    }

    #[test]
    fn test_entry_with_url_needs_text() {
        let tree = tree();
        let validator = LinkPageValidator::new(&tree);
        let mut entry = MenuItemEntry::url("https://x.test", "");
        entry.link_text = None;

        let err = validator.validate_entry(&entry).unwrap_err();

        assert_eq!(err.field, Some("link_text"));
        assert_eq!(
            validator.validate_entry(&MenuItemEntry::url("https://x.test", "X")),
            Ok(())
        );
    }

    #[test]
    fn test_entry_may_link_to_link_page() {
        let tree = tree();
        let validator = LinkPageValidator::new(&tree);

        assert_eq!(validator.validate_entry(&MenuItemEntry::page(PageId(3))), Ok(()));
    }
}
