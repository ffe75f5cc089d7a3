//! Active-state classification.

use std::collections::HashSet;

use menus_store::PageId;

use crate::item::ActiveClass;

/// Classifies pages against the current page.
///
/// The ancestor set is computed once per build by the caller, so each
/// classification is a set lookup.
#[derive(Clone, Copy, Debug)]
pub struct ActiveStateClassifier<'a> {
    current_page: Option<PageId>,
    ancestor_ids: &'a HashSet<PageId>,
    apply: bool,
}

impl<'a> ActiveStateClassifier<'a> {
    /// Create a classifier.
    ///
    /// With `apply` unset every page classifies as [`ActiveClass::None`].
    #[must_use]
    pub fn new(
        current_page: Option<PageId>,
        ancestor_ids: &'a HashSet<PageId>,
        apply: bool,
    ) -> Self {
        Self {
            current_page,
            ancestor_ids,
            apply,
        }
    }

    /// Active state of `candidate`.
    ///
    /// The exact match takes precedence over ancestry.
    #[must_use]
    pub fn classify(&self, candidate: PageId) -> ActiveClass {
        if !self.apply {
            return ActiveClass::None;
        }
        if self.current_page == Some(candidate) {
            ActiveClass::Exact
        } else if self.ancestor_ids.contains(&candidate) {
            ActiveClass::Ancestor
        } else {
            ActiveClass::None
        }
    }

    /// Whether active classes are applied at all.
    #[must_use]
    pub fn applies(&self) -> bool {
        self.apply
    }
}
