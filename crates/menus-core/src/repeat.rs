//! Repetition of a parent page inside its own sub-menu.

use menus_store::Page;
use tracing::warn;

use crate::behavior::{BehaviorArgs, MenuPage, default_repeated_item};
use crate::item::MenuItem;

/// Inserts the repeated parent item at the head of a sub-menu.
#[derive(Clone, Copy, Debug, Default)]
pub struct RepeatingItemInjector;

impl RepeatingItemInjector {
    /// Prepend the repeated item for `parent` to `children`.
    ///
    /// Applies only when repetition is allowed for the build, the parent
    /// repeats in sub-navigation, and the sub-menu is non-empty. Otherwise
    /// `children` is returned unchanged. Items are never mutated.
    pub fn inject<B: MenuPage + ?Sized>(
        behavior: &B,
        parent: &Page,
        mut children: Vec<MenuItem>,
        args: &BehaviorArgs<'_>,
    ) -> Vec<MenuItem> {
        if !args.allow_repeating_parents || children.is_empty() || !parent.repeats_in_subnav() {
            return children;
        }

        let mut item = match behavior.repeated_menu_item(parent, args) {
            Ok(item) => item,
            Err(e) => {
                warn!(page = %parent.id, error = %e, "Falling back to default repeated item");
                default_repeated_item(parent, &args.without_request())
            }
        };

        if item.text.is_empty() {
            item.text.clone_from(&parent.title);
        }
        item.page = Some(parent.id);
        item.repeated = true;
        item.has_children_in_menu = false;
        item.children.clear();

        children.insert(0, item);
        children
    }
}
