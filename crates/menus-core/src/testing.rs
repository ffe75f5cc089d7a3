//! Page trees shared by unit tests.

use menus_store::{
    LinkPage, MenuPageBehavior, NewPage, Page, PageId, PageKind, PageTree, PageTreeBuilder, Site,
};

use crate::behavior::{BehaviorArgs, MenuPage};
use crate::item::MenuItem;

/// `Home > About > Team`, every page except Home shown in menus.
pub(crate) fn scenario_tree() -> PageTree {
    let mut builder = PageTreeBuilder::new();
    let home = builder
        .add_page(NewPage::new(PageId(1), "Home", "home"), None)
        .unwrap();
    let about = builder
        .add_page(NewPage::new(PageId(2), "About", "about").in_menus(), Some(home))
        .unwrap();
    builder
        .add_page(NewPage::new(PageId(3), "Team", "team").in_menus(), Some(about))
        .unwrap();
    builder.add_site(Site::new("example.com", PageId(1)).default_site());
    builder.build().unwrap()
}

/// A site with every page variant.
///
/// ```text
/// 1 Home
/// ├── 2 About          repeats in subnav as "Overview"
/// │   ├── 3 Team
/// │   └── 4 History    hidden
/// ├── 5 Services       ServicesPage
/// │   └── 6 Consulting
/// │       └── 7 Audits
/// ├── 8 News           unpublished
/// ├── 9 Elsewhere      link to https://x.test?ref=1
/// └── 10 Contact       ContactPage
/// ```
pub(crate) fn site_tree() -> PageTree {
    let mut builder = PageTreeBuilder::new();
    let home = builder
        .add_page(NewPage::new(PageId(1), "Home", "home"), None)
        .unwrap();
    let about = builder
        .add_page(
            NewPage::new(PageId(2), "About", "about")
                .in_menus()
                .with_kind(PageKind::Menu(MenuPageBehavior {
                    repeat_in_subnav: true,
                    repeated_item_text: "Overview".to_owned(),
                })),
            Some(home),
        )
        .unwrap();
    builder
        .add_page(NewPage::new(PageId(3), "Team", "team").in_menus(), Some(about))
        .unwrap();
    builder
        .add_page(NewPage::new(PageId(4), "History", "history"), Some(about))
        .unwrap();
    let services = builder
        .add_page(
            NewPage::new(PageId(5), "Services", "services")
                .in_menus()
                .with_type("ServicesPage"),
            Some(home),
        )
        .unwrap();
    let consulting = builder
        .add_page(
            NewPage::new(PageId(6), "Consulting", "consulting").in_menus(),
            Some(services),
        )
        .unwrap();
    builder
        .add_page(
            NewPage::new(PageId(7), "Audits", "audits").in_menus(),
            Some(consulting),
        )
        .unwrap();
    builder
        .add_page(
            NewPage::new(PageId(8), "News", "news").in_menus().draft(),
            Some(home),
        )
        .unwrap();
    builder
        .add_page(
            NewPage::new(PageId(9), "Elsewhere", "elsewhere")
                .in_menus()
                .with_kind(PageKind::Link(LinkPage {
                    link_page: None,
                    link_url: Some("https://x.test".to_owned()),
                    url_append: "?ref=1".to_owned(),
                })),
            Some(home),
        )
        .unwrap();
    builder
        .add_page(
            NewPage::new(PageId(10), "Contact", "contact")
                .in_menus()
                .with_type("ContactPage"),
            Some(home),
        )
        .unwrap();
    builder.add_site(Site::new("example.com", PageId(1)).default_site());
    builder.build().unwrap()
}

/// Always shows a sub-menu of contact methods.
pub(crate) struct ContactPage;

impl MenuPage for ContactPage {
    fn has_submenu_items(&self, _page: &Page, _has_children: bool, _args: &BehaviorArgs<'_>) -> bool {
        true
    }

    fn modify_submenu_items(
        &self,
        _page: &Page,
        mut items: Vec<MenuItem>,
        _args: &BehaviorArgs<'_>,
    ) -> Vec<MenuItem> {
        items.push(MenuItem::new("Call us", "tel:+15550100"));
        items.push(MenuItem::new("Email us", "mailto:hello@example.com"));
        items
    }
}
