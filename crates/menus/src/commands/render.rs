//! `menus render` command implementation.

use std::fmt::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use menus_config::{ClassesConfig, CliSettings, Config};
use menus_core::{
    BehaviorRegistry, MenuContext, MenuHooks, MenuItem, MenuOverrides, Navigation, RenderedMenu,
    SiteFixture,
};
use menus_store::{PageId, RequestContext, SiteResolver};
use tracing::warn;

use crate::error::CliError;
use crate::output::Output;

/// Menu kinds that can be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum MenuArg {
    /// Main menu of the site.
    Main,
    /// Flat menu selected with --handle.
    Flat,
    /// Section menu of the current page.
    Section,
    /// Children of --parent or the current page.
    Children,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Menu to render.
    #[arg(value_enum)]
    menu: MenuArg,

    /// Flat menu handle.
    #[arg(long, required_if_eq("menu", "flat"))]
    handle: Option<String>,

    /// Look up flat menus missing on the current site on the default site.
    #[arg(long)]
    fall_back_to_default_site: bool,

    /// Current page ID (default: the page served at --path).
    #[arg(long)]
    current: Option<u32>,

    /// Parent page ID for children menus.
    #[arg(long)]
    parent: Option<u32>,

    /// Request host (default: the default site).
    #[arg(long)]
    host: Option<String>,

    /// Request path.
    #[arg(long, default_value = "/")]
    path: String,

    /// Number of levels to render (overrides config).
    #[arg(long)]
    max_levels: Option<u32>,

    /// Disable active classes.
    #[arg(long)]
    no_active_classes: bool,

    /// Repeat menu pages in their own sub-menus.
    #[arg(long)]
    repeat_parents: bool,

    /// Never repeat menu pages in their sub-menus.
    #[arg(long, conflicts_with = "repeat_parents")]
    no_repeat_parents: bool,

    /// Render absolute page URLs.
    #[arg(long)]
    absolute: bool,

    /// Print the menu as JSON.
    #[arg(long)]
    json: bool,

    /// Site fixture file (overrides config).
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover menus.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the fixture fails to load, or
    /// the menu cannot be built.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let allow_repeating_parents = self.resolve_repeat_parents();
        let cli_settings = CliSettings {
            fixture: self.fixture.clone(),
            apply_active_classes: self.no_active_classes.then_some(false),
            allow_repeating_parents,
            use_absolute_page_urls: self.absolute.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let fixture = SiteFixture::load(&config.source_resolved.fixture, &config)?;

        for issue in fixture.validate() {
            warn!(subject = %issue.subject, "{}", issue.error);
        }

        let hostname = self
            .host
            .clone()
            .or_else(|| fixture.tree.default_site().map(|s| s.hostname.clone()))
            .unwrap_or_default();
        let request = RequestContext::new(hostname, self.path.clone());
        let site = fixture.tree.current_site_for(&request);
        let current = self.current.map(PageId).or_else(|| {
            site.and_then(|s| fixture.tree.page_for_path(s, &request.path))
                .map(|p| p.id)
        });

        let mut ctx = MenuContext::new().with_request(&request);
        if let Some(site) = site {
            ctx = ctx.with_site(site);
        }
        if let Some(current) = current {
            ctx = ctx.with_current_page(&fixture.tree, current);
        }

        let overrides = MenuOverrides {
            max_levels: self.max_levels,
            allow_repeating_parents,
            ..MenuOverrides::default()
        };
        let behaviors = BehaviorRegistry::new();
        let hooks = MenuHooks::new();
        let navigation = Navigation::new(
            &fixture.tree,
            &fixture.tree,
            &fixture.menus,
            &behaviors,
            &hooks,
            &config,
        );

        let menu = match self.menu {
            MenuArg::Main => navigation.main_menu(&ctx, &overrides)?,
            MenuArg::Flat => {
                let handle = self
                    .handle
                    .as_deref()
                    .ok_or_else(|| CliError::Validation("--handle is required".to_owned()))?;
                navigation.flat_menu(handle, self.fall_back_to_default_site, &ctx, &overrides)?
            }
            MenuArg::Section => {
                let Some(menu) = navigation.section_menu(&ctx, &overrides)? else {
                    output.note("No section menu for the current page");
                    return Ok(());
                };
                menu
            }
            MenuArg::Children => {
                navigation.children_menu(self.parent.map(PageId), &ctx, &overrides)?
            }
        };

        if self.json {
            output.menu(&serde_json::to_string_pretty(&menu)?);
        } else {
            output.menu(&format_menu(&menu, &config.classes));
        }
        Ok(())
    }

    /// Resolve `allow_repeating_parents` from --repeat-parents/--no-repeat-parents flags.
    fn resolve_repeat_parents(&self) -> Option<bool> {
        self.no_repeat_parents
            .then_some(false)
            .or(self.repeat_parents.then_some(true))
    }
}

/// Format a menu as an indented outline.
fn format_menu(menu: &RenderedMenu, classes: &ClassesConfig) -> String {
    let mut text = String::new();

    if let Some(heading) = &menu.heading {
        let _ = writeln!(text, "{heading}");
    }
    if let Some(root) = &menu.section_root {
        format_item(&mut text, root, classes, 0);
    }

    let depth = usize::from(menu.section_root.is_some());
    for item in &menu.items {
        format_item(&mut text, item, classes, depth);
    }

    text.trim_end().to_owned()
}

fn format_item(text: &mut String, item: &MenuItem, classes: &ClassesConfig, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = write!(text, "{indent}- {} <{}>", item.text, item.href);

    let css = item.active_class.css(classes);
    if !css.is_empty() {
        let _ = write!(text, " [{css}]");
    }
    if item.has_children_in_menu && item.children.is_empty() {
        text.push_str(" +");
    }
    text.push('\n');

    for child in &item.children {
        format_item(text, child, classes, depth + 1);
    }
}
