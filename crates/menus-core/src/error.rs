//! Error types for menu building.

use menus_config::ConfigError;

/// Errors raised while preparing a menu.
///
/// Problems inside a build (unroutable pages, failing behaviors) never
/// surface here; they degrade the affected item instead.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// Option value rejected by the configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No site matches the request and no default site exists.
    #[error("No site matches the request")]
    NoSite,

    /// Flat menu lookup failed.
    #[error("No flat menu with handle '{handle}' on site '{site}'")]
    UnknownFlatMenu {
        /// Requested handle.
        handle: String,
        /// Host name of the site searched.
        site: String,
    },

    /// Children menu without a parent or current page.
    #[error("Children menu needs a parent page or a current page")]
    MissingParent,
}
