//! Sites and request context.

use serde::{Deserialize, Serialize};

use crate::page::PageId;

fn default_port() -> u16 {
    80
}

/// A site served from a subtree of the page tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Host name the site is served on.
    pub hostname: String,
    /// Port the site is served on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Root page of the site.
    pub root_page: PageId,
    /// Whether this site answers requests for unknown hosts.
    #[serde(default, rename = "default")]
    pub is_default_site: bool,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

impl Site {
    /// Create a site on port 80.
    #[must_use]
    pub fn new(hostname: impl Into<String>, root_page: PageId) -> Self {
        Self {
            hostname: hostname.into(),
            port: default_port(),
            root_page,
            is_default_site: false,
            site_name: None,
        }
    }

    /// Mark the site as the default site.
    #[must_use]
    pub fn default_site(mut self) -> Self {
        self.is_default_site = true;
        self
    }

    /// Serve the site on a different port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Base URL of the site without a trailing slash.
    ///
    /// Port 443 maps to `https://`, port 80 to `http://`; any other port is
    /// kept explicit.
    #[must_use]
    pub fn root_url(&self) -> String {
        match self.port {
            80 => format!("http://{}", self.hostname),
            443 => format!("https://{}", self.hostname),
            port => format!("http://{}:{port}", self.hostname),
        }
    }

    /// Display name, falling back to the host name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.site_name.as_deref().unwrap_or(&self.hostname)
    }
}

/// The parts of an incoming request that menu resolution looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Host header without port.
    pub hostname: String,
    /// Port the request arrived on, if known.
    pub port: Option<u16>,
    /// Request path (e.g., "/about/team/").
    pub path: String,
}

impl RequestContext {
    /// Create a request context for a host and path.
    #[must_use]
    pub fn new(hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port: None,
            path: path.into(),
        }
    }
}
