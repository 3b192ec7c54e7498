//! Client configuration.
//!
//! The production hosts are the defaults. Overriding them is mostly useful
//! for pointing a client at the mock server or a staging deployment.

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://takeout.bysourfruit.com";
pub const DEFAULT_CDN_URL: &str = "https://cdn-takeout.bysourfruit.com";

/// Settings fixed for the lifetime of a `TakeoutClient`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host of the auth and email endpoints.
    pub base_url: String,
    /// Host of the cloud template store.
    pub cdn_url: String,
    /// Log select success messages under the `takeout` target.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Point both the API and the template store at one host.
    pub fn single_host(url: &str) -> Self {
        Self {
            base_url: url.to_string(),
            cdn_url: url.to_string(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self.cdn_url = self.cdn_url.trim_end_matches('/').to_string();
        self
    }
}
