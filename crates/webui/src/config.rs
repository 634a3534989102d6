//! Configuration resolved once at startup and handed to the UI.

use crate::bootstrap::BootstrapError;
use std::fmt::Display;

pub const EDIT_ENABLED: bool = true;
pub const DELETE_ENABLED: bool = true;

/// Origin components exactly as the page's `Location` reports them.
///
/// `protocol` keeps its trailing colon (`"https:"`), `port` is empty when the
/// page is served on the scheme's default port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    pub protocol: String,
    pub hostname: String,
    pub port: String,
}

impl Origin {
    pub fn new(
        protocol: impl Into<String>,
        hostname: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            hostname: hostname.into(),
            port: port.into(),
        }
    }

    pub fn from_location(location: &web_sys::Location) -> Result<Self, BootstrapError> {
        let read = |what: &str, value: Result<String, wasm_bindgen::JsValue>| {
            value.map_err(|err| BootstrapError::Location(format!("{what}: {err:?}")))
        };
        Ok(Self {
            protocol: read("protocol", location.protocol())?,
            hostname: read("hostname", location.hostname())?,
            port: read("port", location.port())?,
        })
    }

    /// Concatenates the components without normalization, an empty port
    /// leaves the trailing `:` in place.
    pub fn base_url(&self) -> BaseUrl {
        BaseUrl(format!("{}//{}:{}", self.protocol, self.hostname, self.port))
    }
}

/// Root for every backend request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends an absolute path (`/todos/...`) to the base.
    pub fn join(&self, path: &str) -> String {
        debug_assert!(path.starts_with('/'), "path must be absolute: {path}");
        format!("{}{}", self.0, path)
    }
}

impl From<&str> for BaseUrl {
    fn from(value: &str) -> Self {
        BaseUrl(value.to_string())
    }
}

impl Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Switches for UI affordances, fixed at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureFlags {
    pub edit_enabled: bool,
    pub delete_enabled: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            edit_enabled: EDIT_ENABLED,
            delete_enabled: DELETE_ENABLED,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub base_url: BaseUrl,
    pub features: FeatureFlags,
}

impl AppConfig {
    pub fn new(origin: &Origin) -> Self {
        Self {
            base_url: origin.base_url(),
            features: FeatureFlags::default(),
        }
    }

    /// Reads the origin of the page this script runs on.
    pub fn from_window() -> Result<Self, BootstrapError> {
        let window = web_sys::window().ok_or(BootstrapError::NoWindow)?;
        let origin = Origin::from_location(&window.location())?;
        Ok(Self::new(&origin))
    }

    #[must_use]
    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }
}
