//! Endpoint resolution
//!
//! The backend URL comes from a fixed table of named deployment
//! environments, overridable by a single environment variable.
//!
//! Environment variables:
//! - `QUIVER_BACKEND_URL`: explicit backend URL, wins over everything
//! - `QUIVER_ENV`: environment name used when the builder does not name one

use quiver_core::{ConfigError, QuiverResult};

/// Named deployment environments with fixed backend URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Beta,
    Development,
    /// Local frontend pointed at the production backend.
    Devprod,
    /// Host-controlled embedded deployment serving its own backend.
    Embedded,
}

impl Environment {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "production" => Some(Self::Production),
            "beta" => Some(Self::Beta),
            "development" => Some(Self::Development),
            "devprod" => Some(Self::Devprod),
            "embedded" => Some(Self::Embedded),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Beta => "beta",
            Self::Development => "development",
            Self::Devprod => "devprod",
            Self::Embedded => "embedded",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Self::Production | Self::Beta | Self::Devprod => "https://api.quiver.ai/graphql",
            Self::Development => "http://gql.test/graphql",
            Self::Embedded => "http://localhost:7177/graphql",
        }
    }
}

/// Pure resolution: an explicit override URL wins, then the named
/// environment. Unknown names fail rather than fall back.
pub fn resolve_with(name: Option<&str>, override_url: Option<String>) -> QuiverResult<String> {
    if let Some(url) = override_url.filter(|u| !u.is_empty()) {
        return Ok(url);
    }

    let name = name.ok_or(ConfigError::MissingEndpoint)?;
    let env = Environment::from_name(name).ok_or_else(|| ConfigError::UnknownEnvironment {
        name: name.to_string(),
    })?;
    Ok(env.url().to_string())
}

/// Resolve the backend URL from an optional explicit environment name plus
/// the process environment.
pub fn resolve(name: Option<&str>) -> QuiverResult<String> {
    let override_url = std::env::var("QUIVER_BACKEND_URL").ok();
    let env_name = std::env::var("QUIVER_ENV").ok();
    resolve_with(name.or(env_name.as_deref()), override_url)
}

// =============================================================================
// TESTS
// =============================================================================
