//! Lookup configuration
//!
//! Loaded from an optional TOML file, then overridden by CLI flags or
//! environment variables. Endpoint and credential are optional here on
//! purpose: their absence is reported per request as a configuration error,
//! never silently ignored.

use crate::error::LookupError;
use callerid_phone::{normalize_prefix, DEFAULT_COUNTRY_PREFIX};
use callerid_record::{AliasTable, Coercer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default header carrying the verification token
pub const DEFAULT_TOKEN_HEADER: &str = "x-verification-token";

/// How the upstream request is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStyle {
    /// `GET <endpoint>?phone=...` with a bearer credential
    #[default]
    Query,
    /// `POST <endpoint>` with a JSON body and a verification-token header
    VerificationToken,
}

impl RequestStyle {
    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::VerificationToken => "verification-token",
        }
    }
}

impl fmt::Display for RequestStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStyle {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" | "get" | "bearer" => Ok(Self::Query),
            "verification-token" | "verification_token" | "post" | "token" => {
                Ok(Self::VerificationToken)
            }
            other => Err(UnknownSetting::new("request style", other)),
        }
    }
}

/// Which alias table the coercer uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Retail CRM fields
    #[default]
    Retail,
    /// Clinic, provider, insurance and eligibility fields
    Healthcare,
    /// Table supplied in configuration (`aliases`)
    Custom,
}

impl FromStr for SchemaKind {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retail" | "crm" => Ok(Self::Retail),
            "healthcare" | "clinic" => Ok(Self::Healthcare),
            "custom" => Ok(Self::Custom),
            other => Err(UnknownSetting::new("schema", other)),
        }
    }
}

/// Unrecognized value for an enumerated setting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {setting}: '{value}'")]
pub struct UnknownSetting {
    setting: &'static str,
    value: String,
}

impl UnknownSetting {
    fn new(setting: &'static str, value: &str) -> Self {
        Self {
            setting,
            value: value.to_string(),
        }
    }
}

/// Errors loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    /// File could not be read
    #[error("io error reading {}: {source}", path.display())]
    Io {
        /// Configuration file path
        path: PathBuf,
        /// Underlying read error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid configuration TOML
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        /// Configuration file path
        path: PathBuf,
        /// TOML syntax or schema error
        #[source]
        source: toml::de::Error,
    },
}

/// Lookup client configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// Upstream base URL or full endpoint URL
    pub endpoint: Option<String>,
    /// Bearer credential or verification-token value
    pub token: Option<String>,
    /// Request construction
    pub style: RequestStyle,
    /// Header name for the verification-token style
    pub token_header: String,
    /// Name-qualified deployment: first and last name are mandatory
    pub require_name: bool,
    /// Prefix for 10-digit numbers
    pub default_country_prefix: String,
    /// Alias table selection
    pub schema: SchemaKind,
    /// Alias table for `SchemaKind::Custom`
    pub aliases: Option<AliasTable>,
    /// Connect timeout for the HTTP client; unset leaves it to the platform
    pub connect_timeout_secs: Option<u64>,
}

impl LookupConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns the TOML error when the text is malformed or names unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// `ConfigFileError::Io` if unreadable, `ConfigFileError::Parse` if invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// With endpoint URL
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// With credential
    #[inline]
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// With request style
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: RequestStyle) -> Self {
        self.style = style;
        self
    }

    /// With verification-token header name
    #[inline]
    #[must_use]
    pub fn with_token_header(mut self, header: impl Into<String>) -> Self {
        self.token_header = header.into();
        self
    }

    /// Require first and last name on every lookup
    #[inline]
    #[must_use]
    pub fn with_require_name(mut self, require: bool) -> Self {
        self.require_name = require;
        self
    }

    /// With default country prefix
    #[inline]
    #[must_use]
    pub fn with_default_country_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_country_prefix = prefix.into();
        self
    }

    /// With built-in schema
    #[inline]
    #[must_use]
    pub fn with_schema(mut self, schema: SchemaKind) -> Self {
        self.schema = schema;
        self
    }

    /// With custom alias table (switches schema to `Custom`)
    #[inline]
    #[must_use]
    pub fn with_aliases(mut self, table: AliasTable) -> Self {
        self.schema = SchemaKind::Custom;
        self.aliases = Some(table);
        self
    }

    /// Configured endpoint, or a configuration error if missing or blank
    ///
    /// # Errors
    /// `LookupError::Configuration` naming `endpoint`.
    pub fn required_endpoint(&self) -> Result<&str, LookupError> {
        non_blank(self.endpoint.as_deref()).ok_or_else(|| LookupError::missing_setting("endpoint"))
    }

    /// Configured credential, or a configuration error if missing or blank
    ///
    /// # Errors
    /// `LookupError::Configuration` naming `token`.
    pub fn required_token(&self) -> Result<&str, LookupError> {
        non_blank(self.token.as_deref()).ok_or_else(|| LookupError::missing_setting("token"))
    }

    /// Prefix normalized to `+<digits>`
    #[must_use]
    pub fn country_prefix(&self) -> String {
        normalize_prefix(&self.default_country_prefix)
    }

    /// Alias table selected by `schema`
    ///
    /// # Errors
    /// `LookupError::Configuration` when `schema = "custom"` has no `aliases`.
    pub fn alias_table(&self) -> Result<AliasTable, LookupError> {
        match self.schema {
            SchemaKind::Retail => Ok(AliasTable::retail()),
            SchemaKind::Healthcare => Ok(AliasTable::healthcare()),
            SchemaKind::Custom => self
                .aliases
                .clone()
                .ok_or_else(|| LookupError::missing_setting("aliases")),
        }
    }

    /// Coercer for this configuration
    ///
    /// # Errors
    /// See [`LookupConfig::alias_table`].
    pub fn coercer(&self) -> Result<Coercer, LookupError> {
        Ok(Coercer::new(self.alias_table()?).with_default_country_prefix(&self.country_prefix()))
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            style: RequestStyle::Query,
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            require_name: false,
            default_country_prefix: DEFAULT_COUNTRY_PREFIX.to_string(),
            schema: SchemaKind::Retail,
            aliases: None,
            connect_timeout_secs: None,
        }
    }
}

impl fmt::Debug for LookupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("style", &self.style)
            .field("token_header", &self.token_header)
            .field("require_name", &self.require_name)
            .field("default_country_prefix", &self.default_country_prefix)
            .field("schema", &self.schema)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
