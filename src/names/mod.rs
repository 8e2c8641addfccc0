//! The wrapped name-generation API, seen from the core.
//!
//! The orchestrator only knows [`NameSource`]: hand it a [`NameRequest`], get
//! back a [`NameResponse`] or an [`ExternalError`](crate::ExternalError).
//! [`BehindTheNameClient`] is the production implementation.

use std::{fmt, ops::Deref, str::FromStr};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ExternalError, NamegateError};

mod behind_the_name;
pub use behind_the_name::*;

mod usage_codes;
pub use usage_codes::*;

/// Gender filter for generated names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    /// Feminine names only.
    Feminine,
    /// Masculine names only.
    Masculine,
    /// No gender filter.
    #[default]
    Any,
}

impl Gender {
    /// All options, in menu order.
    pub const ALL: [Gender; 3] = [Gender::Feminine, Gender::Masculine, Gender::Any];

    /// One-letter code used on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Feminine => "f",
            Gender::Masculine => "m",
            Gender::Any => "u",
        }
    }

    /// Value of the API's `gender` parameter; `None` means "omit it".
    pub fn api_param(&self) -> Option<&'static str> {
        match self {
            Gender::Feminine => Some("f"),
            Gender::Masculine => Some("m"),
            Gender::Any => None,
        }
    }

    /// Menu description.
    pub fn description(&self) -> &'static str {
        match self {
            Gender::Feminine => "Feminine only",
            Gender::Masculine => "Masculine only",
            Gender::Any => "Unisex / Any (no gender filter)",
        }
    }

    /// Short label for report headers.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Feminine => "Feminine",
            Gender::Masculine => "Masculine",
            Gender::Any => "Unisex",
        }
    }
}

impl FromStr for Gender {
    type Err = NamegateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" => Ok(Gender::Feminine),
            "m" => Ok(Gender::Masculine),
            "u" => Ok(Gender::Any),
            other => Err(NamegateError::InvalidGender(format!(
                "expected one of f, m, u; got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How many given names to request. Between 1 and 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NameCount(u8);

impl NameCount {
    /// Largest count the API accepts.
    pub const MAX: u8 = 6;
}

impl Default for NameCount {
    /// Two names.
    fn default() -> Self {
        Self(2)
    }
}

impl Deref for NameCount {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<i64> for NameCount {
    type Error = NamegateError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(NamegateError::InvalidNameCount(
                "Number of names must be between 1 and 6".to_string(),
            ))
        }
    }
}

/// Filters for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRequest {
    /// Gender filter.
    pub gender: Gender,
    /// Usage (origin) code such as `ita`; `None` for any usage.
    pub usage: Option<String>,
    /// Number of given names.
    pub number: NameCount,
    /// Whether to add a random surname.
    pub random_surname: bool,
}

impl Default for NameRequest {
    /// Two Italian names of any gender, no surname.
    fn default() -> Self {
        Self {
            gender: Gender::Any,
            usage: Some(DEFAULT_USAGE.to_string()),
            number: NameCount::default(),
            random_surname: false,
        }
    }
}

/// Names returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedNames {
    /// Given names.
    #[serde(default)]
    pub names: Vec<String>,
    /// Random surname, when one was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

/// A successful API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResponse {
    /// Parsed body.
    pub names: GeneratedNames,
    /// Body exactly as received, kept for the audit log.
    pub raw: String,
}

impl NameResponse {
    /// Parse a response body.
    ///
    /// The API reports application errors (bad key, bad usage code, its own
    /// rate limiting) as a successful response carrying `error_code` and
    /// `error`; those become [`ExternalError::Api`].
    pub fn parse(raw: impl Into<String>) -> Result<Self, ExternalError> {
        let raw = raw.into();

        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| ExternalError::MalformedPayload(e.to_string()))?;

        if let Some(message) = value.get("error") {
            return Err(ExternalError::Api {
                code: value
                    .get("error_code")
                    .and_then(serde_json::Value::as_i64)
                    .unwrap_or_default(),
                message: message
                    .as_str()
                    .map_or_else(|| message.to_string(), str::to_string),
            });
        }

        let names = serde_json::from_value(value)
            .map_err(|e| ExternalError::MalformedPayload(e.to_string()))?;

        Ok(Self { names, raw })
    }
}

/// Anything that can turn a [`NameRequest`] into names.
#[async_trait]
pub trait NameSource: Send + Sync {
    /// Perform one request against the external API.
    ///
    /// Implementations should fail rather than hang; the orchestrator also
    /// enforces its own timeout on top.
    async fn fetch(&self, request: &NameRequest) -> Result<NameResponse, ExternalError>;
}

#[async_trait]
impl<N> NameSource for std::sync::Arc<N>
where
    N: NameSource + ?Sized,
{
    async fn fetch(&self, request: &NameRequest) -> Result<NameResponse, ExternalError> {
        (**self).fetch(request).await
    }
}
