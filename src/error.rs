//! Error taxonomy shared by all page behaviours.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// How a required element is located in the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    Name,
    Id,
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Name => f.write_str("name"),
            Lookup::Id => f.write_str("id"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PageError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element with {lookup} \"{key}\"")]
    MissingElement { lookup: Lookup, key: String },
    #[error("element \"{key}\" holds non-numeric value {value:?}")]
    MalformedValue { key: String, value: String },
    #[error("invalid timer config: {0}")]
    InvalidConfig(String),
    #[error("DOM call failed: {0}")]
    Dom(String),
}

impl PageError {
    pub fn missing_name(key: impl Into<String>) -> Self {
        PageError::MissingElement { lookup: Lookup::Name, key: key.into() }
    }

    pub fn missing_id(key: impl Into<String>) -> Self {
        PageError::MissingElement { lookup: Lookup::Id, key: key.into() }
    }

    /// Wraps an exception thrown by a web-sys call.
    pub fn dom(err: JsValue) -> Self {
        PageError::Dom(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::InvalidConfig(err.to_string())
    }
}

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PageError>;
