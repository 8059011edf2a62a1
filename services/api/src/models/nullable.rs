//! Nullable values
//!
//! A [`Nullable`] tells "absent" apart from any concrete value. Request
//! payloads decode into nullables so that a partial update can leave
//! untouched fields unset, and the repository can later fill them from the
//! stored row. An empty string is treated as absent, matching how the
//! service has always read its JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Wire format of dates (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while building a nullable from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NullableError {
    /// The text is not a `YYYY-MM-DD` date, or names a day that does not exist
    #[error("{0} is not a valid date")]
    InvalidDate(String),
}

/// A primitive that can live inside a [`Nullable`]
pub trait NullableValue: Sized {
    /// Parse the textual form. `Ok(None)` means the text denotes "unset".
    fn from_text(raw: &str) -> Result<Option<Self>, NullableError>;

    /// Render the value in its textual form
    fn to_text(&self) -> String;

    /// Whether this is the zero value that counts as "unset"
    fn is_zero(&self) -> bool;
}

impl NullableValue for String {
    fn from_text(raw: &str) -> Result<Option<Self>, NullableError> {
        Ok((!raw.is_empty()).then(|| raw.to_string()))
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl NullableValue for NaiveDate {
    fn from_text(raw: &str) -> Result<Option<Self>, NullableError> {
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| NullableError::InvalidDate(raw.to_string()))
    }

    fn to_text(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }

    fn is_zero(&self) -> bool {
        false
    }
}

/// A value plus its presence.
///
/// Two nullables are equal when both are absent, or both present with equal
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nullable<T>(Option<T>);

/// Nullable text column
pub type NullString = Nullable<String>;

/// Nullable calendar date
pub type NullDate = Nullable<NaiveDate>;

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Nullable<T> {
    /// The absent value
    pub const fn null() -> Self {
        Self(None)
    }

    /// Whether the value is absent
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the value, if present
    pub fn value(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Storage representation
    pub fn into_option(self) -> Option<T> {
        self.0
    }

    /// Keep the current value, or take `fallback`'s when this one is absent
    pub fn fill_from(&mut self, fallback: &Self)
    where
        T: Clone,
    {
        if self.0.is_none() {
            self.0.clone_from(&fallback.0);
        }
    }
}

impl<T: NullableValue> Nullable<T> {
    /// Wrap `value`; the type's zero value (e.g. `""`) yields an absent nullable
    pub fn new(value: T) -> Self {
        if value.is_zero() {
            Self(None)
        } else {
            Self(Some(value))
        }
    }

    /// Replace the value, applying the same zero-value rule as [`Nullable::new`]
    pub fn set(&mut self, value: T) {
        *self = Self::new(value);
    }

    /// Build from text. Empty text is absent; malformed text is an error.
    pub fn parse(raw: &str) -> Result<Self, NullableError> {
        T::from_text(raw).map(Self)
    }

    /// Encoded form: `None` for absent, the text otherwise
    pub fn encode(&self) -> Option<String> {
        self.0.as_ref().map(T::to_text)
    }

    /// Inverse of [`Nullable::encode`]
    pub fn decode(raw: Option<&str>) -> Result<Self, NullableError> {
        match raw {
            None => Ok(Self::null()),
            Some(text) => Self::parse(text),
        }
    }
}

impl NullString {
    /// Borrow the text, if present
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<&str> for NullString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl<T: NullableValue> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

impl<T: NullableValue> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.encode() {
            Some(text) => serializer.serialize_str(&text),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, T: NullableValue> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Self::decode(raw.as_deref()).map_err(de::Error::custom)
    }
}
