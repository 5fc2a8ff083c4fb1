//! Query parameters.
//!
//! [`QueryParams`] keeps `(name, value)` pairs in insertion order so the
//! generated URL is deterministic, while equality ignores that order.
//!
//! # Example
//!
//! ```
//! use tongs_core::{QueryParams, ToQueryItems};
//!
//! let params = QueryParams::new().with("term", "cat").with("limit", 20);
//! assert_eq!(
//!     params.to_query_items(),
//!     vec![
//!         ("term".to_string(), "cat".to_string()),
//!         ("limit".to_string(), "20".to_string()),
//!     ]
//! );
//! ```

use std::fmt;

use crate::Result;

/// A query parameter value.
///
/// Both variants render to a string without loss; integers use their
/// decimal representation, so `Int(20)` and `Str("20")` encode the same way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryValue {
    /// A textual value.
    Str(String),
    /// An integer value.
    Int(i64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

macro_rules! query_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

query_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

// Values above `i64::MAX` keep their digits as text.
macro_rules! query_value_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
                }
            }
        )*
    };
}

query_value_from_wide_int!(u64, usize, isize);

/// Trait for types that can be converted to query items.
pub trait ToQueryItems {
    /// Convert this value to a list of `(name, value)` pairs.
    fn to_query_items(&self) -> Vec<(String, String)>;
}

/// An ordered set of query parameters.
///
/// Names are never deduplicated: adding `page` twice produces two
/// `page=...` items in the URL.
#[derive(Debug, Clone, Default, Eq)]
pub struct QueryParams {
    items: Vec<(String, QueryValue)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a parameter, returning the updated set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Adds a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        self.items.push((name.into(), value.into()));
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when there is no parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.items
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Build a parameter set from a serializable struct.
    ///
    /// `Vec` fields become repeated items. All values are kept as text.
    ///
    /// # Example
    ///
    /// ```
    /// use serde::Serialize;
    /// use tongs_core::QueryParams;
    ///
    /// #[derive(Serialize)]
    /// struct Search {
    ///     term: String,
    ///     #[serde(skip_serializing_if = "Option::is_none")]
    ///     page: Option<u32>,
    /// }
    ///
    /// let search = Search { term: "dog".to_string(), page: None };
    /// let params = QueryParams::from_serialize(&search).expect("serialize");
    /// assert_eq!(params, QueryParams::new().with("term", "dog"));
    /// ```
    pub fn from_serialize<T: serde::Serialize>(value: &T) -> Result<Self> {
        let encoded = serde_html_form::to_string(value)?;
        Ok(url::form_urlencoded::parse(encoded.as_bytes())
            .map(|(name, value)| (name.into_owned(), QueryValue::Str(value.into_owned())))
            .collect())
    }

    fn sorted(&self) -> Vec<&(String, QueryValue)> {
        let mut items: Vec<_> = self.items.iter().collect();
        items.sort();
        items
    }
}

impl ToQueryItems for QueryParams {
    fn to_query_items(&self) -> Vec<(String, String)> {
        self.items
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }
}

impl PartialEq for QueryParams {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len() && self.sorted() == other.sorted()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.push(name, value);
        }
    }
}

impl IntoIterator for QueryParams {
    type Item = (String, QueryValue);
    type IntoIter = std::vec::IntoIter<(String, QueryValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
