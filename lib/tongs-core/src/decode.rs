//! JSON decoding with classified errors.
//!
//! Every failed decode produces exactly one [`DecodeError`], whose
//! [`DecodeErrorKind`] says what went wrong. With [`Verbosity::Verbose`] the
//! error also carries a diagnostic naming the offending key or path; with
//! [`Verbosity::Terse`] it carries nothing, which makes it easy to compare.
//!
//! # Example
//!
//! ```
//! use serde::Deserialize;
//! use tongs_core::{DecodeError, DecodeErrorKind, JsonDecoder, Verbosity};
//!
//! #[derive(Debug, Deserialize)]
//! struct Joke {
//!     id: String,
//!     text: String,
//! }
//!
//! let err = JsonDecoder::default()
//!     .decode::<Joke>(br#"{"id":"42"}"#, Verbosity::Terse)
//!     .expect_err("missing text");
//! assert_eq!(err, DecodeError::terse(DecodeErrorKind::KeyNotFound));
//! ```

use std::fmt;

use derive_more::Display;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// How much detail a [`DecodeError`] carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Verbosity {
    /// Kind only.
    Terse,
    /// Kind plus a human-readable diagnostic.
    #[default]
    Verbose,
}

/// What to do with JSON keys the target type does not declare.
///
/// Keys are seen only while serde walks the payload directly. Types that
/// buffer their input first, those with a `#[serde(flatten)]` field or an
/// internally tagged enum (`#[serde(tag = "...")]`), drop undeclared keys
/// under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnknownKeys {
    /// Fail with [`DecodeErrorKind::KeyNotFound`].
    #[default]
    Reject,
    /// Skip them.
    Ignore,
}

/// The kind of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DecodeErrorKind {
    /// The payload is not valid JSON, or holds a value the target rejects.
    #[display("data corrupted")]
    DataCorrupted,
    /// A required key is missing, or an undeclared key is present.
    #[display("key not found")]
    KeyNotFound,
    /// A required value is `null`.
    #[display("value not found")]
    ValueNotFound,
    /// A value has the wrong JSON type.
    #[display("type mismatch")]
    TypeMismatch,
    /// Anything else.
    #[display("decode failure")]
    Other,
}

/// A classified decode failure.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    detail: Option<String>,
}

impl DecodeError {
    /// An error without diagnostic.
    #[must_use]
    pub const fn terse(kind: DecodeErrorKind) -> Self {
        Self { kind, detail: None }
    }

    /// An error with a diagnostic.
    #[must_use]
    pub fn verbose(kind: DecodeErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }

    fn with_verbosity(kind: DecodeErrorKind, verbosity: Verbosity, detail: String) -> Self {
        match verbosity {
            Verbosity::Terse => Self::terse(kind),
            Verbosity::Verbose => Self::verbose(kind, detail),
        }
    }

    /// The failure kind.
    #[must_use]
    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// The diagnostic, for verbose errors.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns `true` if this error carries no diagnostic.
    #[must_use]
    pub const fn is_terse(&self) -> bool {
        self.detail.is_none()
    }

    /// Drop the diagnostic.
    #[must_use]
    pub fn into_terse(self) -> Self {
        Self::terse(self.kind)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {detail}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// JSON decoder configuration.
///
/// The default decoder rejects keys the target type does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonDecoder {
    unknown_keys: UnknownKeys,
}

impl JsonDecoder {
    /// A decoder rejecting undeclared keys.
    ///
    /// Keys buffered by `#[serde(flatten)]` or an internally tagged enum are
    /// not checked, see [`UnknownKeys`].
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            unknown_keys: UnknownKeys::Reject,
        }
    }

    /// A decoder skipping undeclared keys.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            unknown_keys: UnknownKeys::Ignore,
        }
    }

    /// Set the policy for undeclared keys.
    #[must_use]
    pub const fn with_unknown_keys(mut self, unknown_keys: UnknownKeys) -> Self {
        self.unknown_keys = unknown_keys;
        self
    }

    /// The policy for undeclared keys.
    #[must_use]
    pub const fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }

    /// Decode `bytes` into `T`.
    ///
    /// Decoding is all-or-nothing: on failure no partial value escapes.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] classifying the first failure.
    pub fn decode<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        verbosity: Verbosity,
    ) -> Result<T, DecodeError> {
        let mut ignored = Vec::new();
        let mut json = serde_json::Deserializer::from_slice(bytes);

        let result: Result<T, _> = {
            let mut record = |path: serde_ignored::Path<'_>| ignored.push(path.to_string());
            let tracked = serde_ignored::Deserializer::new(&mut json, &mut record);
            serde_path_to_error::deserialize(tracked)
        };
        let value =
            result.map_err(|err| classify(err.inner(), &err.path().to_string(), verbosity))?;
        json.end().map_err(|err| classify(&err, ".", verbosity))?;

        if self.unknown_keys == UnknownKeys::Reject
            && let Some(key) = ignored.first()
        {
            return Err(DecodeError::with_verbosity(
                DecodeErrorKind::KeyNotFound,
                verbosity,
                format!("Unexpected key `{key}` is not declared by the target type"),
            ));
        }

        Ok(value)
    }
}

/// Decode `bytes` into `T` with `decoder`, or the default [`JsonDecoder`].
///
/// # Errors
///
/// Returns a [`DecodeError`] classifying the first failure.
pub fn decode<T: DeserializeOwned>(
    bytes: &[u8],
    decoder: Option<&JsonDecoder>,
    verbosity: Verbosity,
) -> Result<T, DecodeError> {
    decoder.copied().unwrap_or_default().decode(bytes, verbosity)
}

fn classify(err: &serde_json::Error, path: &str, verbosity: Verbosity) -> DecodeError {
    let (kind, detail) = match err.classify() {
        Category::Syntax | Category::Eof => (
            DecodeErrorKind::DataCorrupted,
            format!("The given data was not valid JSON: {err}"),
        ),
        Category::Io => (DecodeErrorKind::Other, err.to_string()),
        Category::Data => classify_data(&bare_message(err), path),
    };

    DecodeError::with_verbosity(kind, verbosity, detail)
}

// Relies on the wording of serde's default `de::Error` constructors.
fn classify_data(message: &str, path: &str) -> (DecodeErrorKind, String) {
    if message.starts_with("missing field `") {
        let key = key_path(path, backticked(message));
        return (
            DecodeErrorKind::KeyNotFound,
            format!("No value associated with key `{key}` ({message})"),
        );
    }

    if message.starts_with("unknown field `") {
        let key = key_path(path, backticked(message));
        return (
            DecodeErrorKind::KeyNotFound,
            format!("Unexpected key `{key}` is not declared by the target type ({message})"),
        );
    }

    if let Some(rest) = message.strip_prefix("invalid type: ") {
        let (found, expected) = rest.split_once(", expected ").unwrap_or((rest, "a value"));
        if found == "null" {
            return (
                DecodeErrorKind::ValueNotFound,
                format!("Expected {expected} at `{path}` but found null"),
            );
        }
        return (
            DecodeErrorKind::TypeMismatch,
            format!("Expected {expected} at `{path}` but found {found}"),
        );
    }

    let corrupted = [
        "invalid value: ",
        "invalid length ",
        "unknown variant `",
        "duplicate field `",
    ];
    if corrupted.iter().any(|prefix| message.starts_with(prefix)) {
        return (
            DecodeErrorKind::DataCorrupted,
            format!("Invalid data at `{path}`: {message}"),
        );
    }

    (DecodeErrorKind::Other, format!("{message} (at `{path}`)"))
}

/// The error message without serde_json's ` at line L column C` suffix.
fn bare_message(err: &serde_json::Error) -> String {
    let mut message = err.to_string();
    if err.line() != 0 {
        let location = format!(" at line {} column {}", err.line(), err.column());
        if let Some(len) = message.strip_suffix(location.as_str()).map(str::len) {
            message.truncate(len);
        }
    }
    message
}

/// The first `` `quoted` `` word of a serde message.
fn backticked(message: &str) -> &str {
    message.split('`').nth(1).unwrap_or_default()
}

fn key_path(parent: &str, key: &str) -> String {
    if parent == "." || parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Joke {
        id: String,
        text: String,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Page {
        current_page: u32,
        results: Vec<Joke>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Closed {
        #[allow(dead_code)]
        id: u64,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Status {
        Ok,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(tag = "type")]
    enum Tagged {
        A { x: u32 },
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Flattened {
        a: u32,
        #[serde(flatten)]
        inner: Inner,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Inner {
        b: u32,
    }

    #[derive(Debug, Deserialize)]
    #[serde(try_from = "String")]
    struct EvenLength(#[allow(dead_code)] String);

    impl TryFrom<String> for EvenLength {
        type Error = String;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            if value.len() % 2 == 0 {
                Ok(Self(value))
            } else {
                Err("odd length".to_string())
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct Code {
        #[allow(dead_code)]
        v: EvenLength,
    }

    fn verbose_err<T: DeserializeOwned + fmt::Debug>(bytes: &[u8]) -> DecodeError {
        let_assert!(Err(err) = decode::<T>(bytes, None, Verbosity::Verbose));
        check!(!err.is_terse());
        err
    }

    #[test]
    fn decode_matching_payload() {
        let joke: Joke = decode(
            br#"{"id":"R7UfaahVfFd","text":"My dog used to chase people on a bike a lot."}"#,
            None,
            Verbosity::Verbose,
        )
        .expect("decode");
        check!(joke.id == "R7UfaahVfFd");
    }

    #[test]
    fn decode_corrupted_payload() {
        let err = verbose_err::<Joke>(b"{\"id\": ");
        check!(err.kind() == DecodeErrorKind::DataCorrupted);
        check!(err.detail().unwrap_or_default().contains("not valid JSON"));

        let err = verbose_err::<Joke>(b"not json");
        check!(err.kind() == DecodeErrorKind::DataCorrupted);
    }

    #[test]
    fn decode_trailing_data_is_corrupted() {
        let err = verbose_err::<Joke>(br#"{"id":"1","text":"t"} {"#);
        check!(err.kind() == DecodeErrorKind::DataCorrupted);
    }

    #[test]
    fn decode_missing_key() {
        let err = verbose_err::<Joke>(br#"{"id":"1"}"#);
        check!(err.kind() == DecodeErrorKind::KeyNotFound);
        check!(err.detail().unwrap_or_default().contains("text"));
    }

    #[test]
    fn decode_missing_nested_key_reports_its_path() {
        let err = verbose_err::<Page>(br#"{"current_page":1,"results":[{"id":"1"}]}"#);
        check!(err.kind() == DecodeErrorKind::KeyNotFound);
        let detail = err.detail().unwrap_or_default();
        check!(detail.contains("results[0].text"), "detail: {detail}");
    }

    #[test]
    fn decode_extra_key_is_rejected_by_default() {
        let err = verbose_err::<Joke>(br#"{"id":"1","text":"t","status":200}"#);
        check!(err.kind() == DecodeErrorKind::KeyNotFound);
        check!(err.detail().unwrap_or_default().contains("status"));
    }

    #[test]
    fn decode_extra_key_is_accepted_when_lenient() {
        let joke: Joke = JsonDecoder::lenient()
            .decode(br#"{"id":"1","text":"t","status":200}"#, Verbosity::Verbose)
            .expect("lenient decode");
        check!(joke == Joke { id: "1".to_string(), text: "t".to_string() });
    }

    #[test]
    fn decode_deny_unknown_fields_is_rejected_even_when_lenient() {
        let_assert!(
            Err(err) = JsonDecoder::lenient().decode::<Closed>(br#"{"id":1,"name":"x"}"#, Verbosity::Verbose)
        );
        check!(err.kind() == DecodeErrorKind::KeyNotFound);
        check!(err.detail().unwrap_or_default().contains("name"));
    }

    #[test]
    fn decode_buffered_shapes_skip_the_unknown_key_check() {
        let strict = JsonDecoder::strict();

        let tagged: Tagged = strict
            .decode(br#"{"type":"A","x":1,"extra":2}"#, Verbosity::Verbose)
            .expect("tagged decode");
        check!(tagged == Tagged::A { x: 1 });

        let flattened: Flattened = strict
            .decode(br#"{"a":1,"b":2,"zzz":3}"#, Verbosity::Verbose)
            .expect("flattened decode");
        check!(flattened == Flattened { a: 1, inner: Inner { b: 2 } });
    }

    #[test]
    fn decode_custom_error_is_other() {
        let err = verbose_err::<Code>(br#"{"v":"abc"}"#);
        check!(err.kind() == DecodeErrorKind::Other);
        let detail = err.detail().unwrap_or_default();
        check!(detail.contains("odd length"), "detail: {detail}");
        check!(detail.contains('v'));

        let_assert!(Err(err) = decode::<Code>(br#"{"v":"abc"}"#, None, Verbosity::Terse));
        check!(err == DecodeError::terse(DecodeErrorKind::Other));

        let_assert!(Ok(_) = decode::<Code>(br#"{"v":"ab"}"#, None, Verbosity::Terse));
    }

    #[test]
    fn decode_null_value() {
        let err = verbose_err::<Joke>(br#"{"id":"1","text":null}"#);
        check!(err.kind() == DecodeErrorKind::ValueNotFound);
        let detail = err.detail().unwrap_or_default();
        check!(detail.contains("text"));
        check!(detail.contains("null"));
    }

    #[test]
    fn decode_type_mismatch() {
        let err = verbose_err::<Page>(br#"{"current_page":"one","results":[]}"#);
        check!(err.kind() == DecodeErrorKind::TypeMismatch);
        let detail = err.detail().unwrap_or_default();
        check!(detail.contains("current_page"));
        check!(detail.contains("u32"));
    }

    #[test]
    fn decode_unknown_variant_is_corrupted() {
        let err = verbose_err::<Status>(br#""maybe""#);
        check!(err.kind() == DecodeErrorKind::DataCorrupted);
    }

    #[test]
    fn decode_terse_errors_compare_by_kind() {
        let cases: [(&[u8], DecodeErrorKind); 5] = [
            (b"[", DecodeErrorKind::DataCorrupted),
            (br#"{"id":"1"}"#, DecodeErrorKind::KeyNotFound),
            (br#"{"id":"1","text":"t","x":1}"#, DecodeErrorKind::KeyNotFound),
            (br#"{"id":null,"text":"t"}"#, DecodeErrorKind::ValueNotFound),
            (br#"{"id":1,"text":"t"}"#, DecodeErrorKind::TypeMismatch),
        ];

        for (bytes, kind) in cases {
            let_assert!(Err(err) = decode::<Joke>(bytes, None, Verbosity::Terse));
            check!(err == DecodeError::terse(kind));
        }
    }

    #[test]
    fn decode_error_display() {
        check!(DecodeError::terse(DecodeErrorKind::TypeMismatch).to_string() == "type mismatch");
        check!(
            DecodeError::verbose(DecodeErrorKind::KeyNotFound, "No value associated with key `id`")
                .to_string()
                == "key not found: No value associated with key `id`"
        );
    }

    #[test]
    fn decode_error_into_terse() {
        let err = verbose_err::<Joke>(br#"{"text":"t"}"#);
        check!(err.into_terse() == DecodeError::terse(DecodeErrorKind::KeyNotFound));
    }
}
