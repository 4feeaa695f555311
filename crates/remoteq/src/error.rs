//! Error types for decoding query documents and extracting them from requests.

use thiserror::Error;

/// Reasons a query document could not be turned into a [`QueryNode`](crate::QueryNode).
///
/// These never escape [`Decoder::decode`](crate::Decoder::decode), which
/// resolves every failure to "no node". They are available through
/// [`Decoder::try_decode`](crate::Decoder::try_decode) and the diagnostics
/// collected by [`Decoder::decode_with_diagnostics`](crate::Decoder::decode_with_diagnostics).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The document is JSON `null`.
    #[error("query document is null")]
    Null,

    /// The document is not a JSON object.
    #[error("query document is not an object")]
    NotAnObject,

    /// The `_query_class` key is absent.
    #[error("query document has no `_query_class`")]
    MissingTag,

    /// The `_query_class` value is not a string.
    #[error("`_query_class` must be a string")]
    TagNotString,

    /// The tag does not name a registered query class.
    #[error("unknown query class '{0}'")]
    UnknownTag(String),

    /// The tag is registered but switched off by the decoder configuration.
    #[error("query class '{0}' is disabled")]
    Disabled(&'static str),

    /// A field required by the query class is absent.
    #[error("{class} requires `{field}`")]
    MissingField {
        class: &'static str,
        field: &'static str,
    },

    /// A field is present but has the wrong JSON shape.
    #[error("{class}: `{field}` must be {expected}")]
    WrongShape {
        class: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    /// A condition list decoded to zero conditions.
    #[error("{class}: no conditions given")]
    EmptyCondition { class: &'static str },

    /// Condition and value sequences differ in length.
    #[error("{conditions} conditions but {values} values")]
    LengthMismatch { conditions: usize, values: usize },
}

/// Errors raised while pulling a query document out of request parameters.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The document text is not valid JSON.
    #[error("query is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The `query_b64` parameter is not valid base64.
    #[error("query_b64 is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded base64 payload is not UTF-8.
    #[error("query_b64 does not decode to UTF-8 text")]
    InvalidUtf8,
}

/// Failure of [`filter_request`](crate::request::filter_request).
///
/// Builder errors are carried through unchanged.
#[derive(Debug, Error)]
pub enum RequestFilterError<E> {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("query builder failed: {0}")]
    Builder(E),
}
