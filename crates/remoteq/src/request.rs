//! Pulling query documents out of HTTP-style request parameters.
//!
//! Clients send the document in one of three places, checked in order:
//!
//! 1. a `query` query-string parameter holding JSON text,
//! 2. a `query_b64` parameter holding base64-encoded JSON text (standard or
//!    URL-safe alphabet, padding optional),
//! 3. a `query` field in a JSON request body, either an object or a string
//!    holding JSON text.
//!
//! The first source present wins, even if a later one would also parse.

use std::collections::HashMap;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde_json::Value;

use crate::builder::QueryBuilder;
use crate::decode::Decoder;
use crate::error::{RequestError, RequestFilterError};

/// Parameter and body key holding JSON text.
pub const QUERY_PARAM: &str = "query";
/// Parameter holding base64-encoded JSON text.
pub const QUERY_B64_PARAM: &str = "query_b64";

const PADDING_INDIFFERENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, PADDING_INDIFFERENT);
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, PADDING_INDIFFERENT);

/// Request inputs relevant to query extraction.
///
/// ```
/// use remoteq::request::{extract_document, QueryParams};
///
/// let params = QueryParams::from_pairs([("query", r#"{"_query_class": "all"}"#)]);
/// let doc = extract_document(&params).unwrap();
/// assert_eq!(doc, Some(serde_json::json!({"_query_class": "all"})));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: HashMap<String, String>,
    body: Option<Value>,
}

impl QueryParams {
    pub fn new() -> Self {
        QueryParams::default()
    }

    /// Builds params from decoded query-string pairs. Later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        QueryParams {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            body: None,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn get_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Finds and parses the query document, if the request carries one.
pub fn extract_document(params: &QueryParams) -> Result<Option<Value>, RequestError> {
    if let Some(text) = params.get(QUERY_PARAM) {
        return Ok(Some(serde_json::from_str(text)?));
    }
    if let Some(encoded) = params.get(QUERY_B64_PARAM) {
        return decode_b64(encoded).map(Some);
    }
    match params.get_body().and_then(|body| body.get(QUERY_PARAM)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(serde_json::from_str(text)?)),
        Some(doc) => Ok(Some(doc.clone())),
    }
}

fn decode_b64(encoded: &str) -> Result<Value, RequestError> {
    let encoded = encoded.trim();
    let bytes = match STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(standard_err) => URL_SAFE.decode(encoded).map_err(|_| standard_err)?,
    };
    let text = String::from_utf8(bytes).map_err(|_| RequestError::InvalidUtf8)?;
    Ok(serde_json::from_str(&text)?)
}

/// Extracts, decodes and applies the request's query document.
///
/// A request without a document, or with one that does not decode, returns
/// `builder` unchanged. Unparseable transport encodings are errors.
pub fn filter_request<B: QueryBuilder>(
    params: &QueryParams,
    builder: B,
    decoder: &Decoder,
) -> Result<B, RequestFilterError<B::Error>> {
    let document = extract_document(params)?;
    decoder
        .apply(document.as_ref(), builder)
        .map_err(RequestFilterError::Builder)
}
