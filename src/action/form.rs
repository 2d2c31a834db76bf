//! Form body parsing.
//!
//! # Responsibilities
//! - Model a submitted form as an ordered multi-map
//! - Distinguish a missing field from an empty one
//! - Parse `application/x-www-form-urlencoded` and `multipart/form-data` bodies
//!
//! # Design Decisions
//! - `get` returns the first value for a name, like browser `FormData`
//! - Parsing sits behind `FormDataParser` so other encodings can be plugged in
//! - Multipart parts with a filename become `FormValue::File`, others text

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, Request};
use futures_util::future::BoxFuture;
use serde_json::{Map, Value};
use thiserror::Error;

const URL_ENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// An uploaded file field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A single form field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FormFile),
}

impl FormValue {
    /// Returns the text value, or `None` for file fields.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(text) => Some(text),
            FormValue::File(_) => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FormValue::Text(text) => Value::String(text.clone()),
            FormValue::File(file) => serde_json::json!({
                "filename": file.filename,
                "content_type": file.content_type,
                "size": file.data.len(),
            }),
        }
    }
}

/// Parsed form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((name.into(), FormValue::Text(value.into())));
    }

    /// Append a file field.
    pub fn append_file(&mut self, name: impl Into<String>, file: FormFile) {
        self.entries.push((name.into(), FormValue::File(file)));
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Every value submitted under `name`, in submission order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormValue> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON view of the form. Repeated names become arrays.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (name, value) in &self.entries {
            let value = value.to_json();
            match object.get_mut(name) {
                None => {
                    object.insert(name.clone(), value);
                }
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        }
        Value::Object(object)
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form_data = FormData::new();
        for (name, value) in iter {
            form_data.append(name, value);
        }
        form_data
    }
}

/// Errors raised while reading a form body.
#[derive(Debug, Error)]
pub enum FormError {
    /// The body is not in an encoding this parser understands.
    #[error("Unsupported form content type: {0}")]
    UnsupportedContentType(String),

    /// The Content-Type header is not valid visible ASCII.
    #[error("Invalid Content-Type header")]
    InvalidContentType,

    /// The multipart body or its boundary is malformed.
    #[error("Invalid multipart body: {0}")]
    Multipart(String),
}

/// Turns a request body into `FormData`.
pub trait FormDataParser: Send + Sync {
    fn parse<'a>(
        &'a self,
        request: &'a Request<Bytes>,
    ) -> BoxFuture<'a, Result<FormData, FormError>>;
}

/// Lowercased media type without parameters, `None` without a header.
fn content_type_essence(request: &Request<Bytes>) -> Result<Option<String>, FormError> {
    let Some(value) = request.headers().get(header::CONTENT_TYPE) else {
        return Ok(None);
    };
    let content_type = value.to_str().map_err(|_| FormError::InvalidContentType)?;
    Ok(Some(
        content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase(),
    ))
}

fn parse_urlencoded(body: &[u8]) -> FormData {
    url::form_urlencoded::parse(body).into_owned().collect()
}

async fn parse_multipart(request: &Request<Bytes>) -> Result<FormData, FormError> {
    // The extractor only needs the boundary from the Content-Type header.
    let mut builder = Request::builder();
    if let Some(content_type) = request.headers().get(header::CONTENT_TYPE) {
        builder = builder.header(header::CONTENT_TYPE, content_type.clone());
    }
    let body_request = builder
        .body(Body::from(request.body().clone()))
        .map_err(|e| FormError::Multipart(e.to_string()))?;

    let mut multipart = Multipart::from_request(body_request, &())
        .await
        .map_err(|e| FormError::Multipart(e.body_text()))?;

    let mut form_data = FormData::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FormError::Multipart(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| FormError::Multipart(e.body_text()))?;
                form_data.append_file(
                    name,
                    FormFile {
                        filename,
                        content_type,
                        data,
                    },
                );
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| FormError::Multipart(e.body_text()))?;
                form_data.append(name, text);
            }
        }
    }

    Ok(form_data)
}

/// Parser for urlencoded bodies. A request without a Content-Type is read
/// as urlencoded as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlEncodedFormParser;

impl FormDataParser for UrlEncodedFormParser {
    fn parse<'a>(
        &'a self,
        request: &'a Request<Bytes>,
    ) -> BoxFuture<'a, Result<FormData, FormError>> {
        Box::pin(async move {
            match content_type_essence(request)? {
                None => Ok(parse_urlencoded(request.body())),
                Some(essence) if essence == URL_ENCODED => Ok(parse_urlencoded(request.body())),
                Some(essence) => Err(FormError::UnsupportedContentType(essence)),
            }
        })
    }
}

/// Parser for the encodings an HTML form submits: urlencoded (also assumed
/// without a Content-Type) and multipart.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormParser;

impl FormDataParser for HtmlFormParser {
    fn parse<'a>(
        &'a self,
        request: &'a Request<Bytes>,
    ) -> BoxFuture<'a, Result<FormData, FormError>> {
        Box::pin(async move {
            match content_type_essence(request)? {
                None => Ok(parse_urlencoded(request.body())),
                Some(essence) if essence == URL_ENCODED => Ok(parse_urlencoded(request.body())),
                Some(essence) if essence == MULTIPART => parse_multipart(request).await,
                Some(essence) => Err(FormError::UnsupportedContentType(essence)),
            }
        })
    }
}
