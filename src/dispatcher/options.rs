use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;

use crate::errors::Error;

/// One file in a multipart body. Kept as owned bytes so the body can be
/// rebuilt for a retried attempt.
#[derive(Clone, Debug)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

/// A request body that can be replayed: every variant is rebuilt per attempt.
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Text(String),
    Bytes(Vec<u8>),
    Form(Vec<(String, String)>),
    Multipart(Vec<FilePart>),
}

impl RequestBody {
    pub(crate) fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder, Error> {
        let builder = match self {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Text(text) => builder.body(text.clone()),
            RequestBody::Bytes(bytes) => builder.body(bytes.clone()),
            RequestBody::Form(pairs) => builder.form(pairs),
            RequestBody::Multipart(files) => {
                let mut form = Form::new();
                for file in files {
                    let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
                    if let Some(mime) = &file.mime {
                        part = part.mime_str(mime).map_err(|e| {
                            Error::InvalidInput(format!("Invalid mime type '{}': {}", mime, e))
                        })?;
                    }
                    form = form.part(file.field.clone(), part);
                }
                builder.multipart(form)
            }
        };
        Ok(builder)
    }
}

/// Method, headers and body for one dispatch.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, Error> {
        self.body = RequestBody::Json(serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = RequestBody::Text(text.into());
        self
    }

    pub fn bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = RequestBody::Bytes(bytes.into());
        self
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        match &mut self.body {
            RequestBody::Multipart(files) => files.push(part),
            _ => self.body = RequestBody::Multipart(vec![part]),
        }
        self
    }

    /// Caller headers with `Authorization` always replaced by the bearer token.
    pub(crate) fn headers_with_bearer(&self, access_token: &str) -> Result<HeaderMap, Error> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|_| Error::Auth("stored access token is not a valid header value".into()))?;
        bearer.set_sensitive(true);
        let mut headers = self.headers.clone();
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}
