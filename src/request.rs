//! Outbound request description and buffered response

use crate::error::{ClientError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Request body
///
/// Bodies are kept as plain data rather than a built `reqwest` body so the
/// same request can be sent again after a token refresh.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<MultipartFile>),
}

/// One file field of a multipart form
#[derive(Debug, Clone)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl MultipartFile {
    fn to_part(&self) -> Result<Part> {
        Part::bytes(self.data.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)
            .map_err(|e| ClientError::Validation(format!("Invalid content type {:?}: {e}", self.mime)))
    }
}

impl RequestBody {
    pub(crate) fn to_form(files: &[MultipartFile]) -> Result<Form> {
        files
            .iter()
            .try_fold(Form::new(), |form, file| Ok(form.part(file.field.clone(), file.to_part()?)))
    }
}

/// An API call relative to the configured API root
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add a query parameter; values are URL-encoded when sent
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a file field to a multipart body
    pub fn file(mut self, file: MultipartFile) -> Self {
        match &mut self.body {
            RequestBody::Multipart(files) => files.push(file),
            _ => self.body = RequestBody::Multipart(vec![file]),
        }
        self
    }
}

/// Fully buffered response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self { status, headers, body })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ClientError::InvalidResponse(format!("Unexpected response body for status {}: {e}", self.status))
        })
    }

    /// Turn a non-2xx response into [`ClientError::Api`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_response(self.status, &self.text()))
        }
    }
}
