//! The gateway every backend call goes through.
//!
//! [ApiClient] turns a method, path, payload and query into an [ApiRequest],
//! attaches the session's bearer token and hands the request to a
//! [Transport]. Components never build requests themselves.

use std::rc::Rc;

use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::{error::ApiError, session::SessionReader, upload::UploadFile};

/// The HTTP methods the backend API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request payload before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Sent as `application/json`.
    Json(serde_json::Value),
    /// Sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// Sent as `multipart/form-data`.
    Multipart(MultipartForm),
}

/// The parts of a `multipart/form-data` body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub files: Vec<(String, UploadFile)>,
    pub fields: Vec<(String, String)>,
}

impl MultipartForm {
    pub fn file(mut self, name: impl Into<String>, file: UploadFile) -> Self {
        self.files.push((name.into(), file));
        self
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

/// An encoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(String),
    UrlEncoded(String),
    Multipart(MultipartForm),
}

/// A fully built request, ready for a [Transport].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub bearer: Option<String>,
    pub body: RequestBody,
}

/// The status and body text of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the response, whatever its status.
///
/// Only failures to get any response at all are errors here; status handling
/// is left to [ApiClient].
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Issues authenticated requests against the backend API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Rc<str>,
    session: SessionReader,
    transport: Rc<dyn Transport>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        session: SessionReader,
        transport: Rc<dyn Transport>,
    ) -> Self {
        let base_url: String = base_url.into();

        Self {
            base_url: base_url.trim_end_matches('/').into(),
            session,
            transport,
        }
    }

    /// Send a request and deserialize the JSON response body.
    ///
    /// # Errors
    /// Returns [ApiError::Backend] with the server's detail message when the
    /// response has a non-success status and a `detail` field,
    /// [ApiError::Status] for other non-success responses, and the
    /// transport's error when no response was received.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<Payload>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.build(method, path, payload, query)?;
        debug!("{:?} {}", request.method, request.url);

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let error = ApiError::from_response(response.status, &response.body);
            warn!("{method:?} {path} failed: {error}");
            return Err(error);
        }

        decode(&response.body)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request(Method::Get, path, None, query).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Payload,
    ) -> Result<T, ApiError> {
        self.request(Method::Post, path, Some(payload), &[]).await
    }

    /// Build the request without sending it.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        payload: Option<Payload>,
        query: &[(&str, String)],
    ) -> Result<ApiRequest, ApiError> {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        if !query.is_empty() {
            let query_string = serde_urlencoded::to_string(query)
                .map_err(|error| ApiError::Request(error.to_string()))?;
            url.push('?');
            url.push_str(&query_string);
        }

        let body = match payload {
            None => RequestBody::Empty,
            Some(Payload::Json(value)) => RequestBody::Json(
                serde_json::to_string(&value)
                    .map_err(|error| ApiError::Request(error.to_string()))?,
            ),
            Some(Payload::Form(fields)) => RequestBody::UrlEncoded(
                serde_urlencoded::to_string(&fields)
                    .map_err(|error| ApiError::Request(error.to_string()))?,
            ),
            Some(Payload::Multipart(form)) => RequestBody::Multipart(form),
        };

        Ok(ApiRequest {
            method,
            url,
            bearer: self.session.token(),
            body,
        })
    }
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
            && self.session == other.session
            && Rc::ptr_eq(&self.transport, &other.transport)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    // Some endpoints answer with an empty body, read that as `null`.
    let body = if body.trim().is_empty() { "null" } else { body };

    serde_json::from_str(body).map_err(|error| ApiError::Decode(error.to_string()))
}
