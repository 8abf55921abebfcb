//! Reqwest-backed transport shared by every job-board port.

use std::time::Duration;

use envelope::Envelope;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::ApiError;

const SERVER_ERROR_FALLBACK: &str = "Server error";

/// HTTP client for the job-board API.
///
/// Requests share one cookie jar, so a session established by `login` is
/// carried by every later call made through the same client.
#[derive(Debug, Clone)]
pub struct HttpJobBoardClient {
    client: Client,
    base_url: Url,
}

/// What a response amounted to once transport errors are ruled out.
#[derive(Debug)]
pub(super) enum Reply {
    /// 401 or 404: there is no session or no such resource.
    Absent {
        status: StatusCode,
        message: Option<String>,
    },
    /// 204, or a success with an empty body.
    NoContent,
    /// A decoded envelope.
    Payload(Envelope),
}

impl Reply {
    /// Payload data for a query; absent replies yield `None`.
    pub(super) fn into_query_data(self) -> Option<Value> {
        match self {
            Self::Absent { .. } | Self::NoContent => None,
            Self::Payload(envelope) => envelope.data,
        }
    }

    /// Single record for a query, unwrapping a nested `data` object.
    pub(super) fn into_query_record(self) -> Option<Value> {
        match self {
            Self::Absent { .. } | Self::NoContent => None,
            Self::Payload(envelope) => envelope.into_record(),
        }
    }

    /// Payload data for a command; absent replies are errors.
    pub(super) fn into_command_data(self) -> Result<Option<Value>, ApiError> {
        match self {
            Self::Absent { status, message } => Err(absent_error(status, message)),
            Self::NoContent => Ok(None),
            Self::Payload(envelope) => Ok(envelope.into_record()),
        }
    }
}

fn absent_error(status: StatusCode, message: Option<String>) -> ApiError {
    let message = message.unwrap_or_else(|| format!("status {}", status.as_u16()));
    if status == StatusCode::UNAUTHORIZED {
        ApiError::unauthorized(message)
    } else {
        ApiError::not_found(message)
    }
}

impl HttpJobBoardClient {
    /// Build a client for `base_url` (for example `http://localhost:3000/api`).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Base URL every path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `segments` against the base URL. Each segment is
    /// percent-encoded, so ids cannot escape their position in the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ApiError::invalid_request(format!("invalid path segment {bad:?}")));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::invalid_request(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(super) fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        Ok(self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    pub(super) fn json_request<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<RequestBuilder, ApiError>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.request(method, segments)?.json(body))
    }

    /// Send `request` and classify the response.
    pub(super) async fn execute(&self, request: RequestBuilder) -> Result<Reply, ApiError> {
        let request = request.build().map_err(map_transport_error)?;
        let path = request.url().path().to_owned();
        let response = self
            .client
            .execute(request)
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%path, status = status.as_u16(), bytes = body.len(), "job board call");

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND) {
            return Ok(Reply::Absent {
                status,
                message: envelope_message(body.as_ref()),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Reply::NoContent);
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let envelope = Envelope::parse(body.as_ref())
            .map_err(|error| ApiError::decode(format!("{path}: {error}")))?;
        if envelope == Envelope::default() {
            return Ok(Reply::NoContent);
        }
        Ok(Reply::Payload(envelope))
    }
}

fn envelope_message(body: &[u8]) -> Option<String> {
    Envelope::parse(body).ok().and_then(|envelope| envelope.message)
}

pub(super) fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::timeout(error.to_string())
    } else {
        ApiError::transport(error.to_string())
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = envelope_message(body).unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() || status.is_server_error() {
            format!("{SERVER_ERROR_FALLBACK} (status {})", status.as_u16())
        } else {
            preview
        }
    });

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiError::timeout(message),
        _ => ApiError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
