//! Errors raised while talking to the backend and the failure categories shown to the user.

use serde::Deserialize;

/// The errors that may occur while issuing a backend request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the request and said why.
    ///
    /// `detail` is the human readable message from the response body and is
    /// safe to show to the user verbatim.
    #[error("{detail}")]
    Backend { status: u16, detail: String },

    /// The backend rejected the request without a readable explanation.
    #[error("the server responded with status {0}")]
    Status(u16),

    /// No response was received, e.g. the server is unreachable or the
    /// browser blocked the request.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be assembled before sending.
    #[error("could not build request: {0}")]
    Request(String),

    /// The response body did not have the expected shape.
    #[error("could not read the server response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response, keeping the backend's detail message
    /// when the body carries one.
    pub fn from_response(status: u16, body: &str) -> Self {
        match extract_detail(body) {
            Some(detail) => ApiError::Backend { status, detail },
            None => ApiError::Status(status),
        }
    }

    /// The backend supplied detail message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Backend { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// The HTTP status of the response that caused this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            ApiError::Status(status) => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend refused the session credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Deserialize)]
struct ValidationIssue {
    msg: String,
    #[serde(default)]
    loc: Vec<serde_json::Value>,
}

impl ValidationIssue {
    fn describe(&self) -> String {
        match self.loc.last().and_then(|field| field.as_str()) {
            Some(field) => format!("{field}: {}", self.msg),
            None => self.msg.clone(),
        }
    }
}

/// Pull the `detail` field out of an error body.
///
/// The backend sends either `{"detail": "message"}` or, for request
/// validation errors, `{"detail": [{"loc": [...], "msg": "..."}]}`.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;

    let detail = match parsed.detail {
        Detail::Message(message) => message,
        Detail::Validation(issues) => issues
            .iter()
            .map(ValidationIssue::describe)
            .collect::<Vec<_>>()
            .join("; "),
    };

    if detail.trim().is_empty() {
        None
    } else {
        Some(detail)
    }
}

/// A failed backend call, classified by the workflow it interrupted.
///
/// Every failure is recoverable by retrying, so these are turned into
/// notifications at the component boundary rather than propagated.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Login or registration was rejected.
    Authentication(ApiError),
    /// The expense list could not be loaded.
    Fetch(ApiError),
    /// An invoice could not be submitted.
    Upload(ApiError),
}

impl Failure {
    pub fn error(&self) -> &ApiError {
        match self {
            Failure::Authentication(error) | Failure::Fetch(error) | Failure::Upload(error) => {
                error
            }
        }
    }

    /// The message to show the user.
    pub fn message(&self) -> String {
        match self {
            Failure::Authentication(error) => format!(
                "Authentication failed: {}",
                error.detail().unwrap_or("Please check your credentials")
            ),
            Failure::Fetch(error) => format!("Could not load expenses: {error}"),
            Failure::Upload(error) => match error.detail() {
                Some(detail) => format!("Upload failed: {detail}"),
                None => "Upload failed, please try again.".to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, Failure};

    #[test]
    fn keeps_backend_detail_message() {
        let error = ApiError::from_response(400, r#"{"detail": "Invalid file type"}"#);

        assert_eq!(
            error,
            ApiError::Backend {
                status: 400,
                detail: "Invalid file type".to_owned()
            }
        );
        assert_eq!(error.detail(), Some("Invalid file type"));
    }

    #[test]
    fn joins_validation_issues() {
        let body = r#"{"detail": [
            {"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"},
            {"loc": ["body", "password"], "msg": "field required", "type": "missing"}
        ]}"#;

        let error = ApiError::from_response(422, body);

        assert_eq!(
            error.detail(),
            Some("email: value is not a valid email address; password: field required")
        );
    }

    #[test]
    fn falls_back_to_status_without_detail() {
        assert_eq!(
            ApiError::from_response(502, "<html>Bad Gateway</html>"),
            ApiError::Status(502)
        );
        assert_eq!(
            ApiError::from_response(500, r#"{"detail": ""}"#),
            ApiError::Status(500)
        );
    }

    #[test]
    fn detects_unauthorized() {
        let error = ApiError::from_response(401, r#"{"detail": "Could not validate credentials"}"#);

        assert!(error.is_unauthorized());
        assert!(!ApiError::Network("offline".to_owned()).is_unauthorized());
    }

    #[test]
    fn authentication_message_uses_detail_or_generic_text() {
        let rejected = Failure::Authentication(ApiError::Backend {
            status: 401,
            detail: "Incorrect email or password".to_owned(),
        });
        let offline = Failure::Authentication(ApiError::Network("offline".to_owned()));

        assert_eq!(
            rejected.message(),
            "Authentication failed: Incorrect email or password"
        );
        assert_eq!(
            offline.message(),
            "Authentication failed: Please check your credentials"
        );
    }

    #[test]
    fn upload_message_uses_detail_or_generic_text() {
        let rejected = Failure::Upload(ApiError::Backend {
            status: 400,
            detail: "Invalid file type".to_owned(),
        });
        let failed = Failure::Upload(ApiError::Status(500));

        assert_eq!(rejected.message(), "Upload failed: Invalid file type");
        assert_eq!(failed.message(), "Upload failed, please try again.");
    }
}
