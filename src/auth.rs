//! Login and registration against the backend, and the sign-in form state.

use log::info;
use serde::{de::IgnoredAny, Deserialize};
use serde_json::json;

use crate::{
    api::{ApiClient, Payload},
    error::{ApiError, Failure},
};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange credentials for an access token.
///
/// The backend expects an OAuth2 password form, so the email is sent as
/// `username`.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<String, ApiError> {
    let form = vec![
        ("username".to_owned(), email.to_owned()),
        ("password".to_owned(), password.to_owned()),
    ];

    let response: TokenResponse = client.post(LOGIN_PATH, Payload::Form(form)).await?;

    if response.access_token.is_empty() {
        return Err(ApiError::Decode(
            "the server returned an empty access token".to_owned(),
        ));
    }

    Ok(response.access_token)
}

/// Create an account. The new user still has to log in afterwards.
pub async fn register(client: &ApiClient, email: &str, password: &str) -> Result<(), ApiError> {
    let _: IgnoredAny = client
        .post(
            REGISTER_PATH,
            Payload::Json(json!({ "email": email, "password": password })),
        )
        .await?;

    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Credentials captured from the form for one submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// A successful form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSuccess {
    LoggedIn(String),
    Registered,
}

/// Send `credentials` to the endpoint matching their mode.
pub async fn submit(
    client: &ApiClient,
    credentials: &Credentials,
) -> Result<AuthSuccess, ApiError> {
    match credentials.mode {
        AuthMode::Login => {
            let token = login(client, &credentials.email, &credentials.password)
                .await?;
            info!("signed in as {}", credentials.email);
            Ok(AuthSuccess::LoggedIn(token))
        }
        AuthMode::Register => {
            register(client, &credentials.email, &credentials.password)
                .await?;
            info!("registered {}", credentials.email);
            Ok(AuthSuccess::Registered)
        }
    }
}

/// The sign-in / sign-up form.
///
/// The typed fields are kept on failure so the user can correct them and try
/// again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pending: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Switch between signing in and creating an account.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
        self.notice = None;
    }

    fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Email and password are required".to_owned());
        }

        if self.mode == AuthMode::Register && self.password != self.confirm_password {
            return Err("Passwords do not match".to_owned());
        }

        Ok(())
    }

    /// Validate the form and mark it pending.
    ///
    /// Returns `None` when a submission is already pending or the form is
    /// invalid, in which case the validation message is set as the error.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.pending {
            return None;
        }

        if let Err(message) = self.validate() {
            self.error = Some(message);
            return None;
        }

        self.pending = true;
        self.error = None;
        self.notice = None;

        Some(Credentials {
            mode: self.mode,
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
        })
    }

    /// Record the result of a submission started with [AuthForm::begin_submit].
    pub fn finish_submit(&mut self, result: &Result<AuthSuccess, ApiError>) {
        self.pending = false;

        match result {
            Ok(AuthSuccess::LoggedIn(_)) => {
                self.password.clear();
                self.confirm_password.clear();
            }
            Ok(AuthSuccess::Registered) => {
                self.mode = AuthMode::Login;
                self.confirm_password.clear();
                self.notice = Some("Account created, please sign in.".to_owned());
            }
            Err(error) => {
                self.error = Some(Failure::Authentication(error.clone()).message());
            }
        }
    }
}
