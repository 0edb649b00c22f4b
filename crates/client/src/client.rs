use std::sync::RwLock;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use vitrin_core::media::{MediaRef, SelectedFile};
use vitrin_core::types::DbId;

use crate::error::{ApiErrorBody, ClientError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// The account a token was issued for.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggedInUser {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    access_token: String,
    user: LoggedInUser,
}

/// Authenticated access to `/api/v1`.
///
/// The bearer token is shared by every clone of the `Arc` holding the client,
/// so a gateway keeps working after a later [`login`](Self::login).
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl AdminClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            token: RwLock::new(None),
        })
    }

    /// Use an already issued access token.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    fn token(&self) -> Result<String, ClientError> {
        self.token
            .read()
            .ok()
            .and_then(|t| t.clone())
            .ok_or(ClientError::NotAuthenticated)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// POST /auth/login; stores the token for later calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoggedInUser, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        let data: LoginData = parse(request.send().await?).await?;
        self.set_token(Some(data.access_token));
        tracing::debug!(user_id = data.user.id, "Logged in");
        Ok(data.user)
    }

    async fn authed<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.bearer_auth(self.token()?).send().await?;
        parse(response).await
    }

    /// GET an admin section; `None` before its first save.
    pub async fn get_section<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>, ClientError> {
        self.authed(self.http.get(self.url(path))).await
    }

    /// PUT an admin section and return the stored record.
    pub async fn put_section<P, R>(&self, path: &str, payload: &P) -> Result<R, ClientError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.authed(self.http.put(self.url(path)).json(payload)).await
    }

    /// POST /admin/upload as multipart.
    pub async fn upload(&self, file: &SelectedFile, context: &str) -> Result<MediaRef, ClientError> {
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new()
            .text("context", context.to_string())
            .part("file", part);

        let media: MediaRef = self
            .authed(self.http.post(self.url("/admin/upload")).multipart(form))
            .await?;
        tracing::debug!(media_id = media.media_id, %context, "Uploaded media");
        Ok(media)
    }
}

/// Unwrap a `{success, data}` envelope or turn the error body into a
/// [`ClientError::Api`].
async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        let envelope: Envelope<T> = response.json().await?;
        return Ok(envelope.data);
    }
    let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
    Err(ClientError::from_api(status, body))
}
