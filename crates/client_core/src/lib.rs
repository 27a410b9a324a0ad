use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::{SessionCode, StoryId, UserId},
    error::ApiError,
    protocol::{
        ContinueStoryRequest, CreateSessionRequest, CreateStoryRequest, CreateUserRequest,
        GenerateImageRequest, GenerateVoiceRequest, JoinSessionRequest, MultiplayerSession, Story,
        User, DEFAULT_VOICE,
    },
};
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

mod backend;
mod session;

pub use backend::StoryBackend;
pub use session::StorySession;

/// Backend origin the shipped client talks to when nothing overrides it.
pub const DEFAULT_API_BASE_URL: &str = "https://dyh6i3cq5g3p.manus.space/api";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {endpoint} did not complete: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server returned {status} for {endpoint}: {message}")]
    Status {
        endpoint: String,
        status: StatusCode,
        message: String,
    },
    #[error("invalid response body from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// HTTP status for requests the server rejected; `None` for transport
    /// and decode failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// JSON-over-HTTP binding to the storytelling backend. One method per
/// endpoint; no retries, no caching, no request cancellation.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request to `{base_url}{endpoint}` and decode the JSON body.
    ///
    /// A `Content-Type: application/json` header is always attached;
    /// caller-supplied headers win on conflict. Failures are logged here
    /// before they propagate.
    async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(extra) = extra_headers {
            for (name, value) in extra.iter() {
                headers.insert(name, value.clone());
            }
        }

        let mut request = self.http.request(method, url.as_str()).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| {
            warn!(%url, "api request did not complete: {source}");
            ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            error!(%url, %status, "api request rejected: {message}");
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status,
                message,
            });
        }

        response.json::<T>().await.map_err(|source| {
            error!(%url, "api response was not valid JSON: {source}");
            ClientError::Decode {
                endpoint: endpoint.to_string(),
                source,
            }
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request::<T, ()>(Method::GET, endpoint, None, None).await
    }

    async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.request(Method::POST, endpoint, Some(body), None).await
    }

    /// Probe the backend. `true` only for a 2xx response; any transport
    /// failure or non-2xx status reads as unreachable.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(url.as_str()).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(%url, "health check failed: {err}");
                false
            }
        }
    }

    // User management.

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ClientError> {
        self.post("/users", request).await
    }

    pub async fn fetch_user(&self, user_id: UserId) -> Result<User, ClientError> {
        self.get(&format!("/users/{}", user_id.0)).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get("/users").await
    }

    // Story management.

    pub async fn create_story(&self, request: &CreateStoryRequest) -> Result<Story, ClientError> {
        self.post("/stories", request).await
    }

    pub async fn fetch_story(&self, story_id: StoryId) -> Result<Story, ClientError> {
        self.get(&format!("/stories/{}", story_id.0)).await
    }

    pub async fn list_user_stories(&self, user_id: UserId) -> Result<Vec<Story>, ClientError> {
        self.get(&format!("/stories/user/{}", user_id.0)).await
    }

    /// Continuation payloads are backend-defined; the body comes back
    /// undecoded.
    pub async fn continue_story(
        &self,
        story_id: StoryId,
        choice: &str,
    ) -> Result<Value, ClientError> {
        let request = ContinueStoryRequest {
            choice: choice.to_string(),
        };
        self.post(&format!("/stories/{}/continue", story_id.0), &request)
            .await
    }

    pub async fn export_story(&self, story_id: StoryId) -> Result<Value, ClientError> {
        self.get(&format!("/stories/{}/export", story_id.0)).await
    }

    // Media generation.

    pub async fn generate_voice(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<Value, ClientError> {
        let request = GenerateVoiceRequest {
            text: text.to_string(),
            voice: voice.unwrap_or(DEFAULT_VOICE).to_string(),
        };
        self.post("/media/generate-voice", &request).await
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<Value, ClientError> {
        let request = GenerateImageRequest {
            prompt: prompt.to_string(),
        };
        self.post("/media/generate-image", &request).await
    }

    pub async fn list_voices(&self) -> Result<Value, ClientError> {
        self.get("/media/voices").await
    }

    // Multiplayer sessions.

    pub async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<MultiplayerSession, ClientError> {
        self.post("/multiplayer/create", request).await
    }

    pub async fn join_session(
        &self,
        request: &JoinSessionRequest,
    ) -> Result<MultiplayerSession, ClientError> {
        self.post("/multiplayer/join", request).await
    }

    pub async fn fetch_session(
        &self,
        code: &SessionCode,
    ) -> Result<MultiplayerSession, ClientError> {
        self.get(&format!("/multiplayer/session/{code}")).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
