use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::StoryId,
    protocol::{
        CreateSessionRequest, CreateStoryRequest, CreateUserRequest, JoinSessionRequest,
        MultiplayerSession, Story, User,
    },
};

use crate::{ApiClient, ClientError};

/// The operations the presentation layer drives. [`ApiClient`] is the
/// production implementation; tests substitute scripted doubles.
#[async_trait]
pub trait StoryBackend: Send + Sync {
    async fn health_check(&self) -> bool;
    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ClientError>;
    async fn create_story(&self, request: &CreateStoryRequest) -> Result<Story, ClientError>;
    async fn continue_story(&self, story_id: StoryId, choice: &str) -> Result<Value, ClientError>;
    async fn export_story(&self, story_id: StoryId) -> Result<Value, ClientError>;
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<MultiplayerSession, ClientError>;
    async fn join_session(
        &self,
        request: &JoinSessionRequest,
    ) -> Result<MultiplayerSession, ClientError>;
}

#[async_trait]
impl StoryBackend for ApiClient {
    async fn health_check(&self) -> bool {
        ApiClient::health_check(self).await
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ClientError> {
        ApiClient::create_user(self, request).await
    }

    async fn create_story(&self, request: &CreateStoryRequest) -> Result<Story, ClientError> {
        ApiClient::create_story(self, request).await
    }

    async fn continue_story(&self, story_id: StoryId, choice: &str) -> Result<Value, ClientError> {
        ApiClient::continue_story(self, story_id, choice).await
    }

    async fn export_story(&self, story_id: StoryId) -> Result<Value, ClientError> {
        ApiClient::export_story(self, story_id).await
    }

    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<MultiplayerSession, ClientError> {
        ApiClient::create_session(self, request).await
    }

    async fn join_session(
        &self,
        request: &JoinSessionRequest,
    ) -> Result<MultiplayerSession, ClientError> {
        ApiClient::join_session(self, request).await
    }
}
