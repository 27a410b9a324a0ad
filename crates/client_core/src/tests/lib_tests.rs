use super::*;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::{Path, State},
    http::{HeaderMap as ServerHeaderMap, StatusCode as ServerStatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::error::ErrorCode;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Debug)]
struct CapturedRequest {
    content_type: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct CaptureState {
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedRequest>>>>,
    hits: Arc<AtomicUsize>,
}

fn capture_state() -> (
    CaptureState,
    oneshot::Receiver<CapturedRequest>,
    Arc<AtomicUsize>,
) {
    let (tx, rx) = oneshot::channel();
    let hits = Arc::new(AtomicUsize::new(0));
    let state = CaptureState {
        tx: Arc::new(Mutex::new(Some(tx))),
        hits: Arc::clone(&hits),
    };
    (state, rx, hits)
}

async fn record(state: &CaptureState, headers: ServerHeaderMap, body: Value) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(CapturedRequest { content_type, body });
    }
}

async fn spawn_server(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn client_for(app: Router) -> ApiClient {
    let base = spawn_server(app).await;
    ApiClient::new(base).expect("client")
}

async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn create_user_posts_json_body_exactly_once() {
    let (state, rx, hits) = capture_state();
    let app = Router::new()
        .route(
            "/users",
            post(
                |State(state): State<CaptureState>,
                 headers: ServerHeaderMap,
                 Json(body): Json<Value>| async move {
                    record(&state, headers, body).await;
                    Json(json!({"id": 7, "username": "User_1", "email": "user1@demo.com"}))
                },
            ),
        )
        .with_state(state);
    let client = client_for(app).await;

    let user = client
        .create_user(&CreateUserRequest {
            username: "User_1".to_string(),
            email: "user1@demo.com".to_string(),
        })
        .await
        .expect("create user");

    let captured = rx.await.expect("captured request");
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        captured.body,
        json!({"username": "User_1", "email": "user1@demo.com"})
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(user.id, UserId(7));
    assert_eq!(user.username, "User_1");
}

#[tokio::test]
async fn request_merges_caller_headers_over_default() {
    let app = Router::new().route(
        "/probe",
        get(|headers: ServerHeaderMap| async move {
            let content_type = headers
                .get(axum::http::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let probe = headers
                .get("x-probe")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({"content_type": content_type, "x_probe": probe}))
        }),
    );
    let client = client_for(app).await;

    let mut extra = HeaderMap::new();
    extra.insert(CONTENT_TYPE, HeaderValue::from_static("text/storytelling"));
    extra.insert("x-probe", HeaderValue::from_static("1"));
    let echoed: Value = client
        .request::<Value, ()>(Method::GET, "/probe", None, Some(extra))
        .await
        .expect("probe");

    assert_eq!(echoed["content_type"], "text/storytelling");
    assert_eq!(echoed["x_probe"], "1");
}

#[tokio::test]
async fn health_check_is_true_for_2xx_regardless_of_body() {
    let app = Router::new().route(
        "/health",
        get(|| async { (ServerStatusCode::OK, "plain text, not json") }),
    );
    let client = client_for(app).await;
    assert!(client.health_check().await);
}

#[tokio::test]
async fn health_check_is_false_for_non_2xx() {
    let app = Router::new().route(
        "/health",
        get(|| async { ServerStatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = client_for(app).await;
    assert!(!client.health_check().await);
}

#[tokio::test]
async fn health_check_is_false_when_unreachable() {
    let client = ApiClient::new(unreachable_base_url().await).expect("client");
    assert!(!client.health_check().await);
}

#[tokio::test]
async fn non_2xx_rejects_with_status_and_backend_message() {
    let app = Router::new().route(
        "/stories/:id",
        get(|| async {
            (
                ServerStatusCode::NOT_FOUND,
                Json(ApiError::new(ErrorCode::NotFound, "story missing")),
            )
        }),
    );
    let client = client_for(app).await;

    let err = client.fetch_story(StoryId(9)).await.expect_err("rejected");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    match err {
        ClientError::Status { status, message, .. } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "story missing");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_2xx_without_error_body_falls_back_to_status_reason() {
    let app = Router::new().route(
        "/stories",
        post(|| async { (ServerStatusCode::BAD_GATEWAY, "upstream fell over") }),
    );
    let client = client_for(app).await;

    let err = client
        .create_story(&CreateStoryRequest {
            title: "T".to_string(),
            genre: shared::domain::Genre::Fantasy,
            initial_prompt: "P".to_string(),
            user_id: UserId(1),
        })
        .await
        .expect_err("rejected");
    match err {
        ClientError::Status { status, message, .. } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_story_returns_minimal_backend_record_unmodified() {
    let app = Router::new().route(
        "/stories",
        post(|| async { Json(json!({"id": 1, "title": "X"})) }),
    );
    let client = client_for(app).await;

    let story = client
        .create_story(&CreateStoryRequest {
            title: "X".to_string(),
            genre: shared::domain::Genre::Horror,
            initial_prompt: "P".to_string(),
            user_id: UserId(1),
        })
        .await
        .expect("create story");

    assert_eq!(story.id, StoryId(1));
    assert_eq!(story.title, "X");
    assert!(story.genre.is_none());
    assert!(story.description.is_none());
    assert!(story.initial_prompt.is_none());
    assert!(story.progress.is_none());
}

#[tokio::test]
async fn create_story_sends_documented_fields() {
    let (state, rx, _) = capture_state();
    let app = Router::new()
        .route(
            "/stories",
            post(
                |State(state): State<CaptureState>,
                 headers: ServerHeaderMap,
                 Json(body): Json<Value>| async move {
                    record(&state, headers, body).await;
                    Json(json!({"id": 1001, "title": "T"}))
                },
            ),
        )
        .with_state(state);
    let client = client_for(app).await;

    client
        .create_story(&CreateStoryRequest {
            title: "T".to_string(),
            genre: shared::domain::Genre::SciFi,
            initial_prompt: "P".to_string(),
            user_id: UserId(9),
        })
        .await
        .expect("create story");

    let captured = rx.await.expect("captured request");
    assert_eq!(
        captured.body,
        json!({"title": "T", "genre": "sci-fi", "initial_prompt": "P", "user_id": 9})
    );
}

#[tokio::test]
async fn continue_story_posts_choice_to_story_path() {
    let (state, rx, _) = capture_state();
    let app = Router::new()
        .route(
            "/stories/7/continue",
            post(
                |State(state): State<CaptureState>,
                 headers: ServerHeaderMap,
                 Json(body): Json<Value>| async move {
                    record(&state, headers, body).await;
                    Json(json!({"ok": true}))
                },
            ),
        )
        .with_state(state);
    let client = client_for(app).await;

    let outcome = client
        .continue_story(StoryId(7), "Enter the caverns immediately")
        .await
        .expect("continue story");

    assert_eq!(outcome, json!({"ok": true}));
    let captured = rx.await.expect("captured request");
    assert_eq!(
        captured.body,
        json!({"choice": "Enter the caverns immediately"})
    );
}

#[tokio::test]
async fn list_user_stories_hits_user_scoped_path() {
    let app = Router::new().route(
        "/stories/user/:id",
        get(|Path(id): Path<i64>| async move {
            Json(json!([
                {"id": 1, "title": "The Crystal Caverns", "progress": 75},
                {"id": 2, "title": "Space Station Alpha", "user_id": id},
            ]))
        }),
    );
    let client = client_for(app).await;

    let stories = client.list_user_stories(UserId(3)).await.expect("list");
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0].id, StoryId(1));
    assert_eq!(stories[0].progress, Some(75));
    assert_eq!(stories[1].title, "Space Station Alpha");
}

#[tokio::test]
async fn export_story_returns_backend_payload_undecoded() {
    let payload = json!({
        "format": "markdown",
        "chapters": [{"heading": "The Cave Mouth", "body": "..."}],
    });
    let exported = payload.clone();
    let app = Router::new().route(
        "/stories/5/export",
        get(move || async move { Json(exported) }),
    );
    let client = client_for(app).await;

    let export = client.export_story(StoryId(5)).await.expect("export");
    assert_eq!(export, payload);
}

#[tokio::test]
async fn generate_voice_defaults_to_male_voice() {
    let (state, rx, _) = capture_state();
    let app = Router::new()
        .route(
            "/media/generate-voice",
            post(
                |State(state): State<CaptureState>,
                 headers: ServerHeaderMap,
                 Json(body): Json<Value>| async move {
                    record(&state, headers, body).await;
                    Json(json!({"audio_url": "https://cdn.example/voice.mp3"}))
                },
            ),
        )
        .with_state(state);
    let client = client_for(app).await;

    client
        .generate_voice("Once upon a time", None)
        .await
        .expect("generate voice");

    let captured = rx.await.expect("captured request");
    assert_eq!(
        captured.body,
        json!({"text": "Once upon a time", "voice": "male"})
    );
}

#[tokio::test]
async fn multiplayer_session_lookup_uses_code_path() {
    let app = Router::new().route(
        "/multiplayer/session/:code",
        get(|Path(code): Path<String>| async move {
            Json(json!({"session_code": code, "story_id": 5}))
        }),
    );
    let client = client_for(app).await;

    let session = client
        .fetch_session(&SessionCode("CAVERN-7".to_string()))
        .await
        .expect("fetch session");

    assert_eq!(session.session_code, SessionCode("CAVERN-7".to_string()));
    assert_eq!(session.story_id, Some(StoryId(5)));
}

#[tokio::test]
async fn join_session_posts_code_and_user() {
    let (state, rx, _) = capture_state();
    let app = Router::new()
        .route(
            "/multiplayer/join",
            post(
                |State(state): State<CaptureState>,
                 headers: ServerHeaderMap,
                 Json(body): Json<Value>| async move {
                    record(&state, headers, body).await;
                    Json(json!({"session_code": "CAVERN-7"}))
                },
            ),
        )
        .with_state(state);
    let client = client_for(app).await;

    client
        .join_session(&JoinSessionRequest {
            session_code: SessionCode("CAVERN-7".to_string()),
            user_id: UserId(3),
        })
        .await
        .expect("join session");

    let captured = rx.await.expect("captured request");
    assert_eq!(
        captured.body,
        json!({"session_code": "CAVERN-7", "user_id": 3})
    );
}

#[tokio::test]
async fn invalid_json_on_success_is_a_decode_error() {
    let app = Router::new().route(
        "/users/4",
        get(|| async { (ServerStatusCode::OK, "definitely not json") }),
    );
    let client = client_for(app).await;

    let err = client.fetch_user(UserId(4)).await.expect_err("rejected");
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn invalid_base_url_is_rejected_up_front() {
    let err = ApiClient::new("not a url").expect_err("rejected");
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}
