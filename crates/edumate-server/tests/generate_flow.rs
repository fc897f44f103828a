//! End-to-end tests of the HTTP surface with a stubbed upstream provider.
//!
//! Each test binds the app to a random localhost port and talks to it over
//! real HTTP; the upstream provider is replaced by `StubGenerator`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use edumate_server::edumate_core::Prompt;
use edumate_server::{AppState, Generator, StudyService, UpstreamError, build_app};
use reqwest::{Client, Method, Response, StatusCode, header};
use serde_json::{Value, json};
use tokio::net::TcpListener;

// ============================================================================
// Fixtures
// ============================================================================

struct StubGenerator {
    reply: Result<String, UpstreamError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn replying(reply: Result<String, UpstreamError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn stalled(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(valid_reply().to_string()),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

fn valid_reply() -> Value {
    let mcqs: Vec<Value> = (1..=5)
        .map(|n| {
            json!({
                "question": format!("Which statement about photosynthesis is true ({n})?"),
                "options": [
                    "A) It releases carbon dioxide",
                    "B) It converts light energy into chemical energy",
                    "C) It only happens at night",
                    "D) It occurs in mitochondria"
                ],
                "answer": "B"
            })
        })
        .collect();

    json!({
        "notes": [
            "Photosynthesis converts light energy into chemical energy.",
            "It takes place mainly in chloroplasts.",
            "Chlorophyll absorbs red and blue light.",
            "Oxygen is released as a by-product.",
            "Glucose produced stores energy for the plant."
        ],
        "mcqs": mcqs,
        "flashcards": [
            { "front": "Chlorophyll", "back": "Green pigment that absorbs light" },
            { "front": "Stomata", "back": "Pores that exchange gases" },
            { "front": "Calvin cycle", "back": "Light-independent reactions fixing CO2" }
        ]
    })
}

/// Serve the app on a random port and return its base URL.
async fn spawn_app(generator: Arc<StubGenerator>, timeout: Duration) -> String {
    let service = StudyService::new(generator, timeout);
    let app = build_app(AppState::new(service), "*").expect("wildcard CORS should build");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{addr}")
}

async fn post_topic(base_url: &str, topic: &str) -> Response {
    Client::new()
        .post(format!("{base_url}/api/generate"))
        .json(&json!({ "topic": topic }))
        .send()
        .await
        .unwrap()
}

async fn into_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    (status, response.json().await.unwrap())
}

// ============================================================================
// Info and health
// ============================================================================

#[tokio::test]
async fn test_root_returns_200_while_upstream_is_down() {
    let generator = StubGenerator::replying(Err(UpstreamError::Unavailable("down".into())));
    let base_url = spawn_app(generator.clone(), Duration::from_secs(5)).await;

    let response = Client::new().get(format!("{base_url}/")).send().await.unwrap();
    let (status, body) = into_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "EduMate AI API is running!");
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_health_endpoint_reports_healthy() {
    let generator = StubGenerator::replying(Ok(String::new()));
    let base_url = spawn_app(generator, Duration::from_secs(5)).await;

    let response = Client::new().get(format!("{base_url}/health")).send().await.unwrap();
    let (status, body) = into_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "service": "edumate-ai" }));
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn test_valid_topic_returns_study_material() {
    let generator = StubGenerator::replying(Ok(valid_reply().to_string()));
    let base_url = spawn_app(generator.clone(), Duration::from_secs(5)).await;

    let (status, body) = into_json(post_topic(&base_url, "Photosynthesis").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none());
    assert_eq!(generator.calls(), 1);

    let data = &body["data"];
    assert_eq!(data["notes"].as_array().unwrap().len(), 5);
    assert_eq!(data["flashcards"].as_array().unwrap().len(), 3);

    let mcqs = data["mcqs"].as_array().unwrap();
    assert_eq!(mcqs.len(), 5);
    for mcq in mcqs {
        assert_eq!(mcq["options"].as_array().unwrap().len(), 4);
        let answer = mcq["answer"].as_str().unwrap();
        assert!(["A", "B", "C", "D"].contains(&answer));
    }
}

#[tokio::test]
async fn test_blank_topics_are_rejected_without_calling_upstream() {
    let generator = StubGenerator::replying(Ok(valid_reply().to_string()));
    let base_url = spawn_app(generator.clone(), Duration::from_secs(5)).await;

    for topic in ["", " ", "\t\n  "] {
        let (status, body) = into_json(post_topic(&base_url, topic).await).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "error": "Topic cannot be empty" }));
    }

    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_overlong_topic_is_rejected() {
    let generator = StubGenerator::replying(Ok(valid_reply().to_string()));
    let base_url = spawn_app(generator.clone(), Duration::from_secs(5)).await;

    let (status, body) = into_json(post_topic(&base_url, &"a".repeat(201)).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_gets_error_envelope() {
    let generator = StubGenerator::replying(Ok(valid_reply().to_string()));
    let base_url = spawn_app(generator.clone(), Duration::from_secs(5)).await;
    let url = format!("{base_url}/api/generate");
    let client = Client::new();

    let missing_topic = client
        .post(&url)
        .json(&json!({ "subject": "Photosynthesis" }))
        .send()
        .await
        .unwrap();
    let (status, body) = into_json(missing_topic).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    let not_json = client
        .post(&url)
        .header(header::CONTENT_TYPE, "application/json")
        .body("topic=Photosynthesis")
        .send()
        .await
        .unwrap();
    let (status, body) = into_json(not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let no_content_type = client
        .post(&url)
        .body(r#"{"topic":"Photosynthesis"}"#)
        .send()
        .await
        .unwrap();
    let (status, body) = into_json(no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_missing_answer_is_a_malformed_upstream_response() {
    let mut reply = valid_reply();
    reply["mcqs"][3].as_object_mut().unwrap().remove("answer");
    let generator = StubGenerator::replying(Ok(reply.to_string()));
    let base_url = spawn_app(generator, Duration::from_secs(5)).await;

    let (status, body) = into_json(post_topic(&base_url, "Photosynthesis").await).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
    // Parse diagnostics stay in the logs.
    assert!(!body["error"].as_str().unwrap().contains("mcqs[3]"));
}

#[tokio::test]
async fn test_fenced_reply_is_accepted() {
    let reply = format!("```json\n{}\n```", valid_reply());
    let base_url = spawn_app(StubGenerator::replying(Ok(reply)), Duration::from_secs(5)).await;

    let (status, body) = into_json(post_topic(&base_url, "Photosynthesis").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_stalled_upstream_returns_503_within_bound() {
    let generator = StubGenerator::stalled(Duration::from_secs(30));
    let base_url = spawn_app(generator, Duration::from_millis(100)).await;

    let started = Instant::now();
    let (status, body) = into_json(post_topic(&base_url, "Photosynthesis").await).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_upstream_failures_map_to_status_codes() {
    let cases = [
        (UpstreamError::Auth, StatusCode::BAD_GATEWAY),
        (UpstreamError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
        (UpstreamError::Timeout, StatusCode::SERVICE_UNAVAILABLE),
        (
            UpstreamError::Unavailable("connection refused".into()),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
        (
            UpstreamError::InvalidResponse("no choices".into()),
            StatusCode::BAD_GATEWAY,
        ),
    ];

    for (error, expected) in cases {
        let generator = StubGenerator::replying(Err(error.clone()));
        let base_url = spawn_app(generator, Duration::from_secs(5)).await;
        let (status, body) = into_json(post_topic(&base_url, "Photosynthesis").await).await;

        assert_eq!(status, expected, "{error:?}");
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_repeated_calls_are_byte_identical() {
    let generator = StubGenerator::replying(Ok(valid_reply().to_string()));
    let base_url = spawn_app(generator.clone(), Duration::from_secs(5)).await;

    let first = post_topic(&base_url, "Photosynthesis").await.bytes().await.unwrap();
    let second = post_topic(&base_url, "Photosynthesis").await.bytes().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(generator.calls(), 2);
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_unknown_route_gets_404_envelope() {
    let base_url = spawn_app(StubGenerator::replying(Ok(String::new())), Duration::from_secs(5)).await;

    let response = Client::new()
        .get(format!("{base_url}/api/unknown"))
        .send()
        .await
        .unwrap();
    let (status, body) = into_json(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "not found: /api/unknown" }));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let base_url = spawn_app(StubGenerator::replying(Ok(String::new())), Duration::from_secs(5)).await;
    let client = Client::new();

    let response = client.get(format!("{base_url}/")).send().await.unwrap();
    let generated = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    let response = client
        .get(format!("{base_url}/"))
        .header("x-request-id", "client-supplied-id")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "client-supplied-id");
}

#[tokio::test]
async fn test_any_origin_is_allowed() {
    let generator = StubGenerator::replying(Ok(valid_reply().to_string()));
    let base_url = spawn_app(generator, Duration::from_secs(5)).await;

    let response = Client::new()
        .request(Method::OPTIONS, format!("{base_url}/api/generate"))
        .header(header::ORIGIN, "https://frontend.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
