use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use podium::{
    application::page::PageService,
    application::speakers::{FetchError, SpeakerService, TalksSource},
    cache::SpeakerCache,
    domain::speakers::{Speaker, Talk},
    infra::content::parse_page,
    infra::http::{HttpState, build_router},
};
use serde_json::Value;
use time::Duration;
use tower::ServiceExt;

const EVENT_SLUG: &str = "pycon-apac-2026";

const CONTENT: &str = r#"
[page]
title = "PyCon APAC 2026"
date_start = "2026-02-27"
date_end = "2026-02-28"
time_start = "09:00"
ticket_link = "https://example.com/tickets"
location_main = "SMX Convention Center"
location_city = "Manila"
keynote_title = "Keynote Speakers"
speaker_title = "Speakers"
schedule_title = "Schedule"
sponsor_title = "Sponsors"

[[banners]]
title = "Early bird"
call_to_action = "Get tickets"
link = "https://example.com/tickets"
start_date = "2020-01-01"
end_date = "2099-12-31"

[[contents]]
title = "Why Attend PyCon?"
body = "<p>Two days of talks.</p>"
image_position = "left"
"#;

struct FixedTalks {
    talks: Vec<Talk>,
}

#[async_trait]
impl TalksSource for FixedTalks {
    async fn confirmed_talks(&self, event_slug: &str) -> Result<Vec<Talk>, FetchError> {
        assert_eq!(event_slug, EVENT_SLUG);
        Ok(self.talks.clone())
    }
}

fn speaker(code: &str, name: &str) -> Speaker {
    Speaker {
        code: code.to_string(),
        name: name.to_string(),
        biography: Some(format!("{name} bio")),
        avatar: None,
    }
}

fn sample_talks() -> Vec<Talk> {
    vec![
        Talk {
            title: "[Keynote] The State of Python".to_string(),
            speakers: vec![speaker("k1", "Ada")],
        },
        Talk {
            title: "Fast Serialization".to_string(),
            speakers: vec![speaker("s1", "Grace"), speaker("s2", "Lin")],
        },
    ]
}

fn app(source: Option<Arc<dyn TalksSource>>, with_page: bool) -> Router {
    let speakers = Arc::new(SpeakerService::new(
        source,
        Arc::new(SpeakerCache::new()),
        EVENT_SLUG,
        Duration::hours(12),
    ));
    let page = if with_page {
        PageService::new(Some(parse_page(CONTENT).expect("valid content")))
    } else {
        PageService::new(None)
    };

    build_router(HttpState { speakers, page })
}

async fn get_json(router: Router, path: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn health_endpoint_returns_no_content() {
    let response = app(None, false)
        .oneshot(
            Request::builder()
                .uri("/_health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn speakers_endpoint_returns_non_keynote_speakers() {
    let source: Arc<dyn TalksSource> = Arc::new(FixedTalks {
        talks: sample_talks(),
    });

    let (status, body) = get_json(app(Some(source), true), "/api/speakers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Grace");
    assert_eq!(body[1]["name"], "Lin");
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn keynotes_endpoint_returns_only_keynote_speakers() {
    let source: Arc<dyn TalksSource> = Arc::new(FixedTalks {
        talks: sample_talks(),
    });

    let (status, body) = get_json(app(Some(source), true), "/api/keynotes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["code"], "k1");
    assert_eq!(body[0]["name"], "Ada");
}

#[tokio::test]
async fn speakers_endpoint_is_empty_without_a_source() {
    let (status, body) = get_json(app(None, true), "/api/speakers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn page_endpoint_renders_the_configured_content() {
    let (status, body) = get_json(app(None, true), "/api/page").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "PyCon APAC 2026");
    assert_eq!(body["date"], "27-28 February, 2026");
    assert_eq!(body["doors_open"], "9:00AM");
    assert_eq!(body["contents"][0]["slug"], "why-attend-pycon");
    assert_eq!(body["banner"]["title"], "Early bird");
}

#[tokio::test]
async fn page_endpoint_is_not_found_without_content() {
    let (status, _) = get_json(app(None, false), "/api/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn banner_endpoint_returns_the_active_banner() {
    let (status, body) = get_json(app(None, true), "/api/banner").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Early bird");
    assert_eq!(body["call_to_action"], "Get tickets");
}

#[tokio::test]
async fn banner_endpoint_is_null_without_content() {
    let (status, body) = get_json(app(None, false), "/api/banner").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}
