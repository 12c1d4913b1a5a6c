//! End-to-end flow through the dashboard router: sign in, build a segment,
//! send a campaign, ask for copy, sign out.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use crm_core::config::AuthConfig;
use crm_core::types::CampaignType;
use crm_management::dispatch::DeliverySimulator;
use crm_management::{
    management_router, CrmService, InMemoryStore, ManagementState, SessionManager,
    TrustedIdentityProvider,
};
use crm_messaging::{fallback_messages, GenerationError, MessageGenerator, TextGenerationService};
use crm_segmentation::SegmentationEngine;
use serde_json::{json, Value};
use tower::ServiceExt;

struct Unreachable;

#[async_trait]
impl TextGenerationService for Unreachable {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Network("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}

fn app() -> Router {
    let store = Arc::new(InMemoryStore::new(true));
    let service = CrmService::new(
        store.clone(),
        Arc::new(SegmentationEngine::default()),
        MessageGenerator::new(Arc::new(Unreachable)),
        DeliverySimulator::seeded(5),
    );
    let sessions = SessionManager::new(
        Arc::new(TrustedIdentityProvider::new(AuthConfig::default())),
        store,
        24,
    );
    management_router(ManagementState {
        service: Arc::new(service),
        sessions: Arc::new(sessions),
    })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn sign_in(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/sign-in",
        None,
        Some(json!({
            "uid": "firebase-uid-1",
            "displayName": "Asha Rao",
            "email": "asha@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["user"]["avatar_url"],
        "https://ui-avatars.com/api/?name=Asha+Rao&background=4F46E5&color=fff"
    );
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_routes_require_token() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/segments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_auth");

    let (status, body) = send(&app, Method::GET, "/api/v1/segments", Some("crm_forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_sign_in_rejects_incomplete_identity() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/sign-in",
        None,
        Some(json!({ "uid": "", "email": "asha@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_failed");
}

#[tokio::test]
async fn test_segment_and_campaign_flow() {
    let app = app();
    let token = sign_in(&app).await;
    let token = Some(token.as_str());

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/session", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "asha@example.com");

    // Empty condition value is rejected before anything is stored.
    let invalid = json!({
        "name": "VIP",
        "logic_operator": "AND",
        "conditions": [{ "field": "total_spent", "operator": "greater_than", "value": "" }]
    });
    let (status, body) = send(&app, Method::POST, "/api/v1/segments/preview", token, Some(invalid.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "All condition values must be filled");
    let (status, _) = send(&app, Method::POST, "/api/v1/segments", token, Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let vip = json!({
        "name": "VIP",
        "logic_operator": "AND",
        "conditions": [{ "field": "total_spent", "operator": "greater_than", "value": "10000" }]
    });
    let (status, body) = send(&app, Method::POST, "/api/v1/segments/preview", token, Some(vip.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let n = body["audience_count"].as_u64().unwrap();
    assert!((50..=549).contains(&n));

    let mut forged = vip.clone();
    forged["preview_count"] = json!(9_999_999);
    let (status, body) = send(&app, Method::POST, "/api/v1/segments", token, Some(forged)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let mut create = vip.clone();
    create["preview_count"] = json!(n);
    let (status, segment) = send(&app, Method::POST, "/api/v1/segments", token, Some(create)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(segment["name"], "VIP");
    assert_eq!(segment["estimated_count"], n);

    let (_, segments) = send(&app, Method::GET, "/api/v1/segments", token, None).await;
    let segments = segments.as_array().unwrap();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[0]["id"], segment["id"]);

    let segment_id = segment["id"].as_str().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/segments/{segment_id}"), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["estimated_count"], n);

    let (status, campaign) = send(
        &app,
        Method::POST,
        "/api/v1/campaigns",
        token,
        Some(json!({
            "name": "VIP thank-you",
            "segment_id": segment_id,
            "message": "Thank you, [Customer Name]!"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(campaign["audience_size"], n);
    assert_eq!(campaign["sent_count"], n);
    let delivered = campaign["delivered_count"].as_u64().unwrap();
    let failed = campaign["failed_count"].as_u64().unwrap();
    assert_eq!(delivered + failed, n);
    assert_eq!(campaign["segment_name"], "VIP");
    assert_eq!(campaign["preview"], "Thank you, Asha Rao!");

    let (_, campaigns) = send(&app, Method::GET, "/api/v1/campaigns", token, None).await;
    assert_eq!(campaigns[0]["id"], campaign["id"]);
    assert!(campaigns[0]["delivery_rate"].as_f64().unwrap() > 90.0);
}

#[tokio::test]
async fn test_malformed_requests_get_error_bodies() {
    let app = app();
    let token = sign_in(&app).await;
    let token = Some(token.as_str());

    let missing = format!("/api/v1/segments/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &missing, token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = send(&app, Method::GET, "/api/v1/segments/not-a-uuid", token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let unknown_field = json!({
        "name": "Adults",
        "conditions": [{ "field": "age", "operator": "greater_than", "value": "18" }]
    });
    let (status, body) = send(&app, Method::POST, "/api/v1/segments/preview", token, Some(unknown_field)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("age"));

    let numeric_value = json!({
        "name": "Buyers",
        "conditions": [{ "field": "purchases", "operator": "greater_than", "value": 3 }]
    });
    let (status, body) = send(&app, Method::POST, "/api/v1/segments", token, Some(numeric_value)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_campaign_validation_errors() {
    let app = app();
    let token = sign_in(&app).await;
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/campaigns",
        token,
        Some(json!({ "name": "Promo", "message": "Hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please select a segment.");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/campaigns",
        token,
        Some(json!({
            "name": "Promo",
            "segment_id": "00000000-0000-0000-0000-000000000000",
            "message": "Hi"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generation_falls_back_when_unreachable() {
    let app = app();
    let token = sign_in(&app).await;
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/messages/generate",
        token,
        Some(json!({ "objective": "win-back offer", "campaign_type": "win-back" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["messages"], json!(fallback_messages(CampaignType::WinBack)));

    let (_, segments) = send(&app, Method::GET, "/api/v1/segments", token, None).await;
    let new_customers = segments
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "New Customers")
        .unwrap()
        .clone();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/campaigns/suggest-message",
        token,
        Some(json!({ "segment_id": new_customers["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["campaign_type"], "new-products");
    assert_eq!(body["selected"], fallback_messages(CampaignType::NewProducts)[0]);
}

#[tokio::test]
async fn test_dashboard_and_sign_out() {
    let app = app();
    let token = sign_in(&app).await;

    let (status, stats) = send(&app, Method::GET, "/api/v1/dashboard/statistics", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["customers"], 1284);
    let (_, recent) = send(&app, Method::GET, "/api/v1/dashboard/recent-campaigns", Some(&token), None).await;
    assert_eq!(recent.as_array().unwrap().len(), 3);
    assert_eq!(recent[0]["date"], "2025-05-01");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/segments",
        Some(&token),
        Some(json!({
            "name": "Frequent visitors",
            "logic_operator": "OR",
            "conditions": [
                { "field": "visit_count", "operator": "greater_than", "value": "20" },
                { "field": "purchases", "operator": "greater_than", "value": "5" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::POST, "/api/v1/auth/sign-out", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/v1/segments", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = sign_in(&app).await;
    let (_, segments) = send(&app, Method::GET, "/api/v1/segments", Some(&token), None).await;
    assert_eq!(segments.as_array().unwrap().len(), 3);
}
