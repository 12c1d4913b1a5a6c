//! Dashboard API router: mounts all endpoints under /api/v1.

use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use crm_core::config::{AppConfig, EstimatorKind};
use crm_core::{CrmError, CrmResult};
use crm_messaging::{GeminiClient, MessageGenerator};
use crm_segmentation::{
    AudienceEstimator, MockAudienceEstimator, PredicateAudienceEstimator, SegmentationEngine,
};
use tracing::{info, warn};

use crate::auth::{auth_middleware, SessionManager, TrustedIdentityProvider};
use crate::dispatch::DeliverySimulator;
use crate::handlers::{self, ManagementState};
use crate::service::CrmService;
use crate::store::InMemoryStore;

impl ManagementState {
    /// Wire the store, evaluator, generator and session manager from config.
    pub fn from_config(config: &AppConfig) -> CrmResult<Self> {
        let store = Arc::new(InMemoryStore::new(config.store.seed_demo_data));

        let estimator: Arc<dyn AudienceEstimator> = match config.segmentation.estimator {
            EstimatorKind::Mock => Arc::new(MockAudienceEstimator::new()),
            EstimatorKind::Predicate => Arc::new(PredicateAudienceEstimator::new(store.clone())),
        };
        let engine = Arc::new(SegmentationEngine::new(estimator));

        let gemini = GeminiClient::new(&config.gemini)
            .map_err(|e| CrmError::Config(format!("gemini client: {e}")))?;
        if !gemini.has_api_key() {
            warn!("No Gemini API key configured; message generation will use fallback copy");
        }
        let generator = MessageGenerator::new(Arc::new(gemini));

        let service = CrmService::new(store.clone(), engine, generator, DeliverySimulator::new())
            .with_latency(Duration::from_millis(config.store.simulated_latency_ms));

        let sessions = SessionManager::new(
            Arc::new(TrustedIdentityProvider::new(config.auth.clone())),
            store,
            config.auth.session_ttl_hours,
        );

        info!(
            estimator = ?config.segmentation.estimator,
            latency_ms = config.store.simulated_latency_ms,
            "Management state initialized"
        );

        Ok(Self {
            service: Arc::new(service),
            sessions: Arc::new(sessions),
        })
    }
}

/// Build the dashboard router. Everything except sign-in requires a
/// bearer token.
pub fn management_router(state: ManagementState) -> Router {
    let protected = Router::new()
        // Auth
        .route("/api/v1/auth/sign-out", post(handlers::sign_out))
        .route("/api/v1/auth/session", get(handlers::current_session))
        // Dashboard
        .route("/api/v1/dashboard/statistics", get(handlers::dashboard_statistics))
        .route("/api/v1/dashboard/recent-campaigns", get(handlers::recent_campaigns))
        // Segments
        .route("/api/v1/segments", get(handlers::list_segments).post(handlers::create_segment))
        .route("/api/v1/segments/preview", post(handlers::preview_segment))
        .route("/api/v1/segments/:id", get(handlers::get_segment))
        // Campaigns
        .route("/api/v1/campaigns", get(handlers::list_campaigns).post(handlers::create_campaign))
        .route("/api/v1/campaigns/suggest-message", post(handlers::suggest_message))
        // Message generation
        .route("/api/v1/messages/generate", post(handlers::generate_messages))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/api/v1/auth/sign-in", post(handlers::sign_in))
        .merge(protected)
        .with_state(state)
}
