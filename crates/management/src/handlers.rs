//! Axum REST handlers for the dashboard API.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use crm_core::types::{DashboardStatistics, GenerationResult, RecentCampaign, Segment, UserProfile};
use crm_core::CrmError;
use crm_segmentation::{SegmentDefinition, SegmentDraft};
use tracing::warn;
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, SessionManager};
use crate::dispatch::personalize;
use crate::models::*;
use crate::service::CrmService;

/// Shared management state.
#[derive(Clone)]
pub struct ManagementState {
    pub service: Arc<CrmService>,
    pub sessions: Arc<SessionManager>,
}

/// `CrmError` rendered as an HTTP error body.
pub struct ApiError(pub CrmError);

impl From<CrmError> for ApiError {
    fn from(e: CrmError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CrmError::Validation(_) => {
                metrics::counter!("api.validation_errors").increment(1);
                StatusCode::BAD_REQUEST
            }
            CrmError::NotFound(_) => StatusCode::NOT_FOUND,
            CrmError::Auth(_) => StatusCode::UNAUTHORIZED,
            CrmError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            CrmError::Config(_) | CrmError::Serialization(_) | CrmError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            warn!(error = %self.0, "Request failed");
        }
        let message = match &self.0 {
            CrmError::Validation(msg) | CrmError::NotFound(msg) | CrmError::Auth(msg) => msg.clone(),
            other => other.to_string(),
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.code().to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(CrmError::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(CrmError::validation(rejection.body_text()))
    }
}

/// JSON body extractor whose rejections render as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections render as [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

type ApiResult<T> = Result<T, ApiError>;

// ─── Auth ──────────────────────────────────────────────────────────────────

pub async fn sign_in(
    State(state): State<ManagementState>,
    ApiJson(assertion): ApiJson<IdentityAssertion>,
) -> ApiResult<Json<SignInResponse>> {
    Ok(Json(state.sessions.sign_in(assertion).await?))
}

pub async fn sign_out(
    State(state): State<ManagementState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    state.sessions.sign_out(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_session(Extension(auth): Extension<AuthenticatedUser>) -> Json<UserProfile> {
    Json(auth.user)
}

// ─── Dashboard ─────────────────────────────────────────────────────────────

pub async fn dashboard_statistics(State(state): State<ManagementState>) -> Json<DashboardStatistics> {
    Json(state.service.store().dashboard_statistics())
}

pub async fn recent_campaigns(State(state): State<ManagementState>) -> Json<Vec<RecentCampaign>> {
    Json(state.service.store().recent_campaigns())
}

// ─── Segments ──────────────────────────────────────────────────────────────

pub async fn list_segments(State(state): State<ManagementState>) -> Json<Vec<Segment>> {
    Json(state.service.list_segments().await)
}

pub async fn get_segment(
    State(state): State<ManagementState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Segment>> {
    let segment = state
        .service
        .store()
        .get_segment(id)
        .ok_or_else(|| CrmError::NotFound(format!("Segment {id} not found")))?;
    Ok(Json(segment))
}

pub async fn preview_segment(
    State(state): State<ManagementState>,
    ApiJson(definition): ApiJson<SegmentDefinition>,
) -> ApiResult<Json<PreviewSegmentResponse>> {
    let audience_count = state.service.preview_segment(&definition).await?;
    Ok(Json(PreviewSegmentResponse { audience_count }))
}

pub async fn create_segment(
    State(state): State<ManagementState>,
    ApiJson(req): ApiJson<CreateSegmentRequest>,
) -> ApiResult<(StatusCode, Json<Segment>)> {
    let draft = SegmentDraft::submitted(req.definition, req.preview_count)?;
    let segment = state.service.create_segment(&draft).await?;
    Ok((StatusCode::CREATED, Json(segment)))
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

pub async fn list_campaigns(State(state): State<ManagementState>) -> Json<Vec<CampaignView>> {
    Json(
        state
            .service
            .list_campaigns()
            .await
            .into_iter()
            .map(CampaignView::from)
            .collect(),
    )
}

pub async fn create_campaign(
    State(state): State<ManagementState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ApiJson(req): ApiJson<CreateCampaignRequest>,
) -> ApiResult<(StatusCode, Json<CreateCampaignResponse>)> {
    let campaign = state.service.create_campaign(&req).await?;
    let preview = personalize(&campaign.message_template, &auth.user.name);
    Ok((
        StatusCode::CREATED,
        Json(CreateCampaignResponse {
            campaign: campaign.into(),
            preview,
        }),
    ))
}

pub async fn suggest_message(
    State(state): State<ManagementState>,
    ApiJson(req): ApiJson<SuggestMessageRequest>,
) -> ApiResult<Json<SuggestMessageResponse>> {
    let (campaign_type, result) = state.service.suggest_message(req.segment_id).await?;
    let selected = result.messages.first().cloned().unwrap_or_default();
    Ok(Json(SuggestMessageResponse {
        campaign_type,
        selected,
        result,
    }))
}

// ─── Message generation ────────────────────────────────────────────────────

pub async fn generate_messages(
    State(state): State<ManagementState>,
    ApiJson(req): ApiJson<GenerateMessagesRequest>,
) -> Json<GenerationResult> {
    Json(
        state
            .service
            .generate_messages(&req.objective, &req.campaign_type)
            .await,
    )
}
