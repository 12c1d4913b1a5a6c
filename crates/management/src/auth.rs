//! Session lifecycle and bearer token authentication.
//!
//! Sign-in is delegated to an external identity provider; the dashboard
//! posts the identity it received and gets a bearer token back. The
//! [`SessionManager`] owns the current user and publishes changes on a
//! watch channel. Sign-out clears the session's in-memory data.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use crm_core::config::AuthConfig;
use crm_core::types::UserProfile;
use crm_core::{CrmError, CrmResult};
use dashmap::DashMap;
use rand::Rng;
use tokio::sync::watch;
use tracing::{info, warn};
use url::Url;

use crate::models::{ErrorResponse, IdentityAssertion, SignInResponse};
use crate::store::CrmRepository;

const TOKEN_PREFIX: &str = "crm_";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, assertion: IdentityAssertion) -> CrmResult<UserProfile>;

    async fn sign_out(&self, user: &UserProfile) -> CrmResult<()>;
}

/// Accepts the identity the dashboard obtained from the provider's popup
/// flow as-is. Development only: nothing is verified beyond presence.
pub struct TrustedIdentityProvider {
    config: AuthConfig,
}

impl TrustedIdentityProvider {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityProvider for TrustedIdentityProvider {
    async fn sign_in(&self, assertion: IdentityAssertion) -> CrmResult<UserProfile> {
        let uid = assertion.uid.trim();
        if uid.is_empty() {
            return Err(CrmError::Auth("Identity provider returned no user id".to_string()));
        }
        let email = assertion
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| CrmError::Auth("Identity provider returned no email".to_string()))?;
        let name = assertion
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(email);

        let avatar_url = match assertion.photo_url.filter(|p| !p.trim().is_empty()) {
            Some(photo) => photo,
            None => avatar_url(&self.config, name)?,
        };

        Ok(UserProfile {
            id: uid.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar_url,
        })
    }

    async fn sign_out(&self, _user: &UserProfile) -> CrmResult<()> {
        Ok(())
    }
}

/// Deterministic avatar URL derived from a display name.
pub fn avatar_url(config: &AuthConfig, name: &str) -> CrmResult<String> {
    let url = Url::parse_with_params(
        &config.avatar_base_url,
        &[
            ("name", name),
            ("background", config.avatar_background.as_str()),
            ("color", config.avatar_color.as_str()),
        ],
    )
    .map_err(|e| CrmError::Config(format!("invalid avatar base url: {e}")))?;
    Ok(url.into())
}

#[derive(Debug, Clone)]
struct SessionEntry {
    user: UserProfile,
    expires_at: DateTime<Utc>,
}

/// User attached to an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub token: String,
    pub user: UserProfile,
}

/// Application-state container for the signed-in session.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn CrmRepository>,
    tokens: DashMap<String, SessionEntry>,
    current: watch::Sender<Option<UserProfile>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn CrmRepository>,
        ttl_hours: i64,
    ) -> Self {
        let (current, _) = watch::channel(None);
        let ttl = Duration::try_hours(ttl_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .unwrap_or_else(|| {
                warn!(ttl_hours, "Session TTL out of range, using default");
                Duration::hours(DEFAULT_SESSION_TTL_HOURS)
            });
        Self {
            provider,
            store,
            tokens: DashMap::new(),
            current,
            ttl,
        }
    }

    /// Sign in through the identity provider and issue a bearer token.
    /// On failure the session is left signed out.
    pub async fn sign_in(&self, assertion: IdentityAssertion) -> CrmResult<SignInResponse> {
        let user = match self.provider.sign_in(assertion).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                metrics::counter!("management.auth.failures").increment(1);
                self.current.send_replace(None);
                return Err(e);
            }
        };

        let now = Utc::now();
        self.tokens.retain(|_, entry| entry.expires_at > now);

        let token = generate_token();
        let expires_at = now + self.ttl;
        self.tokens.insert(
            token.clone(),
            SessionEntry {
                user: user.clone(),
                expires_at,
            },
        );
        self.current.send_replace(Some(user.clone()));
        info!(user_id = %user.id, "User signed in");

        Ok(SignInResponse {
            token,
            user,
            expires_at,
        })
    }

    /// Revoke the token, notify subscribers and reset session data.
    pub async fn sign_out(&self, token: &str) -> CrmResult<()> {
        let (_, entry) = self
            .tokens
            .remove(token)
            .ok_or_else(|| CrmError::Auth("Session not found".to_string()))?;
        self.provider.sign_out(&entry.user).await?;
        self.current.send_replace(None);
        self.store.reset();
        info!(user_id = %entry.user.id, "User signed out");
        Ok(())
    }

    /// Resolve a bearer token to its user. Expired tokens are dropped.
    pub fn authorize(&self, token: &str) -> Option<UserProfile> {
        let entry = self.tokens.get(token)?.clone();
        if entry.expires_at <= Utc::now() {
            self.tokens.remove(token);
            return None;
        }
        Some(entry.user)
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.current.borrow().clone()
    }

    /// Receive a notification whenever the signed-in user changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.current.subscribe()
    }
}

/// Generate a random bearer token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    format!(
        "{}{}",
        TOKEN_PREFIX,
        bytes.iter().map(|b| format!("{:02x}", b)).collect::<String>()
    )
}

/// Axum middleware that requires a valid bearer token and attaches the
/// [`AuthenticatedUser`] to the request.
pub async fn auth_middleware(
    State(sessions): State<Arc<SessionManager>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        return unauthorized("missing_auth", "Authorization header with Bearer token required");
    };

    match sessions.authorize(&token) {
        Some(user) => {
            req.extensions_mut().insert(AuthenticatedUser { token, user });
            next.run(req).await
        }
        None => unauthorized("invalid_token", "Invalid or expired bearer token"),
    }
}

fn unauthorized(error: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}
