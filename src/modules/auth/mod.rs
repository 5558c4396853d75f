use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use libris_authz::TokenAuthority;
use libris_http::{AppError, AppResult};
use libris_kernel::{InitCtx, Module};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;

use crate::modules::invalid_request;
use crate::modules::members::store::CredentialStore;
use crate::Stores;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Clone)]
struct AuthState {
    members: Arc<CredentialStore>,
    tokens: Arc<TokenAuthority>,
}

/// Login endpoint and the background sweep of expired tokens
pub struct AuthModule {
    state: AuthState,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl AuthModule {
    pub fn new(stores: &Stores) -> Self {
        Self {
            state: AuthState {
                members: Arc::clone(&stores.members),
                tokens: Arc::clone(&stores.tokens),
            },
            sweeper: Mutex::new(None),
        }
    }

    fn take_sweeper(&self) -> Option<JoinHandle<()>> {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn base_path(&self) -> String {
        "/api/login".to_string()
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", post(login))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Exchange credentials for a 24h bearer token",
                        "tags": ["Auth"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/LoginRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Token issued",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/LoginResponse" }
                                    }
                                }
                            },
                            "400": error("Missing credentials"),
                            "401": error("Invalid credentials")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "LoginRequest": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string" },
                            "password": { "type": "string", "format": "password" }
                        },
                        "required": ["username", "password"]
                    },
                    "LoginResponse": {
                        "type": "object",
                        "properties": {
                            "token": { "type": "string" }
                        },
                        "required": ["token"]
                    }
                }
            }
        }))
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let interval_secs = ctx.settings.auth.sweep_interval_secs;
        if interval_secs == 0 {
            tracing::info!(module = self.name(), "token sweep disabled");
            return Ok(());
        }

        let tokens = Arc::clone(&self.state.tokens);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            // First tick fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let purged = tokens.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, remaining = tokens.len(), "expired tokens purged");
                }
            }
        });

        let previous = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }

        tracing::info!(module = self.name(), interval_secs, "auth module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        if let Some(handle) = self.take_sweeper() {
            handle.abort();
        }
        tracing::info!(module = self.name(), "auth module stopped");
        Ok(())
    }
}

async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(request) = payload.map_err(invalid_request)?;
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(AppError::bad_request("Missing credentials").with_code("missing_credentials"));
    };

    let Some(member) = state.members.find_by_credentials(&username, &password) else {
        tracing::info!(username = %username, "login rejected");
        return Err(AppError::unauthorized("Invalid credentials").with_code("invalid_credentials"));
    };

    let token = state.tokens.issue(member.id);
    tracing::info!(member_id = member.id, "member logged in");
    Ok(Json(LoginResponse { token }))
}

/// Create a new instance of the auth module
pub fn create_module(stores: &Stores) -> Arc<dyn Module> {
    Arc::new(AuthModule::new(stores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_kernel::Settings;

    #[tokio::test]
    async fn sweep_can_be_disabled() {
        let stores = Stores::new();
        let module = AuthModule::new(&stores);
        let mut settings = Settings::default();
        settings.auth.sweep_interval_secs = 0;

        module
            .start(&InitCtx {
                settings: &settings,
            })
            .await
            .unwrap();
        assert!(module.take_sweeper().is_none());
    }

    #[tokio::test]
    async fn stop_aborts_the_sweep() {
        let stores = Stores::new();
        let module = AuthModule::new(&stores);
        let settings = Settings::default();

        module
            .start(&InitCtx {
                settings: &settings,
            })
            .await
            .unwrap();
        module.stop().await.unwrap();
        assert!(module.take_sweeper().is_none());
    }
}
