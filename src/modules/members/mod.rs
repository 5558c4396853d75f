pub mod models;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use libris_http::AppResult;
use libris_kernel::{InitCtx, Module};
use serde_json::json;

use crate::modules::invalid_request;
use crate::Stores;
use models::{Member, NewMember};
use store::CredentialStore;

/// Members module: self-service registration
pub struct MembersModule {
    members: Arc<CredentialStore>,
}

impl MembersModule {
    pub fn new(stores: &Stores) -> Self {
        Self {
            members: Arc::clone(&stores.members),
        }
    }
}

#[async_trait]
impl Module for MembersModule {
    fn name(&self) -> &'static str {
        "members"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "members module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", post(register_member))
            .with_state(Arc::clone(&self.members))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Register a member",
                        "tags": ["Members"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewMember" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Member registered",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Member" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing required fields or username taken",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Member": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "username": { "type": "string" },
                            "email": { "type": "string" }
                        },
                        "required": ["id", "username", "email"]
                    },
                    "NewMember": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string" },
                            "password": { "type": "string", "format": "password" },
                            "email": { "type": "string" }
                        },
                        "required": ["username", "password", "email"]
                    }
                }
            }
        }))
    }
}

async fn register_member(
    State(members): State<Arc<CredentialStore>>,
    payload: Result<Json<NewMember>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let Json(request) = payload.map_err(invalid_request)?;
    let member = members.register(request)?;

    tracing::info!(member_id = member.id, username = %member.username, "member registered");
    Ok((StatusCode::CREATED, Json(member)))
}

/// Create a new instance of the members module
pub fn create_module(stores: &Stores) -> Arc<dyn Module> {
    Arc::new(MembersModule::new(stores))
}
