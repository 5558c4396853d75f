pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::FromRef, Router};
use libris_authz::TokenAuthority;
use libris_kernel::{InitCtx, Module};
use serde_json::json;

use crate::Stores;
use store::CatalogStore;

/// Loaded at startup when `catalog.seed_sample_books` is on.
const SAMPLE_BOOKS: [(&str, &str, &str); 2] = [
    ("The Great Gatsby", "F. Scott Fitzgerald", "978-0743273565"),
    ("1984", "George Orwell", "978-0451524935"),
];

/// Handler state: the catalog plus the authority that gates mutations.
#[derive(Clone)]
pub struct BooksState {
    pub catalog: Arc<CatalogStore>,
    pub tokens: Arc<TokenAuthority>,
}

impl FromRef<BooksState> for Arc<TokenAuthority> {
    fn from_ref(state: &BooksState) -> Self {
        Arc::clone(&state.tokens)
    }
}

/// Catalog module: listing, search, and authenticated mutations
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(stores: &Stores) -> Self {
        Self {
            state: BooksState {
                catalog: Arc::clone(&stores.catalog),
                tokens: Arc::clone(&stores.tokens),
            },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.catalog.seed_sample_books && self.state.catalog.is_empty() {
            let seeded = self.state.catalog.seed(SAMPLE_BOOKS);
            tracing::info!(module = self.name(), seeded, "sample books loaded");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = self.state.catalog.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
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
        let book = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });
        let string_query = |name: &str, description: &str| {
            json!({
                "name": name,
                "in": "query",
                "required": false,
                "description": description,
                "schema": { "type": "string" }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "page",
                                "in": "query",
                                "required": false,
                                "description": "1-indexed page of 5 books; out-of-range pages are empty",
                                "schema": { "type": "integer", "format": "int64", "default": 1 }
                            },
                            string_query("title", "Case-insensitive title substring"),
                            string_query("author", "Case-insensitive author substring")
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of matching books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookPage" }
                                    }
                                }
                            },
                            "400": error("Malformed query string")
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "security": [{ "token": [] }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": book("Book added"),
                            "400": error("Missing required fields"),
                            "401": error("Unauthorized")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": book("The book"),
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Update a book; absent fields are kept",
                        "tags": ["Books"],
                        "security": [{ "token": [] }],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": book("Updated book"),
                            "401": error("Unauthorized"),
                            "404": error("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "security": [{ "token": [] }],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "401": error("Unauthorized"),
                            "404": error("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" },
                            "available": { "type": "boolean" }
                        },
                        "required": ["id", "title", "author", "isbn", "available"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" }
                        },
                        "required": ["title", "author", "isbn"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" }
                        }
                    },
                    "BookPage": {
                        "type": "object",
                        "properties": {
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            },
                            "total": { "type": "integer" },
                            "page": { "type": "integer" },
                            "total_pages": { "type": "integer" }
                        },
                        "required": ["books", "total", "page", "total_pages"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(stores: &Stores) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(stores))
}
