use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use libris_authz::AuthenticatedMember;
use libris_http::{AppError, AppResult};

use super::models::{Book, BookId, BookPage, CreateBook, ListQuery, UpdateBook};
use super::BooksState;
use crate::modules::invalid_request;

/// HTTP routes for the catalog, relative to `/api/books`.
pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(list_books).post(add_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(state)
}

/// Non-numeric ids cannot name a book.
fn book_id(path: Result<Path<BookId>, PathRejection>) -> AppResult<BookId> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::not_found("Book not found"))
}

async fn list_books(
    State(state): State<BooksState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<BookPage>> {
    let Query(query) = query.map_err(invalid_request)?;
    Ok(Json(state.catalog.list(&query)))
}

async fn get_book(
    State(state): State<BooksState>,
    path: Result<Path<BookId>, PathRejection>,
) -> AppResult<Json<Book>> {
    let id = book_id(path)?;
    Ok(Json(state.catalog.get(id)?))
}

async fn add_book(
    State(state): State<BooksState>,
    AuthenticatedMember(member_id): AuthenticatedMember,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let Json(request) = payload.map_err(invalid_request)?;
    let book = state.catalog.add(request)?;

    tracing::info!(member_id, book_id = book.id, "book added");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(state): State<BooksState>,
    AuthenticatedMember(member_id): AuthenticatedMember,
    path: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let id = book_id(path)?;
    let Json(changes) = payload.map_err(invalid_request)?;
    let book = state.catalog.update(id, changes)?;

    tracing::info!(member_id, book_id = id, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<BooksState>,
    AuthenticatedMember(member_id): AuthenticatedMember,
    path: Result<Path<BookId>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = book_id(path)?;
    state.catalog.delete(id)?;

    tracing::info!(member_id, book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
