//! In-memory catalog.

use std::sync::{Mutex, MutexGuard, PoisonError};

use libris_http::AppError;
use thiserror::Error;

use super::models::{Book, BookId, BookPage, CreateBook, ListQuery, UpdateBook};
use crate::utils;

/// Fixed listing window.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("missing required fields")]
    MissingFields,

    #[error("book {0} not found")]
    NotFound(BookId),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::MissingFields => {
                AppError::bad_request("Missing required fields").with_code("missing_fields")
            }
            CatalogError::NotFound(_) => AppError::not_found("Book not found"),
        }
    }
}

#[derive(Default)]
struct Shelf {
    books: Vec<Book>,
    last_id: BookId,
}

/// Books in insertion order behind a single guard. Ids come from a counter
/// that only grows, so a deleted id is never handed out again.
#[derive(Default)]
pub struct CatalogStore {
    shelf: Mutex<Shelf>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn shelf(&self) -> MutexGuard<'_, Shelf> {
        self.shelf.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Filter by case-insensitive substrings (both must match), then cut
    /// out the requested page.
    pub fn list(&self, query: &ListQuery) -> BookPage {
        let title = needle(query.title.as_deref());
        let author = needle(query.author.as_deref());

        let matching: Vec<Book> = self
            .shelf()
            .books
            .iter()
            .filter(|book| contains(&book.title, title.as_deref()))
            .filter(|book| contains(&book.author, author.as_deref()))
            .cloned()
            .collect();

        BookPage {
            total: matching.len(),
            total_pages: utils::page_count(matching.len(), PAGE_SIZE),
            books: utils::paginate(&matching, query.page, PAGE_SIZE),
            page: query.page,
        }
    }

    pub fn get(&self, id: BookId) -> Result<Book, CatalogError> {
        self.shelf()
            .books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    /// Append a new, available book. Empty strings are accepted; absent
    /// fields are not.
    pub fn add(&self, request: CreateBook) -> Result<Book, CatalogError> {
        let (Some(title), Some(author), Some(isbn)) = (request.title, request.author, request.isbn)
        else {
            return Err(CatalogError::MissingFields);
        };

        let mut shelf = self.shelf();
        shelf.last_id += 1;
        let book = Book {
            id: shelf.last_id,
            title,
            author,
            isbn,
            available: true,
        };
        shelf.books.push(book.clone());
        Ok(book)
    }

    /// Merge the supplied fields into book `id`.
    pub fn update(&self, id: BookId, changes: UpdateBook) -> Result<Book, CatalogError> {
        let mut shelf = self.shelf();
        let book = shelf
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        if let Some(title) = changes.title {
            book.title = title;
        }
        if let Some(author) = changes.author {
            book.author = author;
        }
        if let Some(isbn) = changes.isbn {
            book.isbn = isbn;
        }
        Ok(book.clone())
    }

    pub fn delete(&self, id: BookId) -> Result<(), CatalogError> {
        let mut shelf = self.shelf();
        let position = shelf
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CatalogError::NotFound(id))?;
        shelf.books.remove(position);
        Ok(())
    }

    /// Add `(title, author, isbn)` entries, returning how many were added.
    pub fn seed<I, S>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        entries
            .into_iter()
            .filter_map(|(title, author, isbn)| {
                self.add(CreateBook {
                    title: Some(title.into()),
                    author: Some(author.into()),
                    isbn: Some(isbn.into()),
                })
                .ok()
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.shelf().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lowercased filter, with empty strings treated as no filter.
fn needle(filter: Option<&str>) -> Option<String> {
    filter
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

fn contains(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(needle),
        None => true,
    }
}
