use serde::{Deserialize, Serialize};

/// Identifier of a book in the catalog.
pub type BookId = u64;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, never reused
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// ISBN as supplied by the client
    pub isbn: String,
    /// Whether the book can be lent
    pub available: bool,
}

/// Request model for adding a book. Every field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

/// Query string of the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "ListQuery::first_page")]
    pub page: i64,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl ListQuery {
    fn first_page() -> i64 {
        1
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: Self::first_page(),
            title: None,
            author: None,
        }
    }
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    /// Number of books matching the filters, across all pages
    pub total: usize,
    pub page: i64,
    pub total_pages: usize,
}
