//! Catalog management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    access::CatalogAccess,
    error::{AppError, AppResult},
    models::book::{Book, BookDraft},
};

#[derive(Clone)]
pub struct CatalogService {
    access: Arc<dyn CatalogAccess>,
}

impl CatalogService {
    pub fn new(access: Arc<dyn CatalogAccess>) -> Self {
        Self { access }
    }

    /// Search the catalog. A blank query resolves to no results without
    /// touching the service.
    pub async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.access.search(query).await
    }

    /// Create a new catalog entry
    pub async fn create_book(&self, draft: &BookDraft) -> AppResult<Book> {
        Self::validate_draft(draft)?;
        let book = self.access.create_book(draft).await?;
        tracing::info!(book_id = %book.id, title = %book.title, "catalog entry created");
        Ok(book)
    }

    /// Update an existing catalog entry
    pub async fn update_book(&self, id: &str, draft: &BookDraft) -> AppResult<Book> {
        Self::validate_draft(draft)?;
        let book = self.access.update_book(id, draft).await?;
        tracing::info!(book_id = %book.id, "catalog entry updated");
        Ok(book)
    }

    /// Remove a catalog entry
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        self.access.delete_book(id).await?;
        tracing::info!(book_id = %id, "catalog entry deleted");
        Ok(())
    }

    /// Filter already-fetched books the same way the remote search does.
    pub fn filter_books(books: &[Book], query: &str) -> Vec<Book> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        books
            .iter()
            .filter(|b| b.matches_query(query))
            .cloned()
            .collect()
    }

    fn validate_draft(draft: &BookDraft) -> AppResult<()> {
        draft
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let cover = draft.cover_image.trim();
        if !cover.is_empty() && !cover.starts_with("http://") && !cover.starts_with("https://") {
            return Err(AppError::Validation(
                "Cover image must be a URL or left empty".to_string(),
            ));
        }
        Ok(())
    }
}
