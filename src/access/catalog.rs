//! Catalog access: books, search and borrow records

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::book::{Book, BookDraft, BookPayload};
use crate::models::borrow::BorrowRecord;

use super::http::ApiClient;

/// Contract of the catalog side of the library service.
///
/// Searching with a blank query resolves to an empty list locally;
/// everything else is a remote call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogAccess: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<Vec<Book>>;
    async fn create_book(&self, draft: &BookDraft) -> AppResult<Book>;
    async fn update_book(&self, id: &str, draft: &BookDraft) -> AppResult<Book>;
    async fn delete_book(&self, id: &str) -> AppResult<()>;
    // Circulation reads and returns ride on the catalog API
    async fn list_borrows(&self) -> AppResult<Vec<BorrowRecord>>;
    async fn return_borrow(&self, borrow_id: &str) -> AppResult<BorrowRecord>;
    async fn list_borrow_records(&self) -> AppResult<Vec<BorrowRecord>>;
    async fn member_borrow_records(&self, member_id: &str) -> AppResult<Vec<BorrowRecord>>;
}

/// Catalog access over the HTTP JSON API
#[derive(Debug, Clone)]
pub struct HttpCatalogAccess {
    client: ApiClient,
}

impl HttpCatalogAccess {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogAccess for HttpCatalogAccess {
    async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.client
            .get_json_with_query("/search", &[("q", query)])
            .await
    }

    async fn create_book(&self, draft: &BookDraft) -> AppResult<Book> {
        self.client
            .post_json("/books", &BookPayload::for_create(draft))
            .await
    }

    async fn update_book(&self, id: &str, draft: &BookDraft) -> AppResult<Book> {
        self.client
            .put_json(&format!("/books/{}", id), &BookPayload::for_update(draft))
            .await
    }

    async fn delete_book(&self, id: &str) -> AppResult<()> {
        self.client.delete(&format!("/books/{}", id)).await
    }

    async fn list_borrows(&self) -> AppResult<Vec<BorrowRecord>> {
        self.client.get_json("/borrows").await
    }

    async fn return_borrow(&self, borrow_id: &str) -> AppResult<BorrowRecord> {
        self.client
            .patch_json(&format!("/borrows/{}/return", borrow_id))
            .await
    }

    async fn list_borrow_records(&self) -> AppResult<Vec<BorrowRecord>> {
        self.client.get_json("/borrow-records").await
    }

    async fn member_borrow_records(&self, member_id: &str) -> AppResult<Vec<BorrowRecord>> {
        self.client
            .get_json(&format!("/borrow-records/member/{}", member_id))
            .await
    }
}
