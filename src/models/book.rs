//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Copy counts for a catalog entry. `available` never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copies {
    pub total: u32,
    pub available: u32,
}

/// Full book model as served by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copies: Option<Copies>,
}

impl Book {
    /// Case-insensitive substring match over title, author, description
    /// and genre. A blank query matches nothing.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.title.to_lowercase().contains(&needle)
            || self.author.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .genre
                .as_deref()
                .map(|g| g.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }

    /// Available copy count, when the catalog reports one.
    pub fn available_copies(&self) -> Option<u32> {
        self.copies.map(|c| c.available)
    }

    /// Copy of this book with one copy taken, for optimistic display
    /// while a borrow commit is in flight.
    pub fn with_copy_taken(&self) -> Book {
        let mut book = self.clone();
        if let Some(copies) = &mut book.copies {
            copies.available = copies.available.saturating_sub(1);
        }
        book
    }

    /// Copy of this book with one copy restored, capped at the total.
    pub fn with_copy_restored(&self) -> Book {
        let mut book = self.clone();
        if let Some(copies) = &mut book.copies {
            copies.available = copies.available.saturating_add(1).min(copies.total);
        }
        book
    }
}

/// New or updated book submitted through the catalog forms
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
    #[validate(range(min = 1, message = "At least one copy is required"))]
    pub total_copies: u32,
}

/// Wire payload for book creation and update. Creation reports every
/// copy as available; updates leave the availability count to the
/// service, which tracks open borrows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub copies: CopiesPayload,
}

#[derive(Debug, Serialize)]
pub struct CopiesPayload {
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,
}

impl BookPayload {
    pub fn for_create(draft: &BookDraft) -> Self {
        Self::from_draft(draft, Some(draft.total_copies))
    }

    pub fn for_update(draft: &BookDraft) -> Self {
        Self::from_draft(draft, None)
    }

    fn from_draft(draft: &BookDraft, available: Option<u32>) -> Self {
        Self {
            title: draft.title.clone(),
            author: draft.author.clone(),
            description: draft.description.clone(),
            cover_image: draft.cover_image.clone(),
            published_year: draft.published_year,
            genre: draft.genre.clone(),
            copies: CopiesPayload {
                total: draft.total_copies,
                available,
            },
        }
    }
}
