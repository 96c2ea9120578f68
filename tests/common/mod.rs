//! In-memory stand-in for the remote library service.
//!
//! Implements both access traits over a shared store with the same
//! observable behaviour as the real routes: copy counts move on
//! borrow and return, commits are refused for banned members and
//! drained books, and misses come back as not-found errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use liseuse_client::access::{CatalogAccess, MembershipAccess};
use liseuse_client::config::LendingConfig;
use liseuse_client::error::{AppError, AppResult};
use liseuse_client::models::{
    Book, BookDraft, BorrowRecord, Copies, CommitPayload, Member, MemberDraft, ReservationRecord,
};
use liseuse_client::services::Services;
use liseuse_client::workflow::LendingEngine;

struct Store {
    books: Vec<Book>,
    members: Vec<Member>,
    borrows: Vec<BorrowRecord>,
    reservations: Vec<ReservationRecord>,
    book_seq: u32,
    member_seq: u32,
    borrow_seq: u32,
    reservation_seq: u32,
}

impl Store {
    fn member(&self, id: &str) -> AppResult<Member> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))
    }

    fn book_index(&self, id: &str) -> AppResult<usize> {
        self.books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }
}

#[derive(Clone)]
pub struct InMemoryLibrary {
    store: Arc<Mutex<Store>>,
    fail_lists: Arc<AtomicBool>,
}

impl InMemoryLibrary {
    pub fn seeded() -> Self {
        let books = vec![
            Book {
                id: "BOOK-1".to_string(),
                title: "The Great Gatsby".to_string(),
                author: "F. Scott Fitzgerald".to_string(),
                description: "A portrait of wealth and longing in the Jazz Age".to_string(),
                cover_image: String::new(),
                published_year: Some(1925),
                genre: Some("Classic".to_string()),
                copies: Some(Copies {
                    total: 3,
                    available: 2,
                }),
            },
            Book {
                id: "BOOK-2".to_string(),
                title: "To Kill a Mockingbird".to_string(),
                author: "Harper Lee".to_string(),
                description: "A childhood in Maycomb and a trial that divides it".to_string(),
                cover_image: String::new(),
                published_year: Some(1960),
                genre: Some("Classic".to_string()),
                copies: Some(Copies {
                    total: 2,
                    available: 0,
                }),
            },
            Book {
                id: "BOOK-3".to_string(),
                title: "Nineteen Eighty-Four".to_string(),
                author: "George Orwell".to_string(),
                description: "Surveillance, truth and the rewriting of both".to_string(),
                cover_image: String::new(),
                published_year: Some(1949),
                genre: Some("Dystopia".to_string()),
                copies: Some(Copies {
                    total: 1,
                    available: 0,
                }),
            },
        ];
        let members = vec![
            Member {
                id: "USER-1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: Some("ada@example.org".to_string()),
                phone: Some("0123456789".to_string()),
                join_date: Utc::now() - Duration::days(400),
                is_banned: false,
            },
            Member {
                id: "USER-2".to_string(),
                first_name: "Basile".to_string(),
                last_name: "Fermier".to_string(),
                email: Some("basile@example.org".to_string()),
                phone: None,
                join_date: Utc::now() - Duration::days(30),
                is_banned: true,
            },
        ];
        Self {
            store: Arc::new(Mutex::new(Store {
                books,
                members,
                borrows: Vec::new(),
                reservations: Vec::new(),
                book_seq: 4,
                member_seq: 3,
                borrow_seq: 1,
                reservation_seq: 1,
            })),
            fail_lists: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every list route answer 503 until further notice.
    pub fn poison_lists(&self) {
        self.fail_lists.store(true, Ordering::SeqCst);
    }

    pub fn available_copies(&self, book_id: &str) -> Option<u32> {
        let store = self.store.lock().unwrap();
        store
            .books
            .iter()
            .find(|b| b.id == book_id)
            .and_then(Book::available_copies)
    }

    pub fn book(&self, book_id: &str) -> Book {
        let store = self.store.lock().unwrap();
        store
            .books
            .iter()
            .find(|b| b.id == book_id)
            .cloned()
            .unwrap()
    }

    pub fn borrow_count(&self) -> usize {
        self.store.lock().unwrap().borrows.len()
    }

    pub fn reservation_count(&self) -> usize {
        self.store.lock().unwrap().reservations.len()
    }

    pub fn member_count(&self) -> usize {
        self.store.lock().unwrap().members.len()
    }

    fn lists_poisoned(&self) -> AppResult<()> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AppError::Remote {
                status: 503,
                message: "Service temporarily unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogAccess for InMemoryLibrary {
    async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .books
            .iter()
            .filter(|b| b.matches_query(query))
            .cloned()
            .collect())
    }

    async fn create_book(&self, draft: &BookDraft) -> AppResult<Book> {
        let mut store = self.store.lock().unwrap();
        let id = format!("BOOK-{}", store.book_seq);
        store.book_seq += 1;
        let book = Book {
            id,
            title: draft.title.clone(),
            author: draft.author.clone(),
            description: draft.description.clone(),
            cover_image: draft.cover_image.clone(),
            published_year: draft.published_year,
            genre: draft.genre.clone(),
            copies: Some(Copies {
                total: draft.total_copies,
                available: draft.total_copies,
            }),
        };
        store.books.push(book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: &str, draft: &BookDraft) -> AppResult<Book> {
        let mut store = self.store.lock().unwrap();
        let index = store.book_index(id)?;
        let book = &mut store.books[index];
        book.title = draft.title.clone();
        book.author = draft.author.clone();
        book.description = draft.description.clone();
        book.cover_image = draft.cover_image.clone();
        book.published_year = draft.published_year;
        book.genre = draft.genre.clone();
        book.copies = Some(match book.copies {
            Some(copies) => Copies {
                total: draft.total_copies,
                available: copies.available.min(draft.total_copies),
            },
            None => Copies {
                total: draft.total_copies,
                available: draft.total_copies,
            },
        });
        Ok(book.clone())
    }

    async fn delete_book(&self, id: &str) -> AppResult<()> {
        let mut store = self.store.lock().unwrap();
        let index = store.book_index(id)?;
        store.books.remove(index);
        Ok(())
    }

    async fn list_borrows(&self) -> AppResult<Vec<BorrowRecord>> {
        self.lists_poisoned()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .borrows
            .iter()
            .filter(|b| b.return_date.is_none())
            .cloned()
            .collect())
    }

    async fn return_borrow(&self, borrow_id: &str) -> AppResult<BorrowRecord> {
        let mut store = self.store.lock().unwrap();
        let index = store
            .borrows
            .iter()
            .position(|b| b.id == borrow_id && b.return_date.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Borrow {} not found", borrow_id)))?;

        let book_id = store.borrows[index].book.id.clone();
        if let Ok(book_index) = store.book_index(&book_id) {
            let book = &mut store.books[book_index];
            if let Some(copies) = book.copies {
                book.copies = Some(Copies {
                    total: copies.total,
                    available: (copies.available + 1).min(copies.total),
                });
            }
            let updated = book.clone();
            store.borrows[index].book = updated;
        }
        store.borrows[index].return_date = Some(Utc::now());
        Ok(store.borrows[index].clone())
    }

    async fn list_borrow_records(&self) -> AppResult<Vec<BorrowRecord>> {
        self.lists_poisoned()?;
        Ok(self.store.lock().unwrap().borrows.clone())
    }

    async fn member_borrow_records(&self, member_id: &str) -> AppResult<Vec<BorrowRecord>> {
        self.lists_poisoned()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .borrows
            .iter()
            .filter(|b| b.member.id == member_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MembershipAccess for InMemoryLibrary {
    async fn list_members(&self) -> AppResult<Vec<Member>> {
        Ok(self.store.lock().unwrap().members.clone())
    }

    async fn lookup_member(&self, id: &str) -> AppResult<Member> {
        self.store.lock().unwrap().member(id)
    }

    async fn register_member(&self, draft: &MemberDraft) -> AppResult<Member> {
        let mut store = self.store.lock().unwrap();
        if store
            .members
            .iter()
            .any(|m| m.email.as_deref() == Some(draft.email.as_str()))
        {
            return Err(AppError::Remote {
                status: 409,
                message: "User already exists".to_string(),
            });
        }
        let member = Member {
            id: format!("USER-{}", store.member_seq),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: Some(draft.email.clone()),
            phone: Some(draft.phone.clone()),
            join_date: Utc::now(),
            is_banned: false,
        };
        store.member_seq += 1;
        store.members.push(member.clone());
        Ok(member)
    }

    async fn list_reservations(&self) -> AppResult<Vec<ReservationRecord>> {
        self.lists_poisoned()?;
        Ok(self.store.lock().unwrap().reservations.clone())
    }

    async fn member_reservations(&self, member_id: &str) -> AppResult<Vec<ReservationRecord>> {
        self.lists_poisoned()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .reservations
            .iter()
            .filter(|r| r.member.id == member_id)
            .cloned()
            .collect())
    }

    async fn cancel_reservation(&self, reservation_id: &str) -> AppResult<()> {
        let mut store = self.store.lock().unwrap();
        let index = store
            .reservations
            .iter()
            .position(|r| r.id == reservation_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Reservation {} not found", reservation_id))
            })?;
        store.reservations.remove(index);
        Ok(())
    }

    async fn commit_borrow(&self, payload: &CommitPayload) -> AppResult<BorrowRecord> {
        let mut store = self.store.lock().unwrap();
        let member = store.member(&payload.member_id)?;
        if member.is_banned {
            return Err(AppError::MemberBanned);
        }
        let index = store.book_index(&payload.book_id)?;
        let book = &mut store.books[index];
        match book.copies {
            Some(copies) if copies.available == 0 => return Err(AppError::BookUnavailable),
            Some(copies) => {
                book.copies = Some(Copies {
                    total: copies.total,
                    available: copies.available - 1,
                });
            }
            None => {}
        }
        let book = book.clone();

        let now = Utc::now();
        let record = BorrowRecord {
            id: format!("BORROW-{}", store.borrow_seq),
            book,
            member,
            borrow_date: now,
            due_date: payload.return_date.unwrap_or(now + Duration::days(14)),
            return_date: None,
        };
        store.borrow_seq += 1;
        store.borrows.push(record.clone());
        Ok(record)
    }

    async fn commit_reserve(&self, payload: &CommitPayload) -> AppResult<ReservationRecord> {
        let mut store = self.store.lock().unwrap();
        let member = store.member(&payload.member_id)?;
        if member.is_banned {
            return Err(AppError::MemberBanned);
        }
        let index = store.book_index(&payload.book_id)?;
        let book = store.books[index].clone();

        let now = Utc::now();
        let record = ReservationRecord {
            id: format!("RESERVE-{}", store.reservation_seq),
            book,
            member,
            reservation_date: now,
            expiration_date: now + Duration::days(7),
        };
        store.reservation_seq += 1;
        store.reservations.push(record.clone());
        Ok(record)
    }
}

pub struct Harness {
    pub library: InMemoryLibrary,
    pub services: Services,
    pub engine: LendingEngine,
}

pub fn harness() -> Harness {
    let library = InMemoryLibrary::seeded();
    let services = Services::with_access(Arc::new(library.clone()), Arc::new(library.clone()));
    let engine = LendingEngine::new(Arc::new(library.clone()), &LendingConfig::default());
    Harness {
        library,
        services,
        engine,
    }
}
