//! Access layer for the remote library service

pub mod catalog;
pub mod http;
pub mod membership;

use crate::config::ApiConfig;
use crate::error::AppResult;

pub use catalog::{CatalogAccess, HttpCatalogAccess};
pub use membership::{HttpMembershipAccess, MembershipAccess};

/// Main access struct holding the HTTP-backed accessors
#[derive(Clone)]
pub struct Access {
    pub catalog: HttpCatalogAccess,
    pub membership: HttpMembershipAccess,
}

impl Access {
    /// Create access handles sharing one HTTP client
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = http::ApiClient::new(config)?;
        Ok(Self {
            catalog: HttpCatalogAccess::new(client.clone()),
            membership: HttpMembershipAccess::new(client),
        })
    }
}
