//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod membership;

use std::sync::Arc;

use crate::access::{Access, CatalogAccess, MembershipAccess};

pub use circulation::MemberHistory;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub membership: membership::MembershipService,
    pub circulation: circulation::CirculationService,
}

impl Services {
    /// Create all services over the HTTP access layer
    pub fn new(access: Access) -> Self {
        Self::with_access(Arc::new(access.catalog), Arc::new(access.membership))
    }

    /// Create all services over explicit access handles. Tests use this
    /// to substitute in-memory stand-ins for the remote service.
    pub fn with_access(
        catalog: Arc<dyn CatalogAccess>,
        membership: Arc<dyn MembershipAccess>,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(catalog.clone()),
            membership: membership::MembershipService::new(membership.clone()),
            circulation: circulation::CirculationService::new(catalog, membership),
        }
    }
}
