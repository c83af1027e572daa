//! Repository provider interface
//!
//! Bundles the per-aggregate repositories behind a single object so services
//! depend on one `Arc<dyn RepositoryProvider>` instead of individual repos.

use crate::domain::session::SessionRepository;
use crate::domain::slot::SlotRepository;

pub trait RepositoryProvider: Send + Sync {
    fn sessions(&self) -> &dyn SessionRepository;
    fn slots(&self) -> &dyn SlotRepository;
}
