//! SeaORM repository implementations

pub mod repository_provider;
pub mod session_repository;
pub mod slot_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use session_repository::SeaOrmSessionRepository;
pub use slot_repository::SeaOrmSlotRepository;
