//! External concerns: database, migrations, repository implementations

pub mod database;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, DatabaseConfig};
