pub mod database;
pub mod metrics;
pub mod providers;
pub mod storage;
pub mod users;

pub use database::{Datastore, MockDatastore, PgDatastore};
pub use storage::{HttpObjectStorage, LocalStorage, MockStorage, ObjectStorage};
