//! Record access for the madrasa console.
//!
//! Layers, bottom-up: [`schema`] names the tables, [`mapper`] converts rows,
//! [`models`] hold the domain types, [`store`] talks to persistence and
//! [`facade`] is what the views call.

pub mod config;
pub mod error;
pub mod facade;
pub mod mapper;
pub mod models;
pub mod record;
pub mod schema;
pub mod search;
pub mod store;
pub mod summary;

pub use config::{ConfigError, StoreBackend, StoreConfig};
pub use error::{DataError, DataResult};
pub use facade::{DataService, ListQuery, Repo};
pub use mapper::Row;
pub use record::{NewRecord, Record, RecordPatch};
pub use schema::Table;
pub use store::{MemoryStore, RemoteStore, StoreError};
