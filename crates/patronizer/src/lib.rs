pub mod backend;
pub mod client;
pub mod database;
pub mod error;
pub mod notifications;
pub mod pages;
pub mod stats;
pub mod syncing;

pub use backend::{ Backend, BackendError, HttpBackend, TokenResponse };
pub use client::{ Credential, PageSet, PatreonClient, PATREON_API_BASE };
pub use database::{ Database, MemoryDatabase, PostgresDatabase };
pub use error::{ Error, ErrorKind, Result };
pub use syncing::SyncReport;
