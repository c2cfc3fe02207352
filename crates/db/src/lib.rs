//! MongoDB schema store: collection and index bootstrap plus verification.

pub mod error;
pub mod initializer;
pub mod mongo;
pub mod store;
pub mod verify;

#[cfg(test)]
mod memory;

pub use error::{InitError, StoreError};
pub use initializer::{
    ensure_collection, ensure_index, ensure_unique_index, initialize, InitReport, Outcome,
};
pub use mongo::MongoStore;
pub use store::{IndexInfo, SchemaStore};
pub use verify::{verify, VerifyReport};
