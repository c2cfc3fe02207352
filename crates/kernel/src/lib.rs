pub mod schema;
pub mod settings;

pub use schema::{CollectionSpec, Direction, IndexSpec, Schema};
pub use settings::Settings;
