//! The `scoring_algo` database layout.

use scoring_kernel::{CollectionSpec, IndexSpec, Schema};

pub const DATABASE: &str = "scoring_algo";

pub const COLLECTIONS: [&str; 5] = [
    "surveys",
    "survey_responses",
    "candidates",
    "applications",
    "companies",
];

/// Every collection is keyed by a unique ascending `id`.
pub fn scoring_algo() -> Schema {
    COLLECTIONS
        .into_iter()
        .fold(Schema::new(DATABASE), |schema, name| {
            schema.with_collection(CollectionSpec::new(name).with_index(IndexSpec::unique("id")))
        })
}
