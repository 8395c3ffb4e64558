//! Listing authenticity decision pipeline.
//!
//! Given an extracted product record and a set of trusted marketplace
//! catalogs, selects the best reference match, derives similarity and
//! deviation features, and classifies the listing into a bounded score
//! and verdict with deterministic overrides for trusted domains and
//! degenerate data.

pub mod adapters;
pub mod assembler;
pub mod catalog;
pub mod matcher;
pub mod orchestrator;
pub mod source;
pub mod types;

pub use adapters::{
    FixedSimilarity, ImageSimilarity, NeutralImageSimilarity, TextSimilarity,
    TokenSetTextSimilarity,
};
pub use assembler::FeatureAssembler;
pub use catalog::{load_catalog, load_catalog_file, CatalogError, CatalogSource};
pub use matcher::ReferenceMatcher;
pub use orchestrator::{DecisionOrchestrator, DEFAULT_TRUSTED_DOMAINS};
pub use source::ReferenceSource;
pub use types::{
    parse_price, AnalysisReport, AnalysisRequest, KeywordFlags, MatchResult, ProductRecord,
    ReferenceCandidate, NO_MATCH_SOURCE,
};
