//! CSV marketplace catalogs.
//!
//! Live marketplace search is an external collaborator; a `CatalogSource`
//! stands at that boundary, serving reference listings from a CSV export.
//! Expected CSV columns: title, price, seller, image_url, url
//!
//! `search` does a cheap shared-token prefilter; the real fuzzy ranking
//! happens in the matcher.

use async_trait::async_trait;
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

use verity_signals::similarity::tokenize;

use crate::source::ReferenceSource;
use crate::types::ReferenceCandidate;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to open catalog '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Catalog parse error at line {line}: {source}")]
    Parse { line: usize, source: csv::Error },
}

/// One CSV row of a marketplace catalog.
#[derive(Debug, Clone, Deserialize)]
struct CatalogRow {
    title: String,
    price: String,
    seller: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    url: String,
}

/// Load catalog rows from a CSV reader, tagging each with the source name.
pub fn load_catalog<R: Read>(
    source_name: &str,
    reader: R,
) -> Result<Vec<ReferenceCandidate>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut listings = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let row: CatalogRow = result.map_err(|source| CatalogError::Parse {
            line: line_num + 2,
            source,
        })?;
        listings.push(ReferenceCandidate {
            source: source_name.to_string(),
            title: row.title,
            price: row.price,
            seller: row.seller,
            images: if row.image_url.is_empty() {
                Vec::new()
            } else {
                vec![row.image_url]
            },
            url: row.url,
        });
    }
    Ok(listings)
}

/// Load catalog rows from a CSV file path.
pub fn load_catalog_file(
    source_name: &str,
    path: &str,
) -> Result<Vec<ReferenceCandidate>, CatalogError> {
    let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_string(),
        source,
    })?;
    load_catalog(source_name, file)
}

/// A trusted marketplace backed by an in-memory catalog.
pub struct CatalogSource {
    source_name: String,
    listings: Vec<ReferenceCandidate>,
}

impl CatalogSource {
    pub fn new(source_name: impl Into<String>, listings: Vec<ReferenceCandidate>) -> Self {
        Self {
            source_name: source_name.into(),
            listings,
        }
    }

    /// Build a source from a CSV catalog file.
    pub fn from_file(source_name: &str, path: &str) -> Result<Self, CatalogError> {
        let listings = load_catalog_file(source_name, path)?;
        Ok(Self::new(source_name, listings))
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[async_trait]
impl ReferenceSource for CatalogSource {
    fn enable(&self, query: &str) -> bool {
        !self.listings.is_empty() && !query.trim().is_empty()
    }

    async fn search(&self, query: &str) -> Result<Vec<ReferenceCandidate>, String> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }
        let hits: Vec<ReferenceCandidate> = self
            .listings
            .iter()
            .filter(|listing| {
                let title_tokens = tokenize(&listing.title);
                query_tokens.intersection(&title_tokens).next().is_some()
            })
            .cloned()
            .collect();
        log::debug!(
            "catalog {} returned {} of {} listings for '{}'",
            self.source_name,
            hits.len(),
            self.listings.len(),
            query
        );
        Ok(hits)
    }

    fn name(&self) -> &str {
        &self.source_name
    }
}
