use async_trait::async_trait;

use crate::types::ReferenceCandidate;

/// Extract a short type name from the full module path.
///
/// Given `"my_crate::some_module::MyType"`, returns `"MyType"`.
pub(crate) fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// A trusted marketplace that can be searched for reference listings.
///
/// One implementation per marketplace. Sources are queried with the
/// candidate's title; a failing source is logged and skipped, never
/// aborting the pool build.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Decide if this source should run for the given query.
    fn enable(&self, _query: &str) -> bool {
        true
    }

    /// Search the marketplace for listings matching the query.
    async fn search(&self, query: &str) -> Result<Vec<ReferenceCandidate>, String>;

    /// Returns a stable name for logging/metrics.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_name_strips_path() {
        assert_eq!(short_type_name("a::b::CatalogSource"), "CatalogSource");
        assert_eq!(short_type_name("Bare"), "Bare");
    }
}
