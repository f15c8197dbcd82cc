use crate::models::Vacancy;
use crate::scrapers::types::FilterRequest;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all vacancy scrapers
/// This allows easy addition of new portals besides CIEE in the future
#[async_trait]
pub trait VacancySource: Send + Sync {
    /// Run a full search with the given filters and extract the results
    async fn scrape(&self, request: &FilterRequest) -> Result<Vec<Vacancy>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
