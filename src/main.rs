mod models;
mod scrapers;
mod sink;

use scrapers::{CieeScraper, FilterRequest, OptionTables, ScraperConfig, VacancySource};
use sink::OutputFormat;
use tracing::{error, info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🎓 Vacancy Scout - CIEE vacancy scraper");
    info!("==========================================");
    info!("");

    // Filters for this run; leave a field as None to keep the portal's
    // default for that dropdown.
    let request = FilterRequest {
        vacancy_kind: Some("ESTÁGIO".to_string()),
        education_level: Some("Superior".to_string()),
        professional_area: Some("Informática".to_string()),
        city: Some("BRASÍLIA - DF".to_string()),
    };

    let scraper = CieeScraper::new(ScraperConfig::default(), OptionTables::ciee())?;

    // A failed run still falls through to the close below.
    let vacancies = match scraper.scrape(&request).await {
        Ok(vacancies) => vacancies,
        Err(error) => {
            error!("run failed: {error:#}");
            Vec::new()
        }
    };

    info!("==================================================");
    info!("TOTAL: {} vacancies found", vacancies.len());
    info!("==================================================");

    for (i, vacancy) in vacancies.iter().take(3).enumerate() {
        println!("{}. {} - {}", i + 1, vacancy.kind, vacancy.description);
        println!("   📍 {}", vacancy.location);
        println!("   💰 {}", vacancy.compensation);
        println!("   🔗 {}", vacancy.link);
        println!();
    }

    if !vacancies.is_empty() {
        // VACANCY_SCOUT_FORMAT=csv is accepted but writes nothing yet.
        let format = match std::env::var("VACANCY_SCOUT_FORMAT").ok().as_deref() {
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        };
        match sink::save(&vacancies, format).await {
            Ok(Some(path)) => info!("💾 Saved results to {}", path.display()),
            Ok(None) => {}
            Err(error) => error!("could not save results: {error:#}"),
        }
    }

    scraper.close();

    Ok(())
}
