use std::ffi::OsStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{info, warn};

use crate::models::Vacancy;
use crate::scrapers::errors::StepError;
use crate::scrapers::filters::{FilterPipeline, FilterReport, FilterSurface, StepOutcome};
use crate::scrapers::listing;
use crate::scrapers::locator::{Resolver, Rule};
use crate::scrapers::mapping::{OptionTables, OptionTarget, ValueMapper};
use crate::scrapers::traits::VacancySource;
use crate::scrapers::types::{Filter, FilterRequest, ScraperConfig};

/// Cascade for the button that applies the chosen filters.
fn apply_button_rules() -> Vec<Rule> {
    vec![
        Rule::Css("div.btn-search.btn-purple".to_string()),
        Rule::XPath("//div[contains(@class, 'btn-search')][contains(., 'Aplicar')]".to_string()),
    ]
}

/// Broadest listing selectors, used only to wait for the results to show
/// up before the page is captured.
const LISTING_PRESENCE: &str = "[class*='vaga'], a[href*='codigoVaga']";

/// Browser-driven scraper for the CIEE vacancy portal.
pub struct CieeScraper {
    browser: Browser,
    tab: Arc<Tab>,
    config: ScraperConfig,
    mapper: ValueMapper,
}

impl CieeScraper {
    /// Launch Chrome and prepare a tab. The flags mirror a regular
    /// desktop session so the portal serves the full interactive page.
    pub fn new(config: ScraperConfig, tables: OptionTables) -> Result<Self> {
        info!("Launching Chrome (headless: {})...", config.headless);

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .args(vec![
                OsStr::new("--disable-blink-features=AutomationControlled"),
                OsStr::new("--start-maximized"),
                OsStr::new("--disable-gpu"),
            ])
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open a tab")?;

        Ok(Self {
            browser,
            tab,
            config,
            mapper: ValueMapper::new(tables),
        })
    }

    /// Navigate to the vacancy search page and let it finish rendering.
    pub fn open(&self) -> Result<()> {
        info!("Opening {}...", self.config.base_url);
        self.tab
            .navigate_to(&self.config.base_url)
            .context("Failed to navigate to the portal")?;
        self.tab
            .wait_until_navigated()
            .context("Portal never finished loading")?;
        thread::sleep(self.config.delays.page_load);
        info!("✅ Page loaded");
        Ok(())
    }

    /// Apply the requested filters. Individual steps may fail and be
    /// skipped; the returned report says what actually happened.
    pub fn apply_filters(&self, request: &FilterRequest) -> FilterReport {
        info!("==================================================");
        info!("APPLYING FILTERS");
        info!("==================================================");

        let mut surface = TabSurface {
            resolver: Resolver::new(self.tab.clone(), self.config.element_timeout),
        };
        let pipeline = FilterPipeline::new(&self.mapper, &self.config.delays);
        let report = pipeline.run(&mut surface, request);

        for (filter, outcome) in report.steps() {
            match outcome {
                StepOutcome::Applied => info!("filter {}: applied", filter.label()),
                StepOutcome::NotRequested => info!("filter {}: left at default", filter.label()),
                StepOutcome::Skipped(error) => {
                    warn!("filter {}: skipped ({})", filter.label(), error)
                }
            }
        }
        if !report.confirmed {
            warn!("the Aplicar button was never clicked; results may be unfiltered");
        }

        report
    }

    /// Capture the filtered page and extract every vacancy on it.
    ///
    /// A listing wait that times out is logged and collapses into the
    /// empty result; by this point there is nothing useful to abort.
    pub fn collect_vacancies(&self) -> Result<Vec<Vacancy>> {
        info!("==================================================");
        info!("COLLECTING VACANCIES");
        info!("==================================================");

        thread::sleep(self.config.delays.listing_render);
        if self
            .tab
            .wait_for_element_with_custom_timeout(LISTING_PRESENCE, self.config.element_timeout)
            .is_err()
        {
            let error = StepError::SettleTimeout(self.config.element_timeout);
            warn!(%error, "no listing container appeared, treating the page as empty");
        }

        let html = self.capture_html()?;
        Ok(listing::extract_from_html(&html, &self.config.base_url))
    }

    fn capture_html(&self) -> Result<String> {
        let captured = self
            .tab
            .evaluate("document.documentElement.outerHTML", false)
            .context("Failed to capture the page HTML")?;
        let html = captured
            .value
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();
        if html.is_empty() {
            warn!("captured page HTML is empty");
        }
        Ok(html)
    }

    /// Shut the browser down. Dropping the handles ends the Chrome
    /// process.
    pub fn close(self) {
        info!("🔒 Closing browser");
        drop(self.tab);
        drop(self.browser);
    }
}

#[async_trait]
impl VacancySource for CieeScraper {
    async fn scrape(&self, request: &FilterRequest) -> Result<Vec<Vacancy>> {
        self.open()?;
        self.apply_filters(request);
        self.collect_vacancies()
    }

    fn source_name(&self) -> &'static str {
        "CIEE"
    }
}

/// Live-tab implementation of the pipeline's page operations.
struct TabSurface {
    resolver: Resolver,
}

impl FilterSurface for TabSurface {
    fn open_menu(&mut self, filter: Filter) -> Result<(), StepError> {
        self.resolver.click(&[Rule::by_id(filter.trigger_id())])
    }

    fn narrow_options(&mut self, filter: Filter, term: &str) -> Result<(), StepError> {
        self.resolver
            .type_into(&[Rule::by_id(filter.trigger_id())], term)
    }

    fn select_option(&mut self, _filter: Filter, target: &OptionTarget) -> Result<(), StepError> {
        self.resolver.click(&target.rules())
    }

    fn confirm(&mut self) -> Result<(), StepError> {
        self.resolver.click(&apply_button_rules())
    }

    fn settle(&mut self, pause: Duration) {
        thread::sleep(pause);
    }
}
