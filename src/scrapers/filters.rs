use std::time::Duration;

use tracing::{info, warn};

use super::errors::StepError;
use super::mapping::{OptionTarget, ValueMapper};
use super::types::{Delays, Filter, FilterRequest};

/// What happened to a single filter step.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The option was selected on the page.
    Applied,
    /// The request did not name this filter; the portal default stands.
    NotRequested,
    /// The step failed and was abandoned. Later steps still ran, so the
    /// page ends up filtered on fewer criteria than asked for.
    Skipped(StepError),
}

/// Per-run account of what each step did, aggregated for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    steps: Vec<(Filter, StepOutcome)>,
    /// Whether the Aplicar button was reached and clicked.
    pub confirmed: bool,
}

impl FilterReport {
    fn record(&mut self, filter: Filter, outcome: StepOutcome) {
        self.steps.push((filter, outcome));
    }

    pub fn steps(&self) -> &[(Filter, StepOutcome)] {
        &self.steps
    }

    pub fn outcome(&self, filter: Filter) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(step, _)| *step == filter)
            .map(|(_, outcome)| outcome)
    }

    pub fn applied(&self) -> usize {
        self.steps
            .iter()
            .filter(|(_, outcome)| matches!(outcome, StepOutcome::Applied))
            .count()
    }
}

/// The page operations the pipeline needs. The live implementation
/// drives a browser tab; tests substitute a scripted double.
pub trait FilterSurface {
    /// Open the dropdown for `filter`: resolve its trigger, scroll it
    /// into view, click it.
    fn open_menu(&mut self, filter: Filter) -> Result<(), StepError>;

    /// Replace the text of the filter's input to narrow its option list.
    fn narrow_options(&mut self, filter: Filter, term: &str) -> Result<(), StepError>;

    /// Click the option the mapper picked.
    fn select_option(&mut self, filter: Filter, target: &OptionTarget) -> Result<(), StepError>;

    /// Click the button that applies all chosen filters.
    fn confirm(&mut self) -> Result<(), StepError>;

    /// Absorb asynchronous page behaviour that has no completion signal.
    fn settle(&mut self, pause: Duration);
}

/// Applies the requested filters in their fixed order, then confirms them.
///
/// A step that fails is logged, reported and abandoned; the pipeline
/// carries on with the next one regardless and always reaches the
/// confirmation attempt.
pub struct FilterPipeline<'a> {
    mapper: &'a ValueMapper,
    delays: &'a Delays,
}

impl<'a> FilterPipeline<'a> {
    pub fn new(mapper: &'a ValueMapper, delays: &'a Delays) -> Self {
        Self { mapper, delays }
    }

    pub fn run<S: FilterSurface>(&self, surface: &mut S, request: &FilterRequest) -> FilterReport {
        let mut report = FilterReport::default();

        for filter in Filter::ALL {
            let outcome = match request.value(filter) {
                None => StepOutcome::NotRequested,
                Some(raw) => match self.apply_step(surface, filter, raw) {
                    Ok(()) => {
                        info!("✅ {} selected: {}", filter.label(), raw);
                        StepOutcome::Applied
                    }
                    Err(error) => {
                        warn!(filter = filter.label(), %error, "filter step abandoned");
                        StepOutcome::Skipped(error)
                    }
                },
            };
            report.record(filter, outcome);
        }

        surface.settle(self.delays.before_apply);
        info!("Clicking Aplicar...");
        match surface.confirm() {
            Ok(()) => {
                surface.settle(self.delays.after_apply);
                report.confirmed = true;
            }
            Err(error) => warn!(%error, "could not confirm the filters"),
        }

        report
    }

    fn apply_step<S: FilterSurface>(
        &self,
        surface: &mut S,
        filter: Filter,
        raw: &str,
    ) -> Result<(), StepError> {
        info!("🔹 Selecting {}: {}", filter.label(), raw);

        surface.open_menu(filter)?;
        surface.settle(self.delays.menu_open);

        if filter == Filter::City {
            // The city list holds every municipality in the country;
            // typing part of the name narrows it to something clickable.
            let term = search_term(raw);
            surface.narrow_options(filter, &term)?;
            surface.settle(self.delays.search_narrowing);
        }
        surface.settle(self.delays.options_populate);

        let target = self.mapper.resolve(filter, raw);
        match surface.select_option(filter, &target) {
            Ok(()) => {
                surface.settle(self.delays.after_select);
                Ok(())
            }
            // An exhausted text search means the value is unknown to both
            // the table and the page.
            Err(StepError::NotFound { .. }) if target.is_text_search() => {
                Err(StepError::UnmappedValue {
                    value: raw.to_string(),
                })
            }
            Err(error) => Err(error),
        }
    }
}

/// First word of the value, upper-cased, as typed into the search box.
fn search_term(raw: &str) -> String {
    raw.split_whitespace()
        .next()
        .unwrap_or(raw)
        .to_uppercase()
}
