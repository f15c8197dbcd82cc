use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The four dropdown filters on the search page, in application order.
///
/// The order is fixed: the portal repopulates later dropdowns based on
/// earlier selections, so area and city must come after kind and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    VacancyKind,
    EducationLevel,
    ProfessionalArea,
    City,
}

impl Filter {
    pub const ALL: [Filter; 4] = [
        Filter::VacancyKind,
        Filter::EducationLevel,
        Filter::ProfessionalArea,
        Filter::City,
    ];

    /// DOM id of the control that opens this filter's dropdown.
    pub fn trigger_id(self) -> &'static str {
        match self {
            Filter::VacancyKind => "TipoVaga",
            Filter::EducationLevel => "NivelEnsino",
            Filter::ProfessionalArea => "AreaProfissional",
            Filter::City => "CidadeVaga",
        }
    }

    /// DOM id of the list that holds this filter's options once populated.
    pub fn option_list_id(self) -> &'static str {
        match self {
            Filter::VacancyKind => "ComboTipoVaga",
            Filter::EducationLevel => "ComboNivelEnsino",
            Filter::ProfessionalArea => "ComboAreaProfissional",
            Filter::City => "ComboCidade",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::VacancyKind => "tipo de vaga",
            Filter::EducationLevel => "nível de ensino",
            Filter::ProfessionalArea => "área profissional",
            Filter::City => "cidade",
        }
    }
}

/// Filter selections for one search run.
///
/// Any subset may be set; an unset field leaves the portal's default in
/// place and the corresponding step is skipped entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    #[serde(rename = "tipo_vaga", skip_serializing_if = "Option::is_none")]
    pub vacancy_kind: Option<String>,
    #[serde(rename = "nivel_ensino", skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(rename = "area_profissional", skip_serializing_if = "Option::is_none")]
    pub professional_area: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl FilterRequest {
    pub fn value(&self, filter: Filter) -> Option<&str> {
        match filter {
            Filter::VacancyKind => self.vacancy_kind.as_deref(),
            Filter::EducationLevel => self.education_level.as_deref(),
            Filter::ProfessionalArea => self.professional_area.as_deref(),
            Filter::City => self.city.as_deref(),
        }
    }
}

/// Fixed pauses absorbing page behaviour this system cannot observe:
/// dropdown population, post-filter reloads and scroll animations expose
/// no completion signal, so each gets a named, tunable duration. A known
/// source of flakiness.
#[derive(Debug, Clone)]
pub struct Delays {
    /// After initial navigation, before the page is considered usable.
    pub page_load: Duration,
    /// After clicking a dropdown trigger, before its list exists.
    pub menu_open: Duration,
    /// After opening, until the option list is populated.
    pub options_populate: Duration,
    /// After typing into the city box, until the list has narrowed.
    pub search_narrowing: Duration,
    /// After an option click registered.
    pub after_select: Duration,
    /// Between the last filter and the Aplicar click.
    pub before_apply: Duration,
    /// After Aplicar, while the portal reloads the results.
    pub after_apply: Duration,
    /// Before capturing the listing page.
    pub listing_render: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            page_load: Duration::from_secs(5),
            menu_open: Duration::from_secs(1),
            options_populate: Duration::from_millis(1500),
            search_narrowing: Duration::from_secs(2),
            after_select: Duration::from_secs(1),
            before_apply: Duration::from_secs(2),
            after_apply: Duration::from_secs(4),
            listing_render: Duration::from_secs(3),
        }
    }
}

/// Runtime configuration for a scraper session.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub headless: bool,
    /// Bound on every per-rule element wait.
    pub element_timeout: Duration,
    pub delays: Delays,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ciee.org.br/portal/estudantes/ofertas/estagios".to_string(),
            headless: false,
            element_timeout: Duration::from_secs(10),
            delays: Delays::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_value_follows_the_step_order() {
        let request = FilterRequest {
            vacancy_kind: Some("ESTÁGIO".to_string()),
            city: Some("BRASÍLIA - DF".to_string()),
            ..FilterRequest::default()
        };
        assert_eq!(request.value(Filter::VacancyKind), Some("ESTÁGIO"));
        assert_eq!(request.value(Filter::EducationLevel), None);
        assert_eq!(request.value(Filter::ProfessionalArea), None);
        assert_eq!(request.value(Filter::City), Some("BRASÍLIA - DF"));
    }

    #[test]
    fn request_deserializes_from_the_portal_key_names() {
        let request: FilterRequest = serde_json::from_str(
            r#"{"tipo_vaga": "APRENDIZ", "area_profissional": "Informática"}"#,
        )
        .unwrap();
        assert_eq!(request.vacancy_kind.as_deref(), Some("APRENDIZ"));
        assert_eq!(request.professional_area.as_deref(), Some("Informática"));
        assert!(request.education_level.is_none());
        assert!(request.city.is_none());
    }
}
