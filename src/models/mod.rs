use serde::{Deserialize, Serialize};

/// Placeholder recorded when a field could not be extracted from a card.
pub const NOT_AVAILABLE: &str = "N/A";

/// The fields extracted for every vacancy card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VacancyField {
    Code,
    Kind,
    Description,
    Area,
    Location,
    Schedule,
    Compensation,
    Link,
}

/// One vacancy scraped from the portal's listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacancy {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub area: String,
    pub location: String,
    pub schedule: String,
    pub compensation: String,
    pub link: String,
}

impl Vacancy {
    /// A vacancy with every field at the sentinel, to be filled in by
    /// whatever the card actually exposes.
    pub fn unresolved() -> Self {
        Self {
            code: NOT_AVAILABLE.to_string(),
            kind: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            area: NOT_AVAILABLE.to_string(),
            location: NOT_AVAILABLE.to_string(),
            schedule: NOT_AVAILABLE.to_string(),
            compensation: NOT_AVAILABLE.to_string(),
            link: NOT_AVAILABLE.to_string(),
        }
    }

    pub fn set(&mut self, field: VacancyField, value: String) {
        match field {
            VacancyField::Code => self.code = value,
            VacancyField::Kind => self.kind = value,
            VacancyField::Description => self.description = value,
            VacancyField::Area => self.area = value,
            VacancyField::Location => self.location = value,
            VacancyField::Schedule => self.schedule = value,
            VacancyField::Compensation => self.compensation = value,
            VacancyField::Link => self.link = value,
        }
    }

    /// A card with neither a code nor a link is noise, not a vacancy.
    pub fn is_valid(&self) -> bool {
        self.code != NOT_AVAILABLE || self.link != NOT_AVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_vacancy_is_not_valid() {
        assert!(!Vacancy::unresolved().is_valid());
    }

    #[test]
    fn code_alone_makes_a_vacancy_valid() {
        let mut vacancy = Vacancy::unresolved();
        vacancy.set(VacancyField::Code, "123456".to_string());
        assert!(vacancy.is_valid());
    }

    #[test]
    fn link_alone_makes_a_vacancy_valid() {
        let mut vacancy = Vacancy::unresolved();
        vacancy.set(
            VacancyField::Link,
            "https://example.org/vaga?codigoVaga=1".to_string(),
        );
        assert!(vacancy.is_valid());
    }
}
