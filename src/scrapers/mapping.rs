use std::collections::HashMap;

use tracing::{debug, warn};

use super::locator::Rule;
use super::types::Filter;

/// Where to find a chosen option inside an open dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionTarget {
    /// The value is in the lookup table and the option can be addressed
    /// by DOM id directly.
    Mapped { id: String },
    /// Unknown value: scan the filter's option list for an entry whose
    /// visible text contains the raw input. The first match wins, even
    /// when several options share the substring.
    TextSearch { list_id: &'static str, needle: String },
}

impl OptionTarget {
    pub fn rules(&self) -> Vec<Rule> {
        match self {
            OptionTarget::Mapped { id } => vec![Rule::by_id(id)],
            OptionTarget::TextSearch { list_id, needle } => {
                vec![Rule::option_with_text(list_id, needle)]
            }
        }
    }

    pub fn is_text_search(&self) -> bool {
        matches!(self, OptionTarget::TextSearch { .. })
    }
}

/// Per-filter tables translating human input to the portal's option ids.
///
/// The ids are tied to the portal's current markup; a site update
/// invalidates them. Swapping in a different set of tables requires no
/// code change.
#[derive(Debug, Clone, Default)]
pub struct OptionTables {
    by_filter: HashMap<Filter, HashMap<String, String>>,
}

impl OptionTables {
    /// Tables for the CIEE portal as currently published.
    ///
    /// Professional areas map to the portal's internal area ids, cities
    /// to their IBGE municipality codes.
    pub fn ciee() -> Self {
        let mut by_filter = HashMap::new();
        by_filter.insert(
            Filter::VacancyKind,
            table(&[
                ("ESTÁGIO", "estagio"),
                ("APRENDIZ", "aprendiz"),
                ("PCD", "pcd"),
                ("PROCESSOS PÚBLICOS", "pp"),
                ("SOLUÇÕES ESPECIAIS", "se"),
            ]),
        );
        by_filter.insert(
            Filter::EducationLevel,
            table(&[
                ("TODOS", "TODOS"),
                ("ENSINO FUNDAMENTAL", "EF"),
                ("FUNDAMENTAL", "EF"),
                ("ENSINO MÉDIO", "EM"),
                ("MÉDIO", "EM"),
                ("TÉCNICO", "TE"),
                ("SUPERIOR", "SU"),
            ]),
        );
        by_filter.insert(
            Filter::ProfessionalArea,
            table(&[
                ("INFORMÁTICA", "18"),
                ("TECNOLOGIA DA INFORMAÇÃO", "18"),
                ("TI", "18"),
                ("ADMINISTRAÇÃO", "1"),
                ("ENGENHARIA", "73"),
                ("GASTRONOMIA", "11241"),
                ("LETRAS", "20"),
                ("INDUSTRIA", "17"),
                ("INSTITUIÇÕES FINANCEIRAS", "11241"),
                ("MARKETING", "22"),
                ("MEIO AMBIENTE", "24"),
                ("GEOCIÊNCIAS", "73"),
                ("GEOMÁTICA", "45"),
                ("ASTRONOMIA", "10081"),
            ]),
        );
        by_filter.insert(
            Filter::City,
            table(&[
                ("BRASÍLIA - DF", "5300108"),
                ("BRASÍLIA DE MINAS - MG", "3108602"),
                ("SÃO PAULO - SP", "3550308"),
                ("RIO DE JANEIRO - RJ", "3304557"),
            ]),
        );
        Self { by_filter }
    }

    fn lookup(&self, filter: Filter, normalized: &str) -> Option<&str> {
        self.by_filter
            .get(&filter)?
            .get(normalized)
            .map(String::as_str)
    }

    /// Known inputs for a filter, for diagnostics when a value misses.
    pub fn known_values(&self, filter: Filter) -> Vec<&str> {
        let mut values: Vec<&str> = self
            .by_filter
            .get(&filter)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        values.sort_unstable();
        values
    }
}

fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(input, id)| (input.to_string(), id.to_string()))
        .collect()
}

/// Maps raw filter input to a concrete option target.
///
/// Exact table hits are fast and unambiguous; everything else degrades to
/// a text search over the filter's option list, trading precision for
/// coverage of values nobody has mapped yet.
pub struct ValueMapper {
    tables: OptionTables,
}

impl ValueMapper {
    pub fn new(tables: OptionTables) -> Self {
        Self { tables }
    }

    pub fn resolve(&self, filter: Filter, raw: &str) -> OptionTarget {
        let normalized = normalize(raw);
        if let Some(id) = self.tables.lookup(filter, &normalized) {
            debug!(filter = filter.label(), value = raw, id, "value mapped");
            return OptionTarget::Mapped { id: id.to_string() };
        }
        warn!(
            filter = filter.label(),
            value = raw,
            known = ?self.tables.known_values(filter),
            "value not in table, falling back to text search"
        );
        OptionTarget::TextSearch {
            list_id: filter.option_list_id(),
            needle: raw.trim().to_string(),
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> ValueMapper {
        ValueMapper::new(OptionTables::ciee())
    }

    #[test]
    fn table_hits_never_fall_back_to_text_search() {
        let target = mapper().resolve(Filter::City, "BRASÍLIA - DF");
        assert_eq!(
            target,
            OptionTarget::Mapped {
                id: "5300108".to_string()
            }
        );
    }

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        let target = mapper().resolve(Filter::ProfessionalArea, "  informática ");
        assert_eq!(
            target,
            OptionTarget::Mapped {
                id: "18".to_string()
            }
        );
    }

    #[test]
    fn synonyms_share_one_id() {
        let mapper = mapper();
        let ti = mapper.resolve(Filter::ProfessionalArea, "TI");
        let full = mapper.resolve(Filter::ProfessionalArea, "Tecnologia da Informação");
        assert_eq!(ti, full);
    }

    #[test]
    fn unknown_values_become_a_scoped_text_search() {
        let target = mapper().resolve(Filter::City, " FOOBAR - ZZ ");
        assert_eq!(
            target,
            OptionTarget::TextSearch {
                list_id: "ComboCidade",
                needle: "FOOBAR - ZZ".to_string(),
            }
        );
        assert!(target.is_text_search());
    }

    #[test]
    fn targets_turn_into_locator_cascades() {
        let mapped = OptionTarget::Mapped {
            id: "estagio".to_string(),
        };
        assert_eq!(mapped.rules(), vec![Rule::by_id("estagio")]);

        let search = OptionTarget::TextSearch {
            list_id: "ComboCidade",
            needle: "NITERÓI".to_string(),
        };
        assert_eq!(
            search.rules(),
            vec![Rule::option_with_text("ComboCidade", "NITERÓI")]
        );
    }
}
