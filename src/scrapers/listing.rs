use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::models::{Vacancy, VacancyField};

/// Container selectors for one vacancy card, most specific first. The
/// first entry that matches anything wins; later entries are not read.
const LISTING_CASCADE: [&str; 6] = [
    "a.vaga-item",
    ".vaga-row",
    ".card-vaga",
    "[class*='vaga']",
    "div[class*='item-vaga']",
    "a[href*='codigoVaga']",
];

/// Markers used by the generic anchor scan once the cascade is exhausted.
const CLASS_MARKER: &str = "vaga";
const HREF_MARKER: &str = "codigoVaga";

/// Selector cascade per extracted field. Adding a field or an alternative
/// selector is a table change, not new code.
const FIELD_CASCADES: [(VacancyField, &[&str]); 7] = [
    (VacancyField::Code, &[".codigo-vaga", ".cod-vaga"]),
    (VacancyField::Kind, &[".tipo-vaga", ".badge"]),
    (VacancyField::Description, &[".titulo-vaga", ".descricao", "h3"]),
    (VacancyField::Area, &[".area-vaga", ".info-area"]),
    (VacancyField::Location, &[".local-vaga", ".info-local", ".localizacao"]),
    (VacancyField::Schedule, &[".horario-vaga", ".info-horario"]),
    (
        VacancyField::Compensation,
        &[".salario-vaga", ".info-salario", ".bolsa-auxilio"],
    ),
];

/// Find the vacancy cards in a captured page, in document order.
///
/// Zero cards is a valid result, not an error: a filtered search can
/// legitimately come back empty.
pub fn locate_listings(document: &Html) -> Vec<ElementRef<'_>> {
    for selector in LISTING_CASCADE {
        let Ok(parsed) = Selector::parse(selector) else {
            continue;
        };
        let found: Vec<_> = document.select(&parsed).collect();
        if !found.is_empty() {
            info!("✅ {} listings matched by selector: {}", found.len(), selector);
            return found;
        }
    }

    debug!("selector cascade found nothing, scanning anchors for listing markers");
    let anchors = Selector::parse("a").unwrap();
    document
        .select(&anchors)
        .filter(|element| {
            let class = element.value().attr("class").unwrap_or("");
            let href = element.value().attr("href").unwrap_or("");
            class.to_lowercase().contains(CLASS_MARKER) || href.contains(HREF_MARKER)
        })
        .collect()
}

/// Extract one vacancy from a card element.
///
/// Fields are independent: a cascade that matches nothing leaves its
/// field at the sentinel and the rest are still extracted. The link is
/// not a selector lookup; it comes off the card's own `href`.
pub fn extract_vacancy(card: &ElementRef<'_>, base_url: &str) -> Vacancy {
    let mut vacancy = Vacancy::unresolved();

    if let Some(href) = card.value().attr("href") {
        vacancy.set(VacancyField::Link, absolutize(base_url, href));
    }

    for (field, cascade) in FIELD_CASCADES {
        if let Some(text) = first_text(card, cascade) {
            vacancy.set(field, text);
        }
    }

    vacancy
}

/// Parse a captured page and extract every valid vacancy, preserving
/// document order. Cards failing the code-or-link bar are dropped and
/// counted, not surfaced as errors.
pub fn extract_from_html(html: &str, base_url: &str) -> Vec<Vacancy> {
    let document = Html::parse_document(html);
    let cards = locate_listings(&document);

    if cards.is_empty() {
        warn!("no vacancy cards found on the page");
        return Vec::new();
    }

    let mut vacancies = Vec::new();
    let mut dropped = 0usize;
    for (index, card) in cards.iter().enumerate() {
        debug!("📄 extracting listing {}/{}", index + 1, cards.len());
        let vacancy = extract_vacancy(card, base_url);
        if vacancy.is_valid() {
            vacancies.push(vacancy);
        } else {
            debug!("listing {} has neither code nor link, ignoring", index + 1);
            dropped += 1;
        }
    }

    if dropped > 0 {
        warn!("{} of {} listings dropped for missing both code and link", dropped, cards.len());
    }
    vacancies
}

fn first_text(card: &ElementRef<'_>, cascade: &[&str]) -> Option<String> {
    for selector in cascade {
        let Ok(parsed) = Selector::parse(selector) else {
            continue;
        };
        if let Some(element) = card.select(&parsed).next() {
            let text = element.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", site_root(base_url), href)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href)
    }
}

/// Scheme and host of the base URL, for joining absolute-path links.
fn site_root(base_url: &str) -> &str {
    let Some(scheme_end) = base_url.find("://") else {
        return base_url;
    };
    let rest = &base_url[scheme_end + 3..];
    match rest.find('/') {
        Some(slash) => &base_url[..scheme_end + 3 + slash],
        None => base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;

    const BASE: &str = "https://www.ciee.org.br/portal/estudantes/ofertas/estagios";

    fn card<'a>(document: &'a Html) -> ElementRef<'a> {
        locate_listings(document)
            .into_iter()
            .next()
            .expect("fixture should contain one card")
    }

    #[test]
    fn the_first_matching_cascade_entry_wins() {
        // Cards only for the third entry, plus an anchor that only the
        // sixth entry could match. Stopping at the third means exactly
        // two results.
        let document = Html::parse_document(
            r#"
            <div class="resultados">
                <div class="card-vaga"><span class="codigo-vaga">111</span></div>
                <div class="card-vaga"><span class="codigo-vaga">222</span></div>
                <a class="job-link" href="/portal/vaga?codigoVaga=333">vaga 333</a>
            </div>
            "#,
        );
        let cards = locate_listings(&document);
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn exhausted_cascade_falls_back_to_marker_anchors() {
        // "VagaDestaque" misses every cascade entry (attribute matching
        // is case sensitive) but the lower-cased marker scan catches it.
        let document = Html::parse_document(
            r#"
            <a class="VagaDestaque" href="/destaque/1">uma oportunidade</a>
            <a class="nav-link" href="/sobre">institucional</a>
            "#,
        );
        let cards = locate_listings(&document);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].value().attr("href"), Some("/destaque/1"));
    }

    #[test]
    fn an_empty_page_yields_an_empty_result() {
        let document = Html::parse_document("<html><body><p>Nada aqui.</p></body></html>");
        assert!(locate_listings(&document).is_empty());
        assert!(extract_from_html("<html><body></body></html>", BASE).is_empty());
    }

    #[test]
    fn every_field_is_taken_from_its_own_cascade() {
        let document = Html::parse_document(
            r#"
            <a class="vaga-item" href="https://www.ciee.org.br/vaga?codigoVaga=98765">
                <span class="codigo-vaga">98765</span>
                <span class="badge">ESTÁGIO</span>
                <h3>Estágio em Informática</h3>
                <span class="info-area">Tecnologia da Informação</span>
                <span class="localizacao">BRASÍLIA - DF</span>
                <span class="info-horario">13h às 17h</span>
                <span class="bolsa-auxilio">R$ 1.200,00</span>
            </a>
            "#,
        );
        let vacancy = extract_vacancy(&card(&document), BASE);

        assert_eq!(vacancy.code, "98765");
        assert_eq!(vacancy.kind, "ESTÁGIO");
        assert_eq!(vacancy.description, "Estágio em Informática");
        assert_eq!(vacancy.area, "Tecnologia da Informação");
        assert_eq!(vacancy.location, "BRASÍLIA - DF");
        assert_eq!(vacancy.schedule, "13h às 17h");
        assert_eq!(vacancy.compensation, "R$ 1.200,00");
        assert_eq!(vacancy.link, "https://www.ciee.org.br/vaga?codigoVaga=98765");
    }

    #[test]
    fn a_card_with_only_a_link_still_extracts() {
        let document = Html::parse_document(
            r#"<a class="vaga-item" href="/portal/vaga?codigoVaga=42"></a>"#,
        );
        let vacancy = extract_vacancy(&card(&document), BASE);

        assert_eq!(vacancy.link, "https://www.ciee.org.br/portal/vaga?codigoVaga=42");
        assert_eq!(vacancy.code, NOT_AVAILABLE);
        assert_eq!(vacancy.description, NOT_AVAILABLE);
        assert_eq!(vacancy.compensation, NOT_AVAILABLE);
        assert!(vacancy.is_valid());
    }

    #[test]
    fn cards_without_code_or_link_are_dropped_in_order() {
        let html = r#"
            <div class="listagem">
                <a class="vaga-item" href="/vaga?codigoVaga=111">
                    <span class="codigo-vaga">111</span>
                    <h3>Estágio em Administração</h3>
                </a>
                <a class="vaga-item" href="/vaga?codigoVaga=222">
                    <span class="codigo-vaga">222</span>
                    <h3>Estágio em Informática</h3>
                </a>
                <a class="vaga-item">
                    <h3>Anúncio sem dados</h3>
                </a>
            </div>
        "#;
        let vacancies = extract_from_html(html, BASE);

        assert_eq!(vacancies.len(), 2);
        assert_eq!(vacancies[0].code, "111");
        assert_eq!(vacancies[1].code, "222");
    }

    #[test]
    fn relative_links_are_joined_to_the_site_root() {
        assert_eq!(
            absolutize(BASE, "/portal/vaga?codigoVaga=7"),
            "https://www.ciee.org.br/portal/vaga?codigoVaga=7"
        );
        assert_eq!(
            absolutize(BASE, "https://outra.org/vaga"),
            "https://outra.org/vaga"
        );
    }
}
