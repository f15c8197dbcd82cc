use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::warn;

use crate::models::Vacancy;

/// Output formats accepted by the sink. `Csv` is accepted so callers can
/// already ask for it, but nothing is produced yet; it is a no-op, not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

const FILE_PREFIX: &str = "vagas_ciee";

/// Write the scraped vacancies to a timestamped file in the working
/// directory, returning its path.
pub async fn save(vacancies: &[Vacancy], format: OutputFormat) -> Result<Option<PathBuf>> {
    save_in(Path::new("."), vacancies, format).await
}

/// Like [`save`], into a chosen directory. Records keep their discovery
/// order and non-ASCII text is written as-is.
pub async fn save_in(
    dir: &Path,
    vacancies: &[Vacancy],
    format: OutputFormat,
) -> Result<Option<PathBuf>> {
    match format {
        OutputFormat::Json => {
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            let path = dir.join(format!("{FILE_PREFIX}_{timestamp}.json"));
            let json =
                serde_json::to_string_pretty(vacancies).context("Failed to serialize vacancies")?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(Some(path))
        }
        OutputFormat::Csv => {
            // TODO: write CSV once a consumer actually needs it
            warn!("csv output is not implemented yet; nothing was written");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;

    fn sample_vacancies() -> Vec<Vacancy> {
        vec![
            Vacancy {
                code: "111".to_string(),
                kind: "ESTÁGIO".to_string(),
                description: "Estágio em Informática".to_string(),
                area: "Tecnologia da Informação".to_string(),
                location: "BRASÍLIA - DF".to_string(),
                schedule: "13h às 17h".to_string(),
                compensation: "R$ 1.200,00".to_string(),
                link: "https://www.ciee.org.br/vaga?codigoVaga=111".to_string(),
            },
            Vacancy {
                code: NOT_AVAILABLE.to_string(),
                kind: "APRENDIZ".to_string(),
                description: "Aprendiz de Administração".to_string(),
                area: NOT_AVAILABLE.to_string(),
                location: "SÃO PAULO - SP".to_string(),
                schedule: NOT_AVAILABLE.to_string(),
                compensation: NOT_AVAILABLE.to_string(),
                link: "https://www.ciee.org.br/vaga?codigoVaga=222".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn json_round_trips_in_order_with_accents_intact() {
        let dir = std::env::temp_dir().join("vacancy-scout-json-roundtrip");
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let vacancies = sample_vacancies();
        let path = save_in(&dir, &vacancies, OutputFormat::Json)
            .await
            .unwrap()
            .expect("json should produce a file");

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("ESTÁGIO"));
        assert!(written.contains("SÃO PAULO - SP"));
        assert!(!written.contains("\\u"));

        let parsed: Vec<Vacancy> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, vacancies);
    }

    #[tokio::test]
    async fn csv_is_a_no_op() {
        let dir = std::env::temp_dir().join("vacancy-scout-csv-noop");
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let path = save_in(&dir, &sample_vacancies(), OutputFormat::Csv)
            .await
            .unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn file_names_carry_the_run_timestamp() {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        assert_eq!(timestamp.len(), 15);
        assert!(timestamp.chars().nth(8) == Some('_'));
    }
}
