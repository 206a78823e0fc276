//! Core application

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_CRATE_TARGET, APP_NAME, ENV_LOG};
use crate::data::DataError;
use crate::data::filters::{CompileOptions, CompiledQuery, Criteria};
use crate::data::sqlite::{Page, SqliteService};
use crate::data::types::{AppointmentRow, MedicalHistoryRow, PersonRow, ReferencePersonRow};
use crate::domain::Resource;

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!(app = APP_NAME, "Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        Resource::validate_all().map_err(DataError::from)?;
        let app = Self {
            config: AppConfig::load(&cli_config)?,
        };

        match command {
            Commands::Compile { resource, criteria } => {
                app.compile(resource, &Criteria::from_pairs(criteria))
            }
            Commands::Search {
                resource,
                criteria,
                limit,
                offset,
            } => {
                let page = app.config.search.page(limit, offset);
                app.search(resource, &Criteria::from_pairs(criteria), page)
                    .await
            }
            Commands::Resources => print_json(&resources_json()),
        }
    }

    fn compile(&self, resource: Resource, criteria: &Criteria) -> Result<()> {
        let compiled = self
            .config
            .filters
            .compiler()
            .compile(resource.filter_spec(), criteria);
        print_json(&compiled_json(resource, &compiled))
    }

    async fn search(&self, resource: Resource, criteria: &Criteria, page: Page) -> Result<()> {
        let db = self.open_database().await?;
        let rows = search_json(
            &db,
            resource,
            criteria,
            self.config.filters.compile_options(),
            page,
        )
        .await;
        db.close().await;
        print_json(&rows?)
    }

    async fn open_database(&self) -> Result<SqliteService, DataError> {
        let db = if self.config.database.is_memory() {
            SqliteService::in_memory().await?
        } else {
            SqliteService::init(&self.config.database.path).await?
        };
        Ok(db)
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_CRATE_TARGET);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // Logs go to stderr; stdout carries JSON output
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

/// JSON view of a compiled query
pub(crate) fn compiled_json(resource: Resource, compiled: &CompiledQuery) -> serde_json::Value {
    json!({
        "resource": resource.name(),
        "predicate": compiled.predicate(),
        "fragments": compiled.fragments,
        "params": compiled.params,
    })
}

/// Every resource with its table and accepted criteria keys
pub(crate) fn resources_json() -> serde_json::Value {
    Resource::ALL
        .iter()
        .map(|resource| {
            json!({
                "resource": resource.name(),
                "table": resource.table(),
                "keys": resource.filter_spec().keys().collect::<Vec<_>>(),
            })
        })
        .collect()
}

/// Run a search and serialize the rows with the resource's row type
pub(crate) async fn search_json(
    db: &SqliteService,
    resource: Resource,
    criteria: &Criteria,
    options: CompileOptions,
    page: Page,
) -> Result<serde_json::Value> {
    let rows = match resource {
        Resource::Appointments => {
            to_json(db.search::<AppointmentRow>(resource, criteria, options, page).await?)?
        }
        Resource::MedicalHistory => {
            to_json(db.search::<MedicalHistoryRow>(resource, criteria, options, page).await?)?
        }
        Resource::Persons => {
            to_json(db.search::<PersonRow>(resource, criteria, options, page).await?)?
        }
        Resource::ReferencePersons => {
            to_json(db.search::<ReferencePersonRow>(resource, criteria, options, page).await?)?
        }
    };
    Ok(rows)
}

fn to_json<T: Serialize>(rows: Vec<T>) -> Result<serde_json::Value> {
    serde_json::to_value(rows).context("Failed to serialize search results")
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::compile;
    use crate::domain::resources::MEDICAL_HISTORY;

    #[test]
    fn test_compiled_json() {
        let compiled = compile(
            &MEDICAL_HISTORY,
            &Criteria::from_pairs([("medicamento", "ibuprofeno"), ("paciente_id", "5")]),
        );
        let value = compiled_json(Resource::MedicalHistory, &compiled);

        assert_eq!(
            value,
            json!({
                "resource": "medical-history",
                "predicate": "1=1 AND paciente_id = ? AND id IN (SELECT historial_id FROM recetas WHERE medicamento LIKE ?)",
                "fragments": [
                    "AND paciente_id = ?",
                    "AND id IN (SELECT historial_id FROM recetas WHERE medicamento LIKE ?)"
                ],
                "params": [5, "%ibuprofeno%"],
            })
        );
    }

    #[test]
    fn test_resources_json() {
        let value = resources_json();
        let list = value.as_array().unwrap();

        assert_eq!(list.len(), 4);
        assert_eq!(list[2]["resource"], "persons");
        assert_eq!(list[2]["table"], "personas");
        assert_eq!(
            list[2]["keys"],
            json!(["dni", "nombre", "apellido", "direccion", "telefono"])
        );
    }

    #[tokio::test]
    async fn test_search_json_uses_resource_row_type() {
        let db = SqliteService::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO personas (id, dni, nombre, apellido) VALUES (1, '30111222', 'Ana', 'Gomez');
             INSERT INTO personas_referencia (paciente_id, nombre, apellido, relacion)
             VALUES (1, 'Rosa', 'Gomez', 'madre');",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let value = search_json(
            &db,
            Resource::ReferencePersons,
            &Criteria::from_pairs([("relacion", "mad")]),
            CompileOptions::default(),
            Page::new(10, 0),
        )
        .await
        .unwrap();

        assert_eq!(value[0]["nombre"], "Rosa");
        assert_eq!(value[0]["paciente_id"], 1);
        assert_eq!(value[0]["dni"], serde_json::Value::Null);
    }
}
