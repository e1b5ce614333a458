use anyhow::{bail, Result};
use sqlx::postgres::PgPoolOptions;
use std::env;

mod config;
mod observability;

use config::AppConfig;
use db_client::schema;

enum Command {
    Apply,
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    let command = match args.get(1).map(String::as_str) {
        Some("apply") => Command::Apply,
        Some("verify") => Command::Verify,
        _ => bail!("usage: schema-tool <apply|verify>"),
    };

    let cfg = AppConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    match command {
        Command::Apply => {
            schema::apply(&pool).await?;
            schema::verify(&pool).await?;
            tracing::info!(schema = schema::SCHEMA_NAME, "schema applied and verified");
        }
        Command::Verify => {
            schema::verify(&pool).await?;
            tracing::info!(
                schema = schema::SCHEMA_NAME,
                tables = schema::TABLES.len(),
                "schema matches the declared tables"
            );
        }
    }

    Ok(())
}
