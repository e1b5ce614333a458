use std::collections::HashSet;

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::MonthlySavings;

use super::{partition_new, InsertSummary, CHUNK_ROWS};

/// Insert savings rows whose `(month, unit)` key is not already present.
pub async fn insert_new(pool: &PgPool, rows: &[MonthlySavings]) -> Result<InsertSummary> {
    if rows.is_empty() {
        return Ok(InsertSummary::default());
    }

    let keys: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.month.as_str(), r.unit.as_str()))
        .collect();
    let existing = existing_keys(pool, &keys).await?;
    let (fresh, skipped) = partition_new(rows, &existing, |r| (r.month.clone(), r.unit.clone()));

    let mut inserted = 0u64;
    for chunk in fresh.chunks(CHUNK_ROWS) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO client_dashboard.monthly_savings_v2 \
             (month, unit, consumption, grid_cost, actual_cost_with_banking, savings_with_banking, \
              savings_pct_with_banking, actual_cost_without_banking, savings_without_banking, \
              savings_pct_without_banking) ",
        );
        builder.push_values(chunk, |mut b, r| {
            b.push_bind(&r.month)
                .push_bind(&r.unit)
                .push_bind(r.consumption)
                .push_bind(r.grid_cost)
                .push_bind(r.actual_cost_with_banking)
                .push_bind(r.savings_with_banking)
                .push_bind(r.savings_pct_with_banking)
                .push_bind(r.actual_cost_without_banking)
                .push_bind(r.savings_without_banking)
                .push_bind(r.savings_pct_without_banking);
        });
        inserted += builder.build().execute(pool).await?.rows_affected();
    }

    tracing::info!(inserted, skipped_duplicates = skipped, "loaded monthly savings");
    Ok(InsertSummary { inserted, skipped_duplicates: skipped })
}

async fn existing_keys(
    pool: &PgPool,
    keys: &[(&str, &str)],
) -> Result<HashSet<(String, String)>> {
    let mut existing = HashSet::new();
    for chunk in keys.chunks(CHUNK_ROWS) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT month, unit \
             FROM client_dashboard.monthly_savings_v2 \
             WHERE (month, unit) IN ",
        );
        builder.push_tuples(chunk, |mut b, (month, unit)| {
            b.push_bind(*month).push_bind(*unit);
        });
        let rows: Vec<(String, String)> = builder.build_query_as().fetch_all(pool).await?;
        existing.extend(rows);
    }
    Ok(existing)
}

/// All savings rows for one `YYYY-MM` month, ordered by unit.
pub async fn for_month(pool: &PgPool, month: &str) -> Result<Vec<MonthlySavings>> {
    let rows = sqlx::query_as::<_, MonthlySavings>(
        r#"
        SELECT
            month,
            unit,
            consumption,
            grid_cost,
            actual_cost_with_banking,
            savings_with_banking,
            savings_pct_with_banking,
            actual_cost_without_banking,
            savings_without_banking,
            savings_pct_without_banking
        FROM client_dashboard.monthly_savings_v2
        WHERE month = $1
        ORDER BY unit
        "#,
    )
    .bind(month)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
