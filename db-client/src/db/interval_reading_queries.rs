use std::collections::HashSet;

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::{Date, Time};

use crate::domain::IntervalReading;

use super::{partition_new, InsertSummary, CHUNK_ROWS};

/// Insert readings whose `(reading_date, reading_time, unit)` key is not
/// already present.
pub async fn insert_new(pool: &PgPool, readings: &[IntervalReading]) -> Result<InsertSummary> {
    if readings.is_empty() {
        return Ok(InsertSummary::default());
    }

    let keys: Vec<(Date, Time, &str)> = readings
        .iter()
        .map(|r| (r.reading_date, r.reading_time, r.unit.as_str()))
        .collect();
    let existing = existing_keys(pool, &keys).await?;
    let (fresh, skipped) = partition_new(readings, &existing, |r| {
        (r.reading_date, r.reading_time, r.unit.clone())
    });

    let mut inserted = 0u64;
    for chunk in fresh.chunks(CHUNK_ROWS) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO client_dashboard.gen_cons_15min_data_v2 \
             (reading_date, reading_time, location, unit, tod_slot, consumption, supplied_generation) ",
        );
        builder.push_values(chunk, |mut b, r| {
            b.push_bind(r.reading_date)
                .push_bind(r.reading_time)
                .push_bind(&r.location)
                .push_bind(&r.unit)
                .push_bind(&r.tod_slot)
                .push_bind(r.consumption)
                .push_bind(r.supplied_generation);
        });
        inserted += builder.build().execute(pool).await?.rows_affected();
    }

    tracing::info!(inserted, skipped_duplicates = skipped, "loaded 15-minute readings");
    Ok(InsertSummary { inserted, skipped_duplicates: skipped })
}

async fn existing_keys(
    pool: &PgPool,
    keys: &[(Date, Time, &str)],
) -> Result<HashSet<(Date, Time, String)>> {
    let mut existing = HashSet::new();
    for chunk in keys.chunks(CHUNK_ROWS) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT reading_date, reading_time, unit \
             FROM client_dashboard.gen_cons_15min_data_v2 \
             WHERE (reading_date, reading_time, unit) IN ",
        );
        builder.push_tuples(chunk, |mut b, (date, time, unit)| {
            b.push_bind(*date).push_bind(*time).push_bind(*unit);
        });
        let rows: Vec<(Date, Time, String)> = builder.build_query_as().fetch_all(pool).await?;
        existing.extend(rows);
    }
    Ok(existing)
}

/// Fetch a time-ordered 15-minute profile for a single unit over
/// `[start, end)`.
pub async fn load_profile(
    pool: &PgPool,
    unit: &str,
    start: Date,
    end: Date,
) -> Result<Vec<IntervalReading>> {
    let rows = sqlx::query_as::<_, IntervalReading>(
        r#"
        SELECT
            reading_date,
            reading_time,
            location,
            unit,
            tod_slot,
            consumption,
            supplied_generation
        FROM client_dashboard.gen_cons_15min_data_v2
        WHERE unit = $1
          AND reading_date >= $2
          AND reading_date <  $3
        ORDER BY reading_date, reading_time
        "#,
    )
    .bind(unit)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
