use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::DiscomBillLine;

use super::CHUNK_ROWS;

/// Append bill line items. The bill table has no natural key (the same
/// header can recur across revisions of a bill), so there is no duplicate
/// filtering here.
pub async fn insert(pool: &PgPool, lines: &[DiscomBillLine]) -> Result<u64> {
    let mut inserted = 0u64;
    for chunk in lines.chunks(CHUNK_ROWS) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO client_dashboard.discom_bill_v2 \
             (bill_header, unit, month_year, tariff, kwh_kw, cost_without_solar, \
              cost_with_solar_wheeling, discom_bill, savings) ",
        );
        builder.push_values(chunk, |mut b, line| {
            b.push_bind(&line.bill_header)
                .push_bind(&line.unit)
                .push_bind(&line.month_year)
                .push_bind(&line.tariff)
                .push_bind(&line.kwh_kw)
                .push_bind(&line.cost_without_solar)
                .push_bind(&line.cost_with_solar_wheeling)
                .push_bind(&line.discom_bill)
                .push_bind(&line.savings);
        });
        inserted += builder.build().execute(pool).await?.rows_affected();
    }

    tracing::info!(inserted, "loaded DISCOM bill lines");
    Ok(inserted)
}

/// All line items of one unit's bill for a given `YYYY-MM` month.
pub async fn bill_lines(
    pool: &PgPool,
    unit: &str,
    month_year: &str,
) -> Result<Vec<DiscomBillLine>> {
    let rows = sqlx::query_as::<_, DiscomBillLine>(
        r#"
        SELECT
            bill_header,
            unit,
            month_year,
            tariff,
            kwh_kw,
            cost_without_solar,
            cost_with_solar_wheeling,
            discom_bill,
            savings
        FROM client_dashboard.discom_bill_v2
        WHERE unit = $1
          AND month_year = $2
        "#,
    )
    .bind(unit)
    .bind(month_year)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
