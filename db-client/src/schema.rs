//! Declarative schema for the client dashboard database.
//!
//! The five tables are declared as data: the same declaration renders the
//! `CREATE` statements and drives verification against
//! `information_schema.columns`. Every statement uses `IF NOT EXISTS`, so
//! [`apply`] is safe to run on every startup.

use sqlx::PgPool;

pub const SCHEMA_NAME: &str = "client_dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Date,
    /// `TIME WITHOUT TIME ZONE`.
    Time,
    /// Unconstrained `NUMERIC`.
    Numeric,
    NumericScaled { precision: u8, scale: u8 },
}

impl SqlType {
    fn ddl(&self) -> String {
        match self {
            SqlType::Text => "TEXT".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME WITHOUT TIME ZONE".to_string(),
            SqlType::Numeric => "NUMERIC".to_string(),
            SqlType::NumericScaled { precision, scale } => {
                format!("NUMERIC({precision},{scale})")
            }
        }
    }

    /// Compare against what `information_schema.columns` reports.
    /// Unconstrained NUMERIC comes back with a NULL precision.
    fn matches(&self, data_type: &str, precision: Option<i32>, scale: Option<i32>) -> bool {
        match self {
            SqlType::Text => data_type == "text",
            SqlType::Date => data_type == "date",
            SqlType::Time => data_type == "time without time zone",
            SqlType::Numeric => data_type == "numeric" && precision.is_none(),
            SqlType::NumericScaled { precision: p, scale: s } => {
                data_type == "numeric"
                    && precision == Some(i32::from(*p))
                    && scale == Some(i32::from(*s))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub not_null: bool,
}

const fn col(name: &'static str, sql_type: SqlType) -> ColumnDef {
    ColumnDef { name, sql_type, not_null: false }
}

const fn col_not_null(name: &'static str, sql_type: SqlType) -> ColumnDef {
    ColumnDef { name, sql_type, not_null: true }
}

#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn qualified_name(&self) -> String {
        format!("{SCHEMA_NAME}.{}", self.name)
    }

    pub fn create_ddl(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let mut line = format!("    {} {}", c.name, c.sql_type.ddl());
                if c.not_null {
                    line.push_str(" NOT NULL");
                }
                line
            })
            .collect::<Vec<_>>()
            .join(",\n");
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
            self.qualified_name(),
            columns
        )
    }
}

const NUMERIC_12_4: SqlType = SqlType::NumericScaled { precision: 12, scale: 4 };
const NUMERIC_15_4: SqlType = SqlType::NumericScaled { precision: 15, scale: 4 };
const NUMERIC_6_2: SqlType = SqlType::NumericScaled { precision: 6, scale: 2 };

/// All bill columns are text so that lines like "Net Payable" can carry `-`
/// in tariff and kWh/kW.
pub const DISCOM_BILL: TableDef = TableDef {
    name: "discom_bill_v2",
    columns: &[
        col("bill_header", SqlType::Text),
        col("unit", SqlType::Text),
        col("month_year", SqlType::Text),
        col("tariff", SqlType::Text),
        col("kwh_kw", SqlType::Text),
        col("cost_without_solar", SqlType::Text),
        col("cost_with_solar_wheeling", SqlType::Text),
        col("discom_bill", SqlType::Text),
        col("savings", SqlType::Text),
    ],
};

pub const GEN_CONS_15MIN: TableDef = TableDef {
    name: "gen_cons_15min_data_v2",
    columns: &[
        col("reading_date", SqlType::Date),
        col("reading_time", SqlType::Time),
        col("location", SqlType::Text),
        col("unit", SqlType::Text),
        col("tod_slot", SqlType::Text),
        col("consumption", SqlType::Numeric),
        col("supplied_generation", SqlType::Numeric),
    ],
};

/// The only table with NOT NULL constraints: the hourly aggregate key must
/// always be complete.
pub const HOURLY_GEN_CONS: TableDef = TableDef {
    name: "hourly_gen_con2_v2",
    columns: &[
        col_not_null("date", SqlType::Date),
        col_not_null("time", SqlType::Time),
        col_not_null("unit", SqlType::Text),
        col("tod_slot", SqlType::Text),
        col("consumption", NUMERIC_12_4),
        col("supplied_generation", NUMERIC_12_4),
    ],
};

pub const MONTHLY_BANKING_SETTLEMENT: TableDef = TableDef {
    name: "monthly_banking_settlement_data_v2",
    columns: &[
        col("month", SqlType::Text),
        col("unit", SqlType::Text),
        col("consumption", NUMERIC_15_4),
        col("supplied_generation", NUMERIC_15_4),
        col("surplus_generation", NUMERIC_15_4),
        col("surplus_demand", NUMERIC_15_4),
        col("matched_settlement", NUMERIC_15_4),
        col("settlement_with_banking", NUMERIC_15_4),
        col("surplus_generation_after_banking", NUMERIC_15_4),
        col("surplus_demand_after_banking", NUMERIC_15_4),
    ],
};

pub const MONTHLY_SAVINGS: TableDef = TableDef {
    name: "monthly_savings_v2",
    columns: &[
        col("month", SqlType::Text),
        col("unit", SqlType::Text),
        col("consumption", NUMERIC_15_4),
        col("grid_cost", NUMERIC_15_4),
        col("actual_cost_with_banking", NUMERIC_15_4),
        col("savings_with_banking", NUMERIC_15_4),
        col("savings_pct_with_banking", NUMERIC_6_2),
        col("actual_cost_without_banking", NUMERIC_15_4),
        col("savings_without_banking", NUMERIC_15_4),
        col("savings_pct_without_banking", NUMERIC_6_2),
    ],
};

pub const TABLES: [TableDef; 5] = [
    DISCOM_BILL,
    GEN_CONS_15MIN,
    HOURLY_GEN_CONS,
    MONTHLY_BANKING_SETTLEMENT,
    MONTHLY_SAVINGS,
];

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("table {0} is missing")]
    MissingTable(String),
    #[error("table {table} is missing column {column}")]
    MissingColumn { table: String, column: String },
    #[error("table {table} has undeclared column {column}")]
    UnexpectedColumn { table: String, column: String },
    #[error("column {table}.{column} has type {found}, declared {declared}")]
    TypeMismatch {
        table: String,
        column: String,
        declared: String,
        found: String,
    },
    #[error("column {table}.{column} nullability differs from declaration (NOT NULL: {not_null})")]
    NullabilityMismatch {
        table: String,
        column: String,
        not_null: bool,
    },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Create the schema and all tables (idempotent). Safe to call on every
/// startup; a second run is a no-op.
pub async fn apply(pool: &PgPool) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {SCHEMA_NAME};"))
        .execute(&mut *tx)
        .await?;

    for table in &TABLES {
        sqlx::query(&table.create_ddl()).execute(&mut *tx).await?;
        tracing::debug!(table = table.name, "ensured table exists");
    }

    tx.commit().await?;
    tracing::info!(schema = SCHEMA_NAME, tables = TABLES.len(), "schema applied");
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    is_nullable: String,
    numeric_precision: Option<i32>,
    numeric_scale: Option<i32>,
}

// information_schema exposes domain types (sql_identifier, cardinal_number);
// cast to base types so the rows decode without the macro layer.
const COLUMNS_SQL: &str = r#"
    SELECT
        column_name::text       AS column_name,
        data_type::text         AS data_type,
        is_nullable::text       AS is_nullable,
        numeric_precision::int  AS numeric_precision,
        numeric_scale::int      AS numeric_scale
    FROM information_schema.columns
    WHERE table_schema = $1
      AND table_name = $2
    ORDER BY ordinal_position
"#;

/// Check that every declared table exists with exactly the declared columns,
/// types and nullability.
pub async fn verify(pool: &PgPool) -> Result<(), SchemaError> {
    for table in &TABLES {
        let rows: Vec<ColumnRow> = sqlx::query_as(COLUMNS_SQL)
            .bind(SCHEMA_NAME)
            .bind(table.name)
            .fetch_all(pool)
            .await?;

        if rows.is_empty() {
            return Err(SchemaError::MissingTable(table.qualified_name()));
        }

        for column in table.columns {
            let Some(row) = rows.iter().find(|r| r.column_name == column.name) else {
                return Err(SchemaError::MissingColumn {
                    table: table.name.to_string(),
                    column: column.name.to_string(),
                });
            };

            if !column
                .sql_type
                .matches(&row.data_type, row.numeric_precision, row.numeric_scale)
            {
                return Err(SchemaError::TypeMismatch {
                    table: table.name.to_string(),
                    column: column.name.to_string(),
                    declared: column.sql_type.ddl(),
                    found: row.data_type.clone(),
                });
            }

            let nullable = row.is_nullable == "YES";
            if nullable == column.not_null {
                return Err(SchemaError::NullabilityMismatch {
                    table: table.name.to_string(),
                    column: column.name.to_string(),
                    not_null: column.not_null,
                });
            }
        }

        for row in &rows {
            if !table.columns.iter().any(|c| c.name == row.column_name) {
                return Err(SchemaError::UnexpectedColumn {
                    table: table.name.to_string(),
                    column: row.column_name.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_tables_declared() {
        let names: Vec<&str> = TABLES.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "discom_bill_v2",
                "gen_cons_15min_data_v2",
                "hourly_gen_con2_v2",
                "monthly_banking_settlement_data_v2",
                "monthly_savings_v2",
            ]
        );
    }

    #[test]
    fn every_statement_is_idempotent() {
        for table in &TABLES {
            let ddl = table.create_ddl();
            assert!(
                ddl.starts_with("CREATE TABLE IF NOT EXISTS client_dashboard."),
                "{ddl}"
            );
        }
    }

    #[test]
    fn only_hourly_table_has_not_null_columns() {
        for table in &TABLES {
            let not_null: Vec<&str> = table
                .columns
                .iter()
                .filter(|c| c.not_null)
                .map(|c| c.name)
                .collect();
            if table.name == HOURLY_GEN_CONS.name {
                assert_eq!(not_null, ["date", "time", "unit"]);
            } else {
                assert!(not_null.is_empty(), "{} declares NOT NULL", table.name);
            }
        }
    }

    #[test]
    fn column_names_are_unique_per_table() {
        for table in &TABLES {
            let mut names: Vec<&str> = table.columns.iter().map(|c| c.name).collect();
            names.sort_unstable();
            let before = names.len();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate column in {}", table.name);
        }
    }

    #[test]
    fn interval_quantities_are_unconstrained_numeric() {
        for name in ["consumption", "supplied_generation"] {
            let column = GEN_CONS_15MIN
                .columns
                .iter()
                .find(|c| c.name == name)
                .unwrap();
            assert_eq!(column.sql_type, SqlType::Numeric);
        }
    }

    #[test]
    fn hourly_ddl_renders_fixed_precision_and_not_null() {
        let ddl = HOURLY_GEN_CONS.create_ddl();
        assert!(ddl.contains("date DATE NOT NULL"), "{ddl}");
        assert!(ddl.contains("time TIME WITHOUT TIME ZONE NOT NULL"), "{ddl}");
        assert!(ddl.contains("consumption NUMERIC(12,4)"), "{ddl}");
    }

    #[test]
    fn savings_percentages_use_narrow_precision() {
        for name in ["savings_pct_with_banking", "savings_pct_without_banking"] {
            let column = MONTHLY_SAVINGS
                .columns
                .iter()
                .find(|c| c.name == name)
                .unwrap();
            assert_eq!(
                column.sql_type,
                SqlType::NumericScaled { precision: 6, scale: 2 }
            );
        }
    }

    #[test]
    fn sql_type_matches_information_schema_shapes() {
        assert!(SqlType::Numeric.matches("numeric", None, None));
        assert!(!SqlType::Numeric.matches("numeric", Some(12), Some(4)));
        assert!(NUMERIC_12_4.matches("numeric", Some(12), Some(4)));
        assert!(!NUMERIC_12_4.matches("numeric", Some(15), Some(4)));
        assert!(SqlType::Time.matches("time without time zone", None, None));
        assert!(!SqlType::Time.matches("time with time zone", None, None));
    }
}
