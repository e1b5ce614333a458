use rust_decimal::Decimal;
use time::{Date, Time};

/// One raw 15-minute meter reading in `gen_cons_15min_data_v2`.
///
/// `location` is the plant name as it appears on the uploaded sheets;
/// `unit` is the DISCOM service-connection code it resolves to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IntervalReading {
    pub reading_date: Date,
    pub reading_time: Time,
    pub location: String,
    pub unit: String,
    pub tod_slot: String,
    pub consumption: Decimal,
    pub supplied_generation: Decimal,
}
