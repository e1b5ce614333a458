use rust_decimal::Decimal;
use time::{Date, Time};

/// One hourly aggregate row in `hourly_gen_con2_v2`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HourlyReading {
    pub date: Date,
    pub time: Time,
    pub unit: String,
    pub tod_slot: String,
    pub consumption: Decimal,
    pub supplied_generation: Decimal,
}
