use rust_decimal::Decimal;

/// One monthly net-metering settlement row in
/// `monthly_banking_settlement_data_v2`. `month` is a `YYYY-MM` label and
/// `unit` the `"LOCATION (CODE)"` display form.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlySettlement {
    pub month: String,
    pub unit: String,
    pub consumption: Decimal,
    pub supplied_generation: Decimal,
    pub surplus_generation: Decimal,
    pub surplus_demand: Decimal,
    pub matched_settlement: Decimal,
    pub settlement_with_banking: Decimal,
    pub surplus_generation_after_banking: Decimal,
    pub surplus_demand_after_banking: Decimal,
}
