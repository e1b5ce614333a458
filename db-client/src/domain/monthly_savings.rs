use rust_decimal::Decimal;

/// One monthly savings comparison row in `monthly_savings_v2`, split into
/// with-banking and without-banking figures.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlySavings {
    pub month: String,
    pub unit: String,
    pub consumption: Decimal,
    pub grid_cost: Decimal,
    pub actual_cost_with_banking: Decimal,
    pub savings_with_banking: Decimal,
    pub savings_pct_with_banking: Decimal,
    pub actual_cost_without_banking: Decimal,
    pub savings_without_banking: Decimal,
    pub savings_pct_without_banking: Decimal,
}
