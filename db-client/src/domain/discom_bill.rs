/// One DISCOM bill line item in `discom_bill_v2`.
///
/// Every column is text: tariff and kWh/kW hold `-` on lines where the
/// figure does not apply (e.g. the Net Payable summary line).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DiscomBillLine {
    pub bill_header: String,
    pub unit: String,
    pub month_year: String,
    pub tariff: String,
    pub kwh_kw: String,
    pub cost_without_solar: String,
    pub cost_with_solar_wheeling: String,
    pub discom_bill: String,
    pub savings: String,
}
