use time::Date;

pub mod discom_bill;
pub mod hourly_reading;
pub mod interval_reading;
pub mod monthly_savings;
pub mod monthly_settlement;

pub use discom_bill::DiscomBillLine;
pub use hourly_reading::HourlyReading;
pub use interval_reading::IntervalReading;
pub use monthly_savings::MonthlySavings;
pub use monthly_settlement::MonthlySettlement;

/// Month label used by the monthly tables, e.g. `"2025-08"`.
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn month_key_is_zero_padded() {
        assert_eq!(month_key(date!(2025 - 08 - 14)), "2025-08");
        assert_eq!(month_key(date!(2025 - 12 - 01)), "2025-12");
    }
}
