//! Generated sales record types.
//!
//! The field names double as the column names of the output table the
//! benchmark notebooks create from generated data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A synthetic daily sales observation.
///
/// `total_spend` is always derived from `demand` and `price_per_kg`; it is
/// never sampled independently.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use llm_observer_data::SalesRecord;
///
/// let record = SalesRecord {
///     date: NaiveDate::from_ymd_opt(2024, 7, 4).expect("valid date"),
///     average_temperature: 28.3,
///     rainfall: 0.4,
///     weekend: false,
///     holiday: true,
///     price_per_kg: 1.25,
///     demand: 412.0,
///     month: 7,
///     total_spend: 515.0,
/// };
///
/// assert_eq!(record.month, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Average temperature in degrees Celsius.
    pub average_temperature: f64,
    /// Rainfall in millimetres.
    pub rainfall: f64,
    /// Whether the date falls on a Saturday or Sunday.
    pub weekend: bool,
    /// Whether the date is in the holiday set.
    pub holiday: bool,
    /// Unit price per kilogram.
    pub price_per_kg: f64,
    /// Demand in kilograms.
    pub demand: f64,
    /// Calendar month of `date` (1-12).
    pub month: u32,
    /// `demand * price_per_kg`, rounded to two decimal places.
    pub total_spend: f64,
}
