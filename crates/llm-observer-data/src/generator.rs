//! Deterministic synthetic sales data generation.
//!
//! This module produces reproducible daily sales observations for exercising
//! LLM-written SQL against a known table. The same parameters and the same
//! current date always produce identical records.

use chrono::{Datelike, Days, NaiveDate};
use mockable::Clock;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::GenerationError;
use crate::holidays::HolidayCalendar;
use crate::sales::SalesRecord;

/// Default upper bound for sampled demand.
pub const DEFAULT_BASE_DEMAND: u32 = 1000;

/// Default width of the look-back window in days.
pub const DEFAULT_DAY_RANGE: u32 = 100;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 123_456_789;

/// Lower bound of the day-offset window.
const MIN_DAY_OFFSET: f64 = 1.0;

/// Temperature bounds in degrees Celsius.
const TEMPERATURE_RANGE: (f64, f64) = (0.0, 35.0);

/// Mean of the exponential rainfall distribution in millimetres.
const RAINFALL_MEAN: f64 = 5.0;

/// Price bounds per kilogram.
const PRICE_RANGE: (f64, f64) = (0.5, 3.0);

/// Lower bound for sampled demand.
const MIN_DEMAND: f64 = 1.0;

/// Weekday index (Monday = 0) from which days count as weekend.
const FIRST_WEEKEND_DAY: u32 = 5;

/// Parameters for a sales data generation run.
///
/// # Example
///
/// ```
/// use llm_observer_data::SalesDataParams;
///
/// let params = SalesDataParams::new(100).with_seed(7).with_day_range(30);
///
/// assert_eq!(params.n_rows, 100);
/// assert_eq!(params.base_demand, 1000);
/// assert_eq!(params.day_range, 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesDataParams {
    /// Number of records to generate.
    pub n_rows: usize,
    /// Upper bound for sampled demand.
    pub base_demand: u32,
    /// Dates are drawn from the `day_range` days before today.
    pub day_range: u32,
    /// RNG seed.
    pub seed: u64,
}

impl SalesDataParams {
    /// Creates parameters for `n_rows` records with default bounds and seed.
    #[must_use]
    pub const fn new(n_rows: usize) -> Self {
        Self {
            n_rows,
            base_demand: DEFAULT_BASE_DEMAND,
            day_range: DEFAULT_DAY_RANGE,
            seed: DEFAULT_SEED,
        }
    }

    /// Overrides the demand ceiling.
    #[must_use]
    pub const fn with_base_demand(mut self, base_demand: u32) -> Self {
        self.base_demand = base_demand;
        self
    }

    /// Overrides the look-back window.
    #[must_use]
    pub const fn with_day_range(mut self, day_range: u32) -> Self {
        self.day_range = day_range;
        self
    }

    /// Overrides the RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), GenerationError> {
        if self.day_range < 1 {
            return Err(GenerationError::InvalidArgument {
                name: "day_range",
                message: format!("must be at least 1, got {}", self.day_range),
            });
        }
        if self.base_demand < 1 {
            return Err(GenerationError::InvalidArgument {
                name: "base_demand",
                message: format!("must be at least 1, got {}", self.base_demand),
            });
        }
        Ok(())
    }
}

/// Generates sales records ordered by ascending date.
///
/// Dates are drawn from the window ending yesterday (relative to the clock's
/// local date) and reaching back `day_range - 1` days; a `day_range` of 1
/// dates every record yesterday. The calendar is queried once for the span
/// between the earliest and latest generated dates.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidArgument`] if `day_range` is 0,
/// `base_demand` is 0, or the window reaches before the earliest
/// representable date.
///
/// # Example
///
/// ```
/// use llm_observer_data::{NoHolidays, SalesDataParams, generate_sales_data};
/// use mockable::DefaultClock;
///
/// let params = SalesDataParams::new(5).with_seed(42);
/// let records = generate_sales_data(&params, &NoHolidays, &DefaultClock).expect("generated");
///
/// assert_eq!(records.len(), 5);
/// assert!(records.windows(2).all(|pair| pair[0].date <= pair[1].date));
/// ```
pub fn generate_sales_data(
    params: &SalesDataParams,
    calendar: &impl HolidayCalendar,
    clock: &dyn Clock,
) -> Result<Vec<SalesRecord>, GenerationError> {
    params.validate()?;
    if params.n_rows == 0 {
        return Ok(Vec::new());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let today = clock.local().date_naive();
    let upper_offset = f64::from(params.day_range);

    let mut dates = (0..params.n_rows)
        .map(|_| {
            let offset = if params.day_range > 1 {
                rng.random_range(MIN_DAY_OFFSET..upper_offset)
            } else {
                MIN_DAY_OFFSET
            };
            days_before(today, offset)
        })
        .collect::<Result<Vec<_>, _>>()?;
    dates.sort_unstable();

    let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
        return Ok(Vec::new());
    };
    let holidays = calendar.holidays(first, last);

    let demand_ceiling = f64::from(params.base_demand);
    let records: Vec<SalesRecord> = dates
        .into_iter()
        .map(|date| {
            let average_temperature =
                round_to(rng.random_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1), 1);
            let rainfall = round_to(sample_exponential(&mut rng, RAINFALL_MEAN), 1);
            let price_per_kg = round_to(rng.random_range(PRICE_RANGE.0..=PRICE_RANGE.1), 2);
            let demand = round_to(rng.random_range(MIN_DEMAND..=demand_ceiling), 1);

            SalesRecord {
                date,
                average_temperature,
                rainfall,
                weekend: is_weekend(date),
                holiday: holidays.contains(&date),
                price_per_kg,
                demand,
                month: date.month(),
                total_spend: total_spend(demand, price_per_kg),
            }
        })
        .collect();

    debug!(
        rows = records.len(),
        seed = params.seed,
        first = %first,
        last = %last,
        holidays = holidays.len(),
        "generated sales data"
    );

    Ok(records)
}

/// Subtracts a fractional day offset, truncated to whole days, from `today`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "offsets are sampled from [1, u32::MAX) so truncation to u64 is exact"
)]
fn days_before(today: NaiveDate, offset: f64) -> Result<NaiveDate, GenerationError> {
    let whole_days = offset.trunc() as u64;
    today
        .checked_sub_days(Days::new(whole_days))
        .ok_or_else(|| GenerationError::InvalidArgument {
            name: "day_range",
            message: format!("{whole_days} days before {today} is not a representable date"),
        })
}

fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= FIRST_WEEKEND_DAY
}

/// Draws from an exponential distribution by inverse transform sampling.
#[expect(clippy::float_arithmetic, reason = "inverse CDF of the exponential")]
fn sample_exponential(rng: &mut ChaCha8Rng, mean: f64) -> f64 {
    let uniform: f64 = rng.random();
    -mean * (1.0 - uniform).ln()
}

#[expect(clippy::float_arithmetic, reason = "spend is a product of two floats")]
fn total_spend(demand: f64, price_per_kg: f64) -> f64 {
    round_to(demand * price_per_kg, 2)
}

/// Rounds to `decimals` places.
///
/// Fixed-precision formatting rounds the exact binary value, ties to even.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
