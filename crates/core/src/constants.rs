//! Constants used throughout the vitals core crate.
//!
//! Clinical input ranges, chart geometry and configuration defaults live here so that the
//! validator, projector and config layer agree on a single set of numbers.

use std::ops::RangeInclusive;

/// Accepted heart rate in beats per minute (closed interval).
pub const HEART_RATE_RANGE: RangeInclusive<u16> = 30..=300;

/// Accepted body temperature in degrees Fahrenheit (closed interval).
pub const TEMPERATURE_RANGE_F: RangeInclusive<f64> = 90.0..=110.0;

/// Accepted oxygen saturation in percent (closed interval).
pub const OXYGEN_SATURATION_RANGE: RangeInclusive<f64> = 70.0..=100.0;

/// Accepted patient age in years (closed interval).
pub const AGE_RANGE: RangeInclusive<u8> = 0..=150;

/// Number of patients shown per list page.
pub const PAGE_SIZE: u32 = 10;

/// Padding applied either side of the observed heart rate / systolic range on the left axis.
pub const LEFT_AXIS_PADDING: f64 = 10.0;

/// Fixed domain of the right axis (temperature and oxygen saturation).
pub const RIGHT_AXIS_DOMAIN: (f64, f64) = (95.0, 105.0);

/// Backend base URL used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Request timeout in seconds used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
