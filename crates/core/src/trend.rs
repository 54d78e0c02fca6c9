//! Trend series projection.
//!
//! Turns a reading history (any order) into a dual-axis chart series, oldest first:
//!
//! - left axis: heart rate (bpm) and systolic blood pressure (mmHg), domain padded
//!   [`LEFT_AXIS_PADDING`] beyond the combined observed min/max
//! - right axis: temperature (°F) and oxygen saturation (%), fixed [`RIGHT_AXIS_DOMAIN`]
//!
//! Diastolic pressure is not charted.

use crate::constants::{LEFT_AXIS_PADDING, RIGHT_AXIS_DOMAIN};
use crate::model::{self, Reading};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    HeartRate,
    Temperature,
    OxygenSaturation,
    SystolicBp,
}

impl Metric {
    /// Chart line order.
    pub const ALL: [Metric; 4] = [
        Metric::HeartRate,
        Metric::Temperature,
        Metric::OxygenSaturation,
        Metric::SystolicBp,
    ];

    pub fn axis(self) -> AxisSide {
        match self {
            Metric::HeartRate | Metric::SystolicBp => AxisSide::Left,
            Metric::Temperature | Metric::OxygenSaturation => AxisSide::Right,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::HeartRate => "Heart Rate",
            Metric::Temperature => "Temperature",
            Metric::OxygenSaturation => "O2 Saturation",
            Metric::SystolicBp => "Systolic BP",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::HeartRate => "bpm",
            Metric::Temperature => "°F",
            Metric::OxygenSaturation => "%",
            Metric::SystolicBp => "mmHg",
        }
    }

    /// Legend entry, e.g. `Heart Rate (bpm)`.
    pub fn legend(self) -> String {
        format!("{} ({})", self.label(), self.unit())
    }

    /// Value with its unit as shown in the tooltip.
    fn format_value(self, value: f64) -> String {
        match self {
            Metric::HeartRate | Metric::SystolicBp => format!("{value} {}", self.unit()),
            Metric::Temperature | Metric::OxygenSaturation => format!("{value}{}", self.unit()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// 1-based position in the chronological series.
    pub index: usize,
    pub date_label: String,
    pub time_label: String,
    /// Full date and time, used as the tooltip title.
    pub timestamp_label: String,
    pub heart_rate: u16,
    pub temperature: f64,
    pub oxygen_saturation: f64,
    pub systolic_bp: u16,
}

impl ChartPoint {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::HeartRate => f64::from(self.heart_rate),
            Metric::Temperature => self.temperature,
            Metric::OxygenSaturation => self.oxygen_saturation,
            Metric::SystolicBp => f64::from(self.systolic_bp),
        }
    }

    pub fn tooltip(&self) -> Tooltip {
        Tooltip {
            title: self.timestamp_label.clone(),
            lines: Metric::ALL
                .iter()
                .map(|&m| format!("{}: {}", m.label(), m.format_value(self.value(m))))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub points: Vec<ChartPoint>,
    pub left_axis: AxisDomain,
    pub right_axis: AxisDomain,
}

impl TrendSeries {
    pub fn domain(&self, side: AxisSide) -> AxisDomain {
        match side {
            AxisSide::Left => self.left_axis,
            AxisSide::Right => self.right_axis,
        }
    }

    pub fn caption(&self) -> String {
        format!("Showing {} readings over time", self.points.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendProjection {
    /// Nothing to plot; render a placeholder instead of an empty chart.
    NoData,
    Series(TrendSeries),
}

/// Projects `readings` into a chart series, labelling timestamps in `tz`.
pub fn project<Tz>(readings: &[Reading], tz: &Tz) -> TrendProjection
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if readings.is_empty() {
        return TrendProjection::NoData;
    }

    let points: Vec<ChartPoint> = model::chronological(readings)
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let local: DateTime<Tz> = r.recorded_at.with_timezone(tz);
            ChartPoint {
                index: i + 1,
                date_label: local.format("%Y-%m-%d").to_string(),
                time_label: local.format("%H:%M").to_string(),
                timestamp_label: local.format("%Y-%m-%d %H:%M:%S").to_string(),
                heart_rate: r.heart_rate,
                temperature: r.temperature,
                oxygen_saturation: r.oxygen_saturation,
                systolic_bp: r.blood_pressure.systolic(),
            }
        })
        .collect();

    let left_values = points
        .iter()
        .flat_map(|p| [p.heart_rate, p.systolic_bp])
        .map(f64::from);
    let (lo, hi) = left_values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    TrendProjection::Series(TrendSeries {
        points,
        left_axis: AxisDomain {
            min: lo - LEFT_AXIS_PADDING,
            max: hi + LEFT_AXIS_PADDING,
        },
        right_axis: AxisDomain {
            min: RIGHT_AXIS_DOMAIN.0,
            max: RIGHT_AXIS_DOMAIN.1,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fake::t0;
    use chrono::{Duration, FixedOffset, Utc};
    use proptest::prelude::*;
    use vitals_types::{BloodPressure, PatientId};

    fn reading(minutes: i64, bp: &str, heart_rate: u16, temperature: f64) -> Reading {
        Reading {
            patient_id: PatientId::new("1"),
            blood_pressure: BloodPressure::parse(bp).unwrap(),
            heart_rate,
            temperature,
            oxygen_saturation: 97.0,
            recorded_at: t0() + Duration::minutes(minutes),
        }
    }

    fn series(projection: TrendProjection) -> TrendSeries {
        match projection {
            TrendProjection::Series(s) => s,
            TrendProjection::NoData => panic!("expected a series"),
        }
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert_eq!(project(&[], &Utc), TrendProjection::NoData);
    }

    #[test]
    fn test_descending_input_is_charted_oldest_first() {
        let readings = vec![
            reading(30, "130/85", 90, 99.1),
            reading(20, "125/82", 80, 98.9),
            reading(10, "120/80", 70, 98.6),
        ];
        let s = series(project(&readings, &Utc));

        assert_eq!(s.points.len(), 3);
        let hr: Vec<u16> = s.points.iter().map(|p| p.heart_rate).collect();
        assert_eq!(hr, vec![70, 80, 90]);
        let idx: Vec<usize> = s.points.iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![1, 2, 3]);
        assert_eq!(s.points[0].systolic_bp, 120);
        assert_eq!(s.caption(), "Showing 3 readings over time");
    }

    #[test]
    fn test_left_axis_pads_combined_range_right_axis_is_fixed() {
        let readings = vec![reading(1, "150/90", 55, 101.5), reading(2, "110/70", 120, 94.0)];
        let s = series(project(&readings, &Utc));

        assert_eq!(s.left_axis, AxisDomain { min: 45.0, max: 160.0 });
        assert_eq!(s.domain(AxisSide::Right), AxisDomain { min: 95.0, max: 105.0 });
    }

    #[test]
    fn test_labels_follow_time_zone() {
        let readings = vec![reading(0, "120/80", 70, 98.6)];
        let utc = series(project(&readings, &Utc));
        assert_eq!(utc.points[0].date_label, "2024-01-01");
        assert_eq!(utc.points[0].time_label, "08:00");

        let minus_nine = FixedOffset::west_opt(9 * 3600).unwrap();
        let shifted = series(project(&readings, &minus_nine));
        assert_eq!(shifted.points[0].date_label, "2023-12-31");
        assert_eq!(shifted.points[0].time_label, "23:00");
    }

    #[test]
    fn test_tooltip_carries_units() {
        let readings = vec![reading(0, "118/76", 72, 98.6)];
        let s = series(project(&readings, &Utc));
        let tip = s.points[0].tooltip();

        assert_eq!(tip.title, "2024-01-01 08:00:00");
        assert_eq!(
            tip.lines,
            vec![
                "Heart Rate: 72 bpm",
                "Temperature: 98.6°F",
                "O2 Saturation: 97%",
                "Systolic BP: 118 mmHg",
            ]
        );
    }

    #[test]
    fn test_metric_axes_and_legends() {
        let left: Vec<Metric> = Metric::ALL
            .into_iter()
            .filter(|m| m.axis() == AxisSide::Left)
            .collect();
        assert_eq!(left, vec![Metric::HeartRate, Metric::SystolicBp]);
        assert_eq!(Metric::Temperature.legend(), "Temperature (°F)");
    }

    proptest! {
        #[test]
        fn prop_output_sorted_and_same_length(offsets in proptest::collection::vec(0i64..10_000, 1..40)) {
            let readings: Vec<Reading> = offsets
                .iter()
                .map(|&m| reading(m, "120/80", 70, 98.6))
                .collect();
            let s = series(project(&readings, &Utc));
            prop_assert_eq!(s.points.len(), readings.len());
            let labels: Vec<&str> = s.points.iter().map(|p| p.timestamp_label.as_str()).collect();
            let mut sorted = labels.clone();
            sorted.sort();
            prop_assert_eq!(labels, sorted);
        }
    }
}
