//! Chart-ready projection of a [`NormalizedUserRecord`].
//!
//! Everything here is derived, never fetched: display ordering of the
//! performance radar, French axis labels, and the min/max domains the
//! activity bar chart needs.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::{DayOfWeek, NormalizedUserRecord, PerformanceCategory};

/// Order in which the radar chart walks the performance categories.
pub const DISPLAY_ORDER: [PerformanceCategory; 6] = [
    PerformanceCategory::Intensity,
    PerformanceCategory::Speed,
    PerformanceCategory::Strength,
    PerformanceCategory::Endurance,
    PerformanceCategory::Energy,
    PerformanceCategory::Cardio,
];

/// Headroom added above the highest calorie bar.
const CALORIES_HEADROOM: f64 = 50.0;
const KILOGRAM_MARGIN_BELOW: f64 = 2.0;
const KILOGRAM_MARGIN_ABOVE: f64 = 1.0;

pub fn category_label(category: PerformanceCategory) -> &'static str {
    match category {
        PerformanceCategory::Intensity => "Intensité",
        PerformanceCategory::Speed => "Vitesse",
        PerformanceCategory::Strength => "Force",
        PerformanceCategory::Endurance => "Endurance",
        PerformanceCategory::Energy => "Énergie",
        PerformanceCategory::Cardio => "Cardio",
    }
}

/// One-letter French weekday initial, Monday = "L".
pub fn weekday_letter(day: DayOfWeek) -> &'static str {
    const LETTERS: [&str; 7] = ["L", "M", "M", "J", "V", "S", "D"];
    LETTERS[usize::from(day.get() - 1)]
}

fn display_rank(category: PerformanceCategory) -> usize {
    DISPLAY_ORDER
        .iter()
        .position(|c| *c == category)
        .unwrap_or(DISPLAY_ORDER.len())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Calories,
    Proteins,
    Carbohydrates,
    Lipids,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Counter {
    pub kind: CounterKind,
    pub value: u32,
    pub unit: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RadarPoint {
    pub category: PerformanceCategory,
    pub label: &'static str,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceChart {
    pub points: Vec<RadarPoint>,
    /// Upper bound of the radial axis; 1 when there is nothing positive to plot.
    pub radius_max: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPoint {
    pub day_of_week: DayOfWeek,
    pub label: &'static str,
    pub minutes: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBar {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub kilogram: f64,
    pub calories: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityChart {
    pub bars: Vec<ActivityBar>,
    /// `[0, max + 50]`, absent for an empty chart.
    pub calories_domain: Option<[f64; 2]>,
    /// `[min - 2, max + 1]`, absent for an empty chart.
    pub kilogram_domain: Option<[f64; 2]>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub user_id: u32,
    pub greeting_name: String,
    /// Today's score as a whole percentage.
    pub score_percent: u32,
    pub counters: Vec<Counter>,
    pub performance: PerformanceChart,
    pub sessions: Vec<SessionPoint>,
    pub activity: ActivityChart,
}

impl DashboardView {
    pub fn from_record(record: &NormalizedUserRecord) -> Self {
        let counts = record.counts();
        let counters = vec![
            Counter {
                kind: CounterKind::Calories,
                value: counts.calories,
                unit: "kCal",
            },
            Counter {
                kind: CounterKind::Proteins,
                value: counts.proteins,
                unit: "g",
            },
            Counter {
                kind: CounterKind::Carbohydrates,
                value: counts.carbohydrates,
                unit: "g",
            },
            Counter {
                kind: CounterKind::Lipids,
                value: counts.lipids,
                unit: "g",
            },
        ];

        let sessions = record
            .average_sessions()
            .iter()
            .map(|s| SessionPoint {
                day_of_week: s.day_of_week,
                label: weekday_letter(s.day_of_week),
                minutes: s.session_length_minutes,
            })
            .collect();

        Self {
            user_id: record.identity().id,
            greeting_name: record.identity().first_name.clone(),
            score_percent: (record.today_score() * 100.0).round() as u32,
            counters,
            performance: performance_chart(record),
            sessions,
            activity: activity_chart(record),
        }
    }
}

fn performance_chart(record: &NormalizedUserRecord) -> PerformanceChart {
    let mut entries = record.performance().to_vec();
    entries.sort_by_key(|e| display_rank(e.category));
    let points: Vec<RadarPoint> = entries
        .into_iter()
        .map(|e| RadarPoint {
            category: e.category,
            label: category_label(e.category),
            value: e.value,
        })
        .collect();
    let max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    PerformanceChart {
        points,
        radius_max: if max > 0.0 { max } else { 1.0 },
    }
}

fn activity_chart(record: &NormalizedUserRecord) -> ActivityChart {
    let bars: Vec<ActivityBar> = record
        .daily_activity()
        .iter()
        .map(|a| ActivityBar {
            date: a.date,
            day_of_month: a.date.day(),
            kilogram: a.body_mass_kg,
            calories: a.calories_burned,
        })
        .collect();

    let (calories_domain, kilogram_domain) = if bars.is_empty() {
        (None, None)
    } else {
        let max_cal = bars.iter().map(|b| b.calories).fold(f64::NEG_INFINITY, f64::max);
        let min_kg = bars.iter().map(|b| b.kilogram).fold(f64::INFINITY, f64::min);
        let max_kg = bars.iter().map(|b| b.kilogram).fold(f64::NEG_INFINITY, f64::max);
        (
            Some([0.0, max_cal + CALORIES_HEADROOM]),
            Some([min_kg - KILOGRAM_MARGIN_BELOW, max_kg + KILOGRAM_MARGIN_ABOVE]),
        )
    };

    ActivityChart {
        bars,
        calories_domain,
        kilogram_domain,
    }
}
