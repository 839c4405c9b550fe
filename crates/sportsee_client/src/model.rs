//! Canonical user record and the normalizer that builds it from raw payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{
    RawActivitySession, RawAverageSession, RawKeyData, RawPerformancePayload, RawUserBundle,
    RawUserPayload,
};

/// Structural problems found while building a [`NormalizedUserRecord`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("performance code {0} is not in the kind table")]
    UnknownCategoryCode(u32),
    #[error("unknown performance category: {0:?}")]
    UnknownCategoryName(String),
    #[error("invalid activity date: {0:?}")]
    InvalidDate(String),
    #[error("day of week must be within 1..=7, got {0}")]
    InvalidWeekday(u8),
    #[error("expected one average session per weekday, got {0} sessions")]
    InvalidSessionCount(usize),
    #[error("weekday {0} appears more than once in average sessions")]
    DuplicateWeekday(u8),
    #[error("today's score must be within [0, 1], got {0}")]
    ScoreOutOfRange(f64),
    #[error("{field} must be non-negative, got {value}")]
    NegativeValue { field: &'static str, value: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceCategory {
    Cardio,
    Energy,
    Endurance,
    Strength,
    Speed,
    Intensity,
}

impl PerformanceCategory {
    pub const ALL: [PerformanceCategory; 6] = [
        PerformanceCategory::Cardio,
        PerformanceCategory::Energy,
        PerformanceCategory::Endurance,
        PerformanceCategory::Strength,
        PerformanceCategory::Speed,
        PerformanceCategory::Intensity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceCategory::Cardio => "cardio",
            PerformanceCategory::Energy => "energy",
            PerformanceCategory::Endurance => "endurance",
            PerformanceCategory::Strength => "strength",
            PerformanceCategory::Speed => "speed",
            PerformanceCategory::Intensity => "intensity",
        }
    }
}

impl fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceCategory {
    type Err = NormalizeError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        PerformanceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| NormalizeError::UnknownCategoryName(s.to_string()))
    }
}

/// ISO day index, 1 = Monday .. 7 = Sunday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub fn new(day: u8) -> Result<Self, NormalizeError> {
        if (1..=7).contains(&day) {
            Ok(DayOfWeek(day))
        } else {
            Err(NormalizeError::InvalidWeekday(day))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn weekday(self) -> Weekday {
        match self.0 {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = NormalizeError;

    fn try_from(day: u8) -> Result<Self, Self::Error> {
        DayOfWeek::new(day)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: u32,
    pub age: u32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionCounts {
    pub calories: u32,
    pub carbohydrates: u32,
    pub lipids: u32,
    pub proteins: u32,
}

impl From<&RawKeyData> for NutritionCounts {
    fn from(key_data: &RawKeyData) -> Self {
        NutritionCounts {
            calories: key_data.calorie_count,
            carbohydrates: key_data.carbohydrate_count,
            lipids: key_data.lipid_count,
            proteins: key_data.protein_count,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub category: PerformanceCategory,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageSession {
    pub day_of_week: DayOfWeek,
    pub session_length_minutes: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub body_mass_kg: f64,
    pub calories_burned: f64,
}

/// The single shape the dashboard consumes, independent of the API layout.
///
/// Built in one pass from a complete [`RawUserBundle`] and never mutated
/// afterwards. List fields keep the length and order of their raw sources.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedUserRecord {
    identity: UserIdentity,
    today_score: f64,
    counts: NutritionCounts,
    performance: Vec<PerformanceEntry>,
    average_sessions: Vec<AverageSession>,
    daily_activity: Vec<DailyActivity>,
}

impl NormalizedUserRecord {
    pub fn from_bundle(bundle: &RawUserBundle) -> Result<Self, NormalizeError> {
        debug!(
            user_id = bundle.user.id,
            activity = bundle.activity.sessions.len(),
            average_sessions = bundle.average_sessions.sessions.len(),
            performance = bundle.performance.data.len(),
            "normalizing user payloads"
        );

        let identity = normalize_identity(&bundle.user)?;
        let today_score = resolve_today_score(&bundle.user)?;
        let counts = bundle
            .user
            .key_data
            .as_ref()
            .map(NutritionCounts::from)
            .ok_or(NormalizeError::MissingField("keyData"))?;
        let performance = normalize_performance(&bundle.performance)?;
        let average_sessions = bundle
            .average_sessions
            .sessions
            .iter()
            .map(normalize_average_session)
            .collect::<Result<Vec<_>, _>>()?;
        check_week_coverage(&average_sessions)?;
        let daily_activity = bundle
            .activity
            .sessions
            .iter()
            .map(normalize_daily_activity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            identity,
            today_score,
            counts,
            performance,
            average_sessions,
            daily_activity,
        })
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Goal completion as a fraction in `[0, 1]`.
    pub fn today_score(&self) -> f64 {
        self.today_score
    }

    pub fn counts(&self) -> &NutritionCounts {
        &self.counts
    }

    /// Performance entries in the order the API listed them.
    pub fn performance(&self) -> &[PerformanceEntry] {
        &self.performance
    }

    /// Exactly seven sessions, one per weekday, in source order.
    pub fn average_sessions(&self) -> &[AverageSession] {
        &self.average_sessions
    }

    pub fn daily_activity(&self) -> &[DailyActivity] {
        &self.daily_activity
    }
}

fn normalize_identity(user: &RawUserPayload) -> Result<UserIdentity, NormalizeError> {
    let infos = user
        .user_infos
        .as_ref()
        .ok_or(NormalizeError::MissingField("userInfos"))?;
    Ok(UserIdentity {
        id: user.id,
        age: infos.age,
        first_name: infos.first_name.clone(),
        last_name: infos.last_name.clone(),
    })
}

/// `score` wins over `todayScore` when both are present.
pub fn resolve_today_score(user: &RawUserPayload) -> Result<f64, NormalizeError> {
    let score = user
        .score
        .or(user.today_score)
        .ok_or(NormalizeError::MissingField("score"))?;
    if !(0.0..=1.0).contains(&score) {
        return Err(NormalizeError::ScoreOutOfRange(score));
    }
    Ok(score)
}

/// Resolve every sample's code through the payload's own `kind` table.
pub fn normalize_performance(
    payload: &RawPerformancePayload,
) -> Result<Vec<PerformanceEntry>, NormalizeError> {
    let kinds = payload
        .kind
        .as_ref()
        .ok_or(NormalizeError::MissingField("kind"))?;
    payload
        .data
        .iter()
        .map(|sample| -> Result<PerformanceEntry, NormalizeError> {
            let name = kinds
                .get(&sample.kind)
                .ok_or(NormalizeError::UnknownCategoryCode(sample.kind))?;
            Ok(PerformanceEntry {
                category: name.parse()?,
                value: sample.value,
            })
        })
        .collect()
}

fn normalize_average_session(raw: &RawAverageSession) -> Result<AverageSession, NormalizeError> {
    if raw.session_length < 0.0 {
        return Err(NormalizeError::NegativeValue {
            field: "sessionLength",
            value: raw.session_length,
        });
    }
    Ok(AverageSession {
        day_of_week: DayOfWeek::new(raw.day)?,
        session_length_minutes: raw.session_length,
    })
}

/// Seven sessions covering days 1..=7 once each; order is not checked.
fn check_week_coverage(sessions: &[AverageSession]) -> Result<(), NormalizeError> {
    let mut seen = [false; 7];
    for session in sessions {
        let day = session.day_of_week.get();
        let slot = &mut seen[usize::from(day - 1)];
        if *slot {
            return Err(NormalizeError::DuplicateWeekday(day));
        }
        *slot = true;
    }
    if sessions.len() != 7 {
        return Err(NormalizeError::InvalidSessionCount(sessions.len()));
    }
    Ok(())
}

fn normalize_daily_activity(raw: &RawActivitySession) -> Result<DailyActivity, NormalizeError> {
    if raw.calories < 0.0 {
        return Err(NormalizeError::NegativeValue {
            field: "calories",
            value: raw.calories,
        });
    }
    let date =
        parse_activity_date(&raw.day).ok_or_else(|| NormalizeError::InvalidDate(raw.day.clone()))?;
    Ok(DailyActivity {
        date,
        body_mass_kg: raw.kilogram,
        calories_burned: raw.calories,
    })
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose calendar date is kept.
pub fn parse_activity_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        RawActivityPayload, RawAverageSessionsPayload, RawPerformancePayload, RawUserPayload,
    };
    use serde_json::json;

    fn tom_jones_user() -> RawUserPayload {
        serde_json::from_value(json!({
            "id": 12,
            "userInfos": {"age": 31, "firstName": "Tom", "lastName": "Jones"},
            "todayScore": 0.12,
            "keyData": {"calorieCount": 1930, "proteinCount": 155, "carbohydrateCount": 290, "lipidCount": 50}
        }))
        .expect("user")
    }

    fn bundle_with_user(user: RawUserPayload) -> RawUserBundle {
        RawUserBundle {
            user,
            activity: serde_json::from_value::<RawActivityPayload>(json!({
                "userId": 12,
                "sessions": [
                    {"day": "2020-07-01", "kilogram": 80, "calories": 240},
                    {"day": "2020-07-02", "kilogram": 80, "calories": 220},
                    {"day": "2020-07-03", "kilogram": 81, "calories": 280}
                ]
            }))
            .expect("activity"),
            average_sessions: serde_json::from_value::<RawAverageSessionsPayload>(json!({
                "userId": 12,
                "sessions": [
                    {"day": 1, "sessionLength": 30},
                    {"day": 2, "sessionLength": 23},
                    {"day": 3, "sessionLength": 45},
                    {"day": 4, "sessionLength": 50},
                    {"day": 5, "sessionLength": 0},
                    {"day": 6, "sessionLength": 0},
                    {"day": 7, "sessionLength": 60}
                ]
            }))
            .expect("sessions"),
            performance: serde_json::from_value::<RawPerformancePayload>(json!({
                "userId": 12,
                "kind": {"1": "cardio", "2": "energy"},
                "data": [{"value": 80, "kind": 1}, {"value": 120, "kind": 2}]
            }))
            .expect("performance"),
        }
    }

    #[test]
    fn profile_is_normalized_into_identity_score_and_counts() {
        let record = NormalizedUserRecord::from_bundle(&bundle_with_user(tom_jones_user()))
            .expect("record");
        assert_eq!(
            record.identity(),
            &UserIdentity {
                id: 12,
                age: 31,
                first_name: "Tom".into(),
                last_name: "Jones".into(),
            }
        );
        assert_eq!(record.today_score(), 0.12);
        assert_eq!(
            record.counts(),
            &NutritionCounts {
                calories: 1930,
                proteins: 155,
                carbohydrates: 290,
                lipids: 50,
            }
        );
    }

    #[test]
    fn performance_codes_resolve_through_kind_table() {
        let record = NormalizedUserRecord::from_bundle(&bundle_with_user(tom_jones_user()))
            .expect("record");
        assert_eq!(
            record.performance(),
            &[
                PerformanceEntry {
                    category: PerformanceCategory::Cardio,
                    value: 80.0
                },
                PerformanceEntry {
                    category: PerformanceCategory::Energy,
                    value: 120.0
                },
            ]
        );
    }

    #[test]
    fn kind_table_is_per_payload_not_global() {
        let payload: RawPerformancePayload = serde_json::from_value(json!({
            "userId": 1,
            "kind": {"1": "speed", "9": "intensity"},
            "data": [{"value": 5, "kind": 9}, {"value": 7, "kind": 1}]
        }))
        .unwrap();
        let entries = normalize_performance(&payload).unwrap();
        assert_eq!(entries[0].category, PerformanceCategory::Intensity);
        assert_eq!(entries[1].category, PerformanceCategory::Speed);
    }

    #[test]
    fn score_key_wins_over_today_score() {
        let mut user = tom_jones_user();
        user.score = Some(0.3);
        user.today_score = Some(0.12);
        assert_eq!(resolve_today_score(&user).unwrap(), 0.3);

        user.score = None;
        assert_eq!(resolve_today_score(&user).unwrap(), 0.12);
    }

    #[test]
    fn missing_both_score_keys_fails() {
        let mut user = tom_jones_user();
        user.today_score = None;
        assert_eq!(
            resolve_today_score(&user),
            Err(NormalizeError::MissingField("score"))
        );
    }

    #[test]
    fn score_outside_unit_interval_is_rejected() {
        let mut user = tom_jones_user();
        user.today_score = Some(12.0);
        assert_eq!(
            resolve_today_score(&user),
            Err(NormalizeError::ScoreOutOfRange(12.0))
        );
    }

    #[test]
    fn lists_keep_source_length_and_order() {
        let bundle = bundle_with_user(tom_jones_user());
        let record = NormalizedUserRecord::from_bundle(&bundle).expect("record");

        assert_eq!(record.daily_activity().len(), bundle.activity.sessions.len());
        let dates: Vec<String> = record
            .daily_activity()
            .iter()
            .map(|a| a.date.to_string())
            .collect();
        assert_eq!(dates, ["2020-07-01", "2020-07-02", "2020-07-03"]);
        assert_eq!(record.daily_activity()[2].body_mass_kg, 81.0);
        assert_eq!(record.daily_activity()[2].calories_burned, 280.0);

        assert_eq!(record.average_sessions().len(), 7);
        let days: Vec<u8> = record
            .average_sessions()
            .iter()
            .map(|s| s.day_of_week.get())
            .collect();
        assert_eq!(days, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(record.average_sessions()[4].session_length_minutes, 0.0);
    }

    #[test]
    fn missing_key_data_fails_construction() {
        let mut user = tom_jones_user();
        user.key_data = None;
        let err = NormalizedUserRecord::from_bundle(&bundle_with_user(user)).unwrap_err();
        assert_eq!(err, NormalizeError::MissingField("keyData"));
    }

    #[test]
    fn missing_user_infos_fails_construction() {
        let mut user = tom_jones_user();
        user.user_infos = None;
        let err = NormalizedUserRecord::from_bundle(&bundle_with_user(user)).unwrap_err();
        assert_eq!(err, NormalizeError::MissingField("userInfos"));
    }

    #[test]
    fn unknown_performance_code_fails_construction() {
        let mut bundle = bundle_with_user(tom_jones_user());
        bundle.performance.data[1].kind = 42;
        let err = NormalizedUserRecord::from_bundle(&bundle).unwrap_err();
        assert_eq!(err, NormalizeError::UnknownCategoryCode(42));
    }

    #[test]
    fn unrecognized_category_name_fails_construction() {
        let mut bundle = bundle_with_user(tom_jones_user());
        if let Some(kinds) = bundle.performance.kind.as_mut() {
            kinds.insert(2, "flexibility".into());
        }
        let err = NormalizedUserRecord::from_bundle(&bundle).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::UnknownCategoryName("flexibility".into())
        );
    }

    #[test]
    fn out_of_range_weekday_fails_construction() {
        let mut bundle = bundle_with_user(tom_jones_user());
        bundle.average_sessions.sessions[0].day = 8;
        let err = NormalizedUserRecord::from_bundle(&bundle).unwrap_err();
        assert_eq!(err, NormalizeError::InvalidWeekday(8));
    }

    #[test]
    fn short_week_of_sessions_fails_construction() {
        let mut bundle = bundle_with_user(tom_jones_user());
        bundle.average_sessions.sessions.truncate(5);
        let err = NormalizedUserRecord::from_bundle(&bundle).unwrap_err();
        assert_eq!(err, NormalizeError::InvalidSessionCount(5));
    }

    #[test]
    fn repeated_weekday_fails_construction() {
        let mut bundle = bundle_with_user(tom_jones_user());
        bundle.average_sessions.sessions.truncate(3);
        bundle.average_sessions.sessions[0].day = 3;
        bundle.average_sessions.sessions[1].day = 3;
        let err = NormalizedUserRecord::from_bundle(&bundle).unwrap_err();
        assert_eq!(err, NormalizeError::DuplicateWeekday(3));
    }

    #[test]
    fn shuffled_week_keeps_source_order() {
        let mut bundle = bundle_with_user(tom_jones_user());
        bundle.average_sessions.sessions.reverse();
        let record = NormalizedUserRecord::from_bundle(&bundle).expect("record");
        let days: Vec<u8> = record
            .average_sessions()
            .iter()
            .map(|s| s.day_of_week.get())
            .collect();
        assert_eq!(days, [7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn negative_session_length_fails_construction() {
        let mut bundle = bundle_with_user(tom_jones_user());
        bundle.average_sessions.sessions[3].session_length = -1.0;
        let err = NormalizedUserRecord::from_bundle(&bundle).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::NegativeValue {
                field: "sessionLength",
                ..
            }
        ));
    }

    #[test]
    fn malformed_activity_date_fails_construction() {
        let mut bundle = bundle_with_user(tom_jones_user());
        bundle.activity.sessions[1].day = "July 2nd".into();
        let err = NormalizedUserRecord::from_bundle(&bundle).unwrap_err();
        assert_eq!(err, NormalizeError::InvalidDate("July 2nd".into()));
    }

    #[test]
    fn activity_dates_accept_rfc3339_timestamps() {
        assert_eq!(
            parse_activity_date("2020-07-04T10:30:00Z"),
            NaiveDate::from_ymd_opt(2020, 7, 4)
        );
        assert_eq!(parse_activity_date("not-a-date"), None);
    }

    #[test]
    fn category_names_parse_case_insensitively() {
        assert_eq!(
            "Cardio".parse::<PerformanceCategory>().unwrap(),
            PerformanceCategory::Cardio
        );
        assert_eq!(
            " intensity ".parse::<PerformanceCategory>().unwrap(),
            PerformanceCategory::Intensity
        );
    }

    #[test]
    fn day_of_week_maps_to_chrono_weekday() {
        assert_eq!(DayOfWeek::new(1).unwrap().weekday(), Weekday::Mon);
        assert_eq!(DayOfWeek::new(7).unwrap().weekday(), Weekday::Sun);
        assert!(DayOfWeek::new(0).is_err());
    }

    #[test]
    fn record_serializes_with_canonical_camel_case_names() {
        let record = NormalizedUserRecord::from_bundle(&bundle_with_user(tom_jones_user()))
            .expect("record");
        let v = serde_json::to_value(&record).expect("serialize");
        assert_eq!(v["identity"]["firstName"], "Tom");
        assert_eq!(v["todayScore"], 0.12);
        assert_eq!(v["counts"]["calories"], 1930);
        assert_eq!(v["performance"][0]["category"], "cardio");
        assert_eq!(v["averageSessions"][0]["dayOfWeek"], 1);
        assert_eq!(v["averageSessions"][0]["sessionLengthMinutes"], 30.0);
        assert_eq!(v["dailyActivity"][0]["date"], "2020-07-01");
        assert_eq!(v["dailyActivity"][0]["bodyMassKg"], 80.0);
        assert_eq!(v["dailyActivity"][0]["caloriesBurned"], 240.0);
    }
}
