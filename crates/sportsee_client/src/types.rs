//! Raw payloads as returned by the SportSee API.
//!
//! Field names follow the wire format exactly (`calorieCount`,
//! `sessionLength`, `kilogram`, ...). Sub-objects the normalizer depends on
//! are optional here so that a missing one is reported as a normalization
//! error naming the field instead of an opaque decode failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every endpoint wraps its payload in `{"data": ...}`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawUserPayload {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_infos: Option<RawUserInfos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_data: Option<RawKeyData>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawUserInfos {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawKeyData {
    pub calorie_count: u32,
    pub protein_count: u32,
    pub carbohydrate_count: u32,
    pub lipid_count: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawActivityPayload {
    pub user_id: u32,
    pub sessions: Vec<RawActivitySession>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RawActivitySession {
    /// Calendar day, `YYYY-MM-DD`.
    pub day: String,
    pub kilogram: f64,
    pub calories: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawAverageSessionsPayload {
    pub user_id: u32,
    pub sessions: Vec<RawAverageSession>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawAverageSession {
    /// 1 = Monday .. 7 = Sunday.
    pub day: u8,
    pub session_length: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawPerformancePayload {
    pub user_id: u32,
    /// Code → category name table, e.g. `{"1": "cardio"}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BTreeMap<u32, String>>,
    pub data: Vec<RawPerformanceSample>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RawPerformanceSample {
    pub value: f64,
    pub kind: u32,
}

/// The four payloads collected for one user.
#[derive(Clone, Debug, PartialEq)]
pub struct RawUserBundle {
    pub user: RawUserPayload,
    pub activity: RawActivityPayload,
    pub average_sessions: RawAverageSessionsPayload,
    pub performance: RawPerformancePayload,
}
