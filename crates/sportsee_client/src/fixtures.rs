//! In-memory provider backed by fixture data, for demos and offline work.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::types::{
    RawActivityPayload, RawActivitySession, RawAverageSession, RawAverageSessionsPayload,
    RawKeyData, RawPerformancePayload, RawPerformanceSample, RawUserInfos, RawUserPayload,
};
use crate::{SportSeeClient, SportSeeError, UserId};

/// Payload collections served by [`FixtureSportSeeClient`], one entry per user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixtureData {
    pub users: Vec<RawUserPayload>,
    pub activity: Vec<RawActivityPayload>,
    pub average_sessions: Vec<RawAverageSessionsPayload>,
    pub performance: Vec<RawPerformancePayload>,
}

impl FixtureData {
    /// The two demo users (12 and 18) known to the SportSee mock service.
    pub fn demo() -> Self {
        Self {
            users: vec![
                RawUserPayload {
                    id: 12,
                    user_infos: Some(infos("Tom", "Jones", 31)),
                    score: None,
                    today_score: Some(0.12),
                    key_data: Some(key_data(1930, 155, 290, 50)),
                },
                RawUserPayload {
                    id: 18,
                    user_infos: Some(infos("Jane", "Thomas", 34)),
                    score: Some(0.3),
                    today_score: None,
                    key_data: Some(key_data(2500, 90, 150, 120)),
                },
            ],
            activity: vec![
                activity(
                    12,
                    &[(80, 240), (80, 220), (81, 280), (81, 290), (80, 160), (78, 162), (76, 390)],
                ),
                activity(
                    18,
                    &[(70, 240), (69, 220), (70, 280), (70, 500), (69, 160), (69, 162), (69, 390)],
                ),
            ],
            average_sessions: vec![
                average_sessions(12, [30, 23, 45, 50, 0, 0, 60]),
                average_sessions(18, [30, 40, 50, 30, 30, 50, 50]),
            ],
            performance: vec![
                performance(12, [80, 120, 140, 50, 200, 90]),
                performance(18, [200, 240, 80, 80, 220, 110]),
            ],
        }
    }
}

fn infos(first_name: &str, last_name: &str, age: u32) -> RawUserInfos {
    RawUserInfos {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age,
    }
}

fn key_data(calories: u32, proteins: u32, carbohydrates: u32, lipids: u32) -> RawKeyData {
    RawKeyData {
        calorie_count: calories,
        protein_count: proteins,
        carbohydrate_count: carbohydrates,
        lipid_count: lipids,
    }
}

/// Sessions for 2020-07-01 onwards, one per `(kilogram, calories)` pair.
fn activity(user_id: u32, days: &[(u32, u32)]) -> RawActivityPayload {
    RawActivityPayload {
        user_id,
        sessions: days
            .iter()
            .enumerate()
            .map(|(i, &(kilogram, calories))| RawActivitySession {
                day: format!("2020-07-{:02}", i + 1),
                kilogram: f64::from(kilogram),
                calories: f64::from(calories),
            })
            .collect(),
    }
}

fn average_sessions(user_id: u32, minutes: [u32; 7]) -> RawAverageSessionsPayload {
    RawAverageSessionsPayload {
        user_id,
        sessions: (1u8..=7)
            .zip(minutes)
            .map(|(day, length)| RawAverageSession {
                day,
                session_length: f64::from(length),
            })
            .collect(),
    }
}

/// Values are listed in code order 1..=6.
fn performance(user_id: u32, values: [u32; 6]) -> RawPerformancePayload {
    let names = ["cardio", "energy", "endurance", "strength", "speed", "intensity"];
    let kind: BTreeMap<u32, String> = (1u32..)
        .zip(names)
        .map(|(code, name)| (code, name.to_string()))
        .collect();
    RawPerformancePayload {
        user_id,
        kind: Some(kind),
        data: (1u32..)
            .zip(values)
            .map(|(code, value)| RawPerformanceSample {
                value: f64::from(value),
                kind: code,
            })
            .collect(),
    }
}

/// [`SportSeeClient`] that answers from a [`FixtureData`] set instead of the network.
#[derive(Clone, Debug)]
pub struct FixtureSportSeeClient {
    data: FixtureData,
}

impl FixtureSportSeeClient {
    pub fn new(data: FixtureData) -> Self {
        Self { data }
    }

    pub fn demo() -> Self {
        Self::new(FixtureData::demo())
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }
}

fn find<'a, T>(
    items: &'a [T],
    id_of: impl Fn(&T) -> u32,
    user_id: UserId,
    what: &str,
) -> Result<&'a T, SportSeeError> {
    items
        .iter()
        .find(|item| id_of(item) == user_id.0)
        .ok_or_else(|| SportSeeError::NotFound(format!("{what} for user with id {user_id}")))
}

#[async_trait]
impl SportSeeClient for FixtureSportSeeClient {
    async fn get_user(&self, user_id: UserId) -> Result<RawUserPayload, SportSeeError> {
        find(&self.data.users, |u| u.id, user_id, "profile").cloned()
    }

    async fn get_activity(&self, user_id: UserId) -> Result<RawActivityPayload, SportSeeError> {
        find(&self.data.activity, |a| a.user_id, user_id, "activity data").cloned()
    }

    async fn get_average_sessions(
        &self,
        user_id: UserId,
    ) -> Result<RawAverageSessionsPayload, SportSeeError> {
        find(
            &self.data.average_sessions,
            |s| s.user_id,
            user_id,
            "average session data",
        )
        .cloned()
    }

    async fn get_performance(
        &self,
        user_id: UserId,
    ) -> Result<RawPerformancePayload, SportSeeError> {
        find(&self.data.performance, |p| p.user_id, user_id, "performance data").cloned()
    }
}
