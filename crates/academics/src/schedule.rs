//! Scheduled sessions (seances) and the schedule horizon.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use academia_core::{CourseId, Entity, GroupId, SeanceId};

/// One class meeting. Read-only from the client's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSession {
    pub id: SeanceId,
    pub course_id: CourseId,
    #[serde(default)]
    pub course_title: Option<String>,
    pub group_id: GroupId,
    #[serde(default)]
    pub group_name: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "crate::serde_time")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::serde_time")]
    pub end_time: NaiveTime,
    pub room: String,
}

impl Entity for ScheduledSession {
    type Id = SeanceId;

    fn id(&self) -> Option<&SeanceId> {
        Some(&self.id)
    }
}

/// Sessions dated on or after `as_of`, in source order.
///
/// "Today" counts as upcoming. No sorting happens here; callers that need
/// chronological order sort upstream.
pub fn upcoming_schedule(sessions: &[ScheduledSession], as_of: NaiveDate) -> Vec<ScheduledSession> {
    sessions.iter().filter(|s| s.date >= as_of).cloned().collect()
}

/// [`upcoming_schedule`] with the time of day of `now` truncated to midnight.
pub fn upcoming_schedule_at(sessions: &[ScheduledSession], now: NaiveDateTime) -> Vec<ScheduledSession> {
    upcoming_schedule(sessions, now.date())
}
