use chrono::NaiveDate;

use academia_academics::{ScheduledSession, upcoming_schedule};
use academia_core::TrainerId;

use super::Api;
use crate::error::ClientError;

const PLANNING: &str = "/api/planning";

/// Read-only access to the session calendar.
#[derive(Debug, Clone)]
pub struct PlanningService {
    api: Api,
}

impl PlanningService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Sessions for the logged-in user, as resolved by the server from the token.
    pub async fn my_schedule(&self) -> Result<Vec<ScheduledSession>, ClientError> {
        self.api.get(format!("{PLANNING}/my-schedule")).await
    }

    pub async fn trainer_schedule(&self, trainer: TrainerId) -> Result<Vec<ScheduledSession>, ClientError> {
        self.api.get(format!("{PLANNING}/trainer/{trainer}")).await
    }

    /// [`PlanningService::my_schedule`] restricted to sessions on or after `as_of`.
    pub async fn my_upcoming(&self, as_of: NaiveDate) -> Result<Vec<ScheduledSession>, ClientError> {
        let sessions = self.my_schedule().await?;
        Ok(upcoming_schedule(&sessions, as_of))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::transport::Method;

    #[tokio::test]
    async fn upcoming_keeps_today_and_later_in_source_order() {
        let transport = ScriptedTransport::new();
        transport.reply_json(
            Method::Get,
            "/api/planning/my-schedule",
            200,
            json!([
                {"id": 1, "courseId": 1, "groupId": 1, "date": "2024-10-20", "startTime": "09:00", "endTime": "11:00", "room": "A1"},
                {"id": 2, "courseId": 1, "groupId": 1, "date": "2024-10-18", "startTime": "09:00:00", "endTime": "11:00:00", "room": "A1"},
                {"id": 3, "courseId": 2, "groupId": 1, "date": "2024-10-17", "startTime": "14:00", "endTime": "16:00", "room": "B2"}
            ]),
        );
        let service = PlanningService::new(Api::new(transport.clone()));
        let today = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();

        let upcoming = service.my_upcoming(today).await.unwrap();

        let ids: Vec<i64> = upcoming.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn malformed_schedule_is_reported() {
        let transport = ScriptedTransport::new();
        transport.reply_json(Method::Get, "/api/planning/trainer/7", 200, json!({"unexpected": true}));
        let service = PlanningService::new(Api::new(transport.clone()));

        let err = service.trainer_schedule(TrainerId::new(7)).await.unwrap_err();

        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }
}
