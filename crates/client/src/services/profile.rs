use academia_auth::{MIN_PASSWORD_LEN, UserPayload};

use super::Api;
use crate::error::ClientError;
use crate::transport::ApiRequest;

const PROFILE: &str = "/api/profile";

#[derive(Debug, Clone)]
pub struct ProfileService {
    api: Api,
}

impl ProfileService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// The account record of the logged-in user.
    pub async fn profile(&self) -> Result<UserPayload, ClientError> {
        self.api.get(PROFILE).await
    }

    pub async fn change_password(&self, new_password: &str) -> Result<(), ClientError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::ValidationFailed {
                message: format!("password must be at least {MIN_PASSWORD_LEN} characters"),
                fields: vec!["newPassword".to_string()],
            });
        }

        let request = ApiRequest::post(format!("{PROFILE}/change-password")).query("newPassword", new_password);
        self.api.execute(request).await?;
        tracing::info!("password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::transport::Method;

    #[tokio::test]
    async fn short_password_is_refused_locally() {
        let transport = ScriptedTransport::new();
        let service = ProfileService::new(Api::new(transport.clone()));

        assert!(matches!(
            service.change_password("abc").await,
            Err(ClientError::ValidationFailed { .. })
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn password_travels_as_query_parameter() {
        let transport = ScriptedTransport::new();
        transport.reply_json(Method::Post, "/api/profile/change-password", 200, json!(null));
        let service = ProfileService::new(Api::new(transport.clone()));

        service.change_password("longer-secret").await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.body, None);
        assert_eq!(sent.query, vec![("newPassword".to_string(), "longer-secret".to_string())]);
    }

    #[tokio::test]
    async fn profile_decodes_user_record() {
        let transport = ScriptedTransport::new();
        transport.reply_json(Method::Get, PROFILE, 200, json!({"id": 2, "username": "tom", "role": "TRAINER", "trainerId": 7}));
        let service = ProfileService::new(Api::new(transport.clone()));

        let profile = service.profile().await.unwrap();

        assert_eq!(profile.username, "tom");
        assert_eq!(profile.trainer_id, Some(academia_core::TrainerId::new(7)));
    }
}
