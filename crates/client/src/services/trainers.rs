use academia_academics::Trainer;
use academia_core::TrainerId;

use super::Api;
use crate::error::ClientError;

const TRAINERS: &str = "/api/trainers";

#[derive(Debug, Clone)]
pub struct TrainerService {
    api: Api,
}

impl TrainerService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Trainer>, ClientError> {
        self.api.get(TRAINERS).await
    }

    pub async fn get(&self, id: TrainerId) -> Result<Trainer, ClientError> {
        self.api.get(format!("{TRAINERS}/{id}")).await
    }

    pub async fn create(&self, trainer: &Trainer) -> Result<Trainer, ClientError> {
        trainer.validate()?;
        self.api.create(TRAINERS, trainer).await
    }

    pub async fn update(&self, id: TrainerId, trainer: &Trainer) -> Result<Trainer, ClientError> {
        trainer.validate()?;
        self.api.put(format!("{TRAINERS}/{id}"), trainer).await
    }

    pub async fn delete(&self, id: TrainerId) -> Result<(), ClientError> {
        self.api.delete(format!("{TRAINERS}/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::transport::Method;

    #[tokio::test]
    async fn create_posts_validated_trainer() {
        let transport = ScriptedTransport::new();
        transport.reply_json(
            Method::Post,
            TRAINERS,
            201,
            json!({"id": 7, "name": "Tom Reed", "specialty": "Systems", "email": "tom@campus.edu"}),
        );
        let service = TrainerService::new(Api::new(transport.clone()));
        let draft = Trainer {
            id: None,
            name: "Tom Reed".into(),
            specialty: Some("Systems".into()),
            email: "tom@campus.edu".into(),
        };

        let created = service.create(&draft).await.unwrap();

        assert_eq!(created.id, Some(TrainerId::new(7)));
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["name"], "Tom Reed");
    }

    #[tokio::test]
    async fn trainer_without_email_is_refused_locally() {
        let transport = ScriptedTransport::new();
        let service = TrainerService::new(Api::new(transport.clone()));
        let draft = Trainer {
            id: None,
            name: "Tom".into(),
            specialty: None,
            email: "tom".into(),
        };

        assert!(service.update(TrainerId::new(7), &draft).await.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    fn tom() -> Trainer {
        Trainer {
            id: None,
            name: "Tom Reed".into(),
            specialty: None,
            email: "tom@campus.edu".into(),
        }
    }

    #[tokio::test]
    async fn draft_with_an_id_is_not_created() {
        let transport = ScriptedTransport::new();
        let service = TrainerService::new(Api::new(transport.clone()));
        let stored = Trainer {
            id: Some(TrainerId::new(7)),
            ..tom()
        };

        let err = service.create(&stored).await.unwrap_err();

        assert!(matches!(err, ClientError::ValidationFailed { .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn created_record_without_id_is_malformed() {
        let transport = ScriptedTransport::new();
        transport.reply_json(Method::Post, TRAINERS, 201, json!({"name": "Tom Reed", "email": "tom@campus.edu"}));
        let service = TrainerService::new(Api::new(transport.clone()));

        let err = service.create(&tom()).await.unwrap_err();

        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }
}
