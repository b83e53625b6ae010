// src/services/pregnancy_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::error::AppError,
    db::DocumentGateway,
    models::pregnancy::{PregnancyNotePayload, PregnantCow, PregnantCowPayload},
    services::{
        entity_store::EntityStore,
        schedule,
        undo::{self, UndoBuffer},
    },
};

pub struct PregnancyService {
    gateway: Arc<dyn DocumentGateway>,
    owner: String,
    store: EntityStore<PregnantCow>,
    undo: UndoBuffer<PregnantCow>,
}

impl PregnancyService {
    pub fn new(gateway: Arc<dyn DocumentGateway>, owner: &str) -> Self {
        Self {
            gateway,
            owner: owner.to_string(),
            store: EntityStore::new(),
            undo: UndoBuffer::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    pub async fn load(&mut self) -> Result<(), AppError> {
        self.store.load(self.gateway.as_ref(), &self.owner).await
    }

    pub fn list(&self) -> Vec<PregnantCow> {
        self.store.all().to_vec()
    }

    pub fn get(&self, id: &str) -> Result<PregnantCow, AppError> {
        self.store.require(id).cloned()
    }

    pub async fn create(&mut self, payload: PregnantCowPayload) -> Result<PregnantCow, AppError> {
        payload.validate()?;

        let cow = PregnantCow {
            id: String::new(),
            name: payload.name.trim().to_string(),
            breeding_date: payload.breeding_date,
            weight: payload.weight,
            health: payload.health,
            activity: payload.activity,
            estimated_due_date: schedule::due_date(payload.breeding_date),
            notes: Vec::new(),
        };
        self.store.create(self.gateway.as_ref(), &self.owner, cow).await
    }

    /// A data prevista de parto é recalculada e regravada junto.
    pub async fn update(&mut self, id: &str, payload: PregnantCowPayload) -> Result<PregnantCow, AppError> {
        payload.validate()?;
        self.store
            .update(self.gateway.as_ref(), &self.owner, id, |cow| {
                cow.name = payload.name.trim().to_string();
                cow.breeding_date = payload.breeding_date;
                cow.weight = payload.weight;
                cow.health = payload.health;
                cow.activity = payload.activity;
                cow.estimated_due_date = schedule::due_date(payload.breeding_date);
                Ok(())
            })
            .await
    }

    pub async fn add_note(&mut self, id: &str, payload: PregnancyNotePayload) -> Result<PregnantCow, AppError> {
        payload.validate()?;
        self.store
            .update(self.gateway.as_ref(), &self.owner, id, |cow| {
                cow.notes.push(payload.note.trim().to_string());
                Ok(())
            })
            .await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let snapshot = self.store.delete(self.gateway.as_ref(), &self.owner, id).await?;
        self.undo.remember(snapshot);
        Ok(())
    }

    pub async fn undo_delete(&mut self) -> Result<PregnantCow, AppError> {
        undo::restore(&mut self.undo, &mut self.store, self.gateway.as_ref(), &self.owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{CollectionPath, MemoryGateway},
        models::pregnancy::{ActivityLevel, HealthStatus},
    };
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload(breeding_date: NaiveDate, weight: f64) -> PregnantCowPayload {
        PregnantCowPayload {
            name: "Estrella".into(),
            breeding_date,
            weight,
            health: HealthStatus::Buena,
            activity: ActivityLevel::Normal,
        }
    }

    #[tokio::test]
    async fn test_due_date_is_persisted_on_create_and_edit() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut pregnancies = PregnancyService::new(gateway.clone(), "u1");

        let cow = pregnancies.create(payload(date(2024, 1, 1), 540.0)).await.unwrap();
        assert_eq!(cow.estimated_due_date, date(2024, 10, 7));

        let edited = pregnancies
            .update(&cow.id, payload(date(2023, 6, 1), 540.0))
            .await
            .unwrap();
        assert_eq!(edited.estimated_due_date, date(2024, 3, 7));

        let documents = gateway.list(&CollectionPath::root("u1", "pregnantCows")).await.unwrap();
        assert_eq!(documents[0].data["estimatedDueDate"], json!("2024-03-07"));
    }

    #[tokio::test]
    async fn test_weight_must_be_positive() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut pregnancies = PregnancyService::new(gateway.clone(), "u1");

        let err = pregnancies.create(payload(date(2024, 1, 1), 0.0)).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(gateway.write_count(), 0);
    }

    #[tokio::test]
    async fn test_notes_append_in_order() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut pregnancies = PregnancyService::new(gateway, "u1");
        let cow = pregnancies.create(payload(date(2024, 1, 1), 540.0)).await.unwrap();

        pregnancies
            .add_note(&cow.id, PregnancyNotePayload { note: "Come bien".into() })
            .await
            .unwrap();
        let cow = pregnancies
            .add_note(&cow.id, PregnancyNotePayload { note: "Inquieta".into() })
            .await
            .unwrap();

        assert_eq!(cow.notes, vec!["Come bien".to_string(), "Inquieta".to_string()]);
    }

    #[tokio::test]
    async fn test_undo_restores_with_fresh_id() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut pregnancies = PregnancyService::new(gateway, "u1");
        let mut input = payload(date(2024, 1, 1), 540.0);
        input.health = HealthStatus::Regular;
        input.activity = ActivityLevel::Baja;
        let cow = pregnancies.create(input).await.unwrap();
        let cow = pregnancies
            .add_note(&cow.id, PregnancyNotePayload { note: "Revisar patas".into() })
            .await
            .unwrap();

        pregnancies.delete(&cow.id).await.unwrap();
        let restored = pregnancies.undo_delete().await.unwrap();

        assert_ne!(restored.id, cow.id);
        assert_eq!(PregnantCow { id: cow.id.clone(), ..restored }, cow);
        assert_eq!(pregnancies.list().len(), 1);
    }
}
