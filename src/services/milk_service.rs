// src/services/milk_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::DocumentGateway,
    models::milk::{
        MilkCow, MilkIncident, MilkProductionPayload, MilkProductionRecord, ProductionDetail,
        ProductionPeriod, ProductionPoint,
    },
    services::{
        entity_store::EntityStore,
        schedule,
        undo::{self, UndoBuffer},
    },
};

/// Vacas leiteiras, ordenhas e incidentes. Cada coleção tem seu próprio undo.
pub struct MilkService {
    gateway: Arc<dyn DocumentGateway>,
    owner: String,
    cows: EntityStore<MilkCow>,
    cows_undo: UndoBuffer<MilkCow>,
    productions: EntityStore<MilkProductionRecord>,
    productions_undo: UndoBuffer<MilkProductionRecord>,
    incidents: EntityStore<MilkIncident>,
    incidents_undo: UndoBuffer<MilkIncident>,
}

impl MilkService {
    pub fn new(gateway: Arc<dyn DocumentGateway>, owner: &str) -> Self {
        Self {
            gateway,
            owner: owner.to_string(),
            cows: EntityStore::new(),
            cows_undo: UndoBuffer::new(),
            productions: EntityStore::new(),
            productions_undo: UndoBuffer::new(),
            incidents: EntityStore::new(),
            incidents_undo: UndoBuffer::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cows.is_loaded() && self.productions.is_loaded() && self.incidents.is_loaded()
    }

    pub async fn load(&mut self) -> Result<(), AppError> {
        let gateway = self.gateway.as_ref();
        let cows = EntityStore::<MilkCow>::fetch(gateway, &self.owner).await?;
        let productions = EntityStore::<MilkProductionRecord>::fetch(gateway, &self.owner).await?;
        let incidents = EntityStore::<MilkIncident>::fetch(gateway, &self.owner).await?;

        self.cows.replace_all(cows);
        self.productions.replace_all(productions);
        self.incidents.replace_all(incidents);
        Ok(())
    }

    // --- VACAS ---

    pub fn list_cows(&self) -> Vec<MilkCow> {
        self.cows.all().to_vec()
    }

    pub async fn create_cow(&mut self, cow: MilkCow) -> Result<MilkCow, AppError> {
        cow.validate()?;
        self.cows.create(self.gateway.as_ref(), &self.owner, cow).await
    }

    pub async fn update_cow(&mut self, id: &str, cow: MilkCow) -> Result<MilkCow, AppError> {
        cow.validate()?;
        self.cows
            .update(self.gateway.as_ref(), &self.owner, id, move |current| {
                *current = cow;
                Ok(())
            })
            .await
    }

    pub async fn delete_cow(&mut self, id: &str) -> Result<(), AppError> {
        let snapshot = self.cows.delete(self.gateway.as_ref(), &self.owner, id).await?;
        self.cows_undo.remember(snapshot);
        Ok(())
    }

    pub async fn undo_delete_cow(&mut self) -> Result<MilkCow, AppError> {
        undo::restore(&mut self.cows_undo, &mut self.cows, self.gateway.as_ref(), &self.owner).await
    }

    // --- PRODUÇÃO ---

    pub fn list_productions(&self) -> Vec<MilkProductionRecord> {
        self.productions.all().to_vec()
    }

    pub async fn create_production(
        &mut self,
        payload: MilkProductionPayload,
    ) -> Result<MilkProductionRecord, AppError> {
        payload.validate()?;
        self.productions
            .create(self.gateway.as_ref(), &self.owner, payload.into_record())
            .await
    }

    /// O total é sempre recalculado a partir das três ordenhas.
    pub async fn update_production(
        &mut self,
        id: &str,
        payload: MilkProductionPayload,
    ) -> Result<MilkProductionRecord, AppError> {
        payload.validate()?;
        self.productions
            .update(self.gateway.as_ref(), &self.owner, id, move |current| {
                *current = payload.into_record();
                current.recompute_total();
                Ok(())
            })
            .await
    }

    pub async fn delete_production(&mut self, id: &str) -> Result<(), AppError> {
        let snapshot = self.productions.delete(self.gateway.as_ref(), &self.owner, id).await?;
        self.productions_undo.remember(snapshot);
        Ok(())
    }

    pub async fn undo_delete_production(&mut self) -> Result<MilkProductionRecord, AppError> {
        undo::restore(
            &mut self.productions_undo,
            &mut self.productions,
            self.gateway.as_ref(),
            &self.owner,
        )
        .await
    }

    // --- INCIDENTES ---

    pub fn list_incidents(&self) -> Vec<MilkIncident> {
        self.incidents.all().to_vec()
    }

    pub async fn create_incident(&mut self, incident: MilkIncident) -> Result<MilkIncident, AppError> {
        incident.validate()?;
        self.incidents.create(self.gateway.as_ref(), &self.owner, incident).await
    }

    pub async fn update_incident(&mut self, id: &str, incident: MilkIncident) -> Result<MilkIncident, AppError> {
        incident.validate()?;
        self.incidents
            .update(self.gateway.as_ref(), &self.owner, id, move |current| {
                *current = incident;
                Ok(())
            })
            .await
    }

    pub async fn delete_incident(&mut self, id: &str) -> Result<(), AppError> {
        let snapshot = self.incidents.delete(self.gateway.as_ref(), &self.owner, id).await?;
        self.incidents_undo.remember(snapshot);
        Ok(())
    }

    pub async fn undo_delete_incident(&mut self) -> Result<MilkIncident, AppError> {
        undo::restore(
            &mut self.incidents_undo,
            &mut self.incidents,
            self.gateway.as_ref(),
            &self.owner,
        )
        .await
    }

    // --- ANALÍTICA ---

    pub fn analytics(&self, period: ProductionPeriod) -> Vec<ProductionPoint> {
        schedule::aggregate_production(self.productions.all(), period)
    }

    pub fn details(&self, date: NaiveDate) -> Vec<ProductionDetail> {
        schedule::production_details(self.productions.all(), self.cows.all(), date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{CollectionPath, MemoryGateway},
        models::milk::{IncidentType, ProductionQuality},
    };
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn production(cow_id: &str, on: NaiveDate, morning: f64, evening: f64) -> MilkProductionPayload {
        MilkProductionPayload {
            cow_id: cow_id.into(),
            date: on,
            morning,
            afternoon: 0.0,
            evening,
            quality: ProductionQuality { fat: Some(3.8), protein: None },
        }
    }

    fn service() -> (Arc<MemoryGateway>, MilkService) {
        let gateway = Arc::new(MemoryGateway::new());
        (gateway.clone(), MilkService::new(gateway, "u1"))
    }

    #[tokio::test]
    async fn test_total_is_recomputed_on_create_and_update() {
        let (gateway, mut milk) = service();

        let record = milk.create_production(production("c1", date(2024, 3, 4), 8.0, 6.5)).await.unwrap();
        assert_eq!(record.total, 14.5);

        let updated = milk
            .update_production(&record.id, production("c1", date(2024, 3, 4), 10.0, 6.5))
            .await
            .unwrap();
        assert_eq!(updated.total, 16.5);
        assert_eq!(updated.id, record.id);

        let documents = gateway
            .list(&CollectionPath::root("u1", "milkProductionRecords"))
            .await
            .unwrap();
        assert_eq!(documents[0].data["total"], json!(16.5));
    }

    #[tokio::test]
    async fn test_analytics_and_details_use_cached_records() {
        let (_, mut milk) = service();
        let margarita = milk
            .create_cow(MilkCow { id: String::new(), name: "Margarita".into(), tag: "A1".into() })
            .await
            .unwrap();
        milk.create_production(production(&margarita.id, date(2024, 3, 4), 10.0, 0.0)).await.unwrap();
        milk.create_production(production("c2", date(2024, 3, 6), 14.0, 0.0)).await.unwrap();

        let weekly = milk.analytics(ProductionPeriod::Weekly);
        assert_eq!(weekly, vec![ProductionPoint { label: "2024-W1".into(), total: 12.0 }]);

        let details = milk.details(date(2024, 3, 4));
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].cow_name.as_deref(), Some("Margarita"));
    }

    #[tokio::test]
    async fn test_each_collection_has_its_own_undo() {
        let (_, mut milk) = service();
        let cow = milk
            .create_cow(MilkCow { id: String::new(), name: "Lola".into(), tag: "B2".into() })
            .await
            .unwrap();
        let incident = milk
            .create_incident(MilkIncident {
                id: String::new(),
                cow_id: Some(cow.id.clone()),
                date: date(2024, 3, 5),
                description: "Ubre inflamada".into(),
                kind: IncidentType::Mastitis,
            })
            .await
            .unwrap();

        milk.delete_incident(&incident.id).await.unwrap();
        milk.delete_cow(&cow.id).await.unwrap();

        assert!(matches!(milk.undo_delete_production().await, Err(AppError::NothingToRestore)));
        let restored_incident = milk.undo_delete_incident().await.unwrap();
        assert_eq!(MilkIncident { id: incident.id.clone(), ..restored_incident }, incident);
        let restored_cow = milk.undo_delete_cow().await.unwrap();
        assert_eq!(MilkCow { id: cow.id.clone(), ..restored_cow }, cow);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record() {
        let (gateway, mut milk) = service();
        let record = milk.create_production(production("c1", date(2024, 3, 4), 8.0, 0.0)).await.unwrap();

        gateway.set_failing(true);
        assert!(milk.delete_production(&record.id).await.is_err());

        assert_eq!(milk.list_productions(), vec![record]);
        assert!(matches!(milk.undo_delete_production().await, Err(AppError::NothingToRestore)));
    }
}
