// src/services/vaccine_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::DocumentGateway,
    models::vaccine::{
        SideEffectsPayload, Vaccine, VaccinationRecord, VaccinationRecordPayload,
        VaccinationRecordView, VaccinationSchedule,
    },
    services::{
        entity_store::EntityStore,
        schedule,
        undo::{self, UndoBuffer},
    },
};

/// Catálogo de vacinas e registros de aplicação; cada coleção com seu undo.
pub struct VaccineService {
    gateway: Arc<dyn DocumentGateway>,
    owner: String,
    catalog: EntityStore<Vaccine>,
    catalog_undo: UndoBuffer<Vaccine>,
    records: EntityStore<VaccinationRecord>,
    records_undo: UndoBuffer<VaccinationRecord>,
}

impl VaccineService {
    pub fn new(gateway: Arc<dyn DocumentGateway>, owner: &str) -> Self {
        Self {
            gateway,
            owner: owner.to_string(),
            catalog: EntityStore::new(),
            catalog_undo: UndoBuffer::new(),
            records: EntityStore::new(),
            records_undo: UndoBuffer::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.is_loaded() && self.records.is_loaded()
    }

    pub async fn load(&mut self) -> Result<(), AppError> {
        let gateway = self.gateway.as_ref();
        let catalog = EntityStore::<Vaccine>::fetch(gateway, &self.owner).await?;
        let records = EntityStore::<VaccinationRecord>::fetch(gateway, &self.owner).await?;

        self.catalog.replace_all(catalog);
        self.records.replace_all(records);
        Ok(())
    }

    // =========================================================================
    //  CATÁLOGO
    // =========================================================================

    pub fn list_vaccines(&self) -> Vec<Vaccine> {
        self.catalog.all().to_vec()
    }

    pub async fn create_vaccine(&mut self, vaccine: Vaccine) -> Result<Vaccine, AppError> {
        vaccine.validate()?;
        self.catalog.create(self.gateway.as_ref(), &self.owner, vaccine).await
    }

    pub async fn update_vaccine(&mut self, id: &str, vaccine: Vaccine) -> Result<Vaccine, AppError> {
        vaccine.validate()?;
        self.catalog
            .update(self.gateway.as_ref(), &self.owner, id, move |current| {
                *current = vaccine;
                Ok(())
            })
            .await
    }

    /// Registros que citam a vacina não são tocados.
    pub async fn delete_vaccine(&mut self, id: &str) -> Result<(), AppError> {
        let snapshot = self.catalog.delete(self.gateway.as_ref(), &self.owner, id).await?;
        self.catalog_undo.remember(snapshot);
        Ok(())
    }

    pub async fn undo_delete_vaccine(&mut self) -> Result<Vaccine, AppError> {
        undo::restore(&mut self.catalog_undo, &mut self.catalog, self.gateway.as_ref(), &self.owner).await
    }

    // =========================================================================
    //  REGISTROS DE VACINAÇÃO
    // =========================================================================

    pub fn list_records(&self) -> Vec<VaccinationRecord> {
        self.records.all().to_vec()
    }

    /// Registros com os nomes das vacinas; ids fora do catálogo recebem `missing_label`.
    pub fn record_views(&self, missing_label: &str) -> Vec<VaccinationRecordView> {
        self.records
            .all()
            .iter()
            .map(|record| VaccinationRecordView {
                vaccine_names: record
                    .vaccine_ids
                    .iter()
                    .map(|id| {
                        self.catalog
                            .get(id)
                            .map(|v| v.name.clone())
                            .unwrap_or_else(|| missing_label.to_string())
                    })
                    .collect(),
                record: record.clone(),
            })
            .collect()
    }

    pub async fn create_record(&mut self, payload: VaccinationRecordPayload) -> Result<VaccinationRecord, AppError> {
        payload.validate()?;

        let record = VaccinationRecord {
            id: String::new(),
            cow_id: payload.cow_id.trim().to_string(),
            vaccine_ids: payload.vaccine_ids,
            date: payload.date,
            lot: payload.lot.trim().to_string(),
            administrator: payload.administrator.trim().to_string(),
            notes: payload.notes,
            side_effects: None,
        };
        self.records.create(self.gateway.as_ref(), &self.owner, record).await
    }

    /// Efeitos colaterais já anotados são preservados.
    pub async fn update_record(
        &mut self,
        id: &str,
        payload: VaccinationRecordPayload,
    ) -> Result<VaccinationRecord, AppError> {
        payload.validate()?;
        self.records
            .update(self.gateway.as_ref(), &self.owner, id, move |record| {
                record.cow_id = payload.cow_id.trim().to_string();
                record.vaccine_ids = payload.vaccine_ids;
                record.date = payload.date;
                record.lot = payload.lot.trim().to_string();
                record.administrator = payload.administrator.trim().to_string();
                record.notes = payload.notes;
                Ok(())
            })
            .await
    }

    pub async fn update_side_effects(
        &mut self,
        id: &str,
        payload: SideEffectsPayload,
    ) -> Result<VaccinationRecord, AppError> {
        let side_effects = payload
            .side_effects
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        self.records
            .update(self.gateway.as_ref(), &self.owner, id, move |record| {
                record.side_effects = side_effects;
                Ok(())
            })
            .await
    }

    pub async fn delete_record(&mut self, id: &str) -> Result<(), AppError> {
        let snapshot = self.records.delete(self.gateway.as_ref(), &self.owner, id).await?;
        self.records_undo.remember(snapshot);
        Ok(())
    }

    pub async fn undo_delete_record(&mut self) -> Result<VaccinationRecord, AppError> {
        undo::restore(&mut self.records_undo, &mut self.records, self.gateway.as_ref(), &self.owner).await
    }

    pub fn schedule(&self, today: NaiveDate) -> VaccinationSchedule {
        schedule::vaccination_schedule(self.records.all(), self.catalog.all(), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryGateway;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vaccine(name: &str, frequency: &str) -> Vaccine {
        Vaccine {
            id: String::new(),
            name: name.into(),
            description: "Protección básica".into(),
            recommended_age: 6,
            recommended_situation: "Todo el rebaño".into(),
            frequency: frequency.into(),
        }
    }

    fn record_payload(vaccine_ids: Vec<String>, on: NaiveDate) -> VaccinationRecordPayload {
        VaccinationRecordPayload {
            cow_id: "C1".into(),
            vaccine_ids,
            date: on,
            lot: "L-22".into(),
            administrator: "Dra. Ruiz".into(),
            notes: String::new(),
        }
    }

    fn service() -> (Arc<MemoryGateway>, VaccineService) {
        let gateway = Arc::new(MemoryGateway::new());
        (gateway.clone(), VaccineService::new(gateway, "u1"))
    }

    #[tokio::test]
    async fn test_catalog_requires_fields() {
        let (gateway, mut vaccines) = service();
        let mut incomplete = vaccine("", "Anual");
        incomplete.recommended_age = 0;

        let err = vaccines.create_vaccine(incomplete).await.unwrap_err();

        let AppError::ValidationError(errors) = err else {
            panic!("esperava erro de validação");
        };
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("recommended_age"));
        assert_eq!(gateway.write_count(), 0);
    }

    #[tokio::test]
    async fn test_record_needs_at_least_one_vaccine() {
        let (_, mut vaccines) = service();
        let err = vaccines
            .create_record(record_payload(vec![], date(2024, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_deleted_vaccine_keeps_records_and_shows_placeholder() {
        let (_, mut vaccines) = service();
        let aftosa = vaccines.create_vaccine(vaccine("Aftosa", "Anual")).await.unwrap();
        let rabia = vaccines.create_vaccine(vaccine("Rabia", "Semestral")).await.unwrap();
        vaccines
            .create_record(record_payload(vec![aftosa.id.clone(), rabia.id.clone()], date(2024, 1, 1)))
            .await
            .unwrap();

        vaccines.delete_vaccine(&rabia.id).await.unwrap();

        let views = vaccines.record_views("Vacuna eliminada");
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].vaccine_names, vec!["Aftosa", "Vacuna eliminada"]);

        let schedule = vaccines.schedule(date(2024, 6, 1));
        assert_eq!(schedule.upcoming.len(), 1);
        assert_eq!(schedule.upcoming[0].vaccine_id, aftosa.id);
    }

    #[tokio::test]
    async fn test_update_preserves_side_effects() {
        let (_, mut vaccines) = service();
        let aftosa = vaccines.create_vaccine(vaccine("Aftosa", "Anual")).await.unwrap();
        let record = vaccines
            .create_record(record_payload(vec![aftosa.id.clone()], date(2024, 1, 1)))
            .await
            .unwrap();

        vaccines
            .update_side_effects(&record.id, SideEffectsPayload { side_effects: Some("Fiebre leve".into()) })
            .await
            .unwrap();
        let updated = vaccines
            .update_record(&record.id, record_payload(vec![aftosa.id], date(2024, 1, 2)))
            .await
            .unwrap();

        assert_eq!(updated.date, date(2024, 1, 2));
        assert_eq!(updated.side_effects.as_deref(), Some("Fiebre leve"));
    }

    #[tokio::test]
    async fn test_catalog_and_records_have_separate_undo() {
        let (_, mut vaccines) = service();
        let aftosa = vaccines.create_vaccine(vaccine("Aftosa", "Anual")).await.unwrap();
        let record = vaccines
            .create_record(record_payload(vec![aftosa.id.clone()], date(2024, 1, 1)))
            .await
            .unwrap();

        vaccines.delete_vaccine(&aftosa.id).await.unwrap();
        vaccines.delete_record(&record.id).await.unwrap();

        let restored_vaccine = vaccines.undo_delete_vaccine().await.unwrap();
        let restored_record = vaccines.undo_delete_record().await.unwrap();

        assert_ne!(restored_vaccine.id, aftosa.id);
        assert_eq!(Vaccine { id: aftosa.id.clone(), ..restored_vaccine }, aftosa);
        // o registro restaurado ainda cita o id antigo da vacina
        assert_eq!(VaccinationRecord { id: record.id.clone(), ..restored_record }, record);
    }
}
