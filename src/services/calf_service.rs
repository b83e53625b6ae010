// src/services/calf_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::error::AppError,
    db::DocumentGateway,
    models::{
        calf::{Calf, CalfPayload, FeedingRecord, GrowthMilestone},
        records::{Note, Vaccination},
    },
    services::{
        entity_store::{create_child, load_children, ChildOf, EntityStore},
        undo::{Removal, UndoBuffer},
    },
};

impl ChildOf<Calf> for FeedingRecord {
    fn attach(self, calf: &mut Calf) {
        calf.feeding_records.push(self);
    }
}

impl ChildOf<Calf> for Vaccination {
    fn attach(self, calf: &mut Calf) {
        calf.vaccinations.push(self);
    }
}

impl ChildOf<Calf> for GrowthMilestone {
    fn attach(self, calf: &mut Calf) {
        calf.growth_milestones.push(self);
    }
}

impl ChildOf<Calf> for Note {
    fn attach(self, calf: &mut Calf) {
        calf.notes.push(self);
    }
}

pub struct CalfService {
    gateway: Arc<dyn DocumentGateway>,
    owner: String,
    store: EntityStore<Calf>,
    undo: UndoBuffer<Removal<Calf>>,
}

impl CalfService {
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
        let gateway = self.gateway.as_ref();
        let owner = self.owner.as_str();

        let mut calves = EntityStore::<Calf>::fetch(gateway, owner).await?;
        for calf in calves.iter_mut() {
            calf.feeding_records = load_children::<Calf, _>(gateway, owner, &calf.id).await?;
            calf.vaccinations = load_children::<Calf, _>(gateway, owner, &calf.id).await?;
            calf.growth_milestones = load_children::<Calf, _>(gateway, owner, &calf.id).await?;
            calf.notes = load_children::<Calf, _>(gateway, owner, &calf.id).await?;
        }

        self.store.replace_all(calves);
        Ok(())
    }

    pub fn list(&self) -> Vec<Calf> {
        self.store.all().to_vec()
    }

    pub fn get(&self, id: &str) -> Result<Calf, AppError> {
        self.store.require(id).cloned()
    }

    pub async fn create(&mut self, payload: CalfPayload) -> Result<Calf, AppError> {
        payload.validate()?;
        self.store
            .create(self.gateway.as_ref(), &self.owner, payload.into_calf())
            .await
    }

    pub async fn update(&mut self, id: &str, payload: CalfPayload) -> Result<Calf, AppError> {
        payload.validate()?;
        self.store
            .update(self.gateway.as_ref(), &self.owner, id, |calf| {
                payload.apply_to(calf);
                Ok(())
            })
            .await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let snapshot = self.store.delete(self.gateway.as_ref(), &self.owner, id).await?;
        self.undo.remember(Removal::new(snapshot));
        Ok(())
    }

    /// Recria a cria com id novo e regrava os sub-registros debaixo dele.
    /// O progresso fica no slot: repetir depois de uma falha continua de onde parou.
    pub async fn undo_delete(&mut self) -> Result<Calf, AppError> {
        let calf_id = self.restore_base().await?;

        let feeding_records = self.undo.pending()?.entity.feeding_records.clone();
        for record in feeding_records {
            self.add_record(&calf_id, record).await?;
            self.undo.pending_mut()?.entity.feeding_records.remove(0);
        }
        let vaccinations = self.undo.pending()?.entity.vaccinations.clone();
        for record in vaccinations {
            self.add_record(&calf_id, record).await?;
            self.undo.pending_mut()?.entity.vaccinations.remove(0);
        }
        let growth_milestones = self.undo.pending()?.entity.growth_milestones.clone();
        for record in growth_milestones {
            self.add_record(&calf_id, record).await?;
            self.undo.pending_mut()?.entity.growth_milestones.remove(0);
        }
        let notes = self.undo.pending()?.entity.notes.clone();
        for record in notes {
            self.add_record(&calf_id, record).await?;
            self.undo.pending_mut()?.entity.notes.remove(0);
        }

        self.undo.clear();
        self.get(&calf_id)
    }

    /// Recria só o documento principal, uma única vez por remoção.
    async fn restore_base(&mut self) -> Result<String, AppError> {
        let removal = self.undo.pending()?;
        if let Some(id) = removal.restored_id.as_ref().filter(|id| self.store.get(id).is_some()) {
            return Ok(id.clone());
        }

        let mut base = removal.entity.clone();
        base.feeding_records.clear();
        base.vaccinations.clear();
        base.growth_milestones.clear();
        base.notes.clear();

        let restored = self.store.create(self.gateway.as_ref(), &self.owner, base).await?;
        self.undo.pending_mut()?.restored_id = Some(restored.id.clone());
        Ok(restored.id)
    }

    pub async fn add_record<C: ChildOf<Calf>>(&mut self, calf_id: &str, record: C) -> Result<C, AppError> {
        record.validate()?;
        self.store.require(calf_id)?;

        let created =
            create_child::<Calf, C>(self.gateway.as_ref(), &self.owner, calf_id, record).await?;

        let attached = created.clone();
        self.store.patch_local(calf_id, |calf| attached.attach(calf));
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{CollectionPath, MemoryGateway},
        models::calf::{FeedingUnit, Gender},
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload() -> CalfPayload {
        CalfPayload {
            name: "Pinta".into(),
            birth_date: date(2024, 2, 14),
            mother_cow_id: "vaca-que-no-existe".into(),
            gender: Gender::Female,
            weight: 38.5,
        }
    }

    fn feeding(amount: f64) -> FeedingRecord {
        FeedingRecord {
            id: String::new(),
            date: date(2024, 2, 15),
            kind: "Leche materna".into(),
            amount,
            unit: FeedingUnit::Litros,
        }
    }

    fn without_ids(mut calf: Calf) -> Calf {
        calf.id.clear();
        calf.feeding_records.iter_mut().for_each(|r| r.id.clear());
        calf.vaccinations.iter_mut().for_each(|r| r.id.clear());
        calf.growth_milestones.iter_mut().for_each(|r| r.id.clear());
        calf.notes.iter_mut().for_each(|r| r.id.clear());
        calf
    }

    #[tokio::test]
    async fn test_restore_recreates_sub_records_under_new_id() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut calves = CalfService::new(gateway.clone(), "u1");
        let calf = calves.create(payload()).await.unwrap();
        calves.add_record(&calf.id, feeding(2.0)).await.unwrap();
        calves.add_record(&calf.id, feeding(2.5)).await.unwrap();
        calves
            .add_record(&calf.id, GrowthMilestone {
                id: String::new(),
                date: date(2024, 5, 1),
                description: "Destete".into(),
            })
            .await
            .unwrap();
        let original = calves.get(&calf.id).unwrap();

        calves.delete(&calf.id).await.unwrap();
        let old_feeding = CollectionPath::nested("u1", "calves", &calf.id, "feedingRecords");
        assert!(gateway.list(&old_feeding).await.unwrap().is_empty());

        let restored = calves.undo_delete().await.unwrap();

        assert_ne!(restored.id, calf.id);
        assert_eq!(without_ids(restored.clone()), without_ids(original));
        let new_feeding = CollectionPath::nested("u1", "calves", &restored.id, "feedingRecords");
        assert_eq!(gateway.list(&new_feeding).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_interrupted_undo_resumes_without_duplicating_calf() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut calves = CalfService::new(gateway.clone(), "u1");
        let calf = calves.create(payload()).await.unwrap();
        calves.add_record(&calf.id, feeding(2.0)).await.unwrap();
        calves.add_record(&calf.id, feeding(2.5)).await.unwrap();
        let original = calves.get(&calf.id).unwrap();
        calves.delete(&calf.id).await.unwrap();

        // cria e primeira mamada voltam, a segunda falha
        gateway.fail_nth_create(3);
        assert!(calves.undo_delete().await.is_err());

        let restored = calves.undo_delete().await.unwrap();

        assert_eq!(calves.list().len(), 1);
        assert_eq!(gateway.list(&CollectionPath::root("u1", "calves")).await.unwrap().len(), 1);
        let feeding_path = CollectionPath::nested("u1", "calves", &restored.id, "feedingRecords");
        assert_eq!(gateway.list(&feeding_path).await.unwrap().len(), 2);
        assert_eq!(without_ids(restored), without_ids(original));
    }

    #[tokio::test]
    async fn test_negative_feeding_amount_is_rejected() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut calves = CalfService::new(gateway.clone(), "u1");
        let calf = calves.create(payload()).await.unwrap();
        let writes = gateway.write_count();

        let err = calves.add_record(&calf.id, feeding(-1.0)).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(gateway.write_count(), writes);
        assert!(calves.get(&calf.id).unwrap().feeding_records.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_leaves_calf_unchanged() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut calves = CalfService::new(gateway.clone(), "u1");
        let calf = calves.create(payload()).await.unwrap();

        gateway.set_failing(true);
        let mut heavier = payload();
        heavier.weight = 60.0;
        assert!(calves.update(&calf.id, heavier).await.is_err());
        assert!(calves.delete(&calf.id).await.is_err());

        assert_eq!(calves.list(), vec![calf]);
        assert!(matches!(calves.undo_delete().await, Err(AppError::NothingToRestore)));
    }
}
