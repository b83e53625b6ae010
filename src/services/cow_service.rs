// src/services/cow_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::error::AppError,
    db::DocumentGateway,
    models::{
        cow::{Cow, CowPayload, FeedingSchedule, MilkYield, Treatment},
        records::{Note, Vaccination},
    },
    services::{
        entity_store::{create_child, load_children, ChildOf, EntityStore},
        undo::{Removal, UndoBuffer},
    },
};

impl ChildOf<Cow> for Vaccination {
    fn attach(self, cow: &mut Cow) {
        cow.vaccinations.push(self);
    }
}

impl ChildOf<Cow> for Treatment {
    fn attach(self, cow: &mut Cow) {
        cow.treatments.push(self);
    }
}

impl ChildOf<Cow> for MilkYield {
    fn attach(self, cow: &mut Cow) {
        cow.milk_production.push(self);
    }
}

impl ChildOf<Cow> for FeedingSchedule {
    fn attach(self, cow: &mut Cow) {
        cow.feeding_schedule.push(self);
    }
}

impl ChildOf<Cow> for Note {
    fn attach(self, cow: &mut Cow) {
        cow.notes.push(self);
    }
}

pub struct CowService {
    gateway: Arc<dyn DocumentGateway>,
    owner: String,
    store: EntityStore<Cow>,
    undo: UndoBuffer<Removal<Cow>>,
}

impl CowService {
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

    /// Recarrega as vacas e todos os sub-registros. Em caso de falha o cache
    /// anterior continua valendo.
    pub async fn load(&mut self) -> Result<(), AppError> {
        let gateway = self.gateway.as_ref();
        let owner = self.owner.as_str();

        let mut cows = EntityStore::<Cow>::fetch(gateway, owner).await?;
        for cow in cows.iter_mut() {
            cow.vaccinations = load_children::<Cow, _>(gateway, owner, &cow.id).await?;
            cow.treatments = load_children::<Cow, _>(gateway, owner, &cow.id).await?;
            cow.milk_production = load_children::<Cow, _>(gateway, owner, &cow.id).await?;
            cow.feeding_schedule = load_children::<Cow, _>(gateway, owner, &cow.id).await?;
            cow.notes = load_children::<Cow, _>(gateway, owner, &cow.id).await?;
        }

        tracing::debug!("{} vacas carregadas para {}", cows.len(), owner);
        self.store.replace_all(cows);
        Ok(())
    }

    pub fn list(&self) -> Vec<Cow> {
        self.store.all().to_vec()
    }

    pub fn get(&self, id: &str) -> Result<Cow, AppError> {
        self.store.require(id).cloned()
    }

    /// Busca por id ou nome, sem diferenciar maiúsculas. Consulta vazia devolve tudo.
    pub fn search(&self, query: &str) -> Vec<Cow> {
        let query = query.trim().to_lowercase();
        self.store
            .all()
            .iter()
            .filter(|cow| {
                query.is_empty()
                    || cow.id.to_lowercase().contains(&query)
                    || cow.name.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    pub async fn create(&mut self, payload: CowPayload) -> Result<Cow, AppError> {
        payload.validate()?;
        self.store
            .create(self.gateway.as_ref(), &self.owner, payload.into_cow())
            .await
    }

    pub async fn update(&mut self, id: &str, payload: CowPayload) -> Result<Cow, AppError> {
        payload.validate()?;
        self.store
            .update(self.gateway.as_ref(), &self.owner, id, |cow| {
                payload.apply_to(cow);
                Ok(())
            })
            .await
    }

    /// O gateway apaga os sub-registros junto; a cópia completa fica no undo.
    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let snapshot = self.store.delete(self.gateway.as_ref(), &self.owner, id).await?;
        self.undo.remember(Removal::new(snapshot));
        Ok(())
    }

    /// Recria a vaca com id novo e regrava os sub-registros debaixo dele.
    /// O progresso fica no slot: repetir depois de uma falha continua de onde parou.
    pub async fn undo_delete(&mut self) -> Result<Cow, AppError> {
        let cow_id = self.restore_base().await?;

        let vaccinations = self.undo.pending()?.entity.vaccinations.clone();
        for record in vaccinations {
            self.add_record(&cow_id, record).await?;
            self.undo.pending_mut()?.entity.vaccinations.remove(0);
        }
        let treatments = self.undo.pending()?.entity.treatments.clone();
        for record in treatments {
            self.add_record(&cow_id, record).await?;
            self.undo.pending_mut()?.entity.treatments.remove(0);
        }
        let milk_production = self.undo.pending()?.entity.milk_production.clone();
        for record in milk_production {
            self.add_record(&cow_id, record).await?;
            self.undo.pending_mut()?.entity.milk_production.remove(0);
        }
        let feeding_schedule = self.undo.pending()?.entity.feeding_schedule.clone();
        for record in feeding_schedule {
            self.add_record(&cow_id, record).await?;
            self.undo.pending_mut()?.entity.feeding_schedule.remove(0);
        }
        let notes = self.undo.pending()?.entity.notes.clone();
        for record in notes {
            self.add_record(&cow_id, record).await?;
            self.undo.pending_mut()?.entity.notes.remove(0);
        }

        self.undo.clear();
        self.get(&cow_id)
    }

    /// Recria só o documento principal, uma única vez por remoção.
    async fn restore_base(&mut self) -> Result<String, AppError> {
        let removal = self.undo.pending()?;
        if let Some(id) = removal.restored_id.as_ref().filter(|id| self.store.get(id).is_some()) {
            return Ok(id.clone());
        }

        let mut base = removal.entity.clone();
        base.vaccinations.clear();
        base.treatments.clear();
        base.milk_production.clear();
        base.feeding_schedule.clear();
        base.notes.clear();

        let restored = self.store.create(self.gateway.as_ref(), &self.owner, base).await?;
        self.undo.pending_mut()?.restored_id = Some(restored.id.clone());
        Ok(restored.id)
    }

    /// Acrescenta um sub-registro (vacina, tratamento, ordenha, alimentação ou nota).
    pub async fn add_record<C: ChildOf<Cow>>(&mut self, cow_id: &str, record: C) -> Result<C, AppError> {
        record.validate()?;
        self.store.require(cow_id)?;

        let created =
            create_child::<Cow, C>(self.gateway.as_ref(), &self.owner, cow_id, record).await?;

        let attached = created.clone();
        self.store.patch_local(cow_id, |cow| attached.attach(cow));
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{CollectionPath, MemoryGateway},
        models::records::Vaccination,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload(name: &str) -> CowPayload {
        CowPayload {
            name: name.into(),
            breed: "Holstein".into(),
            birth_date: date(2021, 4, 10),
            genetic_info: String::new(),
            health_history: String::new(),
            unique_traits: "Mancha blanca".into(),
        }
    }

    fn without_ids(mut cow: Cow) -> Cow {
        cow.id.clear();
        cow.vaccinations.iter_mut().for_each(|r| r.id.clear());
        cow.treatments.iter_mut().for_each(|r| r.id.clear());
        cow.milk_production.iter_mut().for_each(|r| r.id.clear());
        cow.feeding_schedule.iter_mut().for_each(|r| r.id.clear());
        cow.notes.iter_mut().for_each(|r| r.id.clear());
        cow
    }

    fn treatment() -> Treatment {
        Treatment {
            id: String::new(),
            date: date(2024, 2, 1),
            description: "Cojera".into(),
            medication: "Antiinflamatorio".into(),
        }
    }

    fn service() -> (Arc<MemoryGateway>, CowService) {
        let gateway = Arc::new(MemoryGateway::new());
        let service = CowService::new(gateway.clone(), "u1");
        (gateway, service)
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload_without_writing() {
        let (gateway, mut cows) = service();
        let mut invalid = payload("  ");
        invalid.birth_date = chrono::Utc::now().date_naive() + chrono::Duration::days(2);

        let err = cows.create(invalid).await.unwrap_err();

        let AppError::ValidationError(errors) = err else {
            panic!("esperava erro de validação");
        };
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("birth_date"));
        assert_eq!(gateway.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_sub_records() {
        let (_, mut cows) = service();
        let cow = cows.create(payload("Luna")).await.unwrap();
        cows.add_record(&cow.id, Vaccination { id: String::new(), date: date(2024, 1, 5), kind: "Aftosa".into() })
            .await
            .unwrap();

        let updated = cows.update(&cow.id, payload("Luna II")).await.unwrap();

        assert_eq!(updated.name, "Luna II");
        assert_eq!(updated.vaccinations.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_undo_recreates_cow_with_records() {
        let (gateway, mut cows) = service();
        let cow = cows.create(payload("Luna")).await.unwrap();
        cows.add_record(&cow.id, treatment()).await.unwrap();
        cows.add_record(&cow.id, Note { id: String::new(), date: date(2024, 2, 2), content: "Mejora".into() })
            .await
            .unwrap();
        let original = cows.get(&cow.id).unwrap();

        cows.delete(&cow.id).await.unwrap();
        assert!(cows.list().is_empty());

        let restored = cows.undo_delete().await.unwrap();

        assert_ne!(restored.id, cow.id);
        assert_eq!(without_ids(restored.clone()), without_ids(original));
        assert_eq!(cows.list().len(), 1);

        let treatments = CollectionPath::nested("u1", "cows", &restored.id, "treatments");
        assert_eq!(gateway.list(&treatments).await.unwrap().len(), 1);

        assert!(matches!(cows.undo_delete().await, Err(AppError::NothingToRestore)));
    }

    #[tokio::test]
    async fn test_interrupted_undo_resumes_without_duplicating_cow() {
        let (gateway, mut cows) = service();
        let cow = cows.create(payload("Luna")).await.unwrap();
        cows.add_record(&cow.id, treatment()).await.unwrap();
        cows.add_record(&cow.id, Note { id: String::new(), date: date(2024, 2, 2), content: "Mejora".into() })
            .await
            .unwrap();
        let original = cows.get(&cow.id).unwrap();
        cows.delete(&cow.id).await.unwrap();

        // a vaca volta, o tratamento falha
        gateway.fail_nth_create(2);
        assert!(cows.undo_delete().await.is_err());
        assert_eq!(cows.list().len(), 1);

        let restored = cows.undo_delete().await.unwrap();

        assert_eq!(cows.list().len(), 1);
        assert_eq!(gateway.list(&CollectionPath::root("u1", "cows")).await.unwrap().len(), 1);
        let treatments = CollectionPath::nested("u1", "cows", &restored.id, "treatments");
        assert_eq!(gateway.list(&treatments).await.unwrap().len(), 1);
        assert_eq!(without_ids(restored), without_ids(original));
        assert!(matches!(cows.undo_delete().await, Err(AppError::NothingToRestore)));
    }

    #[tokio::test]
    async fn test_second_delete_overwrites_undo_slot() {
        let (_, mut cows) = service();
        let a = cows.create(payload("Ana")).await.unwrap();
        let b = cows.create(payload("Bela")).await.unwrap();

        cows.delete(&a.id).await.unwrap();
        cows.delete(&b.id).await.unwrap();

        let restored = cows.undo_delete().await.unwrap();
        assert_eq!(restored.name, "Bela");
        assert!(cows.search("ana").is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_name_or_id() {
        let (_, mut cows) = service();
        let luna = cows.create(payload("Luna")).await.unwrap();
        cows.create(payload("Canela")).await.unwrap();

        assert_eq!(cows.search("LUN").len(), 1);
        assert_eq!(cows.search(&luna.id[..8]).len(), 1);
        assert_eq!(cows.search("").len(), 2);
    }

    #[tokio::test]
    async fn test_load_rebuilds_sub_records_from_gateway() {
        let (gateway, mut cows) = service();
        let cow = cows.create(payload("Luna")).await.unwrap();
        cows.add_record(&cow.id, MilkYield { id: String::new(), date: date(2024, 3, 1), amount: 18.5 })
            .await
            .unwrap();

        let mut fresh = CowService::new(gateway.clone(), "u1");
        fresh.load().await.unwrap();

        let loaded = fresh.get(&cow.id).unwrap();
        assert_eq!(loaded.milk_production.len(), 1);
        assert_eq!(loaded.milk_production[0].amount, 18.5);
    }

    #[tokio::test]
    async fn test_record_for_unknown_cow_is_not_found() {
        let (gateway, mut cows) = service();
        let err = cows
            .add_record("missing", Note { id: String::new(), date: date(2024, 1, 1), content: "x".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(gateway.write_count(), 0);
    }
}
