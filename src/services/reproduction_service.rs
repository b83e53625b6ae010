// src/services/reproduction_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::{error::AppError, validation::field_error},
    db::DocumentGateway,
    models::reproduction::{Check, Insemination, InseminationPayload},
    services::{
        entity_store::EntityStore,
        schedule::{self, LAST_CHECK_NUMBER},
        undo::{Removal, UndoBuffer},
    },
};

/// Inseminações e a cadeia de chequeos de cada uma.
pub struct ReproductionService {
    gateway: Arc<dyn DocumentGateway>,
    owner: String,
    inseminations: EntityStore<Insemination>,
    checks: EntityStore<Check>,
    // A inseminação removida e os chequeos que foram junto
    undo: UndoBuffer<Removal<(Insemination, Vec<Check>)>>,
}

impl ReproductionService {
    pub fn new(gateway: Arc<dyn DocumentGateway>, owner: &str) -> Self {
        Self {
            gateway,
            owner: owner.to_string(),
            inseminations: EntityStore::new(),
            checks: EntityStore::new(),
            undo: UndoBuffer::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.inseminations.is_loaded() && self.checks.is_loaded()
    }

    pub async fn load(&mut self) -> Result<(), AppError> {
        let gateway = self.gateway.as_ref();
        let inseminations = EntityStore::<Insemination>::fetch(gateway, &self.owner).await?;
        let checks = EntityStore::<Check>::fetch(gateway, &self.owner).await?;

        self.inseminations.replace_all(inseminations);
        self.checks.replace_all(checks);
        Ok(())
    }

    pub fn list_inseminations(&self) -> Vec<Insemination> {
        self.inseminations.all().to_vec()
    }

    /// Chequeos pendentes, do mais próximo ao mais distante.
    pub fn list_checks(&self) -> Vec<Check> {
        let mut checks = self.checks.all().to_vec();
        checks.sort_by(|a, b| a.date.cmp(&b.date).then(a.check_number.cmp(&b.check_number)));
        checks
    }

    /// Grava a inseminação e agenda o primeiro chequeo para 30 dias depois.
    pub async fn create_insemination(&mut self, payload: InseminationPayload) -> Result<Insemination, AppError> {
        payload.validate()?;

        let insemination = Insemination {
            id: String::new(),
            cow_id: payload.cow_id.trim().to_string(),
            bull_id: payload.bull_id.trim().to_string(),
            date: payload.date,
            has_birthed: false,
            notes: String::new(),
        };
        let created = self
            .inseminations
            .create(self.gateway.as_ref(), &self.owner, insemination)
            .await?;

        self.checks
            .create(self.gateway.as_ref(), &self.owner, schedule::first_check(&created))
            .await?;

        Ok(created)
    }

    /// Troca de vaca é propagada aos chequeos pendentes.
    pub async fn update_insemination(
        &mut self,
        id: &str,
        payload: InseminationPayload,
    ) -> Result<Insemination, AppError> {
        payload.validate()?;

        let updated = self
            .inseminations
            .update(self.gateway.as_ref(), &self.owner, id, |insemination| {
                insemination.cow_id = payload.cow_id.trim().to_string();
                insemination.bull_id = payload.bull_id.trim().to_string();
                insemination.date = payload.date;
                Ok(())
            })
            .await?;

        let stale: Vec<String> = self
            .checks
            .all()
            .iter()
            .filter(|c| c.insemination_id == id && c.cow_id != updated.cow_id)
            .map(|c| c.id.clone())
            .collect();

        for check_id in stale {
            let cow_id = updated.cow_id.clone();
            self.checks
                .update(self.gateway.as_ref(), &self.owner, &check_id, move |check| {
                    check.cow_id = cow_id;
                    Ok(())
                })
                .await?;
        }

        Ok(updated)
    }

    pub async fn update_notes(&mut self, id: &str, notes: String) -> Result<Insemination, AppError> {
        self.inseminations
            .update(self.gateway.as_ref(), &self.owner, id, move |insemination| {
                insemination.notes = notes;
                Ok(())
            })
            .await
    }

    /// Marca o parto e descarta os chequeos que ainda estavam pendentes.
    pub async fn mark_birthed(&mut self, id: &str) -> Result<Insemination, AppError> {
        let updated = self
            .inseminations
            .update(self.gateway.as_ref(), &self.owner, id, |insemination| {
                insemination.has_birthed = true;
                Ok(())
            })
            .await?;

        self.delete_checks_of(id).await?;
        tracing::info!("Parto registrado para a inseminação {}", id);
        Ok(updated)
    }

    /// Remove a inseminação e, em cascata, só os chequeos dela.
    pub async fn delete_insemination(&mut self, id: &str) -> Result<(), AppError> {
        let related: Vec<Check> = self
            .checks
            .all()
            .iter()
            .filter(|c| c.insemination_id == id)
            .cloned()
            .collect();

        let snapshot = self
            .inseminations
            .delete(self.gateway.as_ref(), &self.owner, id)
            .await?;
        self.undo.remember(Removal::new((snapshot, related)));

        self.delete_checks_of(id).await
    }

    /// Recria a inseminação e os chequeos dela apontando para o id novo.
    /// Uma falha no meio deixa o progresso no slot; repetir não duplica nada.
    pub async fn undo_delete(&mut self) -> Result<Insemination, AppError> {
        let removal = self.undo.pending()?;
        let already_restored = removal
            .restored_id
            .as_deref()
            .and_then(|id| self.inseminations.get(id))
            .cloned();

        let restored = match already_restored {
            Some(restored) => restored,
            None => {
                let insemination = removal.entity.0.clone();
                let restored = self
                    .inseminations
                    .create(self.gateway.as_ref(), &self.owner, insemination)
                    .await?;
                self.undo.pending_mut()?.restored_id = Some(restored.id.clone());
                restored
            }
        };

        let checks = self.undo.pending()?.entity.1.clone();
        for mut check in checks {
            check.insemination_id = restored.id.clone();
            check.cow_id = restored.cow_id.clone();
            self.checks.create(self.gateway.as_ref(), &self.owner, check).await?;
            self.undo.pending_mut()?.entity.1.remove(0);
        }

        self.undo.clear();
        Ok(restored)
    }

    /// Conclui o chequeo: ele sai da lista e o próximo (se houver) entra 30 dias depois.
    pub async fn complete_check(&mut self, id: &str) -> Result<Option<Check>, AppError> {
        let number = self.checks.require(id)?.check_number;
        if !(1..=LAST_CHECK_NUMBER).contains(&number) {
            return Err(field_error(
                "checkNumber",
                "range",
                "El número de chequeo debe estar entre 1 y 9.",
            ));
        }

        let completed = self.checks.delete(self.gateway.as_ref(), &self.owner, id).await?;

        match schedule::next_check(&completed) {
            Some(next) => {
                let created = self.checks.create(self.gateway.as_ref(), &self.owner, next).await?;
                Ok(Some(created))
            }
            None => {
                tracing::info!("Último chequeo concluído para a inseminação {}", completed.insemination_id);
                Ok(None)
            }
        }
    }

    async fn delete_checks_of(&mut self, insemination_id: &str) -> Result<(), AppError> {
        let ids: Vec<String> = self
            .checks
            .all()
            .iter()
            .filter(|c| c.insemination_id == insemination_id)
            .map(|c| c.id.clone())
            .collect();

        for check_id in ids {
            self.checks.delete(self.gateway.as_ref(), &self.owner, &check_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CollectionPath, MemoryGateway};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload(cow_id: &str, on: NaiveDate) -> InseminationPayload {
        InseminationPayload { cow_id: cow_id.into(), bull_id: "T7".into(), date: on }
    }

    fn service() -> (Arc<MemoryGateway>, ReproductionService) {
        let gateway = Arc::new(MemoryGateway::new());
        (gateway.clone(), ReproductionService::new(gateway, "u1"))
    }

    #[tokio::test]
    async fn test_new_insemination_schedules_first_check() {
        let (_, mut reproduction) = service();

        let insemination = reproduction
            .create_insemination(payload("C1", date(2024, 1, 1)))
            .await
            .unwrap();

        let checks = reproduction.list_checks();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].check_number, 1);
        assert_eq!(checks[0].date, date(2024, 1, 31));
        assert_eq!(checks[0].insemination_id, insemination.id);
    }

    #[tokio::test]
    async fn test_completing_checks_walks_the_chain_to_nine() {
        let (_, mut reproduction) = service();
        reproduction
            .create_insemination(payload("C1", date(2024, 1, 1)))
            .await
            .unwrap();

        let mut current = reproduction.list_checks()[0].clone();
        let mut completed = 0;
        loop {
            let next = reproduction.complete_check(&current.id).await.unwrap();
            completed += 1;
            match next {
                Some(next) => {
                    assert_eq!(next.check_number, current.check_number + 1);
                    assert_eq!(next.date, current.date + chrono::Duration::days(30));
                    assert_eq!(reproduction.list_checks(), vec![next.clone()]);
                    current = next;
                }
                None => break,
            }
        }

        assert_eq!(completed, 9);
        assert!(reproduction.list_checks().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_only_to_own_checks_and_undo_relinks() {
        let (_, mut reproduction) = service();
        let first = reproduction
            .create_insemination(payload("C1", date(2024, 1, 1)))
            .await
            .unwrap();
        let second = reproduction
            .create_insemination(payload("C1", date(2024, 3, 1)))
            .await
            .unwrap();

        reproduction.delete_insemination(&first.id).await.unwrap();

        let remaining = reproduction.list_checks();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].insemination_id, second.id);

        let restored = reproduction.undo_delete().await.unwrap();
        assert_ne!(restored.id, first.id);

        let checks = reproduction.list_checks();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].insemination_id, restored.id);
        assert_eq!(checks[0].date, date(2024, 1, 31));
    }

    #[tokio::test]
    async fn test_birthed_clears_pending_checks() {
        let (_, mut reproduction) = service();
        let insemination = reproduction
            .create_insemination(payload("C1", date(2024, 1, 1)))
            .await
            .unwrap();

        let updated = reproduction.mark_birthed(&insemination.id).await.unwrap();

        assert!(updated.has_birthed);
        assert!(reproduction.list_checks().is_empty());
    }

    #[tokio::test]
    async fn test_cow_change_propagates_to_checks() {
        let (_, mut reproduction) = service();
        let insemination = reproduction
            .create_insemination(payload("C1", date(2024, 1, 1)))
            .await
            .unwrap();

        reproduction
            .update_insemination(&insemination.id, payload("C2", date(2024, 1, 1)))
            .await
            .unwrap();

        assert_eq!(reproduction.list_checks()[0].cow_id, "C2");
    }

    #[tokio::test]
    async fn test_future_date_is_rejected() {
        let (gateway, mut reproduction) = service();
        let tomorrow = chrono::Utc::now().date_naive() + chrono::Duration::days(1);

        let err = reproduction
            .create_insemination(payload("C1", tomorrow))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(gateway.write_count(), 0);
    }

    #[tokio::test]
    async fn test_notes_are_replaced() {
        let (_, mut reproduction) = service();
        let insemination = reproduction
            .create_insemination(payload("C1", date(2024, 1, 1)))
            .await
            .unwrap();

        reproduction.update_notes(&insemination.id, "Primera".into()).await.unwrap();
        let updated = reproduction.update_notes(&insemination.id, "Segunda".into()).await.unwrap();

        assert_eq!(updated.notes, "Segunda");
    }

    #[tokio::test]
    async fn test_interrupted_undo_resumes_without_duplicating_insemination() {
        let (gateway, mut reproduction) = service();
        let insemination = reproduction
            .create_insemination(payload("C1", date(2024, 1, 1)))
            .await
            .unwrap();
        let insemination = reproduction
            .update_notes(&insemination.id, "Toro prestado".into())
            .await
            .unwrap();
        reproduction.delete_insemination(&insemination.id).await.unwrap();

        // a inseminação volta, o chequeo não
        gateway.fail_nth_create(2);
        assert!(reproduction.undo_delete().await.is_err());

        let restored = reproduction.undo_delete().await.unwrap();

        assert_eq!(reproduction.list_inseminations(), vec![restored.clone()]);
        let stored = gateway.list(&CollectionPath::root("u1", "inseminations")).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(Insemination { id: insemination.id.clone(), ..restored.clone() }, insemination);

        let checks = reproduction.list_checks();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].insemination_id, restored.id);
        assert!(matches!(reproduction.undo_delete().await, Err(AppError::NothingToRestore)));
    }
}
