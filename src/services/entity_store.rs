// src/services/entity_store.rs

use serde_json::Value;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{CollectionPath, Document, DocumentGateway},
    models::Record,
};

/// Sub-registro guardado numa sub-coleção do documento pai `P`.
pub trait ChildOf<P: Record>: Record + Validate {
    fn attach(self, parent: &mut P);
}

/// Cache de uma coleção de um dono. Toda escrita passa primeiro pelo gateway;
/// o cache só muda depois que o gateway confirmou.
pub struct EntityStore<T: Record> {
    items: Vec<T>,
    loaded: bool,
}

impl<T: Record> Default for EntityStore<T> {
    fn default() -> Self {
        Self { items: Vec::new(), loaded: false }
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(owner: &str) -> CollectionPath {
        CollectionPath::root(owner, T::COLLECTION)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Lê a coleção inteira sem tocar no cache.
    pub async fn fetch(gateway: &dyn DocumentGateway, owner: &str) -> Result<Vec<T>, AppError> {
        let documents = gateway.list(&Self::path(owner)).await?;
        Ok(decode_all(documents, T::COLLECTION))
    }

    pub async fn load(&mut self, gateway: &dyn DocumentGateway, owner: &str) -> Result<(), AppError> {
        let items = Self::fetch(gateway, owner).await?;
        self.replace_all(items);
        Ok(())
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
    }

    pub async fn create(
        &mut self,
        gateway: &dyn DocumentGateway,
        owner: &str,
        mut entity: T,
    ) -> Result<T, AppError> {
        let id = gateway.create(&Self::path(owner), to_fields(&entity)?).await?;
        entity.set_id(id);

        tracing::info!("{} criado: {}", T::COLLECTION, entity.id());
        self.items.push(entity.clone());
        Ok(entity)
    }

    /// Aplica `change` numa cópia, grava todos os campos e só então troca o cache.
    pub async fn update<F>(
        &mut self,
        gateway: &dyn DocumentGateway,
        owner: &str,
        id: &str,
        change: F,
    ) -> Result<T, AppError>
    where
        F: FnOnce(&mut T) -> Result<(), AppError> + Send,
    {
        let index = self.position(id)?;
        let mut updated = self.items[index].clone();
        change(&mut updated)?;
        updated.set_id(id.to_string());

        gateway.update(&Self::path(owner), id, to_fields(&updated)?).await?;

        tracing::info!("{} atualizado: {}", T::COLLECTION, id);
        self.items[index] = updated.clone();
        Ok(updated)
    }

    /// Remove e devolve o estado anterior à remoção.
    pub async fn delete(
        &mut self,
        gateway: &dyn DocumentGateway,
        owner: &str,
        id: &str,
    ) -> Result<T, AppError> {
        let index = self.position(id)?;
        gateway.delete(&Self::path(owner), id).await?;

        tracing::info!("{} removido: {}", T::COLLECTION, id);
        Ok(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn require(&self, id: &str) -> Result<&T, AppError> {
        self.get(id).ok_or_else(|| AppError::not_found(T::COLLECTION, id))
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    #[cfg(test)]
    pub fn insert_local(&mut self, entity: T) {
        self.items.push(entity);
    }

    pub fn patch_local<F: FnOnce(&mut T)>(&mut self, id: &str, patch: F) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            patch(item);
        }
    }

    fn position(&self, id: &str) -> Result<usize, AppError> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| AppError::not_found(T::COLLECTION, id))
    }
}

// --- SUB-COLEÇÕES ---

fn child_path<P: Record, C: Record>(owner: &str, parent_id: &str) -> CollectionPath {
    CollectionPath::nested(owner, P::COLLECTION, parent_id, C::COLLECTION)
}

pub async fn load_children<P: Record, C: Record>(
    gateway: &dyn DocumentGateway,
    owner: &str,
    parent_id: &str,
) -> Result<Vec<C>, AppError> {
    let documents = gateway.list(&child_path::<P, C>(owner, parent_id)).await?;
    Ok(decode_all(documents, C::COLLECTION))
}

pub async fn create_child<P: Record, C: Record>(
    gateway: &dyn DocumentGateway,
    owner: &str,
    parent_id: &str,
    mut child: C,
) -> Result<C, AppError> {
    let path = child_path::<P, C>(owner, parent_id);
    let id = gateway.create(&path, to_fields(&child)?).await?;
    child.set_id(id);
    Ok(child)
}

// --- CONVERSÃO DE DOCUMENTOS ---

/// Corpo do documento: sem `id` e sem os campos que vivem em sub-coleções.
pub fn to_fields<T: Record>(entity: &T) -> Result<Value, AppError> {
    let mut value = serde_json::to_value(entity)
        .map_err(|e| AppError::InternalServerError(e.into()))?;

    if let Some(fields) = value.as_object_mut() {
        fields.remove("id");
        for child in T::CHILD_FIELDS {
            fields.remove(*child);
        }
    }
    Ok(value)
}

pub fn from_document<T: Record>(document: Document) -> Result<T, AppError> {
    let Document { id, mut data } = document;
    match data.as_object_mut() {
        Some(fields) => {
            fields.insert("id".to_string(), Value::String(id.clone()));
        }
        None => return Err(AppError::Gateway(format!("documento '{}' não é um objeto", id))),
    }
    serde_json::from_value(data)
        .map_err(|e| AppError::Gateway(format!("documento '{}' inválido: {}", id, e)))
}

// Documentos ilegíveis são pulados; o resto da coleção continua utilizável
fn decode_all<T: Record>(documents: Vec<Document>, collection: &str) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| match from_document(document) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Ignorando documento em {}: {}", collection, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryGateway,
        models::{milk::MilkCow, cow::Cow},
    };
    use chrono::NaiveDate;
    use serde_json::json;

    fn milk_cow(name: &str) -> MilkCow {
        MilkCow { id: String::new(), name: name.into(), tag: "A1".into() }
    }

    #[tokio::test]
    async fn test_create_assigns_gateway_id() {
        let gateway = MemoryGateway::new();
        let mut store = EntityStore::<MilkCow>::new();

        let created = store.create(&gateway, "u1", milk_cow("Margarita")).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(store.all(), &[created.clone()]);
        let documents = gateway.list(&CollectionPath::root("u1", "milkCows")).await.unwrap();
        assert_eq!(documents[0].id, created.id);
        assert_eq!(documents[0].data, json!({"name": "Margarita", "tag": "A1"}));
    }

    #[tokio::test]
    async fn test_failed_writes_leave_cache_untouched() {
        let gateway = MemoryGateway::new();
        let mut store = EntityStore::<MilkCow>::new();
        let created = store.create(&gateway, "u1", milk_cow("Margarita")).await.unwrap();

        gateway.set_failing(true);
        assert!(store.create(&gateway, "u1", milk_cow("Lola")).await.is_err());
        assert!(store
            .update(&gateway, "u1", &created.id, |c| {
                c.name = "Otra".into();
                Ok(())
            })
            .await
            .is_err());
        assert!(store.delete(&gateway, "u1", &created.id).await.is_err());

        assert_eq!(store.all(), &[created]);
    }

    #[tokio::test]
    async fn test_unknown_id_fails_before_gateway() {
        let gateway = MemoryGateway::new();
        let mut store = EntityStore::<MilkCow>::new();

        let err = store.delete(&gateway, "u1", "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(gateway.write_count(), 0);
    }

    #[tokio::test]
    async fn test_load_replaces_cache_and_skips_broken_documents() {
        let gateway = MemoryGateway::new();
        let path = CollectionPath::root("u1", "milkCows");
        gateway.create(&path, json!({"name": "Lola", "tag": "B2"})).await.unwrap();
        gateway.create(&path, json!({"tag": "sin nombre"})).await.unwrap();

        let mut store = EntityStore::<MilkCow>::new();
        store.insert_local(milk_cow("local"));
        store.load(&gateway, "u1").await.unwrap();

        assert!(store.is_loaded());
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].name, "Lola");
    }

    #[test]
    fn test_fields_exclude_id_and_children() {
        let cow = Cow {
            id: "c1".into(),
            name: "Luna".into(),
            breed: "Holstein".into(),
            birth_date: NaiveDate::from_ymd_opt(2022, 5, 1).unwrap(),
            genetic_info: String::new(),
            health_history: String::new(),
            unique_traits: String::new(),
            vaccinations: vec![],
            treatments: vec![],
            milk_production: vec![],
            feeding_schedule: vec![],
            notes: vec![],
        };
        let fields = to_fields(&cow).unwrap();
        let keys: Vec<&String> = fields.as_object().unwrap().keys().collect();
        assert!(!keys.iter().any(|k| *k == "id" || *k == "treatments" || *k == "notes"));
        assert_eq!(fields["birthDate"], json!("2022-05-01"));
    }
}
