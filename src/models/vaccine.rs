// src/models/vaccine.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::validation::not_blank, models::record};

// --- CATÁLOGO ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Aftosa")]
    pub name: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    /// Idade recomendada, em meses.
    #[validate(range(min = 1, message = "La edad recomendada es obligatoria."))]
    #[schema(example = 6)]
    pub recommended_age: u32,

    #[validate(custom(function = "not_blank"))]
    pub recommended_situation: String,

    /// Texto livre; só "anual" e "semestral" geram recorrência.
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Anual")]
    pub frequency: String,
}
record!(Vaccine, "vaccines");

// --- REGISTROS DE VACINAÇÃO ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    #[serde(default)]
    pub id: String,
    pub cow_id: String,
    pub vaccine_ids: Vec<String>,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    pub lot: String,
    pub administrator: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub side_effects: Option<String>,
}
record!(VaccinationRecord, "vaccinationRecords");

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecordPayload {
    #[validate(custom(function = "not_blank"))]
    pub cow_id: String,

    #[validate(length(min = 1, message = "Selecciona al menos una vacuna."))]
    pub vaccine_ids: Vec<String>,

    #[schema(value_type = String, format = Date, example = "2024-04-02")]
    pub date: NaiveDate,

    #[validate(custom(function = "not_blank"))]
    pub lot: String,

    #[validate(custom(function = "not_blank"))]
    pub administrator: String,

    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SideEffectsPayload {
    pub side_effects: Option<String>,
}

/// Registro com os nomes das vacinas resolvidos contra o catálogo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecordView {
    #[serde(flatten)]
    pub record: VaccinationRecord,
    pub vaccine_names: Vec<String>,
}

// --- AGENDA ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledVaccination {
    pub record_id: String,
    pub cow_id: String,
    pub vaccine_id: String,
    pub vaccine_name: String,

    #[schema(value_type = String, format = Date)]
    pub next_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnscheduledVaccination {
    pub record_id: String,
    pub cow_id: String,
    pub vaccine_id: String,
    pub vaccine_name: String,
    pub frequency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationSchedule {
    pub upcoming: Vec<ScheduledVaccination>,
    pub overdue: Vec<ScheduledVaccination>,
    /// Frequência sem recorrência configurada.
    pub unscheduled: Vec<UnscheduledVaccination>,
}
