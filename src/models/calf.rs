// src/models/calf.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::validation::{not_blank, not_in_future},
    models::{
        record,
        records::{Note, Vaccination},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedingUnit {
    Litros,
    Kilos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedingRecord {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Leche materna")]
    pub kind: String,

    #[validate(range(min = 0.0, message = "La cantidad debe ser un número válido."))]
    pub amount: f64,

    pub unit: FeedingUnit,
}
record!(FeedingRecord, "feedingRecords");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMilestone {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Destete")]
    pub description: String,
}
record!(GrowthMilestone, "growthMilestones");

// --- CRIA ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Calf {
    #[serde(default)]
    pub id: String,
    pub name: String,

    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,

    // Referência livre à mãe, sem validação
    pub mother_cow_id: String,
    pub gender: Gender,
    pub weight: f64,

    #[serde(default)]
    pub feeding_records: Vec<FeedingRecord>,
    #[serde(default)]
    pub vaccinations: Vec<Vaccination>,
    #[serde(default)]
    pub growth_milestones: Vec<GrowthMilestone>,
    #[serde(default)]
    pub notes: Vec<Note>,
}
record!(
    Calf,
    "calves",
    ["feedingRecords", "vaccinations", "growthMilestones", "notes"]
);

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalfPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Pinta")]
    pub name: String,

    #[validate(custom(function = "not_in_future"))]
    #[schema(value_type = String, format = Date, example = "2024-02-14")]
    pub birth_date: NaiveDate,

    #[serde(default)]
    pub mother_cow_id: String,

    pub gender: Gender,

    #[validate(range(min = 0.0, message = "El peso no puede ser negativo."))]
    #[schema(example = 38.5)]
    pub weight: f64,
}

impl CalfPayload {
    pub fn into_calf(self) -> Calf {
        Calf {
            id: String::new(),
            name: self.name.trim().to_string(),
            birth_date: self.birth_date,
            mother_cow_id: self.mother_cow_id,
            gender: self.gender,
            weight: self.weight,
            feeding_records: Vec::new(),
            vaccinations: Vec::new(),
            growth_milestones: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn apply_to(self, calf: &mut Calf) {
        calf.name = self.name.trim().to_string();
        calf.birth_date = self.birth_date;
        calf.mother_cow_id = self.mother_cow_id;
        calf.gender = self.gender;
        calf.weight = self.weight;
    }
}
