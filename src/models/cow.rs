// src/models/cow.rs

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

// --- SUB-REGISTROS DA VACA ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[validate(custom(function = "not_blank"))]
    pub medication: String,
}
record!(Treatment, "treatments");

// Forma antiga de produção de leite, embutida na ficha da vaca
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilkYield {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    #[validate(range(min = 0.0, message = "La cantidad no puede ser negativa."))]
    pub amount: f64,
}
record!(MilkYield, "milkProduction");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedingSchedule {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Heno")]
    pub feed_type: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "2 veces al día")]
    pub frequency: String,

    #[validate(range(min = 0.0, message = "La cantidad no puede ser negativa."))]
    pub amount: f64,
}
record!(FeedingSchedule, "feedingSchedule");

// --- VACA ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cow {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub breed: String,

    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,

    #[serde(default)]
    pub genetic_info: String,
    #[serde(default)]
    pub health_history: String,
    #[serde(default)]
    pub unique_traits: String,

    #[serde(default)]
    pub vaccinations: Vec<Vaccination>,
    #[serde(default)]
    pub treatments: Vec<Treatment>,
    #[serde(default)]
    pub milk_production: Vec<MilkYield>,
    #[serde(default)]
    pub feeding_schedule: Vec<FeedingSchedule>,
    #[serde(default)]
    pub notes: Vec<Note>,
}
record!(
    Cow,
    "cows",
    ["vaccinations", "treatments", "milkProduction", "feedingSchedule", "notes"]
);

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CowPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Luna")]
    pub name: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Holstein")]
    pub breed: String,

    #[validate(custom(function = "not_in_future"))]
    #[schema(value_type = String, format = Date, example = "2023-01-01")]
    pub birth_date: NaiveDate,

    #[serde(default)]
    pub genetic_info: String,
    #[serde(default)]
    pub health_history: String,
    #[serde(default)]
    pub unique_traits: String,
}

impl CowPayload {
    /// Vaca nova, ainda sem id e sem sub-registros.
    pub fn into_cow(self) -> Cow {
        Cow {
            id: String::new(),
            name: self.name.trim().to_string(),
            breed: self.breed.trim().to_string(),
            birth_date: self.birth_date,
            genetic_info: self.genetic_info,
            health_history: self.health_history,
            unique_traits: self.unique_traits,
            vaccinations: Vec::new(),
            treatments: Vec::new(),
            milk_production: Vec::new(),
            feeding_schedule: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn apply_to(self, cow: &mut Cow) {
        cow.name = self.name.trim().to_string();
        cow.breed = self.breed.trim().to_string();
        cow.birth_date = self.birth_date;
        cow.genetic_info = self.genetic_info;
        cow.health_history = self.health_history;
        cow.unique_traits = self.unique_traits;
    }
}
