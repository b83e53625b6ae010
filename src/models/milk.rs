// src/models/milk.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::validation::not_blank, models::record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilkCow {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Margarita")]
    pub name: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "A-102")]
    pub tag: String,
}
record!(MilkCow, "milkCows");

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionQuality {
    pub fat: Option<f64>,
    pub protein: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilkProductionRecord {
    #[serde(default)]
    pub id: String,
    pub cow_id: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    pub morning: f64,
    pub afternoon: f64,
    pub evening: f64,
    /// Sempre morning + afternoon + evening.
    pub total: f64,

    #[serde(default)]
    pub quality: ProductionQuality,
}
record!(MilkProductionRecord, "milkProductionRecords");

impl MilkProductionRecord {
    pub fn recompute_total(&mut self) {
        self.total = self.morning + self.afternoon + self.evening;
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilkProductionPayload {
    #[validate(custom(function = "not_blank"))]
    pub cow_id: String,

    #[schema(value_type = String, format = Date, example = "2024-06-01")]
    pub date: NaiveDate,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "La cantidad no puede ser negativa."))]
    pub morning: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "La cantidad no puede ser negativa."))]
    pub afternoon: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "La cantidad no puede ser negativa."))]
    pub evening: f64,

    #[serde(default)]
    pub quality: ProductionQuality,
}

impl MilkProductionPayload {
    pub fn into_record(self) -> MilkProductionRecord {
        let mut record = MilkProductionRecord {
            id: String::new(),
            cow_id: self.cow_id,
            date: self.date,
            morning: self.morning,
            afternoon: self.afternoon,
            evening: self.evening,
            total: 0.0,
            quality: self.quality,
        };
        record.recompute_total();
        record
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    Mastitis,
    Injury,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilkIncident {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    pub cow_id: Option<String>,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[serde(rename = "type")]
    pub kind: IncidentType,
}
record!(MilkIncident, "milkIncidents");

// --- ANALÍTICA ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductionPeriod {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPoint {
    /// `YYYY-MM-DD`, `YYYY-W{n}` ou `YYYY-MM`, conforme o período.
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionDetail {
    pub cow_id: String,
    pub cow_name: Option<String>,
    pub total: f64,
}
