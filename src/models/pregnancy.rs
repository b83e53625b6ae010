// src/models/pregnancy.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::validation::{not_blank, not_in_future},
    models::record,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum HealthStatus {
    Buena,
    Regular,
    Mala,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ActivityLevel {
    Alta,
    Normal,
    Baja,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PregnantCow {
    #[serde(default)]
    pub id: String,
    pub name: String,

    #[schema(value_type = String, format = Date)]
    pub breeding_date: NaiveDate,

    pub weight: f64,
    pub health: HealthStatus,
    pub activity: ActivityLevel,

    // Derivado de breeding_date, mas gravado junto no documento
    #[schema(value_type = String, format = Date)]
    pub estimated_due_date: NaiveDate,

    #[serde(default)]
    pub notes: Vec<String>,
}
record!(PregnantCow, "pregnantCows");

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PregnantCowPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Estrella")]
    pub name: String,

    #[validate(custom(function = "not_in_future"))]
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub breeding_date: NaiveDate,

    #[validate(range(exclusive_min = 0.0, message = "El peso debe ser un valor positivo."))]
    #[schema(example = 540.0)]
    pub weight: f64,

    pub health: HealthStatus,
    pub activity: ActivityLevel,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyNotePayload {
    #[validate(custom(function = "not_blank"))]
    pub note: String,
}

/// Visão calculada na hora da resposta; nada disso é gravado.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyInsights {
    pub pregnancy_id: String,

    #[schema(value_type = String, format = Date)]
    pub estimated_due_date: NaiveDate,

    pub days_until_due: i64,
    #[schema(minimum = 0, maximum = 100)]
    pub progress_percent: u8,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}
