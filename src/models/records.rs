// src/models/records.rs
// Sub-registros compartilhados entre vacas e crias.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::validation::not_blank, models::record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[schema(value_type = String, format = Date, example = "2024-03-10")]
    pub date: NaiveDate,

    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Brucelosis")]
    pub kind: String,
}
record!(Vaccination, "vaccinations");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default)]
    #[schema(read_only)]
    pub id: String,

    #[schema(value_type = String, format = Date, example = "2024-03-10")]
    pub date: NaiveDate,

    #[validate(custom(function = "not_blank"))]
    pub content: String,
}
record!(Note, "notes");
