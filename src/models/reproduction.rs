// src/models/reproduction.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::validation::{not_blank, not_in_future},
    models::record,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insemination {
    #[serde(default)]
    pub id: String,
    pub cow_id: String,
    pub bull_id: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    #[serde(default)]
    pub has_birthed: bool,
    #[serde(default)]
    pub notes: String,
}
record!(Insemination, "inseminations");

/// Chequeo de prenhez. Pertence a uma inseminação pelo `insemination_id`;
/// o `cow_id` é só informativo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    #[serde(default)]
    pub id: String,
    pub insemination_id: String,
    pub cow_id: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    #[schema(minimum = 1, maximum = 9)]
    pub check_number: u8,
}
record!(Check, "checks");

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InseminationPayload {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "C1")]
    pub cow_id: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "T7")]
    pub bull_id: String,

    #[validate(custom(function = "not_in_future"))]
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InseminationNotesPayload {
    #[serde(default)]
    pub notes: String,
}

/// Chequeo pendente com o aviso de proximidade já resolvido.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckView {
    #[serde(flatten)]
    pub check: Check,
    pub days_until: i64,
    pub needs_attention: bool,
    pub alert: Option<String>,
}
