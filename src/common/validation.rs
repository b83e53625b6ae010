// src/common/validation.rs

use chrono::{NaiveDate, Utc};
use validator::{ValidationError, ValidationErrors};

use crate::common::error::AppError;

/// Datas de nascimento e de cobertura não podem estar no futuro.
pub fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut err = ValidationError::new("future_date");
        err.message = Some("La fecha no puede ser futura.".into());
        return Err(err);
    }
    Ok(())
}

/// Campos de texto obrigatórios: espaços em branco não contam.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Este campo es obligatorio.".into());
        return Err(err);
    }
    Ok(())
}

// Helper para erros de validação montados fora do derive
pub fn field_error(field: &'static str, code: &'static str, message: &str) -> AppError {
    let mut errors = ValidationErrors::new();
    let mut err = ValidationError::new(code);
    err.message = Some(message.to_string().into());
    errors.add(field, err);
    AppError::ValidationError(errors)
}
