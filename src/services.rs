pub mod auth;
pub mod entity_store;
pub mod undo;
pub mod schedule;
pub mod workspace;

pub mod cow_service;
pub mod calf_service;
pub mod pregnancy_service;
pub mod reproduction_service;
pub mod vaccine_service;
pub mod milk_service;
