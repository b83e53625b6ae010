// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::create_storage_session,
        handlers::auth::get_me,

        // --- Cows ---
        handlers::cows::list_cows,
        handlers::cows::search_cows,
        handlers::cows::create_cow,
        handlers::cows::update_cow,
        handlers::cows::delete_cow,
        handlers::cows::undo_delete_cow,
        handlers::cows::refresh_cows,
        handlers::cows::add_vaccination,
        handlers::cows::add_treatment,
        handlers::cows::add_milk_yield,
        handlers::cows::add_feeding_schedule,
        handlers::cows::add_note,

        // --- Calves ---
        handlers::calves::list_calves,
        handlers::calves::create_calf,
        handlers::calves::update_calf,
        handlers::calves::delete_calf,
        handlers::calves::undo_delete_calf,
        handlers::calves::refresh_calves,
        handlers::calves::add_feeding_record,
        handlers::calves::add_vaccination,
        handlers::calves::add_growth_milestone,
        handlers::calves::add_note,

        // --- Pregnancies ---
        handlers::pregnancies::list_pregnancies,
        handlers::pregnancies::create_pregnancy,
        handlers::pregnancies::update_pregnancy,
        handlers::pregnancies::delete_pregnancy,
        handlers::pregnancies::undo_delete_pregnancy,
        handlers::pregnancies::refresh_pregnancies,
        handlers::pregnancies::add_pregnancy_note,
        handlers::pregnancies::get_pregnancy_insights,

        // --- Reproduction ---
        handlers::reproduction::list_inseminations,
        handlers::reproduction::create_insemination,
        handlers::reproduction::update_insemination,
        handlers::reproduction::delete_insemination,
        handlers::reproduction::undo_delete_insemination,
        handlers::reproduction::refresh_reproduction,
        handlers::reproduction::mark_birthed,
        handlers::reproduction::update_insemination_notes,
        handlers::reproduction::list_checks,
        handlers::reproduction::complete_check,

        // --- Vaccines ---
        handlers::vaccines::list_vaccines,
        handlers::vaccines::create_vaccine,
        handlers::vaccines::update_vaccine,
        handlers::vaccines::delete_vaccine,
        handlers::vaccines::undo_delete_vaccine,
        handlers::vaccines::list_records,
        handlers::vaccines::create_record,
        handlers::vaccines::update_record,
        handlers::vaccines::update_side_effects,
        handlers::vaccines::delete_record,
        handlers::vaccines::undo_delete_record,
        handlers::vaccines::get_schedule,
        handlers::vaccines::refresh_vaccines,

        // --- Milk ---
        handlers::milk::list_cows,
        handlers::milk::create_cow,
        handlers::milk::update_cow,
        handlers::milk::delete_cow,
        handlers::milk::undo_delete_cow,
        handlers::milk::list_productions,
        handlers::milk::create_production,
        handlers::milk::update_production,
        handlers::milk::delete_production,
        handlers::milk::undo_delete_production,
        handlers::milk::list_incidents,
        handlers::milk::create_incident,
        handlers::milk::update_incident,
        handlers::milk::delete_incident,
        handlers::milk::undo_delete_incident,
        handlers::milk::get_analytics,
        handlers::milk::get_production_details,
        handlers::milk::refresh_milk,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Caller,
            models::auth::StorageSessionResponse,

            // --- Registros compartilhados ---
            models::records::Vaccination,
            models::records::Note,

            // --- Cows ---
            models::cow::Cow,
            models::cow::CowPayload,
            models::cow::Treatment,
            models::cow::MilkYield,
            models::cow::FeedingSchedule,

            // --- Calves ---
            models::calf::Gender,
            models::calf::FeedingUnit,
            models::calf::Calf,
            models::calf::CalfPayload,
            models::calf::FeedingRecord,
            models::calf::GrowthMilestone,

            // --- Pregnancies ---
            models::pregnancy::HealthStatus,
            models::pregnancy::ActivityLevel,
            models::pregnancy::PregnantCow,
            models::pregnancy::PregnantCowPayload,
            models::pregnancy::PregnancyNotePayload,
            models::pregnancy::PregnancyInsights,

            // --- Reproduction ---
            models::reproduction::Insemination,
            models::reproduction::Check,
            models::reproduction::CheckView,
            models::reproduction::InseminationPayload,
            models::reproduction::InseminationNotesPayload,

            // --- Vaccines ---
            models::vaccine::Vaccine,
            models::vaccine::VaccinationRecord,
            models::vaccine::VaccinationRecordPayload,
            models::vaccine::SideEffectsPayload,
            models::vaccine::VaccinationRecordView,
            models::vaccine::ScheduledVaccination,
            models::vaccine::UnscheduledVaccination,
            models::vaccine::VaccinationSchedule,

            // --- Milk ---
            models::milk::MilkCow,
            models::milk::ProductionQuality,
            models::milk::MilkProductionRecord,
            models::milk::MilkProductionPayload,
            models::milk::IncidentType,
            models::milk::MilkIncident,
            models::milk::ProductionPeriod,
            models::milk::ProductionPoint,
            models::milk::ProductionDetail,
        )
    ),
    tags(
        (name = "Auth", description = "Identidade e sessão de armazenamento"),
        (name = "Cows", description = "Fichas das vacas e seus registros"),
        (name = "Calves", description = "Crias, alimentação e crescimento"),
        (name = "Pregnancies", description = "Acompanhamento de prenhez"),
        (name = "Reproduction", description = "Inseminações e chequeos"),
        (name = "Vaccines", description = "Catálogo, aplicações e agenda de vacinas"),
        (name = "Milk", description = "Produção de leite e incidentes")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
