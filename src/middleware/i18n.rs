// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::services::schedule::{PregnancyAlert, Recommendation};

const SUPPORTED: [&str; 3] = ["es", "pt", "en"];

// Extrator de idioma. Espanhol quando o cabeçalho falta ou pede algo que não temos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale("es".to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

impl Locale {
    /// Primeiro idioma suportado na ordem de preferência do cabeçalho.
    pub fn from_header(header_str: &str) -> Self {
        accept_language::parse(header_str)
            .iter()
            // "pt-BR" -> "pt"
            .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
            .find(|lang| SUPPORTED.contains(&lang.as_str()))
            .map(Locale)
            .unwrap_or_default()
    }

    pub fn lang(&self) -> &str {
        &self.0
    }

    pub fn alert(&self, alert: PregnancyAlert) -> &'static str {
        use PregnancyAlert::*;
        match (self.lang(), alert) {
            ("pt", DueSoon) => "Preparar para o parto iminente",
            ("pt", UrgentCare) => "Atenção veterinária urgente necessária",
            ("pt", ScheduleCheckup) => "Agendar revisão veterinária",
            ("pt", MonitorLowActivity) => "Monitorar atividade reduzida",
            ("pt", WatchStress) => "Vigiar possível estresse por excesso de atividade",

            ("en", DueSoon) => "Prepare for imminent calving",
            ("en", UrgentCare) => "Urgent veterinary care required",
            ("en", ScheduleCheckup) => "Schedule a veterinary check-up",
            ("en", MonitorLowActivity) => "Monitor reduced activity",
            ("en", WatchStress) => "Watch for stress from excessive activity",

            (_, DueSoon) => "Preparar para el parto inminente",
            (_, UrgentCare) => "Atención médica urgente requerida",
            (_, ScheduleCheckup) => "Programar revisión veterinaria",
            (_, MonitorLowActivity) => "Monitorear actividad reducida",
            (_, WatchStress) => "Vigilar posible estrés por exceso de actividad",
        }
    }

    pub fn recommendation(&self, recommendation: Recommendation) -> &'static str {
        use Recommendation::*;
        match (self.lang(), recommendation) {
            ("pt", AdjustDiet) => "Ajustar a dieta para a preparação do parto",
            ("pt", PrepareBirthingArea) => "Preparar a área de parto",
            ("pt", KeepRoutine) => "Manter a rotina de cuidados atual",
            ("pt", IncreaseSupervision) => "Aumentar a supervisão e considerar suplementos",
            ("pt", FollowVetOrders) => "Seguir rigorosamente as indicações veterinárias",
            ("pt", KeepActivity) => "Manter o nível de atividade atual",
            ("pt", EncourageExercise) => "Incentivar exercício moderado supervisionado",
            ("pt", ProvideRest) => "Oferecer espaços tranquilos para descanso",

            ("en", AdjustDiet) => "Adjust diet to prepare for calving",
            ("en", PrepareBirthingArea) => "Prepare the calving area",
            ("en", KeepRoutine) => "Keep the current care routine",
            ("en", IncreaseSupervision) => "Increase supervision and consider supplements",
            ("en", FollowVetOrders) => "Strictly follow veterinary instructions",
            ("en", KeepActivity) => "Keep the current activity level",
            ("en", EncourageExercise) => "Encourage moderate supervised exercise",
            ("en", ProvideRest) => "Provide quiet spaces for rest",

            (_, AdjustDiet) => "Ajustar dieta para preparación al parto",
            (_, PrepareBirthingArea) => "Preparar área de parto",
            (_, KeepRoutine) => "Mantener rutina de cuidados actual",
            (_, IncreaseSupervision) => "Aumentar supervisión y considerar suplementos",
            (_, FollowVetOrders) => "Seguir estrictamente las indicaciones veterinarias",
            (_, KeepActivity) => "Mantener nivel de actividad actual",
            (_, EncourageExercise) => "Fomentar ejercicio moderado supervisado",
            (_, ProvideRest) => "Proporcionar espacios tranquilos para descanso",
        }
    }

    /// Rótulo para ids de vacina que já não estão no catálogo.
    pub fn deleted_vaccine(&self) -> &'static str {
        match self.lang() {
            "pt" => "Vacina removida",
            "en" => "Deleted vaccine",
            _ => "Vacuna eliminada",
        }
    }

    pub fn check_alert(&self, days: i64) -> String {
        let plural = days.abs() != 1;
        match (self.lang(), days < 0) {
            ("pt", false) => format!("Alerta: Checagem em {} dia{}", days, if plural { "s" } else { "" }),
            ("pt", true) => format!("Alerta: Checagem atrasada há {} dia{}", -days, if plural { "s" } else { "" }),
            ("en", false) => format!("Alert: Check in {} day{}", days, if plural { "s" } else { "" }),
            ("en", true) => format!("Alert: Check overdue by {} day{}", -days, if plural { "s" } else { "" }),
            (_, false) => format!("Alerta: Chequeo en {} día{}", days, if plural { "s" } else { "" }),
            (_, true) => format!("Alerta: Chequeo atrasado {} día{}", -days, if plural { "s" } else { "" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_supported_language_wins() {
        assert_eq!(Locale::from_header("pt-BR,pt;q=0.9,en;q=0.8").lang(), "pt");
        assert_eq!(Locale::from_header("fr-FR,en;q=0.5").lang(), "en");
        assert_eq!(Locale::from_header("de").lang(), "es");
        assert_eq!(Locale::default().lang(), "es");
    }

    #[test]
    fn test_spanish_texts() {
        let es = Locale::default();
        assert_eq!(es.alert(PregnancyAlert::UrgentCare), "Atención médica urgente requerida");
        assert_eq!(es.recommendation(Recommendation::PrepareBirthingArea), "Preparar área de parto");
        assert_eq!(es.deleted_vaccine(), "Vacuna eliminada");
        assert_eq!(es.check_alert(1), "Alerta: Chequeo en 1 día");
        assert_eq!(es.check_alert(5), "Alerta: Chequeo en 5 días");
    }

    #[test]
    fn test_english_overdue_check() {
        let en = Locale("en".into());
        assert_eq!(en.check_alert(-3), "Alert: Check overdue by 3 days");
    }
}
