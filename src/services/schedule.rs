// src/services/schedule.rs
//
// Datas derivadas e alertas. Funções puras: `today` sempre vem de fora.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    milk::{MilkCow, MilkProductionRecord, ProductionDetail, ProductionPeriod, ProductionPoint},
    pregnancy::{ActivityLevel, HealthStatus, PregnantCow},
    reproduction::{Check, Insemination},
    vaccine::{
        ScheduledVaccination, UnscheduledVaccination, Vaccine, VaccinationRecord,
        VaccinationSchedule,
    },
};

pub const GESTATION_DAYS: i64 = 280;
pub const CHECK_INTERVAL_DAYS: i64 = 30;
pub const LAST_CHECK_NUMBER: u8 = 9;
pub const CHECK_ALERT_DAYS: i64 = 7;
const DUE_SOON_DAYS: i64 = 30;
const DIET_ADJUST_DAYS: i64 = 60;

// =========================================================================
//  PRENHEZ
// =========================================================================

pub fn due_date(breeding_date: NaiveDate) -> NaiveDate {
    breeding_date + Duration::days(GESTATION_DAYS)
}

/// Dias até `date`; negativo quando já passou.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

pub fn progress_percent(breeding_date: NaiveDate, today: NaiveDate) -> u8 {
    let elapsed = (today - breeding_date).num_days() as f64;
    let percent = (elapsed / GESTATION_DAYS as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PregnancyAlert {
    DueSoon,
    UrgentCare,
    ScheduleCheckup,
    MonitorLowActivity,
    WatchStress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Recommendation {
    AdjustDiet,
    PrepareBirthingArea,
    KeepRoutine,
    IncreaseSupervision,
    FollowVetOrders,
    KeepActivity,
    EncourageExercise,
    ProvideRest,
}

/// Ordem fixa: parto, depois saúde, depois atividade.
pub fn alerts(cow: &PregnantCow, today: NaiveDate) -> Vec<PregnancyAlert> {
    let mut alerts = Vec::new();

    if days_until(due_date(cow.breeding_date), today) <= DUE_SOON_DAYS {
        alerts.push(PregnancyAlert::DueSoon);
    }

    match cow.health {
        HealthStatus::Mala => alerts.push(PregnancyAlert::UrgentCare),
        HealthStatus::Regular => alerts.push(PregnancyAlert::ScheduleCheckup),
        HealthStatus::Buena => {}
    }

    match cow.activity {
        ActivityLevel::Baja => alerts.push(PregnancyAlert::MonitorLowActivity),
        ActivityLevel::Alta => alerts.push(PregnancyAlert::WatchStress),
        ActivityLevel::Normal => {}
    }

    alerts
}

pub fn recommendations(cow: &PregnantCow, today: NaiveDate) -> Vec<Recommendation> {
    let days_left = days_until(due_date(cow.breeding_date), today);
    let mut recommendations = Vec::new();

    if days_left <= DIET_ADJUST_DAYS {
        recommendations.push(Recommendation::AdjustDiet);
    }
    if days_left <= DUE_SOON_DAYS {
        recommendations.push(Recommendation::PrepareBirthingArea);
    }

    recommendations.push(match cow.health {
        HealthStatus::Buena => Recommendation::KeepRoutine,
        HealthStatus::Regular => Recommendation::IncreaseSupervision,
        HealthStatus::Mala => Recommendation::FollowVetOrders,
    });

    recommendations.push(match cow.activity {
        ActivityLevel::Normal => Recommendation::KeepActivity,
        ActivityLevel::Baja => Recommendation::EncourageExercise,
        ActivityLevel::Alta => Recommendation::ProvideRest,
    });

    recommendations
}

// =========================================================================
//  CHEQUEOS
// =========================================================================

pub fn next_check_date(last_check_date: NaiveDate) -> NaiveDate {
    last_check_date + Duration::days(CHECK_INTERVAL_DAYS)
}

/// Primeiro chequeo, 30 dias depois da inseminação.
pub fn first_check(insemination: &Insemination) -> Check {
    Check {
        id: String::new(),
        insemination_id: insemination.id.clone(),
        cow_id: insemination.cow_id.clone(),
        date: next_check_date(insemination.date),
        check_number: 1,
    }
}

/// O chequeo seguinte ao concluído; `None` depois do último.
pub fn next_check(completed: &Check) -> Option<Check> {
    if completed.check_number >= LAST_CHECK_NUMBER {
        return None;
    }
    Some(Check {
        id: String::new(),
        insemination_id: completed.insemination_id.clone(),
        cow_id: completed.cow_id.clone(),
        date: next_check_date(completed.date),
        check_number: completed.check_number + 1,
    })
}

pub fn check_alert(check: &Check, today: NaiveDate) -> bool {
    days_until(check.date, today) <= CHECK_ALERT_DAYS
}

// =========================================================================
//  VACINAS
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Next(NaiveDate),
    NotConfigured,
}

pub fn next_vaccination(last_date: NaiveDate, frequency: &str) -> Recurrence {
    let months = match frequency.trim().to_lowercase().as_str() {
        "anual" => 12,
        "semestral" => 6,
        _ => return Recurrence::NotConfigured,
    };
    // Fim de mês é ajustado para o último dia válido (29/02 + 1 ano = 28/02)
    match last_date.checked_add_months(Months::new(months)) {
        Some(next) => Recurrence::Next(next),
        None => Recurrence::NotConfigured,
    }
}

/// Separa cada par (registro, vacina) em próximas, atrasadas ou sem recorrência.
/// Uma data igual a `today` conta como próxima. Vacinas fora do catálogo são ignoradas.
pub fn vaccination_schedule(
    records: &[VaccinationRecord],
    catalog: &[Vaccine],
    today: NaiveDate,
) -> VaccinationSchedule {
    let by_id: HashMap<&str, &Vaccine> = catalog.iter().map(|v| (v.id.as_str(), v)).collect();
    let mut schedule = VaccinationSchedule::default();

    for record in records {
        for vaccine_id in &record.vaccine_ids {
            let Some(vaccine) = by_id.get(vaccine_id.as_str()) else {
                continue;
            };

            match next_vaccination(record.date, &vaccine.frequency) {
                Recurrence::Next(next_date) => {
                    let entry = ScheduledVaccination {
                        record_id: record.id.clone(),
                        cow_id: record.cow_id.clone(),
                        vaccine_id: vaccine_id.clone(),
                        vaccine_name: vaccine.name.clone(),
                        next_date,
                    };
                    if next_date >= today {
                        schedule.upcoming.push(entry);
                    } else {
                        schedule.overdue.push(entry);
                    }
                }
                Recurrence::NotConfigured => schedule.unscheduled.push(UnscheduledVaccination {
                    record_id: record.id.clone(),
                    cow_id: record.cow_id.clone(),
                    vaccine_id: vaccine_id.clone(),
                    vaccine_name: vaccine.name.clone(),
                    frequency: vaccine.frequency.clone(),
                }),
            }
        }
    }

    schedule.upcoming.sort_by_key(|v| v.next_date);
    schedule.overdue.sort_by_key(|v| v.next_date);
    schedule
}

// =========================================================================
//  PRODUÇÃO DE LEITE
// =========================================================================

// Semana do mês, não semana ISO: dias 1-7 são W1, 8-14 W2...
fn week_label(date: NaiveDate) -> String {
    format!("{}-W{}", date.year(), (date.day() - 1) / 7 + 1)
}

/// Diário soma os registros do dia; semanal e mensal dão a média por registro.
pub fn aggregate_production(
    records: &[MilkProductionRecord],
    period: ProductionPeriod,
) -> Vec<ProductionPoint> {
    let mut buckets: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for record in records {
        let label = match period {
            ProductionPeriod::Daily => record.date.format("%Y-%m-%d").to_string(),
            ProductionPeriod::Weekly => week_label(record.date),
            ProductionPeriod::Monthly => record.date.format("%Y-%m").to_string(),
        };
        let bucket = buckets.entry(label).or_insert((0.0, 0));
        bucket.0 += record.total;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(label, (sum, count))| {
            let total = match period {
                ProductionPeriod::Daily => sum,
                ProductionPeriod::Weekly | ProductionPeriod::Monthly => sum / count as f64,
            };
            ProductionPoint { label, total }
        })
        .collect()
}

pub fn production_details(
    records: &[MilkProductionRecord],
    cows: &[MilkCow],
    date: NaiveDate,
) -> Vec<ProductionDetail> {
    records
        .iter()
        .filter(|r| r.date == date)
        .map(|r| ProductionDetail {
            cow_id: r.cow_id.clone(),
            cow_name: cows.iter().find(|c| c.id == r.cow_id).map(|c| c.name.clone()),
            total: r.total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::milk::ProductionQuality;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pregnant(breeding_date: NaiveDate, health: HealthStatus, activity: ActivityLevel) -> PregnantCow {
        PregnantCow {
            id: "p1".into(),
            name: "Estrella".into(),
            breeding_date,
            weight: 520.0,
            health,
            activity,
            estimated_due_date: due_date(breeding_date),
            notes: vec![],
        }
    }

    fn production(id: &str, cow_id: &str, on: NaiveDate, total: f64) -> MilkProductionRecord {
        MilkProductionRecord {
            id: id.into(),
            cow_id: cow_id.into(),
            date: on,
            morning: total,
            afternoon: 0.0,
            evening: 0.0,
            total,
            quality: ProductionQuality::default(),
        }
    }

    #[test]
    fn test_due_date_is_280_days_across_leap_years() {
        assert_eq!(due_date(date(2024, 1, 1)), date(2024, 10, 7));
        assert_eq!(due_date(date(2023, 6, 1)), date(2024, 3, 7));
        assert_eq!(due_date(date(2023, 1, 1)), date(2023, 10, 8));
        for start in [date(2020, 2, 29), date(2021, 12, 31), date(2099, 5, 17)] {
            assert_eq!((due_date(start) - start).num_days(), 280);
        }
    }

    #[test]
    fn test_progress_is_clamped_and_monotonic() {
        let breeding = date(2024, 1, 1);
        assert_eq!(progress_percent(breeding, date(2023, 12, 1)), 0);
        assert_eq!(progress_percent(breeding, breeding), 0);
        assert_eq!(progress_percent(breeding, date(2024, 5, 20)), 50);
        assert_eq!(progress_percent(breeding, due_date(breeding)), 100);
        assert_eq!(progress_percent(breeding, date(2025, 6, 1)), 100);

        let mut previous = 0;
        let mut today = date(2023, 12, 1);
        while today < date(2025, 1, 1) {
            let current = progress_percent(breeding, today);
            assert!(current >= previous);
            previous = current;
            today += Duration::days(1);
        }
    }

    #[test]
    fn test_days_until_can_be_negative() {
        assert_eq!(days_until(date(2024, 1, 10), date(2024, 1, 1)), 9);
        assert_eq!(days_until(date(2024, 1, 1), date(2024, 1, 10)), -9);
    }

    #[test]
    fn test_alerts_follow_fixed_order() {
        let breeding = date(2024, 1, 1);
        let near_due = due_date(breeding) - Duration::days(10);
        let cow = pregnant(breeding, HealthStatus::Mala, ActivityLevel::Alta);

        assert_eq!(
            alerts(&cow, near_due),
            vec![
                PregnancyAlert::DueSoon,
                PregnancyAlert::UrgentCare,
                PregnancyAlert::WatchStress
            ]
        );

        let calm = pregnant(breeding, HealthStatus::Buena, ActivityLevel::Normal);
        assert!(alerts(&calm, date(2024, 2, 1)).is_empty());

        let regular = pregnant(breeding, HealthStatus::Regular, ActivityLevel::Baja);
        assert_eq!(
            alerts(&regular, date(2024, 2, 1)),
            vec![PregnancyAlert::ScheduleCheckup, PregnancyAlert::MonitorLowActivity]
        );
    }

    #[test]
    fn test_recommendations_by_distance_to_due_date() {
        let breeding = date(2024, 1, 1);
        let cow = pregnant(breeding, HealthStatus::Buena, ActivityLevel::Normal);

        assert_eq!(
            recommendations(&cow, due_date(breeding) - Duration::days(45)),
            vec![
                Recommendation::AdjustDiet,
                Recommendation::KeepRoutine,
                Recommendation::KeepActivity
            ]
        );
        assert_eq!(
            recommendations(&cow, due_date(breeding) - Duration::days(20))[..2],
            [Recommendation::AdjustDiet, Recommendation::PrepareBirthingArea]
        );

        let tired = pregnant(breeding, HealthStatus::Mala, ActivityLevel::Baja);
        assert_eq!(
            recommendations(&tired, date(2024, 2, 1)),
            vec![Recommendation::FollowVetOrders, Recommendation::EncourageExercise]
        );
    }

    #[test]
    fn test_check_cadence_stops_after_ninth() {
        let insemination = Insemination {
            id: "i1".into(),
            cow_id: "C1".into(),
            bull_id: "T1".into(),
            date: date(2024, 1, 1),
            has_birthed: false,
            notes: String::new(),
        };

        let mut check = first_check(&insemination);
        assert_eq!(check.check_number, 1);
        assert_eq!(check.date, date(2024, 1, 31));
        assert_eq!(check.insemination_id, "i1");

        let second = next_check(&check).unwrap();
        assert_eq!(second.check_number, 2);
        assert_eq!(second.date, date(2024, 3, 1));

        while let Some(next) = next_check(&check) {
            assert_eq!(next.date, check.date + Duration::days(30));
            check = next;
        }
        assert_eq!(check.check_number, 9);
    }

    #[test]
    fn test_check_attention_window() {
        let check = Check {
            id: "k".into(),
            insemination_id: "i".into(),
            cow_id: "C1".into(),
            date: date(2024, 1, 31),
            check_number: 1,
        };
        assert!(check_alert(&check, date(2024, 1, 24)));
        assert!(!check_alert(&check, date(2024, 1, 23)));
        assert!(check_alert(&check, date(2024, 2, 5)));
    }

    #[test]
    fn test_vaccination_recurrence() {
        let last = date(2024, 3, 15);
        assert_eq!(next_vaccination(last, "Anual"), Recurrence::Next(date(2025, 3, 15)));
        assert_eq!(next_vaccination(last, " SEMESTRAL "), Recurrence::Next(date(2024, 9, 15)));
        assert_eq!(next_vaccination(last, "mensual"), Recurrence::NotConfigured);
        assert_eq!(next_vaccination(last, ""), Recurrence::NotConfigured);
        assert_eq!(
            next_vaccination(date(2024, 2, 29), "anual"),
            Recurrence::Next(date(2025, 2, 28))
        );
    }

    #[test]
    fn test_schedule_partitions_pairs() {
        let catalog = vec![
            Vaccine {
                id: "v-anual".into(),
                name: "Aftosa".into(),
                description: "d".into(),
                recommended_age: 6,
                recommended_situation: "s".into(),
                frequency: "Anual".into(),
            },
            Vaccine {
                id: "v-unica".into(),
                name: "Clostridial".into(),
                description: "d".into(),
                recommended_age: 3,
                recommended_situation: "s".into(),
                frequency: "Única".into(),
            },
        ];
        let record = |id: &str, on: NaiveDate, ids: &[&str]| VaccinationRecord {
            id: id.into(),
            cow_id: "C1".into(),
            vaccine_ids: ids.iter().map(|s| s.to_string()).collect(),
            date: on,
            lot: "L1".into(),
            administrator: "Vet".into(),
            notes: String::new(),
            side_effects: None,
        };
        let today = date(2024, 6, 1);
        let records = vec![
            record("r-old", date(2023, 1, 10), &["v-anual", "v-unica", "v-gone"]),
            record("r-new", date(2024, 5, 1), &["v-anual"]),
            record("r-today", date(2023, 6, 1), &["v-anual"]),
        ];

        let schedule = vaccination_schedule(&records, &catalog, today);

        assert_eq!(schedule.overdue.len(), 1);
        assert_eq!(schedule.overdue[0].record_id, "r-old");
        assert_eq!(schedule.overdue[0].next_date, date(2024, 1, 10));

        let upcoming: Vec<&str> = schedule.upcoming.iter().map(|v| v.record_id.as_str()).collect();
        assert_eq!(upcoming, vec!["r-today", "r-new"]);

        assert_eq!(schedule.unscheduled.len(), 1);
        assert_eq!(schedule.unscheduled[0].vaccine_id, "v-unica");
        assert_eq!(schedule.unscheduled[0].frequency, "Única");
    }

    #[test]
    fn test_weekly_reports_mean_and_daily_reports_sum() {
        let records = vec![
            production("a", "c1", date(2024, 3, 4), 10.0),
            production("b", "c2", date(2024, 3, 6), 14.0),
        ];

        let weekly = aggregate_production(&records, ProductionPeriod::Weekly);
        assert_eq!(weekly, vec![ProductionPoint { label: "2024-W1".into(), total: 12.0 }]);

        let daily = aggregate_production(&records, ProductionPeriod::Daily);
        assert_eq!(
            daily,
            vec![
                ProductionPoint { label: "2024-03-04".into(), total: 10.0 },
                ProductionPoint { label: "2024-03-06".into(), total: 14.0 },
            ]
        );
    }

    #[test]
    fn test_daily_sums_same_date_and_monthly_averages() {
        let records = vec![
            production("a", "c1", date(2024, 3, 4), 10.0),
            production("b", "c2", date(2024, 3, 4), 14.0),
            production("c", "c1", date(2024, 3, 20), 6.0),
            production("d", "c1", date(2024, 4, 2), 9.0),
        ];

        let daily = aggregate_production(&records, ProductionPeriod::Daily);
        assert_eq!(daily[0], ProductionPoint { label: "2024-03-04".into(), total: 24.0 });

        let monthly = aggregate_production(&records, ProductionPeriod::Monthly);
        assert_eq!(
            monthly,
            vec![
                ProductionPoint { label: "2024-03".into(), total: 10.0 },
                ProductionPoint { label: "2024-04".into(), total: 9.0 },
            ]
        );
    }

    #[test]
    fn test_week_of_month_buckets_collide_across_months() {
        let records = vec![
            production("a", "c1", date(2024, 1, 3), 8.0),
            production("b", "c1", date(2024, 2, 5), 12.0),
            production("c", "c1", date(2024, 2, 29), 4.0),
        ];
        let weekly = aggregate_production(&records, ProductionPeriod::Weekly);
        assert_eq!(
            weekly,
            vec![
                ProductionPoint { label: "2024-W1".into(), total: 10.0 },
                ProductionPoint { label: "2024-W5".into(), total: 4.0 },
            ]
        );
    }

    #[test]
    fn test_production_details_resolve_cow_names() {
        let cows = vec![MilkCow { id: "c1".into(), name: "Margarita".into(), tag: "A1".into() }];
        let records = vec![
            production("a", "c1", date(2024, 3, 4), 10.0),
            production("b", "c9", date(2024, 3, 4), 5.0),
            production("c", "c1", date(2024, 3, 5), 7.0),
        ];
        let details = production_details(&records, &cows, date(2024, 3, 4));
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].cow_name.as_deref(), Some("Margarita"));
        assert_eq!(details[1].cow_name, None);
    }
}
