//! # Recommendation Engine
//!
//! Pure lookups from the baby's age and latest observation to feeding
//! routines, care suggestions, medicine advisories, milestones and sleep tips.
//! The texts are fixed pt-BR content.
//!
//! [`RecommendationService`] wires the lookups to the stored profile and
//! observations.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

use shared::{DailyRange, FeedingRoutine, MedicineRecommendation, Observation, RoutineOverview, SleepTip};

use crate::clock::Clock;
use crate::domain::access_gate::AccessGate;
use crate::domain::observation_service::ObservationService;
use crate::domain::profile_service::ProfileService;
use crate::errors::{AccessError, Feature};

/// Whole calendar months between two dates; the day of the month is ignored
pub fn age_in_months(birth: NaiveDate, now: NaiveDate) -> i32 {
    (now.year() - birth.year()) * 12 + (now.month() as i32 - birth.month() as i32)
}

struct RoutineBracket {
    max_age: Option<i32>,
    breast_feedings: DailyRange,
    formula_amount: DailyRange,
    interval: DailyRange,
    night_feedings: DailyRange,
}

static ROUTINE_BRACKETS: [RoutineBracket; 6] = [
    RoutineBracket {
        max_age: Some(1),
        breast_feedings: DailyRange::new(8, 12),
        formula_amount: DailyRange::new(600, 900),
        interval: DailyRange::new(2, 3),
        night_feedings: DailyRange::new(2, 3),
    },
    RoutineBracket {
        max_age: Some(3),
        breast_feedings: DailyRange::new(7, 9),
        formula_amount: DailyRange::new(750, 1000),
        interval: DailyRange::new(3, 4),
        night_feedings: DailyRange::new(1, 2),
    },
    RoutineBracket {
        max_age: Some(6),
        breast_feedings: DailyRange::new(5, 7),
        formula_amount: DailyRange::new(800, 1000),
        interval: DailyRange::exactly(4),
        night_feedings: DailyRange::new(0, 1),
    },
    RoutineBracket {
        max_age: Some(12),
        breast_feedings: DailyRange::new(4, 6),
        formula_amount: DailyRange::new(600, 800),
        interval: DailyRange::new(4, 5),
        night_feedings: DailyRange::exactly(0),
    },
    RoutineBracket {
        max_age: Some(24),
        breast_feedings: DailyRange::new(2, 4),
        formula_amount: DailyRange::new(400, 600),
        interval: DailyRange::new(5, 6),
        night_feedings: DailyRange::exactly(0),
    },
    RoutineBracket {
        max_age: None,
        breast_feedings: DailyRange::new(0, 2),
        formula_amount: DailyRange::new(300, 500),
        interval: DailyRange::new(6, 8),
        night_feedings: DailyRange::exactly(0),
    },
];

/// Recommended daily feeding routine; the first bracket whose upper age bound
/// is not exceeded wins
pub fn feeding_routine(age_months: i32) -> FeedingRoutine {
    let bracket = ROUTINE_BRACKETS
        .iter()
        .find(|bracket| bracket.max_age.map_or(true, |max| age_months <= max))
        .unwrap_or(&ROUTINE_BRACKETS[ROUTINE_BRACKETS.len() - 1]);

    FeedingRoutine {
        age_months,
        breast_feedings: bracket.breast_feedings,
        formula_amount: bracket.formula_amount,
        interval: bracket.interval,
        night_feedings: bracket.night_feedings,
    }
}

/// Care suggestions for the latest observation, in a fixed order
pub fn suggestions(latest: Option<&Observation>) -> Vec<String> {
    let Some(observation) = latest else {
        return Vec::new();
    };
    let flags = &observation.flags;

    let groups: [(bool, &[&str]); 6] = [
        (
            flags.colic,
            &[
                "💆 Massagem na barriguinha em movimentos circulares pode aliviar cólicas",
                "🤱 Amamente em posição mais vertical para reduzir gases",
                "🌡️ Compressa morna na barriga ajuda a relaxar",
            ],
        ),
        (
            flags.cries,
            &[
                "👶 Verifique se o bebê está com fome, fralda suja ou desconforto",
                "🎵 Sons brancos ou música suave podem acalmar",
                "🤗 Contato pele a pele traz segurança e conforto",
            ],
        ),
        (
            !flags.sleeps_well,
            &[
                "🌙 Estabeleça uma rotina de sono consistente",
                "🛁 Banho morno antes de dormir relaxa o bebê",
                "🌡️ Mantenha o quarto entre 18-21°C",
            ],
        ),
        (
            !flags.eats_well,
            &[
                "🍼 Ofereça mamadas em ambiente calmo e sem distrações",
                "⏰ Respeite os sinais de fome do bebê",
                "👩‍⚕️ Consulte o pediatra se a recusa persistir",
            ],
        ),
        (
            flags.fussy,
            &[
                "🚶 Caminhadas ou balanço suave podem acalmar",
                "🧸 Chupeta ou objeto de conforto pode ajudar",
                "💤 Bebê irritado pode estar cansado - tente colocá-lo para dormir",
            ],
        ),
        (
            flags.smiles && flags.active,
            &[
                "✨ Seu bebê está se desenvolvendo muito bem!",
                "🎉 Continue estimulando com brincadeiras e interação",
            ],
        ),
    ];

    groups
        .iter()
        .filter(|(applies, _)| *applies)
        .flat_map(|(_, texts)| texts.iter().map(|text| text.to_string()))
        .collect()
}

fn advisory(name: &str, purpose: &str, note: &str) -> MedicineRecommendation {
    MedicineRecommendation {
        name: name.to_string(),
        purpose: purpose.to_string(),
        note: note.to_string(),
    }
}

/// Over-the-counter advisories for the latest observation. Each carries a
/// note to consult the pediatrician.
pub fn medicine_recommendations(latest: Option<&Observation>) -> Vec<MedicineRecommendation> {
    let Some(observation) = latest else {
        return Vec::new();
    };
    let flags = &observation.flags;
    let mut recommendations = Vec::new();

    if flags.colic {
        recommendations.push(advisory(
            "Simeticona (Luftal)",
            "Alívio de gases e cólicas",
            "⚠️ Consulte o pediatra para dosagem correta",
        ));
        recommendations.push(advisory(
            "Probióticos infantis",
            "Melhora da flora intestinal",
            "⚠️ Recomendado por pediatra",
        ));
    }
    if !flags.sleeps_well {
        recommendations.push(advisory(
            "Camomila (chá fraco)",
            "Relaxamento natural",
            "⚠️ Apenas após 6 meses e com aprovação médica",
        ));
    }
    if flags.cries && flags.fussy {
        recommendations.push(advisory(
            "Vitamina D",
            "Desenvolvimento ósseo e bem-estar",
            "✅ Geralmente recomendado por pediatras",
        ));
    }

    recommendations
}

pub fn development_milestones(age_months: i32) -> Vec<String> {
    let milestones: [&str; 3] = if age_months <= 3 {
        ["Segue objetos com os olhos", "Sorri em resposta a estímulos", "Emite sons (arrulhos)"]
    } else if age_months <= 6 {
        ["Rola de barriga para cima", "Pega objetos", "Reconhece rostos familiares"]
    } else if age_months <= 12 {
        ["Senta sem apoio", "Engatinha ou se arrasta", "Diz primeiras palavras"]
    } else if age_months <= 24 {
        ["Anda sozinho", "Usa 2-3 palavras juntas", "Imita comportamentos"]
    } else {
        ["Corre e pula", "Forma frases completas", "Brinca com outras crianças"]
    };
    milestones.iter().map(|m| m.to_string()).collect()
}

pub fn sleep_tips() -> Vec<SleepTip> {
    [
        (
            "Alimentação antes de dormir",
            "Uma boa mamada ajuda o bebê a dormir melhor e por mais tempo",
        ),
        ("Ambiente adequado", "Quarto escuro, silencioso e com temperatura entre 18-21°C"),
        ("Rotina consistente", "Mantenha horários regulares para criar previsibilidade"),
    ]
    .iter()
    .map(|(title, detail)| SleepTip {
        title: title.to_string(),
        detail: detail.to_string(),
    })
    .collect()
}

/// Recommendations for the current baby, read from the stored profile and
/// the newest observation
#[derive(Clone)]
pub struct RecommendationService {
    observations: ObservationService,
    profile: ProfileService,
    gate: AccessGate,
    clock: Arc<dyn Clock>,
}

impl RecommendationService {
    pub fn new(
        observations: ObservationService,
        profile: ProfileService,
        gate: AccessGate,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            observations,
            profile,
            gate,
            clock,
        }
    }

    pub fn suggestions(&self) -> Result<Vec<String>> {
        self.gate.ensure(Feature::Observations)?;
        Ok(suggestions(self.observations.latest().as_ref()))
    }

    pub fn medicine_recommendations(&self) -> Result<Vec<MedicineRecommendation>> {
        self.gate.ensure(Feature::Observations)?;
        Ok(medicine_recommendations(self.observations.latest().as_ref()))
    }

    /// Everything the routine view shows for the baby's current age
    pub fn routine_overview(&self) -> Result<RoutineOverview> {
        self.gate.ensure(Feature::Routine)?;
        let profile = self.profile.profile().ok_or(AccessError::OnboardingRequired)?;
        let age = age_in_months(profile.birth_date, self.clock.now().date_naive());

        Ok(RoutineOverview {
            age_months: age,
            routine: feeding_routine(age),
            milestones: development_milestones(age),
            sleep_tips: sleep_tips(),
        })
    }
}
