use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::Score;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What a question measures. Only the first four feed the global score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Capacity,
    Tolerance,
    Perception,
    Composure,
    Validation,
    Goal,
    Retirement,
}

impl Dimension {
    /// Dimensions blended into the global score.
    pub const SCORED: [Dimension; 4] = [
        Dimension::Capacity,
        Dimension::Tolerance,
        Dimension::Perception,
        Dimension::Composure,
    ];
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dimension::Capacity => "capacity",
            Dimension::Tolerance => "tolerance",
            Dimension::Perception => "perception",
            Dimension::Composure => "composure",
            Dimension::Validation => "validation",
            Dimension::Goal => "goal",
            Dimension::Retirement => "retirement",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub code: String,
    pub label: String,
    /// Points awarded on the 0–100 scale.
    pub points: Score,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice { options: Vec<ChoiceOption> },
    /// 1–5 agreement scale; reverse-scored items measure aversion.
    Likert {
        #[serde(default)]
        reverse: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub dimension: Dimension,
    pub prompt: String,
    pub kind: QuestionKind,
    /// Weight of this question inside its dimension's average.
    #[serde(default = "default_weight")]
    pub weight: Decimal,
}

fn default_weight() -> Decimal {
    Decimal::ONE
}

/// A recorded answer. Choice codes arrive as JSON strings, Likert values as
/// integers. Anything else is kept as `Unreadable` so one bad answer never
/// rejects the whole map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Likert(i64),
    SingleChoice(String),
    Unreadable(serde_json::Value),
}

/// Question id → answer. Missing keys are unanswered.
pub type AnswerMap = BTreeMap<String, AnswerValue>;

/// Why an answer could not be turned into points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerIssue {
    WrongKind,
    UnknownCode(String),
    OutOfRange(i64),
    Unreadable(String),
}

impl fmt::Display for AnswerIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerIssue::WrongKind => f.write_str("answer type does not match question type"),
            AnswerIssue::UnknownCode(code) => write!(f, "unknown option '{}'", code),
            AnswerIssue::OutOfRange(v) => write!(f, "Likert value {} outside 1..=5", v),
            AnswerIssue::Unreadable(raw) => write!(f, "unreadable answer {}", raw),
        }
    }
}

impl Question {
    /// Points for an answer, resolved by the question's declared kind.
    pub fn points_for(&self, answer: &AnswerValue) -> Result<Score, AnswerIssue> {
        match (&self.kind, answer) {
            (QuestionKind::SingleChoice { options }, AnswerValue::SingleChoice(code)) => options
                .iter()
                .find(|o| o.code == *code)
                .map(|o| o.points)
                .ok_or_else(|| AnswerIssue::UnknownCode(code.clone())),
            (QuestionKind::Likert { reverse }, AnswerValue::Likert(raw)) => {
                if !(1..=5).contains(raw) {
                    return Err(AnswerIssue::OutOfRange(*raw));
                }
                let step = if *reverse { 5 - raw } else { raw - 1 };
                Ok(Decimal::from(step) * dec!(25))
            }
            (_, AnswerValue::Unreadable(raw)) => Err(AnswerIssue::Unreadable(raw.to_string())),
            _ => Err(AnswerIssue::WrongKind),
        }
    }

    /// The selected code for a single-choice answer, if it is a valid option.
    pub fn choice_code<'a>(&self, answer: &'a AnswerValue) -> Option<&'a str> {
        match (&self.kind, answer) {
            (QuestionKind::SingleChoice { options }, AnswerValue::SingleChoice(code))
                if options.iter().any(|o| o.code == *code) =>
            {
                Some(code.as_str())
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Question ids read outside scoring
// ---------------------------------------------------------------------------

pub const GOAL_QUESTION_ID: &str = "goal_1_objetivo";
pub const RETIREMENT_GOAL_CODE: &str = "pension";
pub const SEX_QUESTION_ID: &str = "ret_1_sexo";
pub const SMOKER_QUESTION_ID: &str = "ret_2_fuma";
pub const HEALTH_QUESTION_ID: &str = "ret_3_salud";

// ---------------------------------------------------------------------------
// v1 bank
// ---------------------------------------------------------------------------

fn choice(id: &str, dimension: Dimension, prompt: &str, options: &[(&str, &str, Decimal)]) -> Question {
    Question {
        id: id.to_string(),
        dimension,
        prompt: prompt.to_string(),
        kind: QuestionKind::SingleChoice {
            options: options
                .iter()
                .map(|(code, label, points)| ChoiceOption {
                    code: code.to_string(),
                    label: label.to_string(),
                    points: *points,
                })
                .collect(),
        },
        weight: Decimal::ONE,
    }
}

fn likert(id: &str, prompt: &str, reverse: bool) -> Question {
    Question {
        id: id.to_string(),
        dimension: Dimension::Tolerance,
        prompt: prompt.to_string(),
        kind: QuestionKind::Likert { reverse },
        weight: Decimal::ONE,
    }
}

/// The v1 risk questionnaire. Within every scored single-choice question the
/// most risk-seeking option is worth 100 and the most averse 0.
pub fn questionnaire_v1() -> Vec<Question> {
    use Dimension::*;
    vec![
        // Capacity
        choice(
            "cap_1_age",
            Capacity,
            "What is your age range?",
            &[
                ("menos_35", "Under 35", dec!(100)),
                ("35_50", "35 to 50", dec!(75)),
                ("50_65", "50 to 65", dec!(40)),
                ("mas_65", "Over 65", dec!(0)),
            ],
        ),
        choice(
            "cap_2_ingresos_estables",
            Capacity,
            "How stable is your current income?",
            &[
                ("muy_estables", "Very stable and predictable", dec!(100)),
                ("estables", "Fairly stable", dec!(70)),
                ("variables", "Quite variable", dec!(35)),
                ("muy_variables", "Highly variable or uncertain", dec!(0)),
            ],
        ),
        choice(
            "cap_3_dependencia_portafolio",
            Capacity,
            "How much do you rely on this portfolio to fund yearly expenses?",
            &[
                ("nada", "Hardly at all, it is long-term savings", dec!(100)),
                ("parcial", "Partly, but it is not my main source", dec!(70)),
                ("alta", "Heavily, it covers a large share of expenses", dec!(30)),
                ("critica", "Critically, essential expenses depend on it", dec!(0)),
            ],
        ),
        choice(
            "cap_4_horizonte",
            Capacity,
            "In how many years do you expect to withdraw a significant part of this portfolio?",
            &[
                ("10_plus", "10 years or more", dec!(100)),
                ("5_10", "Between 5 and 10 years", dec!(70)),
                ("2_5", "Between 2 and 5 years", dec!(35)),
                ("menos_2", "In less than 2 years", dec!(0)),
            ],
        ),
        choice(
            "cap_5_tolerancia_perdida_objetivos",
            Capacity,
            "If the portfolio fell 25% in one year, how would it affect your goals?",
            &[
                ("no_afecta", "It would not affect long-term goals", dec!(100)),
                ("ajuste_menor", "Some adjustments, goals unchanged", dec!(70)),
                ("ajuste_mayor", "Several important goals postponed or reduced", dec!(30)),
                ("inaceptable", "Unacceptable, key plans would be ruined", dec!(0)),
            ],
        ),
        // Tolerance
        likert(
            "tol_1_riesgo_vs_retorno",
            "I accept larger swings in value if they raise the chance of higher long-term returns.",
            false,
        ),
        likert(
            "tol_2_ansiedad_caidas",
            "Temporary market falls make me very anxious, even knowing they are normal.",
            true,
        ),
        likert(
            "tol_3_perdidas_corto_plazo",
            "I can tolerate significant short-term losses if I trust the long-term strategy.",
            false,
        ),
        likert(
            "tol_4_cambios_portafolio",
            "I find it hard to stay invested after several months of poor results.",
            true,
        ),
        likert(
            "tol_5_agresividad_oportunidades",
            "When I see a good opportunity I prefer to take it even if it means more risk.",
            false,
        ),
        // Perception
        choice(
            "per_1_entorno_actual",
            Perception,
            "How would you describe today's economic and market environment?",
            &[
                ("muy_riesgoso", "Very risky and uncertain", dec!(0)),
                ("algo_riesgoso", "Somewhat riskier than usual", dec!(35)),
                ("normal", "Within normal ranges", dec!(65)),
                ("atractivo", "Relatively attractive for investing", dec!(100)),
            ],
        ),
        choice(
            "per_2_en_comparacion",
            Perception,
            "Compared with the last 3–5 years, how risky do markets look today?",
            &[
                ("mucho_mas_riesgo", "Much riskier", dec!(0)),
                ("algo_mas_riesgo", "Somewhat riskier", dec!(35)),
                ("similar", "About the same", dec!(65)),
                ("menos_riesgo", "Less risky", dec!(100)),
            ],
        ),
        choice(
            "per_3_confianza_largo_plazo",
            Perception,
            "How confident are you that global markets will deliver positive returns over 10+ years?",
            &[
                ("muy_poco", "Not very confident", dec!(0)),
                ("algo", "Somewhat confident", dec!(40)),
                ("bastante", "Quite confident", dec!(75)),
                ("muy", "Very confident", dec!(100)),
            ],
        ),
        // Composure
        choice(
            "comp_1_reaccion_caida_20",
            Composure,
            "If your portfolio dropped 20% within six months, what would you most likely do?",
            &[
                ("vende_todo", "Sell almost everything", dec!(0)),
                ("reduce_algo", "Reduce part of the position", dec!(30)),
                ("mantiene", "Hold and wait for a recovery", dec!(70)),
                ("aumenta", "Add to the position at lower prices", dec!(100)),
            ],
        ),
        choice(
            "comp_2_historial_crisis",
            Composure,
            "How did you react with your investments in past crises (2008, 2011, 2020)?",
            &[
                ("vendi", "Sold a significant part", dec!(0)),
                ("reduje_algo", "Reduced somewhat but kept relevant positions", dec!(35)),
                ("mantuve", "Mostly held", dec!(70)),
                ("aumente", "Added to positions", dec!(100)),
                ("no_tenia", "Was not invested at the time", dec!(50)),
            ],
        ),
        choice(
            "comp_3_revision_portafolio",
            Composure,
            "How often do you check the value of your investments?",
            &[
                ("todos_dias", "Daily", dec!(0)),
                ("semanal", "Several times a month", dec!(35)),
                ("mensual", "About once a month", dec!(70)),
                ("trimestral", "Less than once a month", dec!(100)),
            ],
        ),
        // Validation
        choice(
            "val_1_portafolio_preferido",
            Validation,
            "Which portfolio do you identify with: A) small swings, moderate returns; B) medium swings, good returns; C) large swings, higher expected returns?",
            &[
                ("A", "A: stability and low volatility", dec!(15)),
                ("B", "B: balance between stability and growth", dec!(55)),
                ("C", "C: higher volatility for higher returns", dec!(90)),
            ],
        ),
        // Goal (informational)
        choice(
            GOAL_QUESTION_ID,
            Goal,
            "What is the main goal of this investment?",
            &[
                (RETIREMENT_GOAL_CODE, "Retirement income", dec!(0)),
                ("vivienda", "Buying a home", dec!(0)),
                ("educacion", "Children's education", dec!(0)),
                ("libertad", "Financial independence", dec!(0)),
                ("patrimonio", "Wealth growth", dec!(0)),
                ("otro", "Other", dec!(0)),
            ],
        ),
        // Retirement inputs (informational)
        choice(
            SEX_QUESTION_ID,
            Retirement,
            "Sex (used for actuarial tables)",
            &[
                ("masculino", "Male", dec!(0)),
                ("femenino", "Female", dec!(0)),
            ],
        ),
        choice(
            SMOKER_QUESTION_ID,
            Retirement,
            "Do you smoke?",
            &[("si", "Yes", dec!(0)), ("no", "No", dec!(0))],
        ),
        choice(
            HEALTH_QUESTION_ID,
            Retirement,
            "How would you rate your health?",
            &[
                ("excelente", "Excellent", dec!(0)),
                ("buena", "Good", dec!(0)),
                ("regular", "Fair", dec!(0)),
                ("mala", "Poor", dec!(0)),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn by_id(id: &str) -> Question {
        questionnaire_v1()
            .into_iter()
            .find(|q| q.id == id)
            .unwrap()
    }

    #[test]
    fn test_bank_ids_unique() {
        let bank = questionnaire_v1();
        let ids: BTreeSet<&str> = bank.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), bank.len());
    }

    #[test]
    fn test_likert_linear_mapping() {
        let q = by_id("tol_1_riesgo_vs_retorno");
        assert_eq!(q.points_for(&AnswerValue::Likert(1)), Ok(dec!(0)));
        assert_eq!(q.points_for(&AnswerValue::Likert(3)), Ok(dec!(50)));
        assert_eq!(q.points_for(&AnswerValue::Likert(5)), Ok(dec!(100)));
    }

    #[test]
    fn test_likert_reverse_mapping() {
        let q = by_id("tol_2_ansiedad_caidas");
        assert_eq!(q.points_for(&AnswerValue::Likert(1)), Ok(dec!(100)));
        assert_eq!(q.points_for(&AnswerValue::Likert(4)), Ok(dec!(25)));
        assert_eq!(q.points_for(&AnswerValue::Likert(5)), Ok(dec!(0)));
    }

    #[test]
    fn test_likert_out_of_range() {
        let q = by_id("tol_1_riesgo_vs_retorno");
        assert_eq!(
            q.points_for(&AnswerValue::Likert(6)),
            Err(AnswerIssue::OutOfRange(6))
        );
        assert_eq!(
            q.points_for(&AnswerValue::Likert(0)),
            Err(AnswerIssue::OutOfRange(0))
        );
    }

    #[test]
    fn test_wrong_kind_and_unknown_code() {
        let q = by_id("cap_1_age");
        assert_eq!(q.points_for(&AnswerValue::Likert(3)), Err(AnswerIssue::WrongKind));
        assert_eq!(
            q.points_for(&AnswerValue::SingleChoice("x".into())),
            Err(AnswerIssue::UnknownCode("x".into()))
        );
        assert_eq!(
            q.points_for(&AnswerValue::SingleChoice("menos_35".into())),
            Ok(dec!(100))
        );
    }

    #[test]
    fn test_answer_value_untagged_json() {
        let map: AnswerMap =
            serde_json::from_str(r#"{"cap_1_age": "35_50", "tol_1_riesgo_vs_retorno": 4}"#).unwrap();
        assert_eq!(map["cap_1_age"], AnswerValue::SingleChoice("35_50".into()));
        assert_eq!(map["tol_1_riesgo_vs_retorno"], AnswerValue::Likert(4));
    }

    #[test]
    fn test_malformed_answers_still_parse() {
        let map: AnswerMap = serde_json::from_str(
            r#"{"cap_1_age": "menos_35", "tol_1_riesgo_vs_retorno": -1,
                "tol_2_ansiedad_caidas": 300, "tol_3_perdidas_corto_plazo": 4.0,
                "tol_5_agresividad_oportunidades": null}"#,
        )
        .unwrap();
        assert_eq!(map.len(), 5);

        let q = by_id("tol_1_riesgo_vs_retorno");
        assert_eq!(
            q.points_for(&map["tol_1_riesgo_vs_retorno"]),
            Err(AnswerIssue::OutOfRange(-1))
        );
        assert_eq!(
            q.points_for(&map["tol_2_ansiedad_caidas"]),
            Err(AnswerIssue::OutOfRange(300))
        );
        assert!(matches!(
            q.points_for(&map["tol_3_perdidas_corto_plazo"]),
            Err(AnswerIssue::Unreadable(_))
        ));
    }

    #[test]
    fn test_question_kind_round_trips_through_json() {
        let q = by_id("tol_4_cambios_portafolio");
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""type":"likert""#));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert!(matches!(back.kind, QuestionKind::Likert { reverse: true }));
    }
}
