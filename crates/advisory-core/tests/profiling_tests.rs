use advisory_core::profiling::bands::RiskBand;
use advisory_core::profiling::questionnaire::{
    questionnaire_v1, AnswerMap, AnswerValue, Dimension, Question, QuestionKind,
};
use advisory_core::profiling::scoring::score;
use advisory_core::EngineConfig;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Helpers
// ===========================================================================

/// Answer every scored question with its highest- or lowest-scoring option.
fn extreme_answers(most_risk_seeking: bool) -> AnswerMap {
    let mut answers = AnswerMap::new();
    for q in questionnaire_v1() {
        let answer = match &q.kind {
            QuestionKind::Likert { reverse } => {
                let high = most_risk_seeking != *reverse;
                AnswerValue::Likert(if high { 5 } else { 1 })
            }
            QuestionKind::SingleChoice { options } => {
                let pick = if most_risk_seeking {
                    options.iter().max_by_key(|o| o.points)
                } else {
                    options.iter().min_by_key(|o| o.points)
                };
                match pick {
                    Some(o) => AnswerValue::SingleChoice(o.code.clone()),
                    None => continue,
                }
            }
        };
        answers.insert(q.id.clone(), answer);
    }
    answers
}

fn likert_questions() -> Vec<Question> {
    questionnaire_v1()
        .into_iter()
        .filter(|q| matches!(q.kind, QuestionKind::Likert { .. }))
        .collect()
}

/// Scored single-choice questions with their options sorted by points.
fn ranked_choice_questions() -> Vec<(String, Vec<String>)> {
    questionnaire_v1()
        .into_iter()
        .filter(|q| Dimension::SCORED.contains(&q.dimension))
        .filter_map(|q| match q.kind {
            QuestionKind::SingleChoice { mut options } => {
                options.sort_by_key(|o| o.points);
                Some((q.id, options.into_iter().map(|o| o.code).collect()))
            }
            QuestionKind::Likert { .. } => None,
        })
        .collect()
}

fn answers_at_ranks(questions: &[(String, Vec<String>)], ranks: &[usize]) -> AnswerMap {
    questions
        .iter()
        .zip(ranks)
        .map(|((id, codes), rank)| {
            let code = &codes[rank % codes.len()];
            (id.clone(), AnswerValue::SingleChoice(code.clone()))
        })
        .collect()
}

// ===========================================================================
// End-to-end profiles
// ===========================================================================

#[test]
fn test_most_risk_seeking_answers_are_aggressive() {
    let out = score(&EngineConfig::default(), &extreme_answers(true)).unwrap();
    let r = &out.result;
    assert_eq!(r.global, dec!(100));
    assert_eq!(r.band, RiskBand::Aggressive);
    assert_eq!(r.profile_label, "Aggressive");
    assert!(r.unscored_dimensions.is_empty());
}

#[test]
fn test_most_averse_answers_are_conservative() {
    let out = score(&EngineConfig::default(), &extreme_answers(false)).unwrap();
    let r = &out.result;
    assert_eq!(r.global, Decimal::ZERO);
    assert_eq!(r.band, RiskBand::Conservative);
}

#[test]
fn test_extremes_leave_no_answer_warnings() {
    let out = score(&EngineConfig::default(), &extreme_answers(true)).unwrap();
    assert!(out.warnings.iter().all(|w| !w.contains("skipped")));
}

#[test]
fn test_tolerance_only_profile() {
    // Only tolerance answered, all neutral (3) → tolerance 50, global 0.4 * 50
    let mut answers = AnswerMap::new();
    for q in likert_questions() {
        answers.insert(q.id.clone(), AnswerValue::Likert(3));
    }
    let out = score(&EngineConfig::default(), &answers).unwrap();
    assert_eq!(out.result.tolerance, dec!(50));
    assert_eq!(out.result.global, dec!(20));
    assert_eq!(out.result.unscored_dimensions.len(), 3);
    assert_eq!(out.result.band, RiskBand::Conservative);
}

#[test]
fn test_bad_likert_json_is_skipped_with_warning() {
    let answers: AnswerMap = serde_json::from_str(
        r#"{"tol_1_riesgo_vs_retorno": -1, "tol_3_perdidas_corto_plazo": 5,
            "tol_2_ansiedad_caidas": 4.5}"#,
    )
    .unwrap();
    let out = score(&EngineConfig::default(), &answers).unwrap();
    assert_eq!(out.result.tolerance, dec!(100));
    assert!(out
        .warnings
        .iter()
        .any(|w| w.contains("tol_1_riesgo_vs_retorno") && w.contains("skipped")));
    assert!(out
        .warnings
        .iter()
        .any(|w| w.contains("tol_2_ansiedad_caidas") && w.contains("skipped")));
}

#[test]
fn test_metadata_records_config_version() {
    let out = score(&EngineConfig::default(), &AnswerMap::new()).unwrap();
    assert_eq!(out.assumptions["config_version"], "v1");
    assert!(!out.methodology.is_empty());
}

#[test]
fn test_custom_bands_move_the_label() {
    let mut cfg = EngineConfig::default();
    cfg.risk_bands.moderate_from = dec!(10);
    let mut answers = AnswerMap::new();
    for q in likert_questions() {
        answers.insert(q.id.clone(), AnswerValue::Likert(3));
    }
    // Global 20 is Moderate once the first cut drops to 10
    let out = score(&cfg, &answers).unwrap();
    assert_eq!(out.result.band, RiskBand::Moderate);
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn prop_global_score_stays_in_range(values in proptest::collection::vec(-3i64..=9, 5)) {
        let mut answers = AnswerMap::new();
        for (q, v) in likert_questions().iter().zip(values) {
            answers.insert(q.id.clone(), AnswerValue::Likert(v));
        }
        let out = score(&EngineConfig::default(), &answers).unwrap();
        prop_assert!(out.result.global >= Decimal::ZERO);
        prop_assert!(out.result.global <= dec!(100));
    }

    #[test]
    fn prop_better_answer_never_lowers_global(
        ranks in proptest::collection::vec(0usize..8, 16),
        pick in 0usize..64,
        bump in 0usize..8,
    ) {
        let questions = ranked_choice_questions();
        let ranks: Vec<usize> = ranks
            .iter()
            .zip(&questions)
            .map(|(r, (_, codes))| r % codes.len())
            .collect();
        let k = pick % questions.len();
        let mut raised = ranks.clone();
        raised[k] = (ranks[k] + bump).min(questions[k].1.len() - 1);

        let cfg = EngineConfig::default();
        let before = score(&cfg, &answers_at_ranks(&questions, &ranks)).unwrap().result;
        let after = score(&cfg, &answers_at_ranks(&questions, &raised)).unwrap().result;
        prop_assert!(after.global >= before.global);
        prop_assert!(after.capacity >= before.capacity);
        prop_assert!(after.perception >= before.perception);
        prop_assert!(after.composure >= before.composure);
    }

    #[test]
    fn prop_band_is_monotone(a in 0u32..=1000, b in 0u32..=1000) {
        let table = EngineConfig::default().risk_bands;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_band = RiskBand::from_score(&table, Decimal::new(lo as i64, 1));
        let hi_band = RiskBand::from_score(&table, Decimal::new(hi as i64, 1));
        prop_assert!(lo_band <= hi_band);
    }
}
