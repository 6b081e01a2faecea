use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::{debug, warn};

use super::bands::RiskBand;
use super::questionnaire::{
    questionnaire_v1, AnswerMap, Dimension, Question, QuestionKind, GOAL_QUESTION_ID,
    HEALTH_QUESTION_ID, RETIREMENT_GOAL_CODE, SEX_QUESTION_ID, SMOKER_QUESTION_ID,
};
use crate::config::EngineConfig;
use crate::error::AdvisoryError;
use crate::retirement::life_expectancy::{HealthTier, LifeExpectancyInput, Sex};
use crate::types::{round1, with_metadata, ComputationOutput, Score};
use crate::AdvisoryResult;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Static blend of the four scored dimensions into the global score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub capacity: Decimal,
    pub tolerance: Decimal,
    pub perception: Decimal,
    pub composure: Decimal,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            capacity: dec!(0.3),
            tolerance: dec!(0.4),
            perception: dec!(0.1),
            composure: dec!(0.2),
        }
    }
}

impl DimensionWeights {
    fn weight(&self, dimension: Dimension) -> Decimal {
        match dimension {
            Dimension::Capacity => self.capacity,
            Dimension::Tolerance => self.tolerance,
            Dimension::Perception => self.perception,
            Dimension::Composure => self.composure,
            _ => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilingConfig {
    pub questions: Vec<Question>,
    pub dimension_weights: DimensionWeights,
    /// Gap between the validation answer and the global score above which the
    /// profile is flagged as internally inconsistent.
    pub validation_gap_warning: Score,
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            questions: questionnaire_v1(),
            dimension_weights: DimensionWeights::default(),
            validation_gap_warning: dec!(35),
        }
    }
}

impl ProfilingConfig {
    pub fn validate(&self) -> AdvisoryResult<()> {
        let w = &self.dimension_weights;
        let weights = [w.capacity, w.tolerance, w.perception, w.composure];
        if weights.iter().any(|x| *x < Decimal::ZERO) {
            return Err(AdvisoryError::invalid_config(
                "dimension_weights",
                "weights must be non-negative",
            ));
        }
        let total: Decimal = weights.iter().sum();
        if (total - Decimal::ONE).abs() > dec!(0.0001) {
            return Err(AdvisoryError::invalid_config(
                "dimension_weights",
                format!("weights must sum to 1, got {}", total),
            ));
        }

        let mut seen = BTreeSet::new();
        for q in &self.questions {
            if !seen.insert(q.id.as_str()) {
                return Err(AdvisoryError::invalid_config(
                    "questions",
                    format!("duplicate question id '{}'", q.id),
                ));
            }
            if q.weight <= Decimal::ZERO {
                return Err(AdvisoryError::invalid_config(
                    "questions",
                    format!("question '{}' must have a positive weight", q.id),
                ));
            }
            if let QuestionKind::SingleChoice { options } = &q.kind {
                if options.is_empty() {
                    return Err(AdvisoryError::invalid_config(
                        "questions",
                        format!("question '{}' has no options", q.id),
                    ));
                }
                if options
                    .iter()
                    .any(|o| o.points < Decimal::ZERO || o.points > dec!(100))
                {
                    return Err(AdvisoryError::invalid_config(
                        "questions",
                        format!("question '{}' has option points outside 0..=100", q.id),
                    ));
                }
            }
        }
        Ok(())
    }

    fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScores {
    pub capacity: Score,
    pub tolerance: Score,
    pub perception: Score,
    pub composure: Score,
    pub global: Score,
    pub band: RiskBand,
    pub profile_label: String,
    /// Scored dimensions with no usable answer; each counts as 0 in `global`.
    pub unscored_dimensions: Vec<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_score: Option<Score>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Running weighted sum for one dimension.
#[derive(Default)]
struct Tally {
    weighted_points: Decimal,
    total_weight: Decimal,
}

impl Tally {
    fn average(&self) -> Option<Score> {
        if self.total_weight.is_zero() {
            None
        } else {
            Some(self.weighted_points / self.total_weight)
        }
    }
}

/// Reduce an answer map to dimension scores, a global score and a profile.
///
/// Partial answers never fail: invalid or missing answers are skipped, a
/// dimension with nothing usable scores 0 and is reported in
/// `unscored_dimensions`. The global score keeps the static weights even
/// then, so a missing dimension pulls it down.
pub fn score(
    config: &EngineConfig,
    answers: &AnswerMap,
) -> AdvisoryResult<ComputationOutput<RiskScores>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let profiling = &config.profiling;

    for id in answers.keys() {
        if profiling.question(id).is_none() {
            warnings.push(format!("Answer for unknown question '{}' ignored", id));
        }
    }

    let mut tallies: BTreeMap<Dimension, Tally> = BTreeMap::new();
    let mut goal: Option<String> = None;

    for question in &profiling.questions {
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };
        match question.points_for(answer) {
            Ok(points) => {
                let tally = tallies.entry(question.dimension).or_default();
                tally.weighted_points += points * question.weight;
                tally.total_weight += question.weight;
            }
            Err(issue) => {
                warn!(question = %question.id, %issue, "answer skipped");
                warnings.push(format!("Question '{}' skipped: {}", question.id, issue));
                continue;
            }
        }
        if question.dimension == Dimension::Goal && goal.is_none() {
            goal = question.choice_code(answer).map(str::to_string);
        }
    }

    let mut dimension_scores: BTreeMap<Dimension, Score> = BTreeMap::new();
    let mut unscored_dimensions = Vec::new();
    for dimension in Dimension::SCORED {
        match tallies.get(&dimension).and_then(Tally::average) {
            Some(avg) => {
                dimension_scores.insert(dimension, round1(avg));
            }
            None => {
                warnings.push(format!(
                    "No answers for the {} dimension; it scores 0 in the global blend",
                    dimension
                ));
                unscored_dimensions.push(dimension);
                dimension_scores.insert(dimension, Decimal::ZERO);
            }
        }
    }

    let weights = &profiling.dimension_weights;
    let blended: Decimal = Dimension::SCORED
        .iter()
        .map(|d| weights.weight(*d) * dimension_scores[d])
        .sum();
    let global = round1(blended).clamp(Decimal::ZERO, dec!(100));
    let band = RiskBand::from_score(&config.risk_bands, global);

    let validation_score = tallies
        .get(&Dimension::Validation)
        .and_then(Tally::average)
        .map(round1);
    if let Some(v) = validation_score {
        if (v - global).abs() > profiling.validation_gap_warning {
            warnings.push(format!(
                "Validation answer ({}) is inconsistent with the global score ({})",
                v, global
            ));
        }
    }

    debug!(%global, %band, unscored = unscored_dimensions.len(), "risk profile scored");

    let output = RiskScores {
        capacity: dimension_scores[&Dimension::Capacity],
        tolerance: dimension_scores[&Dimension::Tolerance],
        perception: dimension_scores[&Dimension::Perception],
        composure: dimension_scores[&Dimension::Composure],
        global,
        band,
        profile_label: band.label().to_string(),
        unscored_dimensions,
        validation_score,
        goal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Risk profile: weighted dimension averages blended into a global score",
        &serde_json::json!({
            "config_version": config.version,
            "answers": answers.len(),
            "dimension_weights": weights,
            "risk_bands": config.risk_bands,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// [`score`] against the standard configuration.
pub fn score_standard(answers: &AnswerMap) -> AdvisoryResult<ComputationOutput<RiskScores>> {
    score(EngineConfig::standard(), answers)
}

// ---------------------------------------------------------------------------
// Goal and retirement answers
// ---------------------------------------------------------------------------

/// True when the stated investment goal is retirement income.
pub fn wants_retirement_projection(answers: &AnswerMap) -> bool {
    matches!(
        answers.get(GOAL_QUESTION_ID),
        Some(super::questionnaire::AnswerValue::SingleChoice(code)) if code == RETIREMENT_GOAL_CODE
    )
}

/// Build the actuarial input from the retirement questions. Sex is required;
/// smoking defaults to no and health to good when unanswered.
pub fn life_expectancy_input(answers: &AnswerMap, current_age: u32) -> Option<LifeExpectancyInput> {
    use super::questionnaire::AnswerValue::SingleChoice;

    let code = |id: &str| match answers.get(id) {
        Some(SingleChoice(c)) => Some(c.as_str()),
        _ => None,
    };

    let sex = match code(SEX_QUESTION_ID)? {
        "masculino" => Sex::Male,
        "femenino" => Sex::Female,
        _ => return None,
    };
    let smoker = code(SMOKER_QUESTION_ID) == Some("si");
    let health = match code(HEALTH_QUESTION_ID) {
        Some("excelente") => HealthTier::Excellent,
        Some("regular") => HealthTier::Fair,
        Some("mala") => HealthTier::Poor,
        _ => HealthTier::Good,
    };

    Some(LifeExpectancyInput {
        sex,
        current_age,
        smoker,
        health,
    })
}
