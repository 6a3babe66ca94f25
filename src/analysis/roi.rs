//! ROI projection model.
//!
//! Pure arithmetic over the engagement score and a fixed organizational
//! baseline. Leadership and culture scores are accepted and validated as
//! model inputs but the current model only weighs engagement.

use crate::analysis::scoring::round_to;
use crate::error::{AssessmentError, CoreResult};
use crate::models::{DimensionAnalysis, RoiBreakdown, RoiProjection, ThreeYearRoi, YearOneRoi};
use serde::{Deserialize, Serialize};

/// Score assumed for a dimension absent from the run.
pub const DEFAULT_DIMENSION_SCORE: f64 = 70.0;

/// Engagement level at which the model starts crediting improvement.
const ENGAGEMENT_BENCHMARK: f64 = 72.0;
/// Cost of replacing one departing employee.
const REPLACEMENT_COST: f64 = 100_000.0;
/// Share of productivity gain that turns into realized value.
const PRODUCTIVITY_REALIZATION: f64 = 0.7;
/// Benefit multiplier over three years.
const THREE_YEAR_BENEFIT_MULTIPLIER: f64 = 3.3;

/// Organizational baseline the projection is computed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiBaseline {
    #[serde(default = "default_employee_count")]
    pub employee_count: u64,
    #[serde(default = "default_avg_salary")]
    pub avg_salary: f64,
    #[serde(default = "default_turnover_rate")]
    pub current_turnover_rate: f64,
    #[serde(default = "default_implementation_cost")]
    pub implementation_cost: f64,
    /// Additional cost carried in years two and three.
    #[serde(default = "default_follow_on_cost")]
    pub follow_on_cost: f64,
}

impl Default for RoiBaseline {
    fn default() -> Self {
        Self {
            employee_count: default_employee_count(),
            avg_salary: default_avg_salary(),
            current_turnover_rate: default_turnover_rate(),
            implementation_cost: default_implementation_cost(),
            follow_on_cost: default_follow_on_cost(),
        }
    }
}

impl RoiBaseline {
    /// Reject baselines the formula cannot divide by or that make no sense.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, value) in [
            ("avg_salary", self.avg_salary),
            ("current_turnover_rate", self.current_turnover_rate),
            ("implementation_cost", self.implementation_cost),
            ("follow_on_cost", self.follow_on_cost),
        ] {
            if !value.is_finite() {
                return Err(AssessmentError::Input(format!(
                    "ROI baseline {} is not a number: {}",
                    name, value
                )));
            }
        }

        if self.avg_salary < 0.0 || self.current_turnover_rate < 0.0 {
            return Err(AssessmentError::Input(
                "ROI baseline salary and turnover rate must not be negative".to_string(),
            ));
        }
        if self.implementation_cost <= 0.0 {
            return Err(AssessmentError::Input(format!(
                "ROI baseline implementation_cost must be positive, got {}",
                self.implementation_cost
            )));
        }
        if self.implementation_cost + self.follow_on_cost <= 0.0 {
            return Err(AssessmentError::Input(
                "ROI baseline three-year cost must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_employee_count() -> u64 {
    1000
}

fn default_avg_salary() -> f64 {
    80_000.0
}

fn default_turnover_rate() -> f64 {
    0.15
}

fn default_implementation_cost() -> f64 {
    200_000.0
}

fn default_follow_on_cost() -> f64 {
    140_000.0
}

/// Dimension scores the model consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiInputs {
    pub engagement: f64,
    pub leadership: f64,
    pub culture: f64,
}

impl RoiInputs {
    /// Pick the relevant scores out of a run, defaulting missing ones.
    pub fn from_analyses(analyses: &[DimensionAnalysis]) -> Self {
        let score_of = |id: &str| {
            analyses
                .iter()
                .find(|a| a.dimension_id == id)
                .map(|a| a.score)
                .unwrap_or(DEFAULT_DIMENSION_SCORE)
        };

        Self {
            engagement: score_of("engagement"),
            leadership: score_of("leadership"),
            culture: score_of("culture"),
        }
    }

    fn validate(&self) -> CoreResult<()> {
        for (name, score) in [
            ("engagement", self.engagement),
            ("leadership", self.leadership),
            ("culture", self.culture),
        ] {
            if !score.is_finite() {
                return Err(AssessmentError::Input(format!(
                    "{} score is not a number: {}",
                    name, score
                )));
            }
        }
        Ok(())
    }
}

/// Intermediate values of the ROI chain, unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiChain {
    pub engagement_improvement: f64,
    pub productivity_gain: f64,
    pub turnover_reduction: f64,
    pub turnover_savings: f64,
    pub productivity_value: f64,
    pub total_benefits: f64,
    pub year_one_roi: f64,
    pub three_year_roi: f64,
}

/// Computes ROI projections from dimension scores.
#[derive(Debug, Clone, Default)]
pub struct RoiProjector {
    baseline: RoiBaseline,
}

impl RoiProjector {
    pub fn new(baseline: RoiBaseline) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> &RoiBaseline {
        &self.baseline
    }

    /// Run the formula chain without rounding.
    pub fn chain(&self, inputs: &RoiInputs) -> CoreResult<RoiChain> {
        inputs.validate()?;
        self.baseline.validate()?;

        let b = &self.baseline;
        let employees = b.employee_count as f64;

        let engagement_improvement = ((inputs.engagement - ENGAGEMENT_BENCHMARK) / 100.0).max(0.0);
        let productivity_gain = 0.15 + engagement_improvement * 0.10;
        let turnover_reduction = (0.25 + engagement_improvement * 0.15).min(0.5);

        let turnover_savings =
            employees * b.current_turnover_rate * turnover_reduction * REPLACEMENT_COST;
        let productivity_value =
            employees * b.avg_salary * productivity_gain * PRODUCTIVITY_REALIZATION;
        let total_benefits = turnover_savings + productivity_value;

        let cost = b.implementation_cost;
        let three_year_cost = cost + b.follow_on_cost;

        Ok(RoiChain {
            engagement_improvement,
            productivity_gain,
            turnover_reduction,
            turnover_savings,
            productivity_value,
            total_benefits,
            year_one_roi: (total_benefits - cost) / cost * 100.0,
            three_year_roi: (total_benefits * THREE_YEAR_BENEFIT_MULTIPLIER - three_year_cost)
                / three_year_cost
                * 100.0,
        })
    }

    /// Project ROI; monetary values rounded to integers.
    pub fn project(&self, inputs: &RoiInputs) -> CoreResult<RoiProjection> {
        let chain = self.chain(inputs)?;
        let cost = self.baseline.implementation_cost;
        let three_year_cost = cost + self.baseline.follow_on_cost;
        let cumulative_benefits = chain.total_benefits * THREE_YEAR_BENEFIT_MULTIPLIER;

        Ok(RoiProjection {
            year_one: YearOneRoi {
                roi_percentage: chain.year_one_roi.round() as i64,
                total_benefits: chain.total_benefits.round() as i64,
                implementation_cost: cost.round() as i64,
                net_benefit: (chain.total_benefits - cost).round() as i64,
            },
            three_year: ThreeYearRoi {
                roi_percentage: chain.three_year_roi.round() as i64,
                cumulative_benefits: cumulative_benefits.round() as i64,
                cumulative_costs: three_year_cost.round() as i64,
                net_benefit: (cumulative_benefits - three_year_cost).round() as i64,
            },
            breakdown: RoiBreakdown {
                turnover_savings: chain.turnover_savings.round() as i64,
                productivity_value: chain.productivity_value.round() as i64,
                engagement_improvement: round_to(chain.engagement_improvement * 100.0, 1),
                turnover_reduction: round_to(chain.turnover_reduction * 100.0, 1),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn inputs(engagement: f64) -> RoiInputs {
        RoiInputs {
            engagement,
            leadership: DEFAULT_DIMENSION_SCORE,
            culture: DEFAULT_DIMENSION_SCORE,
        }
    }

    #[test]
    fn test_chain_for_engagement_82() {
        let projector = RoiProjector::default();
        let chain = projector.chain(&inputs(82.0)).unwrap();

        assert!(close(chain.engagement_improvement, 0.10));
        assert!(close(chain.productivity_gain, 0.16));
        assert!(close(chain.turnover_reduction, 0.265));

        let b = projector.baseline();
        let employees = b.employee_count as f64;
        assert!(close(
            chain.turnover_savings,
            employees * b.current_turnover_rate * 0.265 * 100_000.0
        ));
        assert!(close(
            chain.productivity_value,
            employees * b.avg_salary * 0.16 * 0.7
        ));
        assert!(close(
            chain.total_benefits,
            chain.turnover_savings + chain.productivity_value
        ));
        assert!(close(
            chain.year_one_roi,
            (chain.total_benefits - 200_000.0) / 200_000.0 * 100.0
        ));
        assert!(close(
            chain.three_year_roi,
            (chain.total_benefits * 3.3 - 340_000.0) / 340_000.0 * 100.0
        ));
    }

    #[test]
    fn test_low_engagement_gets_no_improvement_credit() {
        let chain = RoiProjector::default().chain(&inputs(40.0)).unwrap();
        assert_eq!(chain.engagement_improvement, 0.0);
        assert!(close(chain.productivity_gain, 0.15));
        assert!(close(chain.turnover_reduction, 0.25));
    }

    #[test]
    fn test_turnover_reduction_is_capped() {
        let baseline = RoiBaseline::default();
        let projector = RoiProjector::new(baseline);
        // 72 + 200 would need a 2.0 improvement; the cap holds regardless.
        let chain = projector.chain(&inputs(272.0)).unwrap();
        assert!(close(chain.turnover_reduction, 0.5));
    }

    #[test]
    fn test_projection_rounding() {
        let projection = RoiProjector::default().project(&inputs(82.0)).unwrap();

        assert_eq!(projection.breakdown.engagement_improvement, 10.0);
        assert_eq!(projection.breakdown.turnover_reduction, 26.5);
        assert_eq!(projection.year_one.implementation_cost, 200_000);
        assert_eq!(projection.three_year.cumulative_costs, 340_000);
        assert_eq!(
            projection.year_one.net_benefit,
            projection.year_one.total_benefits - 200_000
        );
    }

    #[test]
    fn test_non_numeric_score_is_input_error() {
        let err = RoiProjector::default()
            .project(&RoiInputs {
                engagement: f64::NAN,
                leadership: 70.0,
                culture: 70.0,
            })
            .unwrap_err();
        assert!(matches!(err, AssessmentError::Input(_)));
    }

    #[test]
    fn test_invalid_baseline_is_input_error() {
        let baselines = [
            RoiBaseline {
                implementation_cost: 0.0,
                follow_on_cost: 0.0,
                ..RoiBaseline::default()
            },
            RoiBaseline {
                implementation_cost: 100_000.0,
                follow_on_cost: -100_000.0,
                ..RoiBaseline::default()
            },
            RoiBaseline {
                avg_salary: -1.0,
                ..RoiBaseline::default()
            },
            RoiBaseline {
                current_turnover_rate: f64::NAN,
                ..RoiBaseline::default()
            },
        ];

        for baseline in baselines {
            let err = RoiProjector::new(baseline).project(&inputs(82.0)).unwrap_err();
            assert!(matches!(err, AssessmentError::Input(_)));
        }
        assert!(RoiBaseline::default().validate().is_ok());
    }

    #[test]
    fn test_inputs_default_missing_dimensions() {
        let inputs = RoiInputs::from_analyses(&[]);
        assert_eq!(inputs.engagement, DEFAULT_DIMENSION_SCORE);
        assert_eq!(inputs.leadership, DEFAULT_DIMENSION_SCORE);
        assert_eq!(inputs.culture, DEFAULT_DIMENSION_SCORE);
    }
}
