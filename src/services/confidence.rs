//! Confidence assessment.
//!
//! Combines retrieval relevance and the responder's self-reported
//! quality into a single trust score. Two bounds are load-bearing and
//! tested: the score never increases when max relevance drops, and an
//! answer generated with zero supporting evidence is pinned to the
//! configured no-context ceiling no matter what the responder claims.

use crate::domain::models::{GeneratedAnswer, PolicyConfig, RetrievedContext};

/// Pure, deterministic confidence scorer.
///
/// Configured once at startup; holds no mutable state.
#[derive(Debug, Clone)]
pub struct ConfidenceAssessor {
    relevance_weight: f64,
    no_context_ceiling: f64,
}

impl ConfidenceAssessor {
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            relevance_weight: policy.relevance_weight.clamp(0.0, 1.0),
            no_context_ceiling: policy.no_context_ceiling.clamp(0.0, 1.0),
        }
    }

    /// Score the answer's trustworthiness in [0, 1].
    ///
    /// Empty context returns exactly the no-context ceiling. Otherwise
    /// the score is a weighted blend of max relevance and self-reported
    /// quality; a responder that reports no quality contributes its
    /// relevance evidence alone.
    pub fn assess(&self, context: &RetrievedContext, answer: &GeneratedAnswer) -> f64 {
        let Some(max_relevance) = context.max_relevance() else {
            return self.no_context_ceiling;
        };

        let max_relevance = max_relevance.clamp(0.0, 1.0);
        let quality = answer
            .self_quality
            .map_or(max_relevance, |q| q.clamp(0.0, 1.0));

        let blended = self.relevance_weight * max_relevance
            + (1.0 - self.relevance_weight) * quality;
        blended.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RetrievedFragment;

    fn assessor() -> ConfidenceAssessor {
        ConfidenceAssessor::new(&PolicyConfig::default())
    }

    fn context_with(relevances: &[f64]) -> RetrievedContext {
        RetrievedContext::new(
            relevances
                .iter()
                .enumerate()
                .map(|(i, &r)| RetrievedFragment::new("fragment", format!("doc{i}.md"), r))
                .collect(),
        )
    }

    #[test]
    fn test_empty_context_pins_to_ceiling() {
        let assessor = assessor();
        let answer = GeneratedAnswer::new("confident-sounding answer").with_quality(1.0);

        let score = assessor.assess(&RetrievedContext::empty(), &answer);
        assert!((score - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ceiling_below_threshold_minus_margin() {
        let policy = PolicyConfig::default();
        assert!(
            policy.no_context_ceiling
                <= policy.escalation_threshold - policy.confidence_margin
        );
    }

    #[test]
    fn test_well_supported_answer_clears_threshold() {
        // One fragment at 0.9, self-reported quality 0.8
        let assessor = assessor();
        let context = context_with(&[0.9]);
        let answer = GeneratedAnswer::new("answer").with_quality(0.8);

        let score = assessor.assess(&context, &answer);
        assert!(score >= 0.6, "expected >= 0.6, got {score}");
    }

    #[test]
    fn test_monotonic_in_max_relevance() {
        let assessor = assessor();
        let answer = GeneratedAnswer::new("answer").with_quality(0.7);

        let mut previous = f64::MAX;
        for relevance in [0.95, 0.8, 0.6, 0.4, 0.2, 0.05] {
            let score = assessor.assess(&context_with(&[relevance]), &answer);
            assert!(
                score <= previous,
                "score rose from {previous} to {score} as relevance fell"
            );
            previous = score;
        }
    }

    #[test]
    fn test_missing_quality_falls_back_to_relevance() {
        let assessor = assessor();
        let context = context_with(&[0.8]);
        let answer = GeneratedAnswer::new("answer");

        let score = assessor.assess(&context, &answer);
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_score_stays_in_unit_interval() {
        let assessor = assessor();
        let context = context_with(&[1.0, 1.0]);
        let answer = GeneratedAnswer::new("answer").with_quality(1.0);
        assert!(assessor.assess(&context, &answer) <= 1.0);

        let context = context_with(&[0.0]);
        let answer = GeneratedAnswer::new("answer").with_quality(0.0);
        assert!(assessor.assess(&context, &answer) >= 0.0);
    }
}
