//! Escalation policy.
//!
//! A pure decision function evaluated in strict precedence order; the
//! first matching rule wins and no two reasons ever co-emit. Sensitive
//! queries escalate before confidence is ever computed, so the
//! retrieval and generation cost on that path is avoided entirely.

use crate::domain::models::{Category, EscalationReason, EscalationVerdict, PolicyConfig};

/// Pure escalation decision function.
#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    escalation_threshold: f64,
    always_complex: Vec<Category>,
}

impl EscalationPolicy {
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            escalation_threshold: policy.escalation_threshold,
            always_complex: policy.always_complex.clone(),
        }
    }

    /// The configured confidence cut line.
    pub fn threshold(&self) -> f64 {
        self.escalation_threshold
    }

    /// Decide the verdict for one resolution.
    ///
    /// Precedence: sensitive, policy gap, low confidence, always-complex
    /// category, answered.
    pub fn decide(
        &self,
        sensitive: bool,
        confidence: f64,
        context_empty: bool,
        category: Category,
    ) -> EscalationVerdict {
        if sensitive {
            return EscalationVerdict::escalated(EscalationReason::Sensitive);
        }
        if context_empty {
            return EscalationVerdict::escalated(EscalationReason::PolicyGap);
        }
        if confidence < self.escalation_threshold {
            return EscalationVerdict::escalated(EscalationReason::LowConfidence);
        }
        if self.always_complex.contains(&category) {
            return EscalationVerdict::escalated(EscalationReason::Complex);
        }
        EscalationVerdict::answered()
    }
}
