//! Escalation notice composition.
//!
//! When a verdict escalates, the user-visible response gains a footer
//! telling the employee what happens next, with a short reference id
//! they can quote to HR.

use uuid::Uuid;

use crate::domain::models::EscalationReason;

/// Per-reason notice line shown above the footer.
fn notice_line(reason: EscalationReason) -> &'static str {
    match reason {
        EscalationReason::Sensitive => {
            "This query involves a sensitive HR matter and requires direct HR team involvement."
        }
        EscalationReason::Complex => {
            "This query involves a complex process that may require personalized HR guidance."
        }
        EscalationReason::PolicyGap => {
            "No specific policy was found in our current documentation for this query."
        }
        EscalationReason::LowConfidence => {
            "This response may need verification by an HR specialist."
        }
        EscalationReason::None => "This query has been flagged for HR review.",
    }
}

/// Short reference id an employee can quote: first 8 hex chars of the
/// session id, uppercased.
pub fn reference_id(session_id: Uuid) -> String {
    session_id.simple().to_string()[..8].to_uppercase()
}

/// Compose the escalated response text.
///
/// Appends the escalation footer to the generated answer, or produces a
/// standalone notice when generation never ran (sensitive fast path,
/// stage failures).
pub fn escalated_response(
    original: Option<&str>,
    reason: EscalationReason,
    session_id: Uuid,
) -> String {
    let footer = format!(
        "\n\n---\n{}\n\n\
         Your query has been escalated to the HR team. An HR representative \
         will reach out within 1-2 business days.\n\n\
         For urgent matters, please contact HR directly at: hr@company.com\n\n\
         Reference ID: {}",
        notice_line(reason),
        reference_id(session_id),
    );

    match original {
        Some(text) if !text.is_empty() => format!("{text}{footer}"),
        _ => format!("Thank you for your query.{footer}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_id_is_short_and_upper() {
        let id = reference_id(Uuid::new_v4());
        assert_eq!(id.len(), 8);
        assert_eq!(id, id.to_uppercase());
    }

    #[test]
    fn test_footer_appended_to_answer() {
        let text = escalated_response(
            Some("You get 12 sick days."),
            EscalationReason::LowConfidence,
            Uuid::new_v4(),
        );
        assert!(text.starts_with("You get 12 sick days."));
        assert!(text.contains("escalated to the HR team"));
        assert!(text.contains("verification by an HR specialist"));
    }

    #[test]
    fn test_standalone_notice_without_answer() {
        let text = escalated_response(None, EscalationReason::Sensitive, Uuid::new_v4());
        assert!(text.starts_with("Thank you for your query."));
        assert!(text.contains("sensitive HR matter"));
    }
}
