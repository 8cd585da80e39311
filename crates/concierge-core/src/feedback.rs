//! Feedback form state and the submission payload

use serde::{Deserialize, Serialize};

/// Body of `POST /api/feedback`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    /// Serialized as `null` when the user left it blank
    pub name: Option<String>,
    pub description: String,
}

/// Transient state of the feedback form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub name: String,
    pub description: String,
    submitting: bool,
    submitted: bool,
}

impl FeedbackForm {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// The submit control is enabled only for a non-blank description
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.submitted && !self.description.trim().is_empty()
    }

    pub fn to_submission(&self) -> FeedbackSubmission {
        let name = self.name.trim();
        FeedbackSubmission {
            name: (!name.is_empty()).then(|| name.to_string()),
            description: self.description.trim().to_string(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub(crate) fn begin(&mut self) {
        self.submitting = true;
    }

    pub(crate) fn finish(&mut self, success: bool) {
        self.submitting = false;
        self.submitted = success;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_disables_submit() {
        assert!(!FeedbackForm::new("Sam", "").can_submit());
        assert!(!FeedbackForm::new("Sam", "   \n\t").can_submit());
        assert!(FeedbackForm::new("", "The offside answer was great").can_submit());
    }

    #[test]
    fn test_submission_trims_and_nulls_blank_name() {
        let form = FeedbackForm::new("   ", "  Sources were missing  ");
        let submission = form.to_submission();
        assert_eq!(submission.name, None);
        assert_eq!(submission.description, "Sources were missing");

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": null, "description": "Sources were missing"})
        );

        let form = FeedbackForm::new(" Sam ", "ok");
        assert_eq!(form.to_submission().name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_submitting_blocks_resubmit() {
        let mut form = FeedbackForm::new("", "text");
        form.begin();
        assert!(form.is_submitting());
        assert!(!form.can_submit());

        form.finish(false);
        assert!(!form.is_submitting());
        assert!(form.can_submit(), "failed submit leaves the form open for retry");

        form.begin();
        form.finish(true);
        assert!(form.is_submitted());
        assert!(!form.can_submit());
    }
}
