use async_trait::async_trait;

/// What the learner is asked to confirm before a manual submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitSummary {
    pub answered: usize,
    pub total: usize,
    pub remaining_seconds: u32,
}

impl SubmitSummary {
    pub fn unanswered(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }

    pub fn prompt(&self) -> String {
        match self.unanswered() {
            0 => "Submit your answers? You cannot change them afterwards.".to_string(),
            1 => "You have 1 unanswered question. Submit anyway?".to_string(),
            n => format!("You have {} unanswered questions. Submit anyway?", n),
        }
    }
}

#[async_trait]
pub trait SubmitConfirmation: Send + Sync {
    async fn confirm_submission(&self, summary: &SubmitSummary) -> bool;
}

/// Confirms every submission, for non-interactive runs.
pub struct AlwaysConfirm;

#[async_trait]
impl SubmitConfirmation for AlwaysConfirm {
    async fn confirm_submission(&self, _summary: &SubmitSummary) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_unanswered_questions() {
        let summary = SubmitSummary {
            answered: 1,
            total: 3,
            remaining_seconds: 20,
        };

        assert_eq!(summary.unanswered(), 2);
        assert_eq!(
            summary.prompt(),
            "You have 2 unanswered questions. Submit anyway?"
        );
    }

    #[tokio::test]
    async fn always_confirm_accepts() {
        let summary = SubmitSummary {
            answered: 2,
            total: 2,
            remaining_seconds: 0,
        };

        assert!(AlwaysConfirm.confirm_submission(&summary).await);
    }
}
