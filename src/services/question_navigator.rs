use crate::services::attempt_store::AttemptStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}

/// Tracks which question is on screen. Moving never touches answers, and
/// questions may be left unanswered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionNavigator {
    current: usize,
    total: usize,
}

impl QuestionNavigator {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn last_index(&self) -> usize {
        self.total.saturating_sub(1)
    }

    /// Jumps to `index`, clamped to the last question.
    pub fn go_to(&mut self, index: usize) -> usize {
        self.current = index.min(self.last_index());
        self.current
    }

    pub fn next(&mut self) -> usize {
        if self.current < self.last_index() {
            self.current += 1;
        }
        self.current
    }

    pub fn previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current == self.last_index()
    }

    pub fn progress(&self, store: &AttemptStore) -> Progress {
        Progress {
            answered: store.answered_count(),
            total: store.answers().len(),
        }
    }
}
