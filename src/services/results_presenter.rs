use std::fmt;

use serde_json::Value;

use crate::models::domain::{GradedAnswer, GradedResult, QuizQuestion, QuizQuestionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    Excellent,
    Great,
    Good,
    NeedsPractice,
}

impl PerformanceTier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            PerformanceTier::Excellent
        } else if percentage >= 70.0 {
            PerformanceTier::Great
        } else if percentage >= 50.0 {
            PerformanceTier::Good
        } else {
            PerformanceTier::NeedsPractice
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excellent! You have mastered this material.",
            PerformanceTier::Great => "Great job! You have a solid understanding of the topic.",
            PerformanceTier::Good => "Good effort. Review the explanations below to improve.",
            PerformanceTier::NeedsPractice => {
                "Keep practicing. Revisit the course material and try again."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReview {
    pub number: usize,
    pub question_id: String,
    pub prompt: Option<String>,
    pub your_answer: String,
    pub is_correct: bool,
    pub points_earned: u32,
    pub correct_answer: Option<String>, // only filled when the learner was wrong
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsReport {
    pub verdict: Verdict,
    pub tier: PerformanceTier,
    pub percentage: f64,
    pub points_earned: u32,
    pub total_points: u32,
    pub passing_score: f64,
    pub reviews: Vec<QuestionReview>,
}

/// Turns a graded result into a report. Holds no state and does no I/O.
pub struct ResultsPresenter;

impl ResultsPresenter {
    pub fn present(result: &GradedResult, questions: &[QuizQuestion]) -> ResultsReport {
        let reviews = result
            .answers
            .iter()
            .enumerate()
            .map(|(position, graded)| {
                let question = questions.iter().find(|q| q.id == graded.question_id);
                Self::review(position + 1, graded, question)
            })
            .collect();

        ResultsReport {
            verdict: if result.passed {
                Verdict::Passed
            } else {
                Verdict::Failed
            },
            tier: PerformanceTier::from_percentage(result.percentage),
            percentage: result.percentage,
            points_earned: result.points_earned,
            total_points: result.total_points,
            passing_score: result.passing_score,
            reviews,
        }
    }

    fn review(number: usize, graded: &GradedAnswer, question: Option<&QuizQuestion>) -> QuestionReview {
        let correct_answer = if graded.is_correct {
            None
        } else {
            graded
                .correct_answer
                .as_ref()
                .map(|value| describe_answer(value, question))
        };

        QuestionReview {
            number,
            question_id: graded.question_id.clone(),
            prompt: question.map(|q| q.text.clone()),
            your_answer: describe_answer(&graded.user_answer, question),
            is_correct: graded.is_correct,
            points_earned: graded.points_earned,
            correct_answer,
            explanation: graded
                .explanation
                .clone()
                .or_else(|| question.and_then(|q| q.explanation.clone())),
        }
    }
}

fn describe_answer(value: &Value, question: Option<&QuizQuestion>) -> String {
    let choice_label = |index: usize| {
        question
            .filter(|q| q.question_type == QuizQuestionType::SingleChoice)
            .and_then(|q| q.option_label(index))
            .map(str::to_string)
    };

    match value {
        Value::Null => "Not answered".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(text) if text.is_empty() => "Not answered".to_string(),
        Value::String(text) if text == "true" => "True".to_string(),
        Value::String(text) if text == "false" => "False".to_string(),
        Value::String(text) => text
            .parse::<usize>()
            .ok()
            .and_then(choice_label)
            .unwrap_or_else(|| text.clone()),
        Value::Number(number) => number
            .as_u64()
            .and_then(|index| choice_label(index as usize))
            .unwrap_or_else(|| number.to_string()),
        other => other.to_string(),
    }
}

impl fmt::Display for ResultsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match self.verdict {
            Verdict::Passed => "PASSED",
            Verdict::Failed => "NOT PASSED",
        };
        writeln!(
            f,
            "{} with {:.0}% ({}/{} points, passing score {:.0}%)",
            verdict, self.percentage, self.points_earned, self.total_points, self.passing_score
        )?;
        writeln!(f, "{}", self.tier.message())?;

        for review in &self.reviews {
            writeln!(f)?;
            let mark = if review.is_correct { "correct" } else { "incorrect" };
            match &review.prompt {
                Some(prompt) => writeln!(f, "Q{}. {} [{}]", review.number, prompt, mark)?,
                None => writeln!(f, "Q{}. ({}) [{}]", review.number, review.question_id, mark)?,
            }
            writeln!(f, "  Your answer: {}", review.your_answer)?;
            if let Some(correct) = &review.correct_answer {
                writeln!(f, "  Correct answer: {}", correct)?;
            }
            if let Some(explanation) = &review.explanation {
                writeln!(f, "  {}", explanation)?;
            }
        }

        Ok(())
    }
}
