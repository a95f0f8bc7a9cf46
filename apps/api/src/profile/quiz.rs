//! Quiz Collector: the nine fixed personality questions and the profile
//! built from one complete submission.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A fixed single-choice question. The first choice is the default answer.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub key: &'static str,
    /// Label used when the profile is handed to the classifier.
    pub label: &'static str,
    pub prompt: &'static str,
    pub choices: &'static [&'static str],
}

pub static QUESTIONS: [QuizQuestion; 9] = [
    QuizQuestion {
        key: "work_preference",
        label: "Work preference",
        prompt: "You prefer to work:",
        choices: &["Alone", "In a small team", "In a large team", "Depends on the task"],
    },
    QuizQuestion {
        key: "decision_making",
        label: "Decision-making",
        prompt: "You make decisions based on:",
        choices: &["Logic and analysis", "Feelings and intuition", "A balance of both"],
    },
    QuizQuestion {
        key: "organization_style",
        label: "Organization style",
        prompt: "You are more:",
        choices: &[
            "Highly organized",
            "Somewhat organized",
            "Spontaneous",
            "Chaotic but effective",
        ],
    },
    QuizQuestion {
        key: "focus",
        label: "Focus",
        prompt: "You focus on:",
        choices: &["Fine details", "The big picture", "Both equally"],
    },
    QuizQuestion {
        key: "problem_solving",
        label: "Problem-solving",
        prompt: "When solving problems, you are:",
        choices: &[
            "Highly creative",
            "Practical and methodical",
            "A mix of creative and practical",
        ],
    },
    QuizQuestion {
        key: "adaptability",
        label: "Adaptability",
        prompt: "How do you handle change?",
        choices: &[
            "I adapt quickly",
            "I need time to adjust",
            "I resist change",
            "I thrive on change",
        ],
    },
    QuizQuestion {
        key: "social_interaction",
        label: "Social interaction",
        prompt: "In social settings, you are:",
        choices: &[
            "Extroverted and outgoing",
            "Introverted but friendly",
            "Reserved and observant",
            "Depends on my mood",
        ],
    },
    QuizQuestion {
        key: "goal_orientation",
        label: "Goal orientation",
        prompt: "Your goals are driven by:",
        choices: &[
            "Achieving stability",
            "Pursuing passion",
            "Gaining recognition",
            "Personal growth",
        ],
    },
    QuizQuestion {
        key: "risk_approach",
        label: "Risk approach",
        prompt: "When faced with risks, you:",
        choices: &[
            "Take calculated risks",
            "Avoid risks",
            "Embrace risks",
            "Assess risks thoroughly",
        ],
    },
];

/// Raw answers as submitted: a flat JSON object of question key to choice.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct QuizSubmission {
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizAnswer {
    pub label: &'static str,
    pub choice: &'static str,
}

/// One answer per question, in question order. Only constructible from a
/// fully validated submission, so it always holds exactly nine entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuizProfile {
    answers: Vec<QuizAnswer>,
}

impl QuizProfile {
    /// Validates the whole submission before building anything. A missing
    /// answer takes the question's first choice; an unknown key or a choice
    /// outside the question's options rejects the submission.
    pub fn from_submission(submission: &QuizSubmission) -> Result<Self, AppError> {
        if let Some(unknown) = submission
            .answers
            .keys()
            .find(|key| !QUESTIONS.iter().any(|q| q.key == key.as_str()))
        {
            return Err(AppError::Validation(format!(
                "Unknown quiz question '{unknown}'"
            )));
        }

        let answers = QUESTIONS
            .iter()
            .map(|question| {
                let choice = match submission.answers.get(question.key) {
                    None => question.choices[0],
                    Some(given) => question
                        .choices
                        .iter()
                        .copied()
                        .find(|c| *c == given.trim())
                        .ok_or_else(|| {
                            AppError::Validation(format!(
                                "'{given}' is not a valid answer to '{}'",
                                question.prompt
                            ))
                        })?,
                };
                Ok(QuizAnswer {
                    label: question.label,
                    choice,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Self { answers })
    }

    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    /// `"{label}: {choice}"` per line, in question order.
    pub fn to_prompt_lines(&self) -> String {
        self.answers
            .iter()
            .map(|a| format!("{}: {}", a.label, a.choice))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
