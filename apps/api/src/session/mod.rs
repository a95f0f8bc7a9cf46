//! Session: everything one user's interaction accumulates. Created and
//! disposed explicitly through the session endpoints; nothing is persisted.

pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::chat::ConversationHistory;
use crate::profile::{PersonalityLabel, QuizProfile, SkillSet};

pub use store::SessionStore;

/// Result of the most recent resume upload. `text` is empty when extraction failed.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeState {
    pub filename: String,
    pub text: String,
    pub skills: SkillSet,
}

/// The most recent quiz submission and its classification.
#[derive(Debug, Clone, Serialize)]
pub struct QuizState {
    pub profile: QuizProfile,
    pub personality: PersonalityLabel,
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resume: Option<ResumeState>,
    pub quiz: Option<QuizState>,
    pub history: ConversationHistory,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            resume: None,
            quiz: None,
            history: ConversationHistory::new(),
        }
    }

    /// Skills from the uploaded resume; empty when none was uploaded.
    pub fn skills(&self) -> SkillSet {
        self.resume
            .as_ref()
            .map(|r| r.skills.clone())
            .unwrap_or_default()
    }

    /// The classified label, or `Unknown` when no quiz was submitted.
    pub fn personality(&self) -> PersonalityLabel {
        self.quiz
            .as_ref()
            .map(|q| q.personality.clone())
            .unwrap_or_default()
    }

    /// Recommendations and roadmap are offered once either input exists.
    pub fn has_profile_input(&self) -> bool {
        self.resume.is_some() || self.quiz.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::QuizSubmission;

    #[test]
    fn test_new_session_has_no_profile_input() {
        let session = Session::new();
        assert!(!session.has_profile_input());
        assert!(session.skills().is_empty());
        assert_eq!(session.personality(), PersonalityLabel::unknown());
    }

    #[test]
    fn test_failed_upload_still_counts_as_input() {
        let mut session = Session::new();
        session.resume = Some(ResumeState {
            filename: "scan.pdf".to_string(),
            text: String::new(),
            skills: SkillSet::default(),
        });
        assert!(session.has_profile_input());
        assert!(session.skills().is_empty());
    }

    #[test]
    fn test_quiz_state_supplies_personality() {
        let mut session = Session::new();
        session.quiz = Some(QuizState {
            profile: QuizProfile::from_submission(&QuizSubmission::default()).unwrap(),
            personality: PersonalityLabel::new("Creative Thinker"),
        });
        assert_eq!(session.personality().as_str(), "Creative Thinker");
    }
}
