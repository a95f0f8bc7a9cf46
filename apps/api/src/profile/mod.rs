// Profile stages: quiz collection, skill extraction, personality classification.
// All LLM calls go through llm_client::guarded_complete.

pub mod personality;
pub mod prompts;
pub mod quiz;
pub mod skills;

pub use personality::PersonalityLabel;
pub use quiz::{QuizProfile, QuizSubmission};
pub use skills::SkillSet;
