use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::llm_client::{guarded_complete, CompletionRequest, LanguageModel};
use crate::outcome::Staged;
use crate::profile::prompts::PERSONALITY_PROMPT_TEMPLATE;
use crate::profile::quiz::QuizProfile;

const STAGE: &str = "Personality classification";
const UNKNOWN: &str = "Unknown";

/// Short personality classification. The model's label is trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonalityLabel(String);

impl PersonalityLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Sentinel used when no quiz was submitted or classification failed.
    pub fn unknown() -> Self {
        Self(UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PersonalityLabel {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for PersonalityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub async fn classify(llm: &dyn LanguageModel, profile: &QuizProfile) -> Staged<PersonalityLabel> {
    let prompt = PERSONALITY_PROMPT_TEMPLATE.replace("{answers}", &profile.to_prompt_lines());

    match guarded_complete(llm, STAGE, &CompletionRequest::prompt(prompt)).await {
        Ok(label) => {
            info!("Classified quiz profile as '{label}'");
            Staged::ok(PersonalityLabel::new(label))
        }
        Err(notice) => Staged::degraded(PersonalityLabel::unknown(), notice),
    }
}
