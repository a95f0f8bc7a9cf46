use serde::Serialize;

use crate::advice::prompts::{fill_profile_prompt, FALLBACK_ROADMAP, ROADMAP_PROMPT_TEMPLATE};
use crate::llm_client::{guarded_complete, CompletionRequest, LanguageModel};
use crate::outcome::Staged;
use crate::profile::{PersonalityLabel, SkillSet};

const STAGE: &str = "Roadmap generation";

/// Markdown roadmap, displayed verbatim. Step count is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roadmap(String);

impl Roadmap {
    pub fn as_markdown(&self) -> &str {
        &self.0
    }
}

pub async fn roadmap(
    llm: &dyn LanguageModel,
    skills: &SkillSet,
    personality: &PersonalityLabel,
) -> Staged<Roadmap> {
    let prompt = fill_profile_prompt(ROADMAP_PROMPT_TEMPLATE, skills, personality);

    match guarded_complete(llm, STAGE, &CompletionRequest::prompt(prompt)).await {
        Ok(markdown) => Staged::ok(Roadmap(markdown)),
        Err(notice) => Staged::degraded(Roadmap(FALLBACK_ROADMAP.to_string()), notice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::scripted::ScriptedModel;
    use crate::llm_client::LlmError;
    use crate::outcome::NoticeKind;

    #[tokio::test]
    async fn test_roadmap_is_returned_verbatim_after_trim() {
        let model = ScriptedModel::replying(["\n## Step 1 (1-3 months)\nLearn Rust\n"]);
        let staged = roadmap(&model, &SkillSet::parse("Python"), &PersonalityLabel::unknown()).await;
        assert_eq!(staged.value.as_markdown(), "## Step 1 (1-3 months)\nLearn Rust");

        let prompt = model.requests()[0].last_user_text().unwrap().to_string();
        assert!(prompt.contains("Skills: Python\nPersonality Type: Unknown\n"));
    }

    #[tokio::test]
    async fn test_failure_returns_generic_roadmap() {
        let model = ScriptedModel::new([Err(LlmError::Malformed("bad json".to_string()))]);
        let staged = roadmap(&model, &SkillSet::default(), &PersonalityLabel::unknown()).await;
        assert_eq!(staged.value.as_markdown(), FALLBACK_ROADMAP);
        assert_eq!(staged.notice.unwrap().kind, NoticeKind::MalformedResponse);
    }
}
