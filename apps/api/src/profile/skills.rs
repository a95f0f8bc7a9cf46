//! Skill Extractor: asks the model for a comma-separated skills list and
//! parses it once, here, into an ordered list of tokens.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::llm_client::{guarded_complete, CompletionRequest, LanguageModel};
use crate::outcome::{NoticeKind, Staged};
use crate::profile::prompts::SKILLS_PROMPT_TEMPLATE;

const STAGE: &str = "Skill extraction";

/// Ordered, case-insensitively de-duplicated skill tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    /// Parses the model's reply. Tokens are split on commas and newlines;
    /// list bullets and wrapping quotes are stripped, blanks dropped, and
    /// later duplicates discarded.
    pub fn parse(raw: &str) -> Self {
        let mut seen = HashSet::new();
        let skills = raw
            .split([',', '\n'])
            .map(clean_token)
            .filter(|token| !token.is_empty())
            .filter(|token| seen.insert(token.to_lowercase()))
            .map(str::to_string)
            .collect();
        Self(skills)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// The list joined with `", "`, or `"None"` when empty, as prompts expect.
    pub fn to_prompt_text(&self) -> String {
        if self.0.is_empty() {
            "None".to_string()
        } else {
            self.0.join(", ")
        }
    }
}

fn clean_token(token: &str) -> &str {
    token
        .trim()
        .trim_start_matches(['-', '*', '•'])
        .trim()
        .trim_matches(['\'', '"', '`'])
        .trim()
        .trim_end_matches('.')
        .trim()
}

/// Extracts skills from non-empty resume text.
///
/// The prompt allows the model to answer with an empty string when it finds
/// nothing, so an empty reply is an empty list, not a failure.
pub async fn extract_skills(llm: &dyn LanguageModel, resume_text: &str) -> Staged<SkillSet> {
    let prompt = SKILLS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);

    match guarded_complete(llm, STAGE, &CompletionRequest::prompt(prompt)).await {
        Ok(raw) => {
            let skills = SkillSet::parse(&raw);
            info!("Extracted {} skills from resume", skills.len());
            Staged::ok(skills)
        }
        Err(notice) if notice.kind == NoticeKind::EmptyLlmResponse => Staged::ok(SkillSet::default()),
        Err(notice) => Staged::degraded(SkillSet::default(), notice),
    }
}
