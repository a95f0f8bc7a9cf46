//! Recommendation Generator: jobs and courses for a skills/personality pair.
//!
//! The model is asked for `### Jobs` and `### Courses` sections but nothing
//! guarantees it complies, so splitting is best-effort with an explicit
//! "delimiter not found" branch.

use serde::Serialize;
use tracing::info;

use crate::advice::prompts::{
    fill_profile_prompt, FALLBACK_COURSES, FALLBACK_JOBS, RECOMMENDATION_PROMPT_TEMPLATE,
};
use crate::llm_client::{guarded_complete, CompletionRequest, LanguageModel};
use crate::outcome::Staged;
use crate::profile::{PersonalityLabel, SkillSet};

const STAGE: &str = "Recommendation generation";
const JOBS_HEADER: &str = "### Jobs";
const COURSES_HEADER: &str = "### Courses";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Recommendations {
    /// The response contained `### Courses` and was split at its first occurrence.
    Sectioned { jobs: String, courses: String },
    /// No delimiter: the whole trimmed response, shown as a single section.
    Undivided { text: String },
}

impl Recommendations {
    pub fn parse(response: &str) -> Self {
        match response.split_once(COURSES_HEADER) {
            Some((jobs, courses)) => Recommendations::Sectioned {
                jobs: jobs.replace(JOBS_HEADER, "").trim().to_string(),
                courses: courses.trim().to_string(),
            },
            None => Recommendations::Undivided {
                text: response.trim().to_string(),
            },
        }
    }

    /// One static job and one static course.
    pub fn fallback() -> Self {
        Recommendations::Sectioned {
            jobs: FALLBACK_JOBS.to_string(),
            courses: FALLBACK_COURSES.to_string(),
        }
    }
}

fn build_prompt(skills: &SkillSet, personality: &PersonalityLabel) -> String {
    fill_profile_prompt(RECOMMENDATION_PROMPT_TEMPLATE, skills, personality)
}

pub async fn recommend(
    llm: &dyn LanguageModel,
    skills: &SkillSet,
    personality: &PersonalityLabel,
) -> Staged<Recommendations> {
    let prompt = build_prompt(skills, personality);

    match guarded_complete(llm, STAGE, &CompletionRequest::prompt(prompt)).await {
        Ok(response) => {
            let recommendations = Recommendations::parse(&response);
            if matches!(recommendations, Recommendations::Undivided { .. }) {
                info!("Recommendation response had no {COURSES_HEADER} section; showing it whole");
            }
            Staged::ok(recommendations)
        }
        Err(notice) => Staged::degraded(Recommendations::fallback(), notice),
    }
}
