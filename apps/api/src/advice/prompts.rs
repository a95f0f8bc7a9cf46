// Advice LLM prompt templates: job/course recommendations and career roadmap.

use crate::profile::{PersonalityLabel, SkillSet};

/// Recommendation prompt. Replace `{skills}` and `{personality}` before sending.
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = "\
You are a career advisor. Based on the following skills and personality type, \
recommend 3–5 relevant jobs and 3–5 relevant online courses.

Present the recommendations in two clearly separated sections:
1. ### Jobs
2. ### Courses

For each job, include:
- Job Title
- Required Skills
- Average Salary (e.g., $80K)

For each course, include:
- Course Title
- Platform (e.g., Udemy, Coursera, edX)
- URL (link to the course)

Tailor the recommendations to match the provided skills and personality type.
If no input is given, suggest general entry-level jobs and foundational courses.
Always suggest at least one job and one course.

Skills: {skills}
Personality Type: {personality}
";

/// Roadmap prompt. Replace `{skills}` and `{personality}` before sending.
pub const ROADMAP_PROMPT_TEMPLATE: &str = "\
Generate a career roadmap in markdown format based on the following skills and personality type. \
Include 3-5 steps with timelines (e.g., '1-3 months', '3-6 months') and actionable advice:
Skills: {skills}
Personality Type: {personality}
Return only the markdown content.";

/// Shown when the recommendation call fails or comes back empty.
pub const FALLBACK_JOBS: &str = "\
- **Job Title**: General Developer
  **Required Skills**: Coding Basics
  **Average Salary**: $60K";

pub const FALLBACK_COURSES: &str = "\
- **Course Title**: Intro to Programming
  **Platform**: edX
  **URL**: [Intro to Programming](https://example.com/intro)";

/// Shown when the roadmap call fails or comes back empty.
pub const FALLBACK_ROADMAP: &str = "\
1. **Foundations (1-3 months)**: Strengthen core skills with an introductory course and daily practice.
2. **Projects (3-6 months)**: Build two or three small portfolio projects and publish them.
3. **Job search (6-9 months)**: Tailor your resume to entry-level roles and apply consistently.";

/// Fills `{skills}` and `{personality}` in one left-to-right pass, so a
/// placeholder appearing inside an inserted value is left as written.
pub fn fill_profile_prompt(
    template: &str,
    skills: &SkillSet,
    personality: &PersonalityLabel,
) -> String {
    let skills = skills.to_prompt_text();
    let values = [("{skills}", skills.as_str()), ("{personality}", personality.as_str())];

    let mut prompt = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        prompt.push_str(&rest[..open]);
        let tail = &rest[open..];
        match values.iter().find(|(placeholder, _)| tail.starts_with(placeholder)) {
            Some((placeholder, value)) => {
                prompt.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                prompt.push('{');
                rest = &tail[1..];
            }
        }
    }
    prompt.push_str(rest);
    prompt
}
