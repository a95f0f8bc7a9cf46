// Profile LLM prompt templates: skill extraction and personality classification.

/// Skill extraction prompt. Replace `{resume_text}` before sending.
pub const SKILLS_PROMPT_TEMPLATE: &str = "\
Extract technical and soft skills from the following resume text. \
Return a list of skills as a comma-separated string (e.g., 'Python, Data Analysis, Teamwork'). \
Focus on relevant skills and avoid duplicates. If no skills are found, return an empty string:

{resume_text}";

/// Personality classification prompt. Replace `{answers}` with the
/// `"{label}: {choice}"` lines of the quiz profile.
pub const PERSONALITY_PROMPT_TEMPLATE: &str = "\
Analyze the following quiz answers to determine the user's personality type. \
Provide a concise personality type label (e.g., 'Creative Thinker', 'Analytical Strategist', 'Empathetic Leader') \
based on these traits:
{answers}
Return only the personality type label, nothing else.";
