//! Markdown panels, laid out the way the assistant presents each stage's result.

use crate::advice::recommendations::Recommendations;
use crate::advice::roadmap::Roadmap;
use crate::chat::ConversationHistory;
use crate::profile::{PersonalityLabel, SkillSet};

/// Resume text and its skills. Nothing is shown when no text was extracted.
pub fn resume_panel(resume_text: &str, skills: &SkillSet) -> Option<String> {
    if resume_text.trim().is_empty() {
        return None;
    }
    Some(format!(
        "### 📄 Resume Summary\n\n**Extracted Resume Text:**\n\n~~~text\n{}\n~~~\n\n**Extracted Skills:** {}",
        resume_text.trim_end(),
        skills.as_slice().join(", ")
    ))
}

pub fn personality_panel(label: &PersonalityLabel) -> String {
    format!("### 🧠 Personality Type:\n\nBased on your answers, you're a **{label}**.")
}

pub fn recommendations_panel(recommendations: &Recommendations) -> String {
    match recommendations {
        Recommendations::Sectioned { jobs, courses } => format!(
            "### 🔍 Suggested Jobs\n\n{jobs}\n\n### 📚 Recommended Courses\n\n{courses}"
        ),
        Recommendations::Undivided { text } => format!("### 💡 Recommendations\n\n{text}"),
    }
}

pub fn roadmap_panel(roadmap: &Roadmap) -> String {
    format!("### 🗺 Career Roadmap\n\n{}", roadmap.as_markdown())
}

/// Most recent exchange first.
pub fn transcript(history: &ConversationHistory) -> String {
    history
        .most_recent_first()
        .map(|e| format!("**You:** {}\n\n**Bot:** {}", e.user, e.bot))
        .collect::<Vec<_>>()
        .join("\n\n")
}
