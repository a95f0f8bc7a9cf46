// Advice stages: job/course recommendations and career roadmap.
// Both read the session's skills and personality label; neither mutates the session.

pub mod handlers;
pub mod prompts;
pub mod recommendations;
pub mod roadmap;
