// Conversational Responder: free-form chat over the session's running history.

pub mod handlers;
pub mod history;
pub mod prompts;
pub mod responder;

pub use history::ConversationHistory;
