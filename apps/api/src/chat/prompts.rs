/// System instruction for the free-form chat. Prior exchanges are sent as
/// alternating user/model turns after it.
pub const CONVERSATION_SYSTEM: &str = "\
The following is a friendly conversation between a human and an AI. \
The AI is talkative and provides lots of specific details from its context. \
If the AI does not know the answer to a question, it truthfully says it does not know.";

/// Reply recorded when the model could not answer.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't reach the assistant just now. Please try asking again.";
