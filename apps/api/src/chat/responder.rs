use tracing::info;

use crate::chat::history::ConversationHistory;
use crate::chat::prompts::{CONVERSATION_SYSTEM, FALLBACK_REPLY};
use crate::llm_client::{guarded_complete, CompletionRequest, LanguageModel, Turn};
use crate::outcome::Staged;

const STAGE: &str = "Chat";

/// Answers `utterance` with the recent history as context, then appends the
/// exchange. Every call appends exactly one pair, fallback replies included.
pub async fn respond(
    llm: &dyn LanguageModel,
    history: &mut ConversationHistory,
    utterance: &str,
    context_pairs: Option<usize>,
) -> Staged<String> {
    let mut turns = history.context_turns(context_pairs);
    turns.push(Turn::user(utterance));
    let request = CompletionRequest {
        system: Some(CONVERSATION_SYSTEM.to_string()),
        turns,
    };

    match guarded_complete(llm, STAGE, &request).await {
        Ok(reply) => {
            history.append(utterance, reply.as_str(), false);
            info!("Chat exchange #{} answered", history.len());
            Staged::ok(reply)
        }
        Err(notice) => {
            history.append(utterance, FALLBACK_REPLY, true);
            Staged::degraded(FALLBACK_REPLY.to_string(), notice)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::scripted::ScriptedModel;
    use crate::llm_client::LlmError;
    use crate::outcome::NoticeKind;

    #[tokio::test]
    async fn test_each_submission_appends_one_pair_in_order() {
        let model = ScriptedModel::replying(["one", "two", "three"]);
        let mut history = ConversationHistory::new();

        for q in ["first?", "second?", "third?"] {
            respond(&model, &mut history, q, None).await;
        }

        assert_eq!(history.len(), 3);
        let order: Vec<_> = history.chronological().iter().map(|e| e.bot.as_str()).collect();
        assert_eq!(order, ["one", "two", "three"]);
        let shown: Vec<_> = history.most_recent_first().map(|e| e.user.as_str()).collect();
        assert_eq!(shown, ["third?", "second?", "first?"]);
    }

    #[tokio::test]
    async fn test_previous_exchanges_are_sent_as_context() {
        let model = ScriptedModel::replying(["Hi Sam", "Your name is Sam"]);
        let mut history = ConversationHistory::new();
        respond(&model, &mut history, "I'm Sam", None).await;
        respond(&model, &mut history, "What's my name?", None).await;

        let second = &model.requests()[1];
        assert_eq!(second.system.as_deref(), Some(CONVERSATION_SYSTEM));
        assert_eq!(
            second.turns,
            vec![
                Turn::user("I'm Sam"),
                Turn::model("Hi Sam"),
                Turn::user("What's my name?")
            ]
        );
    }

    #[tokio::test]
    async fn test_context_window_limits_replayed_pairs() {
        let model = ScriptedModel::replying(["a", "b", "c"]);
        let mut history = ConversationHistory::new();
        for q in ["q1", "q2", "q3"] {
            respond(&model, &mut history, q, Some(1)).await;
        }
        // third call sees only the second exchange plus the new question
        assert_eq!(model.requests()[2].turns.len(), 3);
        assert_eq!(model.requests()[2].turns[0], Turn::user("q2"));
    }

    #[tokio::test]
    async fn test_failure_still_records_the_exchange() {
        let model = ScriptedModel::new([Err(LlmError::Api {
            status: 503,
            message: "unavailable".to_string(),
        })]);
        let mut history = ConversationHistory::new();
        let staged = respond(&model, &mut history, "hello?", None).await;

        assert_eq!(staged.value, FALLBACK_REPLY);
        assert_eq!(staged.notice.unwrap().kind, NoticeKind::ServiceError);
        assert_eq!(history.len(), 1);
        assert!(history.chronological()[0].degraded);
    }
}
