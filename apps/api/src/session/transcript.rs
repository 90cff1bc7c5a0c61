use tracing::debug;

use crate::extract::{extract, ArtifactState, DelimiterPair};
use crate::models::message::{Message, Role};

/// Ordered accumulator for one conversation.
///
/// Two mutations only: `append` adds a finished entry, `update_last` grows
/// the most recent one (streamed assistant deltas). Nothing is ever removed
/// or reordered, so extraction over the joined text is reproducible at any
/// point in the conversation.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends `delta` to the content of the most recent message. On an
    /// empty transcript this is a no-op: a delta with no open message means
    /// the caller raced ahead, and dropping it is safer than inventing an
    /// entry with a made-up role.
    pub fn update_last(&mut self, delta: &str) {
        match self.messages.last_mut() {
            Some(message) => message.content.push_str(delta),
            None => debug!("update_last on empty transcript, dropping delta"),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// An owned copy of the current entries, detached from later mutations.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages().to_vec()
    }

    /// The full conversation as one searchable text, message contents joined
    /// with a single newline. Roles and timestamps deliberately do not
    /// appear: a marker split across two assistant messages still matches.
    pub fn joined_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Runs delimited-block extraction over the joined conversation text.
    pub fn extract_artifact(&self, delimiters: &DelimiterPair) -> ArtifactState {
        extract(&self.joined_text(), delimiters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> DelimiterPair {
        DelimiterPair::new("[RESUME_START]", "[RESUME_END]").unwrap()
    }

    fn assistant(content: &str) -> Message {
        Message::new(Role::Assistant, content)
    }

    fn user(content: &str) -> Message {
        Message::new(Role::User, content)
    }

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append(user("first"));
        transcript.append(assistant("second"));
        transcript.append(user("third"));

        let contents: Vec<_> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[test]
    fn test_update_last_grows_most_recent_entry() {
        let mut transcript = Transcript::new();
        transcript.append(user("question"));
        transcript.append(assistant("par"));
        transcript.update_last("tial");

        assert_eq!(transcript.messages()[0].content, "question");
        assert_eq!(transcript.messages()[1].content, "partial");
    }

    #[test]
    fn test_update_last_on_empty_transcript_is_noop() {
        let mut transcript = Transcript::new();
        transcript.update_last("orphan delta");
        assert!(transcript.messages().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_later_mutations() {
        let mut transcript = Transcript::new();
        transcript.append(assistant("before"));
        let snapshot = transcript.snapshot();
        transcript.update_last(" after");

        assert_eq!(snapshot[0].content, "before");
        assert_eq!(transcript.messages()[0].content, "before after");
    }

    #[test]
    fn test_joined_text_uses_single_newline() {
        let mut transcript = Transcript::new();
        transcript.append(user("a"));
        transcript.append(assistant("b"));
        assert_eq!(transcript.joined_text(), "a\nb");
    }

    #[test]
    fn test_extraction_spans_message_boundaries() {
        // Marker block opened in one assistant message, closed in a later
        // one. Joining with a newline must still surface the artifact.
        let mut transcript = Transcript::new();
        transcript.append(assistant("here we go [RESUME_START]\nJane Doe"));
        transcript.append(user("looks good"));
        transcript.append(assistant("Software Engineer\n[RESUME_END] done"));

        assert_eq!(
            transcript.extract_artifact(&markers()),
            ArtifactState::Available("Jane Doe\nlooks good\nSoftware Engineer".to_string())
        );
    }

    #[test]
    fn test_streaming_split_equivalence() {
        // Delivering a reply as one message or as an arbitrary sequence of
        // update_last deltas must produce the same extraction outcome. Split
        // at every char boundary, including mid-marker splits.
        let reply = "Sure!\n[RESUME_START]\nJane Doe\nSoftware Engineer\n[RESUME_END]\nAnything else?";

        let mut whole = Transcript::new();
        whole.append(assistant(reply));
        let expected = whole.extract_artifact(&markers());
        assert!(expected.is_available());

        let boundaries: Vec<usize> = reply.char_indices().map(|(i, _)| i).collect();
        for &split in &boundaries {
            let mut streamed = Transcript::new();
            streamed.append(assistant(""));
            streamed.update_last(&reply[..split]);
            streamed.update_last(&reply[split..]);
            assert_eq!(
                streamed.extract_artifact(&markers()),
                expected,
                "split at byte {split}"
            );
        }
    }

    #[test]
    fn test_interview_conversation_end_to_end() {
        // A realistic four-message interview: no artifact until the final
        // reply carries a complete marker pair.
        let mut transcript = Transcript::new();

        transcript.append(user("Hi, I need a resume"));
        assert_eq!(transcript.extract_artifact(&markers()), ArtifactState::Unavailable);

        transcript.append(assistant("Happy to help! What's your name and current role?"));
        assert_eq!(transcript.extract_artifact(&markers()), ArtifactState::Unavailable);

        transcript.append(user("Jane Doe, software engineer"));
        assert_eq!(transcript.extract_artifact(&markers()), ArtifactState::Unavailable);

        transcript.append(assistant(
            "Great, here is a first draft.\n[RESUME_START]\nJane Doe\nSoftware Engineer\n[RESUME_END]\nWant me to add a summary?",
        ));
        assert_eq!(
            transcript.extract_artifact(&markers()),
            ArtifactState::Available("Jane Doe\nSoftware Engineer".to_string())
        );
    }
}
