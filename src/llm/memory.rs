use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        }
    }
}

/// Ordered chat history for one session. Turns are only ever appended.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    turns: Vec<ConversationTurn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Renders the history as alternating `Human:`/`Assistant:` lines.
    pub fn transcript(&self) -> String {
        let mut transcript = String::new();
        for turn in &self.turns {
            transcript.push_str(&format!("Human: {}\nAssistant: {}\n", turn.question, turn.answer));
        }
        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order() {
        let mut memory = ConversationMemory::new();
        memory.record(ConversationTurn::new("first?", "one"));
        memory.record(ConversationTurn::new("second?", "two"));

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.turns()[0].question, "first?");
        assert_eq!(memory.turns()[1].answer, "two");
        assert_eq!(
            memory.transcript(),
            "Human: first?\nAssistant: one\nHuman: second?\nAssistant: two\n"
        );

        memory.clear();
        assert!(memory.is_empty());
    }
}
