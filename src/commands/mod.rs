use colored::Colorize;
use crate::session::Session;

mod document;
mod system;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Dispatches REPL lines: commands first, anything else is a question.
pub struct CommandHandler {
    session: Session,
}

impl CommandHandler {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    #[cfg(test)]
    fn session(&self) -> &Session {
        &self.session
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<Flow, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }

        match input.to_lowercase().as_str() {
            "help" | "exit" | "quit" => return system::handle_command(input),
            "history" => {
                self.print_history();
                return Ok(Flow::Continue);
            }
            "reset" => {
                self.session.reset();
                println!("🧹 Documents and conversation cleared");
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts[0].eq_ignore_ascii_case("upload") {
            document::handle_upload(&parts[1..], &mut self.session).await?;
            return Ok(Flow::Continue);
        }

        self.handle_question(input).await?;
        Ok(Flow::Continue)
    }

    async fn handle_question(&mut self, question: &str) -> Result<(), String> {
        let answer = self.session.ask(question).await.map_err(|e| e.to_string())?;
        println!("{}", answer.truecolor(255, 236, 179));
        println!();
        Ok(())
    }

    fn print_history(&self) {
        let turns = self.session.history();
        if turns.is_empty() {
            println!("No conversation yet.");
            return;
        }
        for turn in turns {
            println!("👤 {}", turn.question.bright_cyan());
            println!("🤖 {}", turn.answer.bright_green());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineSettings;
    use crate::llm::ConversationTurn;
    use crate::providers::traits::CompletionProvider;
    use crate::providers::utils::HashingEmbedder;
    use crate::session::PipelineServices;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Arc;

    #[derive(Clone)]
    struct CannedProvider;

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(&self, _prompt: &str, _history: &[ConversationTurn]) -> Result<String> {
            Ok("canned".to_string())
        }

        async fn get_model_info(&self) -> Result<String> {
            Ok("canned".to_string())
        }
    }

    fn handler() -> CommandHandler {
        let services = PipelineServices {
            embedder: Arc::new(HashingEmbedder::default()),
            completion: Arc::new(CannedProvider),
        };
        CommandHandler::new(Session::new(services, PipelineSettings::default()).unwrap())
    }

    #[tokio::test]
    async fn test_exit_and_help() {
        let mut handler = handler();
        assert_eq!(handler.handle_command("help").await, Ok(Flow::Continue));
        assert_eq!(handler.handle_command("EXIT").await, Ok(Flow::Exit));
    }

    #[tokio::test]
    async fn test_question_without_documents_fails() {
        let mut handler = handler();
        let err = handler.handle_command("what is in the file?").await.unwrap_err();
        assert!(err.contains("No documents"));
        assert!(handler.session().history().is_empty());
    }

    #[tokio::test]
    async fn test_upload_requires_paths() {
        let mut handler = handler();
        assert!(handler.handle_command("upload").await.is_err());
        assert!(handler.handle_command("upload /no/such/file.pdf").await.is_err());
        assert!(!handler.session().is_ready());
    }
}
