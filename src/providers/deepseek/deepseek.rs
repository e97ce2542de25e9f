use async_trait::async_trait;
use anyhow::{Result, anyhow};
use crate::config::ProviderConfig;
use crate::llm::memory::ConversationTurn;
use crate::providers::traits::CompletionProvider;
use reqwest::Client;
use serde_json::{json, Value};

const DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";

/// Completion-only provider. Embeddings still come from OpenAI.
#[derive(Clone)]
pub struct DeepSeekProvider {
    api_key: String,
    system_message: String,
    client: Client,
    model: String,
    api_url: String,
    temperature: f32,
}

impl DeepSeekProvider {
    pub fn new(api_key: String, system_message: String, config: &ProviderConfig) -> Self {
        Self {
            api_key,
            system_message,
            client: Client::new(),
            model: config.chat_model.clone(),
            api_url: config
                .api_url
                .clone()
                .unwrap_or_else(|| DEEPSEEK_API_URL.to_string()),
            temperature: config.temperature,
        }
    }

    fn build_messages(&self, prompt: &str, history: &[ConversationTurn]) -> Vec<Value> {
        let mut messages = vec![json!({
            "role": "system",
            "content": self.system_message
        })];

        for turn in history {
            messages.push(json!({ "role": "user", "content": turn.question }));
            messages.push(json!({ "role": "assistant", "content": turn.answer }));
        }

        messages.push(json!({ "role": "user", "content": prompt }));
        messages
    }
}

#[async_trait]
impl CompletionProvider for DeepSeekProvider {
    async fn complete(&self, prompt: &str, history: &[ConversationTurn]) -> Result<String> {
        let response = self.client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": self.model,
                "messages": self.build_messages(prompt, history),
                "temperature": self.temperature
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("API request failed: Status {}, Body: {}", status, error_text));
        }

        let response_json: Value = response.json().await?;
        parse_completion(&response_json)
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok(self.model.clone())
    }
}

fn parse_completion(response_json: &Value) -> Result<String> {
    if let Some(error) = response_json.get("error") {
        return Err(anyhow!("API returned error: {}", error));
    }

    response_json
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            let debug_json = serde_json::to_string_pretty(response_json).unwrap_or_default();
            anyhow!("Invalid response format. Response JSON: {}", debug_json)
        })
}
