use async_trait::async_trait;
use anyhow::{Result, anyhow};
use crate::config::ProviderConfig;
use crate::llm::memory::ConversationTurn;
use crate::providers::traits::{CompletionProvider, EmbeddingProvider};
use async_openai::{
    types::{
        ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
        CreateEmbeddingRequestArgs,
        EmbeddingInput,
    },
    Client,
    config::OpenAIConfig,
};
use tracing::debug;

#[derive(Clone)]
pub struct OpenAIProvider {
    system_message: String,
    client: Client<OpenAIConfig>,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
}

impl OpenAIProvider {
    pub fn new(api_key: String, system_message: String, config: &ProviderConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = &config.api_url {
            openai_config = openai_config.with_api_base(api_base.clone());
        }

        Self {
            system_message,
            client: Client::with_config(openai_config),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
        }
    }

    fn build_messages(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(history.len() * 2 + 2);

        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_message.clone())
                .build()?
                .into(),
        );

        for turn in history {
            messages.push(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.question.clone())
                    .build()?
                    .into(),
            );
            messages.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.answer.clone())
                    .build()?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()?
                .into(),
        );

        Ok(messages)
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str, history: &[ConversationTurn]) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .temperature(self.temperature)
            .messages(self.build_messages(prompt, history)?)
            .build()?;

        debug!(model = %self.chat_model, turns = history.len(), "requesting chat completion");
        let response = self.client.chat().create(request).await?;

        response.choices.first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("No response content"))
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok(self.chat_model.clone())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.embedding_model)
            .input(EmbeddingInput::String(text.to_string()))
            .build()?;

        let response = self.client.embeddings().create(request).await?;

        if let Some(embedding) = response.data.into_iter().next() {
            Ok(embedding.embedding)
        } else {
            Err(anyhow!("No embedding returned from OpenAI"))
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.embedding_model)
            .input(EmbeddingInput::StringArray(texts.to_vec()))
            .build()?;

        debug!(model = %self.embedding_model, inputs = texts.len(), "requesting embeddings");
        let response = self.client.embeddings().create(request).await?;

        // The API may return entries out of order; `index` ties each back to its input.
        let mut data = response.data;
        data.sort_by_key(|embedding| embedding.index);

        if data.len() != texts.len() {
            return Err(anyhow!(
                "OpenAI returned {} embeddings for {} inputs",
                data.len(),
                texts.len()
            ));
        }

        Ok(data.into_iter().map(|embedding| embedding.embedding).collect())
    }

    fn model_name(&self) -> String {
        self.embedding_model.clone()
    }
}
