#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use pdf_chat_agent::providers::traits::{CompletionProvider, EmbeddingProvider};
use pdf_chat_agent::providers::utils::HashingEmbedder;
use pdf_chat_agent::{ConversationTurn, Document, PipelineServices, PipelineSettings, Session};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Builds a PDF with one page per entry of `pages`; each line of a page is
/// written as its own text object.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_text in pages {
        let mut operations = Vec::new();
        for (i, line) in page_text.lines().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![72.into(), (720 - 14 * i as i64).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn pdf_document(name: &str, pages: &[&str]) -> Document {
    Document::new(name, pdf_with_pages(pages))
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub history: Vec<ConversationTurn>,
}

/// Answers "answer #n" and remembers every call it receives.
#[derive(Clone, Default)]
pub struct RecordingCompletion {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    pub fail: Arc<AtomicBool>,
}

impl RecordingCompletion {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CompletionProvider for RecordingCompletion {
    async fn complete(&self, prompt: &str, history: &[ConversationTurn]) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("completion quota exceeded"));
        }
        let mut calls = self.calls.lock().unwrap();
        calls.push(RecordedCall {
            prompt: prompt.to_string(),
            history: history.to_vec(),
        });
        Ok(format!("answer #{}", calls.len()))
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok("recording".to_string())
    }
}

/// Hashing embedder that can be switched into a failing mode and counts
/// remote calls.
#[derive(Clone, Default)]
pub struct SwitchableEmbedder {
    inner: HashingEmbedder,
    pub fail: Arc<AtomicBool>,
    pub batch_calls: Arc<AtomicUsize>,
}

impl SwitchableEmbedder {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmbeddingProvider for SwitchableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("embedding service unavailable"));
        }
        Ok(self.inner.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("embedding service unavailable"));
        }
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.inner.embed_text(t)).collect())
    }

    fn model_name(&self) -> String {
        "switchable".to_string()
    }
}

pub struct Harness {
    pub session: Session,
    pub completion: RecordingCompletion,
    pub embedder: SwitchableEmbedder,
}

pub fn harness(settings: PipelineSettings) -> Harness {
    let completion = RecordingCompletion::default();
    let embedder = SwitchableEmbedder::default();
    let services = PipelineServices {
        embedder: Arc::new(embedder.clone()),
        completion: Arc::new(completion.clone()),
    };
    let session = Session::new(services, settings).unwrap();
    Harness { session, completion, embedder }
}
