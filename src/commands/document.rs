use crate::document::Document;
use crate::session::Session;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// `upload <path>...`: reads every file, then ingests them as one batch.
pub async fn handle_upload(args: &[&str], session: &mut Session) -> Result<(), String> {
    if args.is_empty() {
        return Err("Usage: upload <file.pdf> [more.pdf ...]".to_string());
    }

    let mut documents = Vec::with_capacity(args.len());
    for path in args {
        let document = Document::from_path(Path::new(path))
            .await
            .map_err(|e| e.to_string())?;
        documents.push(document);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .map_err(|e| e.to_string())?);
    pb.set_message(format!("Indexing {} document(s)", documents.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = session.ingest(documents).await;
    pb.finish_and_clear();

    let summary = result.map_err(|e| e.to_string())?;
    println!(
        "📚 Indexed {} into {} chunks ({} characters)",
        summary.documents.join(", ").bright_yellow(),
        summary.chunks.to_string().cyan(),
        summary.characters.to_string().cyan()
    );
    println!("💭 You can now ask questions about the documents.");
    Ok(())
}
