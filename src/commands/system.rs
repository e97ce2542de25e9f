use super::Flow;

pub fn handle_command(input: &str) -> Result<Flow, String> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("\n📄 Document Commands:");
            println!("  upload <file.pdf> [more.pdf ...]  - Index PDFs (replaces the current set)");
            println!("  reset                             - Forget documents and history");
            println!();

            println!("💬 Conversation:");
            println!("  Just type your question about the uploaded documents");
            println!("  history  - Show the conversation so far");
            println!();

            println!("⚙️ System Commands:");
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            println!();
            Ok(Flow::Continue)
        },
        "exit" | "quit" => {
            println!("👋 Goodbye!");
            Ok(Flow::Exit)
        },
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string())
    }
}
