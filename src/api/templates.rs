use crate::llm::ConversationTurn;

pub const CSS: &str = r#"<style>
body { font-family: sans-serif; margin: 0; display: flex; min-height: 100vh; background: #f5f6f8; }
.sidebar { width: 18rem; padding: 1.5rem; background: #262730; color: #fafafa; }
.sidebar h3 { margin-top: 0; }
.main { flex: 1; padding: 2rem 3rem; max-width: 52rem; }
.status { font-size: 0.85rem; color: #9aa0a6; margin-top: 1rem; }
.question-form input[type=text] { width: 80%; padding: 0.6rem; font-size: 1rem; }
.chat-message { padding: 1.25rem; border-radius: 0.5rem; margin-bottom: 1rem; display: flex; }
.chat-message.user { background-color: #2b313e; }
.chat-message.bot { background-color: #475063; }
.chat-message .avatar { width: 12%; font-size: 2rem; }
.chat-message .message { width: 88%; padding: 0 1.25rem; color: #fff; white-space: pre-wrap; }
.error { padding: 1rem; background: #fdecea; color: #611a15; border-radius: 0.5rem; }
</style>"#;

pub const USER_TEMPLATE: &str = r#"<div class="chat-message user">
    <div class="avatar">&#128100;</div>
    <div class="message">{{MSG}}</div>
</div>"#;

pub const BOT_TEMPLATE: &str = r#"<div class="chat-message bot">
    <div class="avatar">&#129302;</div>
    <div class="message">{{MSG}}</div>
</div>"#;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Alternates user and bot bubbles, oldest turn first.
pub fn render_history(turns: &[ConversationTurn]) -> String {
    let mut html = String::new();
    for turn in turns {
        html.push_str(&USER_TEMPLATE.replace("{{MSG}}", &escape_html(&turn.question)));
        html.push_str(&BOT_TEMPLATE.replace("{{MSG}}", &escape_html(&turn.answer)));
    }
    html
}

pub fn render_page(turns: &[ConversationTurn], status: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>PDF Chat</title>{css}</head>
<body>
<div class="sidebar">
    <h3>Documents</h3>
    <form action="/upload" method="post" enctype="multipart/form-data">
        <input type="file" name="files" accept="application/pdf" multiple>
        <p><button type="submit">Upload</button></p>
    </form>
    <div class="status">{status}</div>
</div>
<div class="main">
    <h1>Ask your PDFs</h1>
    <form class="question-form" action="/ask" method="post">
        <input type="text" name="question" placeholder="Ask a question about your documents" autofocus>
        <button type="submit">Ask</button>
    </form>
    <div class="history">{history}</div>
</div>
</body>
</html>"#,
        css = CSS,
        status = escape_html(status),
        history = render_history(turns),
    )
}

pub fn render_error(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>PDF Chat</title>{css}</head>
<body>
<div class="main">
    <div class="error">{message}</div>
    <p><a href="/">Back</a></p>
</div>
</body>
</html>"#,
        css = CSS,
        message = escape_html(message),
    )
}
