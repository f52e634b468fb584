//! Server-rendered HTML pages
//!
//! Plain `format!` templates around a shared layout. Every value that
//! came from a user or a session goes through `html_escape` first.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use lpal_common::{FlashMessage, VocabularyList};

/// Navigation entries: (path, label)
const NAV: [(&str, &str); 3] = [("/", "Home"), ("/chat", "Chat"), ("/vocabulary", "Vocabulary")];

fn build_info() -> String {
    let git_hash = env!("GIT_HASH");
    format!(
        "lpal-web v{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        git_hash.get(..8).unwrap_or(git_hash),
        env!("BUILD_PROFILE")
    )
}

fn render_flashes(flashes: &[FlashMessage]) -> String {
    flashes
        .iter()
        .map(|flash| {
            format!(
                r#"<div class="flash flash-{}" role="alert">{}</div>"#,
                attr(&flash.category),
                text(&flash.message)
            )
        })
        .collect()
}

fn language_options(languages: &[&str], selected: Option<&str>) -> String {
    languages
        .iter()
        .map(|lang| {
            let marker = if Some(*lang) == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                attr(lang),
                marker,
                text(lang)
            )
        })
        .collect()
}

/// Shared page chrome
///
/// `active` is the nav path to highlight; `scripts` are appended before
/// `</body>`.
fn layout(title: &str, active: &str, flashes: &[FlashMessage], body: &str, scripts: &[&str]) -> String {
    let nav: String = NAV
        .iter()
        .map(|(path, label)| {
            let class = if *path == active { r#" class="active""# } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, path, class, label)
        })
        .collect();
    let scripts: String = scripts
        .iter()
        .map(|src| format!(r#"<script src="{}"></script>"#, src))
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="theme-color" content="#2b6cb0">
    <title>{title} - LanguagePal</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <header>
        <div class="header-content">
            <a class="brand" href="/">LanguagePal</a>
            <nav>{nav}</nav>
        </div>
    </header>
    <main class="container">
        {flashes}
        {body}
    </main>
    <footer><span class="build-info">{build}</span></footer>
    <script>
        if ('serviceWorker' in navigator) {{
            navigator.serviceWorker.register('/service-worker.js').catch(function (err) {{
                console.warn('Service worker registration failed', err);
            }});
        }}
    </script>
    {scripts}
</body>
</html>"##,
        title = text(title),
        nav = nav,
        flashes = render_flashes(flashes),
        body = body,
        build = text(&build_info()),
        scripts = scripts,
    )
}

/// GET /
pub fn home(flashes: &[FlashMessage]) -> String {
    let body = r#"
        <section class="hero">
            <h1>Practice a language by talking about it</h1>
            <p>Chat with an AI tutor, get your sentences corrected as you go, and
               steer the conversation toward the vocabulary you are learning.</p>
            <p>
                <a class="button" href="/chat">Start chatting</a>
                <a class="button secondary" href="/vocabulary">Manage vocabulary</a>
            </p>
        </section>
        <section class="features">
            <div><h3>Corrections</h3><p>Every message is checked for grammar and word choice.</p></div>
            <div><h3>Breakdowns</h3><p>Ask for a translation and word-by-word analysis of any reply.</p></div>
            <div><h3>Your words</h3><p>Pick a vocabulary list and the tutor will favour those words.</p></div>
        </section>"#;
    layout("Home", "/", flashes, body, &[])
}

/// GET /chat
pub fn chat(flashes: &[FlashMessage], languages: &[&str], lists: &[VocabularyList]) -> String {
    let vocabulary_options: String = lists
        .iter()
        .map(|list| {
            format!(
                r#"<option value="{}" data-language="{}">{} ({})</option>"#,
                list.id,
                attr(&list.language),
                text(&list.name),
                text(&list.language)
            )
        })
        .collect();

    let body = format!(
        r#"
        <section class="chat-controls">
            <label>Language
                <select id="language-select">{languages}</select>
            </label>
            <label>Vocabulary
                <select id="vocabulary-select">
                    <option value="">No restriction</option>
                    {vocabulary}
                </select>
            </label>
            <button type="button" id="reset-chat" class="secondary">New conversation</button>
        </section>
        <section id="chat-messages" class="chat-messages" aria-live="polite"></section>
        <form id="chat-form" class="chat-form" autocomplete="off">
            <input type="text" id="chat-input" placeholder="Type your message..." required>
            <button type="submit">Send</button>
        </form>
        <aside id="analysis-panel" class="analysis-panel" hidden>
            <button type="button" id="close-analysis" class="secondary">Close</button>
            <div id="analysis-content"></div>
        </aside>"#,
        languages = language_options(languages, None),
        vocabulary = vocabulary_options,
    );
    layout("Chat", "/chat", flashes, &body, &["/static/chat.js"])
}

/// GET /vocabulary
pub fn vocabulary(flashes: &[FlashMessage], languages: &[&str], lists: &[VocabularyList]) -> String {
    let saved = if lists.is_empty() {
        r#"<p class="empty">No vocabulary lists yet.</p>"#.to_string()
    } else {
        let rows: String = lists
            .iter()
            .map(|list| {
                format!(
                    r#"<li class="vocabulary-item" data-id="{id}">
                    <div><strong>{name}</strong> <span class="tag">{language}</span>
                        <span class="count">{count} words</span></div>
                    <div class="actions">
                        <a class="button secondary" href="/vocabulary/edit/{id}">Edit</a>
                        <button type="button" class="danger delete-vocabulary" data-id="{id}">Delete</button>
                    </div>
                </li>"#,
                    id = list.id,
                    name = text(&list.name),
                    language = text(&list.language),
                    count = list.words.len(),
                )
            })
            .collect();
        format!(r#"<ul class="vocabulary-lists">{}</ul>"#, rows)
    };

    let body = format!(
        r#"
        <h1>Vocabulary lists</h1>
        <form method="post" action="/vocabulary" class="vocabulary-form">
            <label>Name <input type="text" name="name" required></label>
            <label>Language <select name="language" id="vocabulary-language">{languages}</select></label>
            <label>Words <small>(one per line or comma separated)</small>
                <textarea name="vocabulary" id="vocabulary-text" rows="10"></textarea>
            </label>
            <div class="form-actions">
                <button type="button" id="load-examples" class="secondary">Load examples</button>
                <button type="submit">Save list</button>
            </div>
        </form>
        <h2>Saved lists</h2>
        {saved}"#,
        languages = language_options(languages, None),
        saved = saved,
    );
    layout("Vocabulary", "/vocabulary", flashes, &body, &["/static/vocabulary.js"])
}

/// GET /vocabulary/edit/:id
pub fn edit_vocabulary(flashes: &[FlashMessage], languages: &[&str], list: &VocabularyList) -> String {
    let body = format!(
        r#"
        <h1>Edit vocabulary list</h1>
        <form method="post" action="/vocabulary/edit/{id}" class="vocabulary-form">
            <label>Name <input type="text" name="name" value="{name}" required></label>
            <label>Language <select name="language">{languages}</select></label>
            <label>Words <small>(one per line or comma separated)</small>
                <textarea name="vocabulary" rows="12">{words}</textarea>
            </label>
            <div class="form-actions">
                <a class="button secondary" href="/vocabulary">Cancel</a>
                <button type="submit">Update list</button>
            </div>
        </form>"#,
        id = list.id,
        name = attr(&list.name),
        languages = language_options(languages, Some(&list.language)),
        words = text(&list.words_text()),
    );
    layout("Edit vocabulary", "/vocabulary", flashes, &body, &[])
}

/// GET /offline
pub fn offline() -> String {
    let body = r#"
        <section class="offline">
            <h1>You are offline</h1>
            <p>LanguagePal needs a connection to reach the tutor. Check your
               network and try again.</p>
            <p><a class="button" href="/">Retry</a></p>
        </section>"#;
    layout("Offline", "", &[], body, &[])
}
