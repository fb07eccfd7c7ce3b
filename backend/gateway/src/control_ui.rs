//! Chat page: server-rendered HTML for the web UI.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use codelens_agent::{ChatSession, EXTRACTED_PREFIX};
use codelens_core::{EntryContent, Role};
use codelens_markdown::{Renderer, fenced};
use codelens_media::{UploadPolicy, sniff_image_mime};
use serde::Deserialize;
use tracing::{info, warn};

use crate::attachments::read_submit_form;
use crate::server::GatewayState;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 260px; background: #f4f5f7; padding: 1rem; box-sizing: border-box; }
main { flex: 1; padding: 1.5rem 2rem; max-width: 960px; }
.ask { display: flex; gap: .5rem; align-items: center; }
.ask input[type=text] { flex: 4; padding: .5rem; }
.entry { margin: .75rem 0; }
.notice { padding: .5rem .75rem; border-radius: 4px; background: #e6f4ea; }
.notice.error { background: #fce8e6; }
.empty { color: #555; background: #e8f0fe; padding: .5rem .75rem; border-radius: 4px; }
figure { margin: .5rem 0; }
figcaption { font-size: .8rem; color: #555; }
pre { background: #1e1e1e; color: #d4d4d4; padding: .75rem; overflow-x: auto; }
"#;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub notice: Option<String>,
}

/// A one-line message above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// `GET /`
pub async fn index(State(state): State<GatewayState>, Query(query): Query<PageQuery>) -> Html<String> {
    let notice = match query.notice.as_deref() {
        Some("cleared") => Some(Notice::Success("History cleared!".to_string())),
        _ => None,
    };
    let session = state.session.lock().await;
    Html(render_page(&session, &state.uploads, notice.as_ref()))
}

/// `POST /submit`: run one turn, then redirect back to the page.
pub async fn submit(State(state): State<GatewayState>, multipart: Multipart) -> Response {
    let submission = match read_submit_form(multipart)
        .await
        .and_then(|form| form.into_submission(&state.uploads))
    {
        Ok(submission) => submission,
        Err(e) => {
            warn!(error = %e, "Rejected submit form");
            let session = state.session.lock().await;
            let page = render_page(&session, &state.uploads, Some(&Notice::Error(e.to_string())));
            return (StatusCode::BAD_REQUEST, Html(page)).into_response();
        }
    };

    let mut session = state.session.lock().await;
    let outcome = state.agent.submit(&mut session, submission).await;
    info!(appended = outcome.appended, model_called = outcome.model_called, "Turn finished");

    Redirect::to("/").into_response()
}

/// `POST /clear-history`: empties the sidebar only.
pub async fn clear_history(State(state): State<GatewayState>) -> Redirect {
    let mut session = state.session.lock().await;
    state.agent.clear_history(&mut session);
    Redirect::to("/?notice=cleared")
}

/// Render the whole page for the current session.
pub fn render_page(session: &ChatSession, uploads: &UploadPolicy, notice: Option<&Notice>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<title>CodeLens</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body>");

    render_sidebar(&mut html, session);

    html.push_str("<main><h1>🤖 CodeLens</h1><h4>Ask or Upload:</h4>");
    if let Some(notice) = notice {
        let (class, text) = match notice {
            Notice::Success(text) => ("notice", text),
            Notice::Error(text) => ("notice error", text),
        };
        html.push_str(&format!("<p class=\"{class}\">{}</p>", Renderer::escape(text)));
    }
    html.push_str(&format!(
        concat!(
            "<form class=\"ask\" method=\"post\" action=\"/submit\" enctype=\"multipart/form-data\">",
            "<input type=\"text\" name=\"question\" placeholder=\"Type your question here...\">",
            "<input type=\"file\" name=\"image\" accept=\"{accept}\">",
            "<button type=\"submit\">Send 🚀</button></form>"
        ),
        accept = Renderer::escape(&uploads.accept_attr())
    ));

    html.push_str("<hr><h3>💬 Conversation</h3>");
    render_conversation(&mut html, session);

    html.push_str("</main></body></html>");
    html
}

fn render_sidebar(html: &mut String, session: &ChatSession) {
    html.push_str("<aside><h2>📝 Chat History</h2>");

    let history = session.history();
    if history.is_empty() {
        html.push_str("<p class=\"empty\">No chat history yet.</p>");
    }
    // Newest first; images are numbered by their position in the sidebar list.
    for (idx, item) in history.iter().enumerate().rev() {
        match &item.content {
            EntryContent::Text(question) => {
                html.push_str("<div class=\"entry\">");
                html.push_str(&Renderer::to_html(&format!("**Q:** {question}")));
                html.push_str("</div>");
            }
            EntryContent::Image(bytes) => {
                push_figure(html, bytes, &format!("Image {}", idx + 1), 120);
            }
        }
    }

    html.push_str(concat!(
        "<form method=\"post\" action=\"/clear-history\">",
        "<button type=\"submit\">Clear History</button></form></aside>"
    ));
}

fn render_conversation(html: &mut String, session: &ChatSession) {
    let conversation = session.conversation();
    if conversation.is_empty() {
        html.push_str(
            "<p class=\"empty\">No conversation yet. Please ask something or upload an image.</p>",
        );
        return;
    }

    for entry in conversation {
        match (entry.role, &entry.content) {
            (Role::User, EntryContent::Text(text)) => {
                push_markdown(html, &format!("**You:** {text}"));
            }
            (Role::User, EntryContent::Image(bytes)) => {
                push_figure(html, bytes, "You uploaded:", 230);
            }
            (Role::Bot, EntryContent::Text(text)) => match text.strip_prefix(EXTRACTED_PREFIX) {
                Some(code) => push_markdown(
                    html,
                    &format!("**Bot:** {}\n\n{}", EXTRACTED_PREFIX.trim_end(), fenced(code)),
                ),
                None => push_markdown(html, &format!("**Bot:** {text}")),
            },
            (Role::Bot, EntryContent::Image(bytes)) => {
                push_figure(html, bytes, "Bot:", 230);
            }
        }
    }
}

fn push_markdown(html: &mut String, markdown: &str) {
    html.push_str("<div class=\"entry\">");
    html.push_str(&Renderer::to_html(markdown));
    html.push_str("</div>");
}

fn push_figure(html: &mut String, bytes: &[u8], caption: &str, width: u32) {
    html.push_str(&format!(
        "<figure class=\"entry\"><img src=\"{}\" width=\"{width}\" alt=\"{caption}\"><figcaption>{caption}</figcaption></figure>",
        data_uri(bytes),
        caption = Renderer::escape(caption),
    ));
}

/// Inline an image as a `data:` URI.
pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_image_mime(bytes), STANDARD.encode(bytes))
}
