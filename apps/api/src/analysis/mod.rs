// Resume analysis: extract text, build the review prompt, ask the model once.
// All model calls go through llm_client::FeedbackModel.

pub mod handlers;
pub mod page;
pub mod prompts;

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use tracing::info;

use crate::analysis::prompts::{build_review_prompt, target_role_label};
use crate::errors::AppError;
use crate::extract::{extract_text, ResumeUpload};
use crate::llm_client::FeedbackModel;

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    /// Markdown exactly as the model returned it.
    pub feedback: String,
    pub feedback_html: String,
    pub model: String,
    pub job_role: String,
}

pub async fn analyze_resume(
    upload: ResumeUpload,
    job_role: Option<&str>,
    model: &dyn FeedbackModel,
) -> Result<Feedback, AppError> {
    let format = upload.format()?;
    info!(
        "Analyzing {} resume ({} bytes, role: {})",
        format.as_str(),
        upload.data.len(),
        target_role_label(job_role)
    );

    let resume_text = tokio::task::spawn_blocking(move || extract_text(&upload))
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("Text extraction panicked")))??;

    let prompt = build_review_prompt(&resume_text, job_role);
    let feedback = model
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    info!(
        "Analysis complete: {} chars of feedback from {}",
        feedback.chars().count(),
        model.model_name()
    );

    Ok(Feedback {
        feedback_html: render_markdown(&feedback),
        feedback,
        model: model.model_name().to_string(),
        job_role: target_role_label(job_role).to_string(),
    })
}

/// Renders CommonMark (with tables and strikethrough) to HTML.
/// Raw HTML in the source is escaped rather than passed through, and links or
/// images pointing anywhere but http(s), mailto or a relative path keep only their text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    // One entry per open link/image: true when its tags were dropped.
    let mut dropped: Vec<bool> = Vec::new();
    let parser = Parser::new_ext(markdown, options).filter_map(move |event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link { ref dest_url, .. })
        | Event::Start(Tag::Image { ref dest_url, .. }) => {
            let safe = is_safe_url(dest_url);
            dropped.push(!safe);
            safe.then_some(event)
        }
        Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
            if dropped.pop().unwrap_or(false) {
                None
            } else {
                Some(event)
            }
        }
        other => Some(other),
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn is_safe_url(url: &str) -> bool {
    // Browsers ignore embedded whitespace and control characters in schemes.
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
        Some(i) if normalized[i..].starts_with(':') => {
            matches!(&normalized[..i], "http" | "https" | "mailto")
        }
        _ => true,
    }
}
