//! Axum route handlers for the analyzer page and API.

use askama::Template;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::{info, warn};

use crate::analysis::page::{IndexPage, EMPTY_UPLOAD_WARNING};
use crate::analysis::{analyze_resume, Feedback};
use crate::errors::AppError;
use crate::extract::ResumeUpload;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_ROLE_FIELD: &str = "job_role";

/// What the browser submitted. Either field may be missing.
#[derive(Debug, Default)]
pub struct AnalysisForm {
    pub upload: Option<ResumeUpload>,
    pub job_role: Option<String>,
}

/// Reads the `resume` file part and the `job_role` text part.
/// Unknown parts are skipped. A file input left empty by the browser counts as no upload.
pub async fn read_analysis_form(mut multipart: Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().map(str::to_string).filter(|n| !n.is_empty());
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;

                if file_name.is_none() && data.is_empty() {
                    continue;
                }
                form.upload = Some(ResumeUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some(JOB_ROLE_FIELD) => {
                let role = field.text().await.map_err(multipart_error)?;
                form.job_role = Some(role).filter(|r| !r.trim().is_empty());
            }
            other => warn!("Ignoring unexpected form field {:?}", other),
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("The uploaded file exceeds the size limit.".to_string())
    } else {
        AppError::Validation(format!("Invalid form submission: {}", err.body_text()))
    }
}

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(IndexPage::new(state.config.max_upload_bytes).render()?))
}

/// POST /analyze
///
/// Form target of the page. Always answers with the page; failures become
/// a banner and the matching status code.
pub async fn handle_analyze_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Html<String>), AppError> {
    let page = IndexPage::new(state.config.max_upload_bytes);

    let form = match read_analysis_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            return Ok((e.status_code(), Html(page.with_error(e.user_message()).render()?)));
        }
    };
    let page = page.with_job_role(form.job_role.as_deref());

    let Some(upload) = form.upload else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Html(page.with_warning(EMPTY_UPLOAD_WARNING).render()?),
        ));
    };

    match analyze_resume(upload, form.job_role.as_deref(), state.model.as_ref()).await {
        Ok(feedback) => Ok((StatusCode::OK, Html(page.with_feedback(feedback).render()?))),
        Err(e) => {
            info!("Analysis failed: {e}");
            Ok((e.status_code(), Html(page.with_error(e.user_message()).render()?)))
        }
    }
}

/// POST /api/v1/analyze
///
/// Same pipeline as the form, answered as JSON.
pub async fn handle_analyze_api(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Feedback>, AppError> {
    let form = read_analysis_form(multipart).await?;
    let upload = form
        .upload
        .ok_or_else(|| AppError::Validation(EMPTY_UPLOAD_WARNING.to_string()))?;

    let feedback = analyze_resume(upload, form.job_role.as_deref(), state.model.as_ref()).await?;
    Ok(Json(feedback))
}
