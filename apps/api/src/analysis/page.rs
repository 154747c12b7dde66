//! The single HTML page, rendered with Askama.

use askama::Template;

use crate::analysis::Feedback;

pub const EMPTY_UPLOAD_WARNING: &str = "Please upload a resume to proceed.";

#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct IndexPage {
    /// Echoed back into the role input after a submit.
    pub job_role: String,
    /// Human-readable upload limit, e.g. `10MB`.
    pub upload_limit: String,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub feedback: Option<Feedback>,
}

impl IndexPage {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self {
            upload_limit: format_upload_limit(max_upload_bytes),
            ..Default::default()
        }
    }

    pub fn with_job_role(mut self, job_role: Option<&str>) -> Self {
        self.job_role = job_role.unwrap_or_default().to_string();
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = Some(feedback);
        self
    }
}

const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

/// Rounds up, in MB from 1 MiB and in KB below that.
pub fn format_upload_limit(bytes: usize) -> String {
    if bytes >= MIB {
        format!("{}MB", bytes.div_ceil(MIB))
    } else {
        format!("{}KB", bytes.div_ceil(KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_page() {
        let html = IndexPage::new(10 * 1024 * 1024).render().unwrap();
        assert!(html.contains("Smart Resume Analyzer"));
        assert!(html.contains("About the Project"));
        assert!(html.contains("Limit 10MB"));
        assert!(html.contains(r#"accept=".pdf,.txt""#));
        assert!(!html.contains("Analysis Complete!"));
    }

    #[test]
    fn test_warning_banner() {
        let html = IndexPage::new(1024 * 1024)
            .with_warning(EMPTY_UPLOAD_WARNING)
            .render()
            .unwrap();
        assert!(html.contains(EMPTY_UPLOAD_WARNING));
    }

    #[test]
    fn test_feedback_is_inserted_unescaped_but_role_is_escaped() {
        let feedback = Feedback {
            feedback: "### Summary".to_string(),
            feedback_html: "<h3>Summary</h3>".to_string(),
            model: "stub-model".to_string(),
            job_role: "General / Not specified".to_string(),
        };
        let html = IndexPage::new(1024 * 1024)
            .with_job_role(Some("<b>Chef</b>"))
            .with_feedback(feedback)
            .render()
            .unwrap();
        assert!(html.contains("Analysis Complete!"));
        assert!(html.contains("<h3>Summary</h3>"));
        assert!(html.contains("&lt;b&gt;Chef"));
        assert!(!html.contains("<b>Chef"));
    }

    #[test]
    fn test_upload_limit_label() {
        assert_eq!(format_upload_limit(10 * 1024 * 1024), "10MB");
        assert_eq!(format_upload_limit(10 * 1024 * 1024 + 1), "11MB");
        assert_eq!(format_upload_limit(1024 * 1024), "1MB");
        assert_eq!(format_upload_limit(512 * 1024), "512KB");
        assert_eq!(format_upload_limit(1500), "2KB");
    }

    #[test]
    fn test_small_limit_is_not_zero() {
        let html = IndexPage::new(1024).render().unwrap();
        assert!(html.contains("Limit 1KB"));
        assert!(!html.contains("Limit 0MB"));
    }
}
