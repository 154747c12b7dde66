// Resume review prompt.
// The wording and section layout are fixed; only the role and resume text vary.

/// Used when no target role was given.
pub const GENERAL_ROLE: &str = "General / Not specified";

/// The role as it appears in the prompt: the trimmed input, or the fallback.
pub fn target_role_label(job_role: Option<&str>) -> &str {
    job_role
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .unwrap_or(GENERAL_ROLE)
}

pub fn build_review_prompt(resume_text: &str, job_role: Option<&str>) -> String {
    let role = target_role_label(job_role);
    format!(
        r#"
You are an Expert Resume Reviewer and Advanced Applicant Tracking System (ATS).
Your task is to analyze the following resume in detail and provide constructive, professional, and structured feedback.

Target Job Role (if any): {role}

Please evaluate the resume based on the following criteria:
1. ATS Compatibility & Formatting
2. Content Clarity and Impact (use of action-oriented language)
3. Measurable Achievements (quantifiable metrics)
4. Skills Presentation (alignment with the target role)
5. Experience Descriptions

Provide the analysis in the following structured format using Markdown:

### 📊 Executive Summary
[A brief 2-3 sentence overview of the resume's overall quality and immediate impression.]

### 🤖 ATS Compatibility
[Assessment of how well this resume would pass through an ATS. Identify any formatting or keyword issues.]

### ⭐ Key Strengths
[Bullet points highlighting what the candidate has done well (e.g., strong action verbs, clear formatting).]

### 📉 Areas for Improvement
[Specific, constructive points on what is lacking. E.g., missing metrics, vague bullet points, irrelevant skills.]

### 🛠️ Actionable Recommendations
[Step-by-step suggestions on how to improve the resume for the target job role. Provide specific examples of how to rewrite bullet points to include measurable achievements.]

---
**Resume Content:**
{resume_text}
"#
    )
}
