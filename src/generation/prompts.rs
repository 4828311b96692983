//! Prompt construction for interview question generation

/// Instruction template sent to the text2text model for each matched
/// candidate.
pub const QUESTION_PROMPT_TEMPLATE: &str = "You are an AI interview assistant. \
Given the job title '{job_title}' and the following resume:\n\n{resume_snippet}\n\n\
Generate 3 relevant and specific interview questions for this job-resume match. \
Focus on technical skills, experience, and cultural fit. Format as a simple list.";

pub fn question_prompt(job_title: &str, resume_snippet: &str) -> String {
    QUESTION_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{resume_snippet}", resume_snippet)
}

/// Cap a resume to `max_chars` characters for prompting, marking the cut
/// with an ellipsis.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_title_and_resume() {
        let prompt = question_prompt("Data Analyst", "SQL expert with five years in BI.");
        assert!(prompt.contains("job title 'Data Analyst'"));
        assert!(prompt.contains("SQL expert with five years in BI."));
        assert!(prompt.contains("Generate 3 relevant and specific interview questions"));
    }

    #[test]
    fn test_short_text_is_not_truncated() {
        assert_eq!(truncate_snippet("short resume", 1000), "short resume");
    }

    #[test]
    fn test_long_text_is_truncated_with_ellipsis() {
        let text = "x".repeat(1500);
        let snippet = truncate_snippet(&text, 1000);
        assert_eq!(snippet.chars().count(), 1003);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let text = "é".repeat(20);
        let snippet = truncate_snippet(&text, 10);
        assert_eq!(snippet, format!("{}...", "é".repeat(10)));
    }
}
