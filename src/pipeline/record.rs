//! Typed records flowing through the ingestion and matching pipelines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully processed resume. Created once by the ingestion pipeline and
/// never mutated afterwards; re-ingestion under the same id replaces the
/// stored copy wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: String,
    /// Original text as uploaded. Not serialized into artifacts, the
    /// canonical text is the copy of record.
    #[serde(skip_serializing, default)]
    pub raw_text: String,
    /// ISO 639-1 code from detection.
    pub original_language: String,
    /// English text used for embedding: translation output, or the raw text
    /// when the source was already English or passed through untranslated.
    pub canonical_text: String,
    pub structured_fields: StructuredFields,
    /// Weighted aggregate in [0, 1] over which fields were populated.
    pub extraction_confidence: f32,
    pub parsed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<SkillMention>,
    pub certifications: Vec<String>,
    pub languages_spoken: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMention {
    /// Title-cased keyword, e.g. "Python", "Machine Learning".
    pub skill: String,
    pub confidence: f32,
    /// Up to 50 characters on either side of the first mention.
    pub context: String,
}

/// Structured job description as received from job JSON files or the
/// match-candidates endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl JobDescription {
    /// Canonical text fed to the embedding model. Non-empty sections are
    /// concatenated in fixed order and separated by blank lines, so the same
    /// job always embeds identically.
    pub fn canonical_text(&self) -> String {
        let mut parts = Vec::new();

        if !self.title.trim().is_empty() {
            parts.push(format!("Job Title: {}", self.title));
        }

        if !self.description.trim().is_empty() {
            parts.push(format!("Description: {}", self.description));
        }

        let requirements: Vec<&String> = self
            .requirements
            .iter()
            .filter(|r| !r.trim().is_empty())
            .collect();
        if !requirements.is_empty() {
            let lines: Vec<String> = requirements.iter().map(|r| format!("- {}", r)).collect();
            parts.push(format!("Requirements:\n{}", lines.join("\n")));
        }

        let skills: Vec<&String> = self.skills.iter().filter(|s| !s.trim().is_empty()).collect();
        if !skills.is_empty() {
            let joined = skills
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Skills: {}", joined));
        }

        parts.join("\n\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text_full_job() {
        let job = JobDescription {
            title: "Data Analyst".to_string(),
            description: "Analyze business data.".to_string(),
            requirements: vec!["3 years SQL".to_string()],
            skills: vec!["SQL".to_string(), "Excel".to_string()],
        };

        let text = job.canonical_text();
        assert!(text.starts_with("Job Title: Data Analyst"));
        assert!(text.contains("Requirements:\n- 3 years SQL"));
        assert!(text.contains("Skills: SQL, Excel"));
    }

    #[test]
    fn test_canonical_text_skips_empty_sections() {
        let job = JobDescription {
            title: "Backend Engineer".to_string(),
            ..Default::default()
        };

        assert_eq!(job.canonical_text(), "Job Title: Backend Engineer");
    }

    #[test]
    fn test_canonical_text_filters_blank_requirements() {
        let job = JobDescription {
            title: "QA".to_string(),
            requirements: vec!["  ".to_string(), "Selenium".to_string()],
            ..Default::default()
        };

        let text = job.canonical_text();
        assert!(text.contains("Requirements:\n- Selenium"));
        assert!(!text.contains("-  \n"));
    }

    #[test]
    fn test_resume_record_serialization_omits_raw_text() {
        let record = ResumeRecord {
            id: "r1".to_string(),
            raw_text: "full original text".to_string(),
            original_language: "en".to_string(),
            canonical_text: "full original text".to_string(),
            structured_fields: StructuredFields::default(),
            extraction_confidence: 0.0,
            parsed_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("raw_text"));
        assert!(json.contains("canonical_text"));
    }
}
