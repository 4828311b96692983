//! Structured field extraction from English resume text
//!
//! Extraction never fails on malformed input: each sub-extraction leaves its
//! field empty when nothing matches, and only the aggregate confidence
//! reflects how much was found. Name and location come from a pluggable
//! entity recognizer and are simply absent when none is available.

use crate::error::{Result, ScreenerError};
use crate::pipeline::record::{EducationEntry, ExperienceEntry, SkillMention, StructuredFields};
use crate::pipeline::sections::SectionScanner;
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::collections::HashMap;

/// Skill keywords scanned for as case-insensitive substrings.
const SKILL_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "angular",
    "vue",
    "node.js",
    "sql",
    "mongodb",
    "postgresql",
    "mysql",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "git",
    "agile",
    "scrum",
    "machine learning",
    "ai",
    "data analysis",
    "statistics",
    "excel",
    "powerbi",
    "tableau",
    "html",
    "css",
    "bootstrap",
    "jquery",
    "php",
    "c++",
    "c#",
    ".net",
    "spring",
    "django",
    "flask",
    "fastapi",
    "express",
    "graphql",
    "rest api",
    "microservices",
    "ci/cd",
    "jenkins",
    "github actions",
];

const DEGREE_KEYWORDS: &[&str] = &["bachelor", "master", "phd", "associate", "diploma"];

const JOB_TITLE_KEYWORDS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "analyst",
    "specialist",
    "consultant",
];

/// Characters of context kept on each side of a skill's first mention.
const SKILL_CONTEXT_RADIUS: usize = 50;

/// Named-entity capability for person name and location. Optional: without
/// one, those two fields are absent and everything else is unaffected.
pub trait EntityRecognizer: Send + Sync {
    fn person_name(&self, text: &str) -> Option<String>;
    fn location(&self, text: &str) -> Option<String>;
}

/// Line-shape heuristics standing in for a statistical NER model: a name is
/// an early short line of capitalized words, a location is an explicitly
/// labelled line.
pub struct HeuristicRecognizer;

impl EntityRecognizer for HeuristicRecognizer {
    fn person_name(&self, text: &str) -> Option<String> {
        for line in text.lines().take(5) {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.contains('@') || trimmed.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            let words: Vec<&str> = trimmed.split_whitespace().collect();
            if !(2..=4).contains(&words.len()) || trimmed.len() > 60 {
                continue;
            }
            let name_like = words.iter().all(|w| {
                w.chars().next().is_some_and(|c| c.is_uppercase())
                    && w.chars().all(|c| c.is_alphabetic() || c == '.' || c == '-' || c == '\'')
            });
            if name_like {
                return Some(trimmed.to_string());
            }
        }
        None
    }

    fn location(&self, text: &str) -> Option<String> {
        for line in text.lines() {
            let lower = line.trim().to_lowercase();
            for label in ["location:", "address:", "based in:"] {
                if lower.starts_with(label) {
                    let value = line.trim()[label.len()..].trim();
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
        None
    }
}

/// Everything one extraction pass produced: the fields, the aggregate
/// confidence, and the skill mentions the threshold filtered out (kept so
/// callers can audit what was seen but dropped).
#[derive(Debug, Clone)]
pub struct Extraction {
    pub fields: StructuredFields,
    pub confidence: f32,
    pub below_threshold_skills: Vec<SkillMention>,
}

pub struct FieldExtractor {
    email_re: Regex,
    phone_re: Regex,
    linkedin_re: Regex,
    website_re: Regex,
    year_re: Regex,
    duration_re: Regex,
    skill_matcher: AhoCorasick,
    confidence_threshold: f32,
    ner_window: usize,
    recognizer: Option<Box<dyn EntityRecognizer>>,
}

impl FieldExtractor {
    pub fn new(confidence_threshold: f32, ner_window: usize) -> Result<Self> {
        let skill_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(SKILL_KEYWORDS)
            .map_err(|e| {
                ScreenerError::Configuration(format!("failed to build skill matcher: {}", e))
            })?;

        Ok(Self {
            email_re: compile(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,
            phone_re: compile(r"(?:\+?\d{1,2}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}")?,
            linkedin_re: compile(r"https?://(?:www\.)?linkedin\.com/in/[A-Za-z0-9-]+")?,
            website_re: compile(r"https?://(?:www\.)?[A-Za-z0-9.-]+\.[A-Za-z]{2,}")?,
            year_re: compile(r"\b(19|20)\d{2}\b")?,
            duration_re: compile(
                r"(?i)\b(19|20)\d{2}\b.*\b(19|20)\d{2}\b|\b(19|20)\d{2}\b.*\b(present|now)\b",
            )?,
            skill_matcher,
            confidence_threshold,
            ner_window,
            recognizer: Some(Box::new(HeuristicRecognizer)),
        })
    }

    /// Swap out or remove the entity recognizer. With `None`, name and
    /// location are never populated.
    pub fn with_recognizer(mut self, recognizer: Option<Box<dyn EntityRecognizer>>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Extract all structured fields from English text. Does not fail:
    /// missing fields stay empty and an empty input yields confidence 0.0.
    pub fn extract(&self, text: &str) -> Extraction {
        let mut fields = StructuredFields {
            email: self.first_match(&self.email_re, text),
            phone: self.first_match(&self.phone_re, text),
            linkedin: self.first_match(&self.linkedin_re, text),
            website: self.first_match(&self.website_re, text),
            ..Default::default()
        };

        if let Some(recognizer) = &self.recognizer {
            let window = prefix(text, self.ner_window);
            fields.name = recognizer.person_name(window);
            fields.location = recognizer.location(window);
        }

        let (skills, filtered) = self.extract_skills(text);
        fields.skills = skills;
        fields.education = self.extract_education(text);
        fields.experience = self.extract_experience(text);
        fields.certifications = SectionScanner::certifications().collect(text);
        fields.languages_spoken = extract_language_names(&SectionScanner::languages().collect(text));

        let confidence = aggregate_confidence(&fields);

        Extraction {
            fields,
            confidence,
            below_threshold_skills: filtered,
        }
    }

    /// Email and phone only, for annotating match results with contact info.
    pub fn contact_info(&self, text: &str) -> (Option<String>, Option<String>) {
        (
            self.first_match(&self.email_re, text),
            self.first_match(&self.phone_re, text),
        )
    }

    fn first_match(&self, re: &Regex, text: &str) -> Option<String> {
        re.find(text).map(|m| m.as_str().to_string())
    }

    /// Scan for skill keywords and score each mention with the document-wide
    /// three-tier heuristic. Returns (retained, filtered-out), both sorted by
    /// confidence descending.
    fn extract_skills(&self, text: &str) -> (Vec<SkillMention>, Vec<SkillMention>) {
        let confidence = skill_tier_confidence(text);

        // First occurrence per keyword.
        let mut first_hit: HashMap<usize, usize> = HashMap::new();
        for m in self.skill_matcher.find_iter(text) {
            first_hit.entry(m.pattern().as_usize()).or_insert(m.start());
        }

        let mut retained = Vec::new();
        let mut filtered = Vec::new();
        for (pattern, start) in first_hit {
            let keyword = SKILL_KEYWORDS[pattern];
            let mention = SkillMention {
                skill: title_case(keyword),
                confidence,
                context: context_around(text, start, keyword.len(), SKILL_CONTEXT_RADIUS),
            };
            if confidence >= self.confidence_threshold {
                retained.push(mention);
            } else {
                filtered.push(mention);
            }
        }

        retained.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.skill.cmp(&b.skill))
        });
        filtered.sort_by(|a, b| a.skill.cmp(&b.skill));
        (retained, filtered)
    }

    fn extract_education(&self, text: &str) -> Vec<EducationEntry> {
        let lines = SectionScanner::education().collect(text);
        let mut entries = Vec::new();
        let mut current: Option<EducationEntry> = None;

        for line in &lines {
            let lower = line.to_lowercase();
            if DEGREE_KEYWORDS.iter().any(|k| lower.contains(k)) {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                // Inline entries like "Bachelor of Science, MIT, 2018" carry
                // degree, institution and year on one line.
                let mut segments = line.split(',').map(str::trim);
                let degree = segments.next().unwrap_or(line).to_string();
                let institution = segments.next().unwrap_or("").to_string();
                let year = self
                    .first_match(&self.year_re, line)
                    .unwrap_or_default();
                current = Some(EducationEntry {
                    degree,
                    institution,
                    year,
                });
            } else if let Some(entry) = current.as_mut() {
                if entry.institution.is_empty() {
                    entry.institution = line.clone();
                } else if entry.year.is_empty() {
                    if let Some(year) = self.first_match(&self.year_re, line) {
                        entry.year = year;
                    }
                }
            }
        }

        if let Some(entry) = current {
            entries.push(entry);
        }
        entries
    }

    fn extract_experience(&self, text: &str) -> Vec<ExperienceEntry> {
        let lines = SectionScanner::experience().collect(text);
        let mut entries = Vec::new();
        let mut current: Option<ExperienceEntry> = None;

        for line in &lines {
            let lower = line.to_lowercase();
            if JOB_TITLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                current = Some(ExperienceEntry {
                    title: line.clone(),
                    ..Default::default()
                });
            } else if let Some(entry) = current.as_mut() {
                if entry.company.is_empty() {
                    entry.company = line.clone();
                } else if entry.duration.is_empty() {
                    // Until a date-range line shows up, lines here are not
                    // part of the description and are dropped.
                    if self.duration_re.is_match(line) {
                        entry.duration = line.clone();
                    }
                } else {
                    entry.description.push_str(line);
                    entry.description.push(' ');
                }
            }
        }

        if let Some(entry) = current {
            entries.push(entry);
        }
        for entry in &mut entries {
            entry.description = entry.description.trim().to_string();
        }
        entries
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ScreenerError::Configuration(format!("invalid regex {}: {}", pattern, e)))
}

/// Document-wide skill confidence: 0.9 with a skills/competencies marker,
/// 0.8 with an experience/work marker, 0.6 otherwise.
fn skill_tier_confidence(text: &str) -> f32 {
    let lower = text.to_lowercase();
    if lower.contains("skills") || lower.contains("competencies") {
        0.9
    } else if lower.contains("experience") || lower.contains("work") {
        0.8
    } else {
        0.6
    }
}

/// Mean of the per-signal scores that are present; 0.0 when nothing was
/// extracted at all.
fn aggregate_confidence(fields: &StructuredFields) -> f32 {
    let mut scores = Vec::new();

    if fields.email.is_some() {
        scores.push(0.8);
    }
    if fields.name.is_some() {
        scores.push(0.7);
    }
    if fields.phone.is_some() {
        scores.push(0.6);
    }
    if !fields.skills.is_empty() {
        let avg: f32 = fields.skills.iter().map(|s| s.confidence).sum::<f32>()
            / fields.skills.len() as f32;
        scores.push(avg * 0.8);
    }
    if !fields.education.is_empty() {
        scores.push(0.7);
    }
    if !fields.experience.is_empty() {
        scores.push(0.7);
    }

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f32>() / scores.len() as f32
    }
}

/// Python-style title case: uppercase every letter that follows a
/// non-alphabetic character ("node.js" -> "Node.Js", "sql" -> "Sql").
fn title_case(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    let mut at_word_start = true;
    for c in keyword.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn context_around(text: &str, start: usize, match_len: usize, radius: usize) -> String {
    let begin = floor_char_boundary(text, start.saturating_sub(radius));
    let end = ceil_char_boundary(text, (start + match_len + radius).min(text.len()));
    text[begin..end].trim().to_string()
}

fn prefix(text: &str, max_bytes: usize) -> &str {
    &text[..floor_char_boundary(text, max_bytes.min(text.len()))]
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

fn extract_language_names(lines: &[String]) -> Vec<String> {
    let mut names = Vec::new();
    for line in lines {
        for part in line.split(',') {
            let name = part.trim().trim_end_matches('.').trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(0.7, 1000).unwrap()
    }

    const SAMPLE: &str = "Jane Doe\njane.doe@example.com\n(555) 123-4567\nSkills: Python, SQL\nEducation: Bachelor of Science, MIT, 2018";

    #[test]
    fn test_sample_resume_contact_fields() {
        let result = extractor().extract(SAMPLE);
        assert_eq!(
            result.fields.email.as_deref(),
            Some("jane.doe@example.com")
        );
        let phone = result.fields.phone.unwrap();
        assert!(phone.contains("555"));
        assert!(phone.contains("123-4567"));
        assert_eq!(result.fields.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_sample_resume_skills() {
        let result = extractor().extract(SAMPLE);
        let names: Vec<&str> = result.fields.skills.iter().map(|s| s.skill.as_str()).collect();
        assert!(names.contains(&"Python"));
        assert!(names.contains(&"Sql"));
        // "Skills:" marker present, so the top confidence tier applies.
        assert!(result.fields.skills.iter().all(|s| s.confidence == 0.9));
    }

    #[test]
    fn test_sample_resume_education() {
        let result = extractor().extract(SAMPLE);
        assert_eq!(result.fields.education.len(), 1);
        let entry = &result.fields.education[0];
        assert!(entry.degree.contains("Bachelor"));
        assert_eq!(entry.institution, "MIT");
        assert_eq!(entry.year, "2018");
    }

    #[test]
    fn test_multiline_education_entries() {
        // Degree, institution and year on separate lines, two entries in one
        // section.
        let text = "Education\nMaster of Arts\nStanford University\n2015\n\
                    Bachelor of Science\nMIT\n2010\nSkills\nPython";
        let result = extractor().extract(text);

        assert_eq!(result.fields.education.len(), 2);
        let first = &result.fields.education[0];
        assert_eq!(first.degree, "Master of Arts");
        assert_eq!(first.institution, "Stanford University");
        assert_eq!(first.year, "2015");

        let second = &result.fields.education[1];
        assert_eq!(second.degree, "Bachelor of Science");
        assert_eq!(second.institution, "MIT");
        assert_eq!(second.year, "2010");
    }

    #[test]
    fn test_empty_input_degrades_gracefully() {
        let result = extractor().extract("");
        assert!(result.fields.email.is_none());
        assert!(result.fields.name.is_none());
        assert!(result.fields.skills.is_empty());
        assert!(result.fields.education.is_empty());
        assert!(result.fields.experience.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_confidence_in_unit_interval() {
        let result = extractor().extract(SAMPLE);
        assert!(result.confidence > 0.0);
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn test_without_recognizer_entity_fields_absent() {
        let extractor = extractor().with_recognizer(None);
        let result = extractor.extract(SAMPLE);
        assert!(result.fields.name.is_none());
        assert!(result.fields.location.is_none());
        // Regex fields are unaffected.
        assert!(result.fields.email.is_some());
    }

    #[test]
    fn test_low_tier_skills_are_filtered_but_audited() {
        // No skills/experience/work markers anywhere: tier 0.6, below the
        // 0.7 threshold.
        let text = "I enjoy writing python and using docker every day.";
        let result = extractor().extract(text);
        assert!(result.fields.skills.is_empty());
        let filtered: Vec<&str> = result
            .below_threshold_skills
            .iter()
            .map(|s| s.skill.as_str())
            .collect();
        assert!(filtered.contains(&"Python"));
        assert!(filtered.contains(&"Docker"));
        assert!(result
            .below_threshold_skills
            .iter()
            .all(|s| s.confidence == 0.6));
    }

    #[test]
    fn test_skill_context_window() {
        let result = extractor().extract(SAMPLE);
        let python = result
            .fields
            .skills
            .iter()
            .find(|s| s.skill == "Python")
            .unwrap();
        assert!(python.context.contains("Python"));
        assert!(python.context.len() <= "Python".len() + 2 * SKILL_CONTEXT_RADIUS + 2);
    }

    #[test]
    fn test_experience_entries() {
        let text = "Work History\nSenior Software Engineer\nAcme Corp\n2019 - 2023\nBuilt the billing platform.\nShipped v2 of the API.\nEducation\nMIT";
        let result = extractor().extract(text);
        assert_eq!(result.fields.experience.len(), 1);
        let entry = &result.fields.experience[0];
        assert_eq!(entry.title, "Senior Software Engineer");
        assert_eq!(entry.company, "Acme Corp");
        assert_eq!(entry.duration, "2019 - 2023");
        assert!(entry.description.contains("billing platform"));
        assert!(entry.description.contains("v2 of the API"));
    }

    #[test]
    fn test_duration_accepts_present() {
        let e = extractor();
        assert!(e.duration_re.is_match("2021 - present"));
        assert!(e.duration_re.is_match("2018 to now"));
        assert!(!e.duration_re.is_match("team of 2020 people")); // single year, no range
    }

    #[test]
    fn test_linkedin_and_website() {
        let text = "Reach me at https://linkedin.com/in/jane-doe or https://janedoe.dev for more.";
        let result = extractor().extract(text);
        assert_eq!(
            result.fields.linkedin.as_deref(),
            Some("https://linkedin.com/in/jane-doe")
        );
        assert!(result.fields.website.is_some());
    }

    #[test]
    fn test_certifications_and_languages() {
        let text = "Jane Doe\nCertifications:\nAWS Solutions Architect\nCKA\nLanguages: English, French, German";
        let result = extractor().extract(text);
        assert_eq!(
            result.fields.certifications,
            vec!["AWS Solutions Architect".to_string(), "CKA".to_string()]
        );
        assert_eq!(
            result.fields.languages_spoken,
            vec![
                "English".to_string(),
                "French".to_string(),
                "German".to_string()
            ]
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("sql"), "Sql");
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("c++"), "C++");
    }
}
