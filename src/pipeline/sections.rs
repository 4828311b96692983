//! Keyword-delimited section scanning
//!
//! Resume sections are located by a single forward pass over lines: a line
//! containing a start keyword opens the section, and a later line containing
//! a stop keyword closes it. The keyword sets are deliberately the same
//! coarse heuristics the screener has always used; the scanner isolates them
//! behind one type so the method can be replaced without touching callers.

/// One scan = one section. States: seeking the header, collecting lines,
/// done once a terminating header is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Seeking,
    InSection,
    Done,
}

pub struct SectionScanner {
    start_keywords: &'static [&'static str],
    stop_keywords: &'static [&'static str],
}

pub const EDUCATION_START: &[&str] = &[
    "education",
    "academic",
    "degree",
    "university",
    "college",
    "bachelor",
    "master",
    "phd",
    "diploma",
];
pub const EDUCATION_STOP: &[&str] = &["experience", "work", "employment", "skills"];

pub const EXPERIENCE_START: &[&str] = &[
    "experience",
    "work history",
    "employment",
    "professional experience",
    "career",
];
pub const EXPERIENCE_STOP: &[&str] = &["education", "skills", "projects"];

pub const CERTIFICATIONS_START: &[&str] = &["certifications", "certificates", "licenses"];
pub const CERTIFICATIONS_STOP: &[&str] = &["education", "experience", "skills", "projects", "languages"];

pub const LANGUAGES_START: &[&str] = &["languages"];
pub const LANGUAGES_STOP: &[&str] = &["education", "experience", "skills", "certifications"];

impl SectionScanner {
    pub fn new(
        start_keywords: &'static [&'static str],
        stop_keywords: &'static [&'static str],
    ) -> Self {
        Self {
            start_keywords,
            stop_keywords,
        }
    }

    pub fn education() -> Self {
        Self::new(EDUCATION_START, EDUCATION_STOP)
    }

    pub fn experience() -> Self {
        Self::new(EXPERIENCE_START, EXPERIENCE_STOP)
    }

    pub fn certifications() -> Self {
        Self::new(CERTIFICATIONS_START, CERTIFICATIONS_STOP)
    }

    pub fn languages() -> Self {
        Self::new(LANGUAGES_START, LANGUAGES_STOP)
    }

    /// Collect the non-blank lines of the first matching section.
    ///
    /// A header line of the form `Education: Bachelor of Science, MIT` keeps
    /// the content after the colon as the section's first line; a bare header
    /// contributes nothing. The terminating header line is not collected.
    pub fn collect(&self, text: &str) -> Vec<String> {
        let mut state = ScanState::Seeking;
        let mut collected = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            let lower = trimmed.to_lowercase();

            match state {
                ScanState::Seeking => {
                    if self.start_keywords.iter().any(|k| lower.contains(k)) {
                        state = ScanState::InSection;
                        if let Some((_, rest)) = trimmed.split_once(':') {
                            let rest = rest.trim();
                            if !rest.is_empty() {
                                collected.push(rest.to_string());
                            }
                        }
                    }
                }
                ScanState::InSection => {
                    if self.stop_keywords.iter().any(|k| lower.contains(k)) {
                        state = ScanState::Done;
                    } else if !trimmed.is_empty() {
                        collected.push(trimmed.to_string());
                    }
                }
                ScanState::Done => break,
            }

            if state == ScanState::Done {
                break;
            }
        }

        collected
    }
}
