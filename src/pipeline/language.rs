//! Language detection over normalized text

use crate::error::{Result, ScreenerError};
use regex::Regex;
use whatlang::Lang;

/// Minimum normalized length for a detection attempt. Below this the
/// statistical detector is effectively guessing.
const MIN_DETECTABLE_CHARS: usize = 10;

pub struct LanguageDetector {
    email_re: Regex,
    url_re: Regex,
    phone_re: Regex,
}

impl LanguageDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            email_re: compile(r"\S+@\S+")?,
            url_re: compile(r"https?://[^\s]+")?,
            phone_re: compile(r"\+?[1-9]\d{0,15}")?,
        })
    }

    /// Detect the language of `text` and return its ISO 639-1 code.
    ///
    /// Detection failure propagates as `LanguageDetection`; callers decide
    /// whether a failed document is skipped. There is no silent English
    /// default.
    pub fn detect(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ScreenerError::LanguageDetection {
                message: "input text is empty".to_string(),
            });
        }

        let cleaned = self.normalize(text);
        if cleaned.chars().count() < MIN_DETECTABLE_CHARS {
            return Err(ScreenerError::LanguageDetection {
                message: format!(
                    "text too short for reliable detection ({} chars after normalization)",
                    cleaned.chars().count()
                ),
            });
        }

        let info = whatlang::detect(&cleaned).ok_or_else(|| ScreenerError::LanguageDetection {
            message: "detector could not produce a language code".to_string(),
        })?;

        let code = iso639_1(info.lang());
        log::debug!(
            "detected language {} (confidence {:.2}) for sample: {:.50}",
            code,
            info.confidence(),
            cleaned
        );
        Ok(code)
    }

    /// Strip patterns that skew n-gram statistics: emails, URLs and
    /// phone-like digit runs, then collapse whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let no_email = self.email_re.replace_all(&collapsed, "");
        let no_url = self.url_re.replace_all(&no_email, "");
        let no_phone = self.phone_re.replace_all(&no_url, "");
        no_phone.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ScreenerError::Configuration(format!("invalid regex {}: {}", pattern, e)))
}

/// whatlang reports ISO 639-3; map the languages we expect in resumes to
/// 639-1 and fall back to the 639-3 code for the long tail.
fn iso639_1(lang: Lang) -> String {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Fra => "fr",
        Lang::Spa => "es",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Pol => "pl",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Tur => "tr",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        _ => return lang.code().to_string(),
    };
    code.to_string()
}
