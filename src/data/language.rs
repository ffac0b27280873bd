use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{ModuleCode, SeasonCode};
use super::page::Page;
use crate::error::FilterError;

// ---------------------------------------------------------------------------
// Language table
// ---------------------------------------------------------------------------

/// Everything that differs between display languages.
///
/// Adding a language means adding one entry to [`LANGUAGES`].
#[derive(Debug)]
pub struct LanguageProfile {
    pub code: &'static str,
    /// Anchored; group 1 is the season token, group 2 the segment letters.
    pub pattern: Regex,
    /// Words/glyphs whose presence in the season token marks spring.
    pub spring_words: &'static [&'static str],
    pub autumn_words: &'static [&'static str],
    pub spring_name: &'static str,
    pub autumn_name: &'static str,
    /// Selector text for the `all` option.
    pub all_label: &'static str,
    /// Placed between season name and segment letter in selector text.
    pub label_separator: &'static str,
}

impl LanguageProfile {
    pub fn season_name(&self, season: SeasonCode) -> &'static str {
        match season {
            SeasonCode::Spring => self.spring_name,
            SeasonCode::Autumn => self.autumn_name,
        }
    }
}

pub static LANGUAGES: Lazy<Vec<LanguageProfile>> = Lazy::new(|| {
    vec![
        LanguageProfile {
            code: "en",
            pattern: Regex::new(
                r"^((?:Spring|Fall|Autumn)(?:\s*(?:Spring|Fall|Autumn))*)\s*([A-Ca-c]+)\b",
            )
            .expect("valid en schedule pattern"),
            spring_words: &["Spring"],
            autumn_words: &["Fall", "Autumn"],
            spring_name: "Spring",
            autumn_name: "Fall",
            all_label: "All modules",
            label_separator: " ",
        },
        LanguageProfile {
            code: "ja",
            pattern: Regex::new(r"^([春秋]+)([A-Ca-c]+)").expect("valid ja schedule pattern"),
            spring_words: &["春"],
            autumn_words: &["秋"],
            spring_name: "春",
            autumn_name: "秋",
            all_label: "すべて",
            label_separator: "",
        },
    ]
});

/// Look up the profile for a language code.
pub fn profile(code: &str) -> Result<&'static LanguageProfile, FilterError> {
    LANGUAGES
        .iter()
        .find(|p| p.code == code)
        .ok_or_else(|| FilterError::UnsupportedLanguage(code.to_string()))
}

/// Display language of a page: its `<html lang>`, else `fallback`.
pub fn detect_language(page: &Page, fallback: &str) -> String {
    page.html_lang().unwrap_or_else(|| fallback.to_string())
}

/// Text shown for `code` in the module selector.
pub fn selector_label(code: ModuleCode, profile: &LanguageProfile) -> String {
    match code {
        ModuleCode::All => profile.all_label.to_string(),
        ModuleCode::Term(season, segment) => format!(
            "{}{}{}",
            profile.season_name(season),
            profile.label_separator,
            segment.display_letter()
        ),
    }
}
