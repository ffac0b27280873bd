use super::language::{profile, LanguageProfile};
use super::model::{CourseInfo, ModuleSegment};
use crate::error::FilterError;

/// Parse the leading season/segment token of a schedule label.
///
/// Returns `Ok(None)` when the label does not start with a recognizable
/// token; callers keep such entries visible. Anything after the token
/// (weekday, period) is ignored.
pub fn parse_course_info(label: &str, language: &str) -> Result<Option<CourseInfo>, FilterError> {
    let profile = profile(language)?;
    Ok(parse_with_profile(label, profile))
}

/// Same as [`parse_course_info`] with the profile already resolved.
pub fn parse_with_profile(label: &str, profile: &LanguageProfile) -> Option<CourseInfo> {
    let caps = profile.pattern.captures(label)?;
    let season = caps.get(1)?.as_str();
    let letters = caps.get(2)?.as_str();

    Some(CourseInfo {
        spring: profile.spring_words.iter().any(|w| season.contains(w)),
        autumn: profile.autumn_words.iter().any(|w| season.contains(w)),
        segments: letters.chars().filter_map(ModuleSegment::from_letter).collect(),
    })
}

/// A schedule label worth parsing has at least two whitespace-separated tokens.
pub fn has_schedule_shape(label: &str) -> bool {
    label.split_whitespace().nth(1).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SeasonCode;
    use std::collections::BTreeSet;

    fn segments(letters: &[ModuleSegment]) -> BTreeSet<ModuleSegment> {
        letters.iter().copied().collect()
    }

    #[test]
    fn english_spring_two_segments() {
        let info = parse_course_info("Spring AB Mon. 2", "en").unwrap().unwrap();
        assert!(info.spring);
        assert!(!info.autumn);
        assert_eq!(info.segments, segments(&[ModuleSegment::A, ModuleSegment::B]));
    }

    #[test]
    fn japanese_autumn_single_segment() {
        let info = parse_course_info("秋A 水5,6", "ja").unwrap().unwrap();
        assert!(!info.spring);
        assert!(info.autumn);
        assert_eq!(info.segments, segments(&[ModuleSegment::A]));
    }

    #[test]
    fn japanese_full_year_all_segments() {
        let info = parse_course_info("春秋ABC 集中", "ja").unwrap().unwrap();
        assert!(info.has_season(SeasonCode::Spring));
        assert!(info.has_season(SeasonCode::Autumn));
        assert_eq!(
            info.segments,
            segments(&[ModuleSegment::A, ModuleSegment::B, ModuleSegment::C])
        );

        let bare = parse_course_info("春秋ABC", "ja").unwrap().unwrap();
        assert_eq!(bare, info);
    }

    #[test]
    fn english_both_seasons_and_lowercase_letters() {
        let info = parse_course_info("Spring Fall abc Thu. 1", "en").unwrap().unwrap();
        assert!(info.spring && info.autumn);
        assert_eq!(info.segments.len(), 3);

        let autumn = parse_course_info("Autumn C Fri. 4", "en").unwrap().unwrap();
        assert!(autumn.autumn && !autumn.spring);
    }

    #[test]
    fn labels_without_leading_token_do_not_match() {
        for label in ["Mon. 2 Spring AB", "Summer A Mon. 1", "Spring Break", "", "通年 月1"] {
            assert_eq!(parse_course_info(label, "en").unwrap(), None, "{label:?}");
        }
        assert_eq!(parse_course_info("Spring AB Mon. 2", "ja").unwrap(), None);
        assert_eq!(parse_course_info("夏季休業中 集中", "ja").unwrap(), None);
    }

    #[test]
    fn unsupported_language_is_not_a_no_match() {
        assert_eq!(
            parse_course_info("Spring AB Mon. 2", "de"),
            Err(FilterError::UnsupportedLanguage("de".to_string()))
        );
    }

    #[test]
    fn schedule_shape_needs_two_tokens() {
        assert!(has_schedule_shape("Spring AB Mon. 2"));
        assert!(has_schedule_shape("秋A 水5,6"));
        assert!(!has_schedule_shape("春秋ABC"));
        assert!(!has_schedule_shape("   "));
        assert!(!has_schedule_shape(""));
    }
}
