use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

// ---------------------------------------------------------------------------
// SeasonCode – spring or autumn term
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeasonCode {
    Spring,
    Autumn,
}

impl SeasonCode {
    /// Lowercase form used inside encoded module codes.
    pub fn as_str(self) -> &'static str {
        match self {
            SeasonCode::Spring => "spring",
            SeasonCode::Autumn => "autumn",
        }
    }
}

impl FromStr for SeasonCode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spring" => Ok(SeasonCode::Spring),
            "autumn" => Ok(SeasonCode::Autumn),
            other => Err(FilterError::InvalidModuleCode(other.to_string())),
        }
    }
}

impl fmt::Display for SeasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ModuleSegment – a / b / c sub-division of a term
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleSegment {
    A,
    B,
    C,
}

impl ModuleSegment {
    /// Case-insensitive letter lookup.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(ModuleSegment::A),
            'b' => Some(ModuleSegment::B),
            'c' => Some(ModuleSegment::C),
            _ => None,
        }
    }

    /// Lowercase letter, as stored in encoded module codes.
    pub fn letter(self) -> char {
        match self {
            ModuleSegment::A => 'a',
            ModuleSegment::B => 'b',
            ModuleSegment::C => 'c',
        }
    }

    /// Uppercase letter, for display only.
    pub fn display_letter(self) -> char {
        self.letter().to_ascii_uppercase()
    }
}

impl fmt::Display for ModuleSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ---------------------------------------------------------------------------
// ModuleCode – the selector value
// ---------------------------------------------------------------------------

/// Either the `all` sentinel or one concrete season/segment pair.
///
/// The textual form (`all`, `spring-a`, `autumn-c`, ...) is what the
/// preference store keeps; see [`super::module_code`] for the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModuleCode {
    #[default]
    All,
    Term(SeasonCode, ModuleSegment),
}

impl ModuleCode {
    /// The seven selector values in display order.
    pub const ALL_CODES: [ModuleCode; 7] = [
        ModuleCode::All,
        ModuleCode::Term(SeasonCode::Spring, ModuleSegment::A),
        ModuleCode::Term(SeasonCode::Spring, ModuleSegment::B),
        ModuleCode::Term(SeasonCode::Spring, ModuleSegment::C),
        ModuleCode::Term(SeasonCode::Autumn, ModuleSegment::A),
        ModuleCode::Term(SeasonCode::Autumn, ModuleSegment::B),
        ModuleCode::Term(SeasonCode::Autumn, ModuleSegment::C),
    ];
}

impl fmt::Display for ModuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleCode::All => f.write_str(super::module_code::ALL),
            ModuleCode::Term(season, segment) => {
                f.write_str(&super::module_code::encode(*season, *segment))
            }
        }
    }
}

impl FromStr for ModuleCode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if super::module_code::is_all(s) {
            return Ok(ModuleCode::All);
        }
        let (season, segment) = super::module_code::decode(s)?;
        Ok(ModuleCode::Term(season, segment))
    }
}

// ---------------------------------------------------------------------------
// CourseInfo – parsed schedule facts of one entry
// ---------------------------------------------------------------------------

/// Season and segment membership extracted from one schedule label.
///
/// A label may name both seasons (full-year courses) and several segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseInfo {
    pub spring: bool,
    pub autumn: bool,
    pub segments: BTreeSet<ModuleSegment>,
}

impl CourseInfo {
    pub fn has_season(&self, season: SeasonCode) -> bool {
        match season {
            SeasonCode::Spring => self.spring,
            SeasonCode::Autumn => self.autumn,
        }
    }

    pub fn has_segment(&self, segment: ModuleSegment) -> bool {
        self.segments.contains(&segment)
    }

    /// Whether an entry with these facts belongs to `season`/`segment`.
    pub fn matches(&self, season: SeasonCode, segment: ModuleSegment) -> bool {
        self.has_season(season) && self.has_segment(segment)
    }
}

// ---------------------------------------------------------------------------
// LayoutKind / Stripe
// ---------------------------------------------------------------------------

/// Which of the two supported page renderings is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    List,
    Thumbnail,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::List => f.write_str("list"),
            LayoutKind::Thumbnail => f.write_str("thumbnail"),
        }
    }
}

/// Alternating row style of the next visible list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stripe {
    #[default]
    Odd,
    Even,
}

impl Stripe {
    pub fn flip(self) -> Self {
        match self {
            Stripe::Odd => Stripe::Even,
            Stripe::Even => Stripe::Odd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_order_starts_with_all() {
        assert_eq!(ModuleCode::ALL_CODES[0], ModuleCode::All);
        let rendered: Vec<String> = ModuleCode::ALL_CODES.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            rendered,
            ["all", "spring-a", "spring-b", "spring-c", "autumn-a", "autumn-b", "autumn-c"]
        );
    }

    #[test]
    fn segment_letters_are_case_insensitive() {
        assert_eq!(ModuleSegment::from_letter('B'), Some(ModuleSegment::B));
        assert_eq!(ModuleSegment::from_letter('c'), Some(ModuleSegment::C));
        assert_eq!(ModuleSegment::from_letter('d'), None);
        assert_eq!(ModuleSegment::A.display_letter(), 'A');
    }

    #[test]
    fn course_info_needs_both_season_and_segment() {
        let info = CourseInfo {
            spring: true,
            autumn: false,
            segments: [ModuleSegment::A, ModuleSegment::B].into_iter().collect(),
        };
        assert!(info.matches(SeasonCode::Spring, ModuleSegment::B));
        assert!(!info.matches(SeasonCode::Autumn, ModuleSegment::B));
        assert!(!info.matches(SeasonCode::Spring, ModuleSegment::C));
    }

    #[test]
    fn stripe_alternates() {
        assert_eq!(Stripe::default(), Stripe::Odd);
        assert_eq!(Stripe::Odd.flip(), Stripe::Even);
        assert_eq!(Stripe::Odd.flip().flip(), Stripe::Odd);
    }
}
