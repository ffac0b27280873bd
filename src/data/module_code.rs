//! Text codec for module codes: `all` or `{season}-{segment}`.

use super::model::{ModuleSegment, SeasonCode};
use crate::error::FilterError;

/// The sentinel meaning "no filter".
pub const ALL: &str = "all";

const SEPARATOR: char = '-';

pub fn is_all(code: &str) -> bool {
    code == ALL
}

/// Join season and segment into the stored form, e.g. `spring-a`.
pub fn encode(season: SeasonCode, segment: ModuleSegment) -> String {
    format!("{}{SEPARATOR}{}", season.as_str(), segment.letter())
}

/// Split a concrete code into its parts.
///
/// Only the six `{spring,autumn}-{a,b,c}` strings decode. Callers branch on
/// [`is_all`] first; passing `all` here is rejected like any other bad code.
pub fn decode(code: &str) -> Result<(SeasonCode, ModuleSegment), FilterError> {
    let invalid = || FilterError::InvalidModuleCode(code.to_string());

    let (season, segment) = code.split_once(SEPARATOR).ok_or_else(invalid)?;
    let season: SeasonCode = season.parse().map_err(|_| invalid())?;

    let mut letters = segment.chars();
    let segment = match (letters.next(), letters.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => ModuleSegment::from_letter(c),
        _ => None,
    }
    .ok_or_else(invalid)?;

    Ok((season, segment))
}
