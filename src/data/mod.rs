/// Data layer: page model, schedule parsing, and filtering.
///
/// Architecture:
/// ```text
///  .html / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Page (node arena)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  layout   │  list table or thumbnail cards → ordered entries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐   course_info: label → season/segments (per language)
///   │  filter   │   module_code: selector value
///   └──────────┘   → show/hide entries, re-stripe list rows
/// ```

pub mod course_info;
pub mod filter;
pub mod html;
pub mod language;
pub mod layout;
pub mod loader;
pub mod model;
pub mod module_code;
pub mod page;
