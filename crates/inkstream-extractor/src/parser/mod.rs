//! Grammar tiers for reading model output
//!
//! Tried in order by the [`Extractor`](crate::Extractor): fenced JSON,
//! then `field: value` sections, then plain markdown. Each tier returns
//! `None` when it yields no field, letting the next one try.

mod cursor;
pub(crate) mod fenced_json;
pub(crate) mod markdown;
pub(crate) mod sections;
