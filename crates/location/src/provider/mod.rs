//! Location providers.

pub mod scripted;
pub mod track;
pub mod unsupported;

pub use scripted::{Fix, ScriptedFix, ScriptedSource};
pub use track::{TrackError, parse_track};
pub use unsupported::UnsupportedSource;
