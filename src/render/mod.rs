//! Alternative renderings of a story: JSON, plain text and statistics.

mod json;
mod stats;
mod text;

pub use json::{from_json, to_json, JsonFormat};
pub use stats::StoryStats;
pub use text::to_text;
