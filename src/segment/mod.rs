//! Speech segment construction.
//!
//! Turns a per-frame activity timeline into merged, duration-filtered
//! speech segments.

mod builder;
mod timeline;
mod types;

pub use builder::SegmentBuilder;
pub use timeline::{ActivityFrame, ActivityTimeline};
pub use types::{Segment, round_to};
