//! Utility functions.

mod duration;
mod exclusions;

pub use duration::human_readable_duration;
pub use exclusions::{
    read_error_list, read_error_lists, read_exclusion_list, read_exclusion_lists,
};
