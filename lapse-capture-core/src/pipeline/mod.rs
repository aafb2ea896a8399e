pub mod buffer_tracker;
pub mod encode;
