pub mod geometry;
pub mod input;
pub mod time;
pub mod viewport;
