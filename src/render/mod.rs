//! Drawing surfaces and shared text helpers.

pub mod cpu;
pub mod recording;
pub mod surface;
pub mod text;
