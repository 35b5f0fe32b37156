//! Telemetry collaborators: trace sample lookup and map panel rendering.

pub mod map;
pub mod trace;
