//! Declarative scene description.

pub mod model;
