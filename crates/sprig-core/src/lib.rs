//! Sprig Core
//!
//! This crate contains the ambient utilities shared by the Sprig crates:
//! logging, profiling, math and geometry primitives.

pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
