// src/flow/mod.rs

//! Flow document generation.
//!
//! Turns an ordered list of [`Step`](crate::types::Step)s into the YAML-ish
//! flow text consumed by `maestro test`. Everything in here is pure: no IO,
//! no processes, no failure modes.
//!
//! - [`params`] classifies a step's untyped parameters into a closed enum.
//! - [`builder`] renders the document.

pub mod builder;
pub mod params;

pub use builder::{FlowDocument, build};
pub use params::StepParams;
