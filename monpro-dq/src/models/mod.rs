//! Domain models for the diagnostic service

mod battlecard;

pub use battlecard::{Battlecard, EstimatedRoi};
