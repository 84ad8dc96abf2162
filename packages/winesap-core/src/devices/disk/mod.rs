mod controller;
pub mod nibble;

pub use controller::{DiskController, MAX_HALF_TRACK, PHASE_DELTA};
