pub mod pairing;
pub mod signal_handling;

pub use pairing::*;
