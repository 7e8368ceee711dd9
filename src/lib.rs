pub mod algorithm;
pub mod errors;
pub mod exact;
pub mod graph;
pub mod io;
pub mod log;
pub mod utils;

pub mod prelude {
    pub use super::algorithm::*;
    pub use super::errors::*;
    pub use super::exact::*;
    pub use super::graph::*;
    pub use super::io::*;
    pub use super::utils::{Pairing, signal_handling};
}

#[cfg(test)]
mod testing;
