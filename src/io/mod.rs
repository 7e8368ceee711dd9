pub mod score_reader;
pub use score_reader::*;
pub mod writer;
pub use writer::*;
