pub mod preview;
pub mod rebuild;
pub mod serve;
pub mod stats;
