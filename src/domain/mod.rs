pub mod action;
pub mod outcome;
pub mod sample;

pub use action::*;
pub use outcome::*;
pub use sample::*;
