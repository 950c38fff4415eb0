pub mod annotation;
pub mod common;
pub mod outcome;
pub mod submission;

pub use annotation::*;
pub use common::*;
pub use outcome::*;
pub use submission::*;
