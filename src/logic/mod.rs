pub mod tagger;
pub mod terms;

pub use tagger::*;
pub use terms::*;
