pub mod bioportal;
pub mod cache;
pub mod traits;

pub use bioportal::*;
pub use cache::*;
pub use traits::*;
