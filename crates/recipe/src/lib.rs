mod catalog;
mod detail;
mod error;
mod source;

pub use catalog::*;
pub use detail::*;
pub use error::*;
pub use source::*;
