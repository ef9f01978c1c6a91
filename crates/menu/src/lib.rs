mod calendar;
mod category;
mod error;
mod grid;
mod period;

pub use calendar::*;
pub use category::*;
pub use error::*;
pub use grid::*;
pub use period::*;
