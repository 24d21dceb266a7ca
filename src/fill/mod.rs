mod flood;
mod matcher;

pub use flood::{FillMode, FloodFillEngine};
pub use matcher::{ColorMatcher, MAX_TOLERANCE, MIN_TOLERANCE, Tolerance, matches};
