pub mod counts;
pub mod gaps;
pub mod hours;
pub mod window;

pub use window::TimeWindow;
