mod bridge;
#[cfg(test)]
mod bridge_test;
mod display_mode;
mod global;
mod widget_state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bridge::*;
pub use display_mode::*;
pub use global::*;
pub use widget_state::*;
