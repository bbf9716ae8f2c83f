pub mod game_state;
pub mod widget;

pub use game_state::*;
pub use widget::*;
