pub mod game_state;
pub mod hand;
pub mod widget;

pub use game_state::*;
pub use hand::*;
pub use widget::*;
