mod announcement;
mod game_view;
mod options;
mod view;
mod widget;

pub use announcement::*;
pub use game_view::*;
pub use options::*;
pub use view::*;
pub use widget::*;
