
pub mod board;
pub mod game;
pub mod player;
pub mod point;
pub mod transform;

pub use board::Board;
pub use game::{Game, MoveError, Status};
pub use player::Player;
pub use point::Point;
pub use transform::Transform;
