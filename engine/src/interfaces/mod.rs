pub mod display;
pub mod play;
pub mod train;
