
pub mod error;
pub use self::error::{Context, Result};

pub mod log;

pub mod notate;

pub mod serialize;
pub use self::serialize::{Serialize, Deserialize};
