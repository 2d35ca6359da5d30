
///
/// Error propagation for the whole workspace. Every fallible operation 
/// returns a Result from here; domain crates define their own typed 
/// errors and let them convert into it through `?`.
///
pub use anyhow::{anyhow as error, bail, ensure, Context, Error, Result};
