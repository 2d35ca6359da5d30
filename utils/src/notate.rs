
use super::error::*;

#[macro_export]
///
/// A format! variant whose arguments are all Notate implementors; each 
/// argument is replaced by its canonical notation.
///
macro_rules! notate 
{
    ($fmt:expr, $($args:expr),*) => 
    {
        format!($fmt, $($args.notate()),*)
    };
}

///
/// A trait for values with a short, human-typable notation, such as 
/// board coordinates entered at the terminal.
///
/// notate() always produces the canonical form; parse() also accepts 
/// loose forms (case, whitespace) and rejects anything out of range.
///
pub trait Notate 
    where Self: Sized
{
    ///
    /// Returns the canonical notational string for this object.
    ///
    fn notate (& self) -> String;

    ///
    /// Constructs a new object from the given notational string, provided
    /// that the notation is valid.
    ///
    fn parse (s: & str) -> Result<Self>;
}
