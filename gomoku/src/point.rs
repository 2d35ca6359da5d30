
use lazy_static::lazy_static;
use regex::Regex;

use utils::error::Context;
use utils::notate::Notate;
use utils::*;

///
/// Represents an intersection on the board as a (row, column) pair.
///
/// The notation is a column letter followed by a 1-based row number, 
/// e.g. `a1` is the top-left intersection and `c2` is row 1, column 2.
/// Points carry no board size; bounds are checked against the size 
/// supplied by the caller.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point 
{
    row: i32,
    col: i32
}

lazy_static! 
{
    static ref NOTATION : Regex = Regex::new(r"^([a-zA-Z])\s*([0-9]{1,2})$").unwrap();
}

impl std::fmt::Display for Point 
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result 
    {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl Notate for Point 
{
    fn notate (& self) -> String 
    {
        let letter = (b'a' + self.col as u8) as char;
        format!("{}{}", letter, self.row + 1)
    }

    fn parse (s: & str) -> Result<Point>
    {
        let context = format!("Invalid notation '{}' for point.", s);

        let captures = NOTATION.captures(s.trim())
            .ok_or_else(|| error::error!("Expected a column letter followed by a row number."))
            .context(context.clone())?;

        let col = (captures[1].to_ascii_lowercase().as_bytes()[0] - b'a') as i32;
        let row = captures[2].parse::<i32>().context(context.clone())? - 1;

        if row < 0 
        {
            return Err(error::error!("Rows are numbered from 1.")).context(context);
        }

        Ok(Point { row, col })
    }
}

impl Point 
{
    ///
    /// Returns the point for a row-major linear index on an n x n board.
    ///
    pub fn from_index (index: usize, n: usize) -> Point 
    {
        Point::new((index / n) as i32, (index % n) as i32)
    }

    ///
    /// Determines whether this point is on an n x n board.
    ///
    pub fn in_bounds (& self, n: usize) -> bool
    {
        let n = n as i32;
        0 <= self.row && self.row < n && 0 <= self.col && self.col < n
    }

    ///
    /// Returns the row-major linear index of this point on an n x n board.
    ///
    pub fn index (& self, n: usize) -> usize 
    {
        self.row as usize * n + self.col as usize
    }

    ///
    /// Returns a new point.
    ///
    pub fn new (row: i32, col: i32) -> Point
    {
        Point { row, col }
    }

    ///
    /// Returns the point offset by the given step.
    ///
    pub fn offset (& self, d_row: i32, d_col: i32) -> Point 
    {
        Point { row: self.row + d_row, col: self.col + d_col }
    }

    pub fn row (& self) -> i32
    {
        self.row
    }

    pub fn col (& self) -> i32
    {
        self.col
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    #[test]
    fn notation_round_trips ()
    {
        let point = Point::new(7, 7);
        assert_eq!(point.notate(), "h8");
        assert_eq!(Point::parse("h8").unwrap(), point);
        assert_eq!(Point::parse(" H 8 ").unwrap(), point);
    }

    #[test]
    fn parse_rejects_garbage ()
    {
        assert!(Point::parse("88").is_err());
        assert!(Point::parse("a0").is_err());
        assert!(Point::parse("").is_err());
    }

    #[test]
    fn index_round_trips ()
    {
        let n = 15;
        for index in [0, 14, 15, 112, 224]
        {
            assert_eq!(Point::from_index(index, n).index(n), index);
        }
    }
}
