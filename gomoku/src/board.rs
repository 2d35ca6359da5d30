
use super::player::Player;
use super::point::Point;

use utils::*;

///
/// An n x n grid of stones. Each intersection holds a stone sign: +1 for 
/// Black, -1 for White, 0 when empty. Storage is row-major, which is also 
/// the convention for move indices everywhere in the workspace.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board 
{
    n: usize,
    stones: Vec<i8>
}

impl std::fmt::Display for Board 
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result 
    {
        write!(f, "   ")?;
        for col in 0 .. self.n 
        {
            write!(f, "{} ", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;

        for row in 0 .. self.n
        {
            write!(f, "{:>2} ", row + 1)?;
            for col in 0 .. self.n
            {
                write!(f, "{} ", Player::from_sign(self.stones[row * self.n + col]))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Board 
{
    ///
    /// Returns an empty board of the given size.
    ///
    pub fn blank (n: usize) -> Board
    {
        Board { n, stones: vec![0; n * n] }
    }

    ///
    /// Returns the number of intersections.
    ///
    pub fn action_size (& self) -> usize 
    {
        self.stones.len()
    }

    ///
    /// Returns the stone sign at the given linear index.
    ///
    pub fn at (& self, index: usize) -> i8 
    {
        self.stones[index]
    }

    ///
    /// Returns the owner of the given point, or None when empty or off the board.
    ///
    pub fn player_at (& self, point: & Point) -> Player 
    {
        match point.in_bounds(self.n)
        {
            true  => Player::from_sign(self.stones[point.index(self.n)]),
            false => Player::None
        }
    }

    ///
    /// Returns the edge length.
    ///
    pub fn n (& self) -> usize 
    {
        self.n
    }

    ///
    /// Places a stone without any legality checks.
    ///
    pub fn place (& mut self, index: usize, player: Player)
    {
        self.stones[index] = player.value();
    }

    ///
    /// Returns a copy of the board as an n x n grid of stone signs.
    ///
    pub fn rows (& self) -> Vec<Vec<i8>>
    {
        self.stones.chunks(self.n).map(|row| row.to_vec()).collect()
    }

    ///
    /// Returns the flat row-major stones.
    ///
    pub fn stones (& self) -> & [i8]
    {
        & self.stones
    }
}
