
use utils::notate::Notate;
use utils::*;

///
/// A player in an n-in-a-row game.
///
/// Black and White own the stones on the board; None marks an empty 
/// intersection. The numeric value of a player is its stone sign, which 
/// is also the sign used for values in training data.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Player 
{
    Black,
    White,
    None
}

impl std::fmt::Display for Player 
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let token = match self 
        {
            Player::Black => "●",
            Player::White => "○",
            Player::None  => "·"
        };
        write!(f, "{}", token)
    }
}

impl Notate for Player 
{
    fn notate (& self) -> String 
    {
        match self 
        {
            Player::Black => "B".to_string(),
            Player::White => "W".to_string(),
            Player::None  => "_".to_string()
        }
    }

    fn parse (s: & str) -> Result<Player>
    {
        match s.trim()
        {
            "B" | "b" | "X" | "x" => Ok(Player::Black),
            "W" | "w" | "O" | "o" => Ok(Player::White),
            "_" | "-" | "."       => Ok(Player::None),
            _                     => Err(error::error!("Invalid notation '{}' for player.", s))
        }
    }
}

impl Player 
{
    ///
    /// Returns the player for a stone sign; zero is the empty player.
    ///
    pub fn from_sign (sign: i8) -> Player 
    {
        match sign.signum()
        {
            1  => Player::Black,
            -1 => Player::White,
            _  => Player::None
        }
    }

    ///
    /// Returns the player opposite this one.
    ///
    pub fn next (& self) -> Player 
    {
        match self 
        {
            Player::Black => Player::White,
            Player::White => Player::Black,
            Player::None  => panic!("Something has gone terribly wrong: tried to get next() of a null player.")
        }
    }

    ///
    /// Returns the stone sign of this player.
    ///
    pub fn value (& self) -> i8
    {
        match self 
        {
            Player::Black =>  1,
            Player::White => -1,
            Player::None  =>  0 
        }
    }
}
