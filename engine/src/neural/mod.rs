
pub mod config;
pub mod inference;
pub mod input;
pub mod network;

use crate::selfplay::example::TrainingExample;

use gomoku::Game;

use utils::error::*;

///
/// A position as the network sees it: the stones, the move that produced 
/// them, and the sign of the player to move.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Position 
{
    pub board: Vec<Vec<i8>>,
    pub last_action: Option<usize>,
    pub current_player: i8
}

impl std::convert::From<& Game> for Position 
{
    fn from (game: & Game) -> Position 
    {
        Position 
        {
            board: game.board().rows(),
            last_action: game.last_move(),
            current_player: game.current_player().value()
        }
    }
}

///
/// The network's opinion of a position. The policy covers every move, 
/// legal or not, and sums to 1; the value is in the perspective of the 
/// player to move.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation 
{
    pub policy: Vec<f32>,
    pub value: f32
}

///
/// The inference capability shared by every search in the process.
///
/// Implementors synchronize internally; callers on any number of threads 
/// may submit positions concurrently and block until their own results 
/// arrive, in the order they were submitted.
///
pub trait Evaluator: Send + Sync 
{
    fn evaluate (& self, positions: Vec<Position>) -> Result<Vec<Evaluation>>;
}

///
/// The two checkpoint slots a model can be saved to.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot 
{
    Current,
    Best
}

impl Slot 
{
    ///
    /// Returns the file stem of this slot inside the model directory.
    ///
    pub fn stem (& self) -> & 'static str 
    {
        match self 
        {
            Slot::Current => "checkpoint",
            Slot::Best    => "best_checkpoint"
        }
    }
}

///
/// The training side of the model service.
///
pub trait Trainer 
{
    ///
    /// Fits the model to the given examples in mini-batches of the given size.
    ///
    fn train (& mut self, examples: & [TrainingExample], batch_size: usize) -> Result<()>;

    ///
    /// Writes the model weights to a checkpoint slot.
    ///
    fn save (& self, slot: Slot) -> Result<()>;
}
