
pub mod config;
pub mod node;
pub mod search;

use gomoku::Game;

use utils::error::*;

///
/// A search tree bound to one model, owned by a single game.
///
/// The tree is kept between calls: after a move is played, advance() makes 
/// the matching subtree the new root so its statistics are reused by the 
/// next search instead of being rebuilt.
///
pub trait SearchEngine 
{
    ///
    /// Searches the given position and returns a distribution over every 
    /// move. A temperature of zero puts all mass on the most visited move.
    ///
    fn action_probabilities (& mut self, game: & Game, temperature: f32) -> Result<Vec<f32>>;

    ///
    /// Commits a move, keeping the subtree below it.
    ///
    fn advance (& mut self, action: usize);

    ///
    /// Forgets the whole tree, ready for a new game.
    ///
    fn reset (& mut self);
}
