
use crate::neural::Position;

use utils::{Serialize, Deserialize};

///
/// One observation from self-play, labelled with the game result.
///
/// The policy covers all n * n moves and has no mass on occupied points. 
/// The value is the winner's sign times current_player, so it is +1 for 
/// examples where the eventual winner was to move, -1 for the loser's, 
/// and 0 everywhere in a drawn game.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample 
{
    pub board: Vec<Vec<i8>>,
    pub last_action: Option<usize>,
    pub current_player: i8,
    pub policy: Vec<f32>,
    pub value: f32
}

impl TrainingExample 
{
    ///
    /// Returns the position this example was recorded at.
    ///
    pub fn position (& self) -> Position 
    {
        Position 
        {
            board: self.board.clone(),
            last_action: self.last_action,
            current_player: self.current_player
        }
    }
}

///
/// An observation recorded mid-game, before its value is known.
///
#[derive(Clone, Debug, PartialEq)]
pub struct PendingExample 
{
    pub board: Vec<Vec<i8>>,
    pub last_action: Option<usize>,
    pub current_player: i8,
    pub policy: Vec<f32>
}

impl PendingExample 
{
    ///
    /// Labels this observation with the sign of the game's winner.
    ///
    pub fn finish (self, winner: i8) -> TrainingExample 
    {
        TrainingExample 
        {
            value: (self.current_player * winner) as f32,
            board: self.board,
            last_action: self.last_action,
            current_player: self.current_player,
            policy: self.policy
        }
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    fn pending (current_player: i8) -> PendingExample 
    {
        PendingExample { board: vec![vec![0; 3]; 3], last_action: None, current_player, policy: vec![1.0 / 9.0; 9] }
    }

    #[test]
    fn value_follows_the_player_to_move ()
    {
        assert_eq!(pending(1).finish(1).value, 1.0);
        assert_eq!(pending(-1).finish(1).value, -1.0);
        assert_eq!(pending(1).finish(-1).value, -1.0);
        assert_eq!(pending(-1).finish(-1).value, 1.0);
        assert_eq!(pending(-1).finish(0).value, 0.0);
    }
}
