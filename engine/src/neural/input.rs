
use super::Position;

use tch::Tensor;

///
/// The number of feature planes per position.
///
pub const PLANES : usize = 3;

///
/// Represents the network input for one position: a [3, n, n] tensor 
/// seen from the perspective of the player to move. Plane 0 marks that 
/// player's stones, plane 1 the opponent's, and plane 2 is a one-hot of 
/// the last move (all zero on an empty board).
///
pub struct Input (pub Tensor);

impl std::convert::From<& Position> for Input 
{
    fn from (position: & Position) -> Input 
    {
        let n = position.board.len() as i64;
        let data = planes(position);

        Input(Tensor::of_slice(& data).reshape(& [PLANES as i64, n, n]))
    }
}

///
/// Returns the flat feature planes of a position in [plane, row, col] order.
///
pub fn planes (position: & Position) -> Vec<f32>
{
    let n = position.board.len();
    let mut data = vec![0.0_f32; PLANES * n * n];

    for (i, row) in position.board.iter().enumerate()
    {
        for (j, & stone) in row.iter().enumerate()
        {
            // Multiplying by the player to move puts own stones at +1.

            let relative = stone * position.current_player;
            let cell = i * n + j;

            if relative > 0 
            {
                data[cell] = 1.0;
            }
            else if relative < 0 
            {
                data[n * n + cell] = 1.0;
            }
        }
    }

    if let Some(action) = position.last_action 
    {
        data[2 * n * n + action] = 1.0;
    }

    data
}
