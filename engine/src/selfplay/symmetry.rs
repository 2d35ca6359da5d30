
use gomoku::Transform;

use utils::error::*;

///
/// One symmetric image of an observation.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Symmetric 
{
    pub transform: Transform,
    pub board: Vec<Vec<i8>>,
    pub policy: Vec<f32>
}

///
/// Expands a board and its row-major policy into the 8 images under the 
/// symmetries of the square, the identity included. The same transform is 
/// applied to stones and move probabilities, so every image is as valid a 
/// training target as the original.
///
pub fn augment (board: & [Vec<i8>], policy: & [f32]) -> Result<Vec<Symmetric>>
{
    let n = board.len();
    ensure!(board.iter().all(|row| row.len() == n), "The board is not square.");
    ensure!(policy.len() == n * n, "Expected a policy of length {}, got {}.", n * n, policy.len());

    let stones : Vec<i8> = board.concat();

    let images = Transform::as_array().into_iter()
        .map(|transform| 
        {
            let board = transform.apply_to_grid(& stones, n)
                .chunks(n.max(1))
                .map(|row| row.to_vec())
                .collect();

            Symmetric { transform, board, policy: transform.apply_to_grid(policy, n) }
        })
        .collect();

    Ok(images)
}
