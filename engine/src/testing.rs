//! Doubles shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;

use crate::mcts::SearchEngine;
use crate::neural::{Evaluation, Evaluator, Position, Slot, Trainer};
use crate::selfplay::example::TrainingExample;

use gomoku::Game;

use utils::error::*;

///
/// Uniform priors, a neutral value, and a log of every batch size.
///
#[derive(Default)]
pub struct Uniform 
{
    pub batches: Mutex<Vec<usize>>
}

impl Evaluator for Uniform 
{
    fn evaluate (& self, positions: Vec<Position>) -> Result<Vec<Evaluation>>
    {
        self.batches.lock().unwrap().push(positions.len());
        Ok(positions.iter()
            .map(|p| 
            {
                let size = p.board.len() * p.board.len();
                Evaluation { policy: vec![1.0 / size as f32; size], value: 0.0 }
            })
            .collect())
    }
}

///
/// A search that always plays the first legal move of a fixed order, and 
/// counts how it is driven.
///
pub struct Scripted 
{
    order: Vec<usize>,
    pub resets: usize,
    pub advances: usize,
    pub openings: usize
}

impl Scripted 
{
    ///
    /// Plays the lowest legal index.
    ///
    pub fn lowest (action_size: usize) -> Scripted 
    {
        Scripted::new((0 .. action_size).collect())
    }

    pub fn new (order: Vec<usize>) -> Scripted 
    {
        Scripted { order, resets: 0, advances: 0, openings: 0 }
    }
}

impl SearchEngine for Scripted 
{
    fn action_probabilities (& mut self, game: & Game, _temperature: f32) -> Result<Vec<f32>>
    {
        if game.last_move().is_none()
        {
            self.openings += 1;
        }

        let legal = game.legal_moves();
        let action = self.order.iter()
            .copied()
            .find(|& a| legal[a])
            .ok_or_else(|| error!("No scripted move is legal."))?;

        let mut probs = vec![0.0; legal.len()];
        probs[action] = 1.0;
        Ok(probs)
    }

    fn advance (& mut self, _action: usize)
    {
        self.advances += 1;
    }

    fn reset (& mut self)
    {
        self.resets += 1;
    }
}

///
/// A trainer that records what it was asked to do. The save log may be 
/// shared with the test.
///
#[derive(Default)]
pub struct Recorder 
{
    pub trained: Vec<(usize, usize)>,
    pub saved: Rc<RefCell<Vec<Slot>>>
}

impl Recorder 
{
    pub fn sharing (saved: Rc<RefCell<Vec<Slot>>>) -> Recorder 
    {
        Recorder { trained: Vec::new(), saved }
    }
}

impl Trainer for Recorder 
{
    fn train (& mut self, examples: & [TrainingExample], batch_size: usize) -> Result<()>
    {
        self.trained.push((examples.len(), batch_size));
        Ok(())
    }

    fn save (& self, slot: Slot) -> Result<()>
    {
        self.saved.borrow_mut().push(slot);
        Ok(())
    }
}
