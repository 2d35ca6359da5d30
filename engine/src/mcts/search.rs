
use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::*;
use crate::neural::{Evaluator, Position};

use gomoku::Game;

use super::node::*;
use super::SearchEngine;

use utils::error::*;
use utils::log;

///
/// A PUCT search over an arena of nodes, evaluated through a shared 
/// Evaluator. The root is always node 0.
///
/// Each round descends up to `thread_pool_size` times before asking the 
/// evaluator for anything. Every descent charges a virtual loss to the 
/// nodes on its path, which makes them look worse to the descents that 
/// follow, so one round gathers a batch of distinct leaves that are then 
/// evaluated in a single request.
///
pub struct Search<E: Evaluator>
{
    config: MCTSConfig,
    evaluator: Arc<E>,
    tree: Vec<Node>
}

impl<E: Evaluator> Search<E>
{
    ///
    /// Creates an empty search tree bound to the given evaluator.
    ///
    pub fn new (config: MCTSConfig, evaluator: Arc<E>) -> Search<E>
    {
        Search { config, evaluator, tree: vec![Node::root()] }
    }

    ///
    /// Returns the number of times the current root has been visited.
    ///
    #[cfg(test)]
    pub fn root_visits (& self) -> f32 
    {
        self.tree[0].n
    }

    ///
    /// Returns the number of nodes in the tree.
    ///
    #[cfg(test)]
    pub fn size (& self) -> usize 
    {
        self.tree.len()
    }

    ///
    /// Adds value to every node from the leaf up to the root. The value is 
    /// given in the perspective of the player to move at the leaf.
    ///
    fn backpropagate (& mut self, leaf: NodeID, value: f32)
    {
        let mut id = leaf;
        let mut val = - value;

        loop 
        {
            let node = & mut self.tree[id];
            node.update(val, 1.0);

            match node.parent 
            {
                Some(parent) => 
                {
                    id = parent;
                    val = - val;
                },
                None => break
            }
        }
    }

    ///
    /// Charges (or refunds, with a negative sign) the virtual loss to the 
    /// path from the leaf up to the root.
    ///
    fn charge_virtual_loss (& mut self, leaf: NodeID, sign: f32)
    {
        let loss = self.config.c_virtual_loss * sign;
        let mut id = Some(leaf);

        while let Some(current) = id 
        {
            let node = & mut self.tree[current];
            node.update(- loss, loss);
            id = node.parent;
        }
    }

    ///
    /// Returns the child of the given node with the highest PUCT score.
    ///
    fn continuation (& self, id: NodeID) -> NodeID 
    {
        let parent = & self.tree[id];
        let visits = parent.n.max(1.0).sqrt();

        let mut best_id = parent.oldest_child;
        let mut best_score = f32::NEG_INFINITY;

        for child_id in parent.oldest_child .. parent.oldest_child + parent.num_children 
        {
            let child = & self.tree[child_id];
            let u = self.config.c_puct * child.p * visits / (1.0 + child.n);
            let score = child.q() + u;

            if score > best_score
            {
                best_id = child_id;
                best_score = score;
            }
        }

        best_id
    }

    ///
    /// Expands the leaf with one child per legal move. The priors are the 
    /// evaluator's policy restricted to legal moves and renormalized; a 
    /// policy with no legal mass falls back to uniform priors.
    ///
    fn expand (& mut self, leaf: NodeID, state: & Game, policy: & [f32]) -> Result<()>
    {
        ensure!(
            policy.len() == state.action_size(), 
            "The evaluator returned a policy of length {}, expected {}.", policy.len(), state.action_size()
        );

        let legal : Vec<usize> = state.legal_moves().iter()
            .enumerate()
            .filter(|(_, & legal)| legal)
            .map(|(action, _)| action)
            .collect();

        let mass : f32 = legal.iter().map(|& a| policy[a]).sum();
        let uniform = 1.0 / legal.len() as f32;

        let insertion_point = self.tree.len();
        for & action in & legal 
        {
            let prior = match mass.is_finite() && mass > 0.0 
            {
                true  => policy[action] / mass,
                false => uniform
            };
            self.tree.push(Node::new(Some(leaf), action, prior));
        }

        self.tree[leaf].visit(insertion_point, legal.len());
        Ok(())
    }

    ///
    /// Descends from the root to a leaf, applying moves to a copy of the 
    /// root position and charging virtual loss along the way.
    ///
    fn select (& mut self, root: & Game) -> Result<(NodeID, Game)>
    {
        let mut id = 0;
        let mut state = root.clone();

        while self.tree[id].is_visited() && ! state.is_over()
        {
            id = self.continuation(id);
            state.execute_move(self.tree[id].in_action)?;
        }

        self.charge_virtual_loss(id, 1.0);
        Ok((id, state))
    }

    ///
    /// Runs one round of at most `budget` simulations and returns how many 
    /// completed. Every round completes at least one.
    ///
    fn simulate (& mut self, root: & Game, budget: usize) -> Result<usize>
    {
        let mut leaves : Vec<(NodeID, Game)> = Vec::new();
        let mut completed = 0;

        for _ in 0 .. budget.min(self.config.thread_pool_size.max(1))
        {
            let (leaf, state) = self.select(root)?;

            if state.is_over()
            {
                // The player who just moved decided the game; from the 
                // perspective of the player to move it is a loss or a draw.

                let (_, winner) = state.game_status();
                let value = match winner 
                {
                    0 => 0.0,
                    _ => - 1.0
                };

                self.charge_virtual_loss(leaf, - 1.0);
                self.backpropagate(leaf, value);
                completed += 1;
                continue;
            }

            if self.tree[leaf].pending 
            {
                self.charge_virtual_loss(leaf, - 1.0);
                break;
            }

            self.tree[leaf].pending = true;
            leaves.push((leaf, state));
        }

        if leaves.is_empty()
        {
            return Ok(completed);
        }

        let positions = leaves.iter().map(|(_, state)| Position::from(state)).collect();
        let evaluations = self.evaluator.evaluate(positions)?;

        ensure!(
            evaluations.len() == leaves.len(), 
            "The evaluator answered {} of {} positions.", evaluations.len(), leaves.len()
        );

        for ((leaf, state), evaluation) in leaves.into_iter().zip(evaluations)
        {
            self.expand(leaf, & state, & evaluation.policy)?;
            self.tree[leaf].pending = false;
            self.charge_virtual_loss(leaf, - 1.0);
            self.backpropagate(leaf, evaluation.value);
            completed += 1;
        }

        Ok(completed)
    }
}

impl<E: Evaluator> SearchEngine for Search<E>
{
    fn action_probabilities (& mut self, game: & Game, temperature: f32) -> Result<Vec<f32>>
    {
        ensure!(! game.is_over(), "Cannot search a finished game.");

        let target = self.config.num_mcts_sims.max(1);
        let mut done = 0;
        while done < target 
        {
            done += self.simulate(game, target - done)?;
        }

        let root = & self.tree[0];
        let children = & self.tree[root.oldest_child .. root.oldest_child + root.num_children];
        let mut probs = vec![0.0_f32; game.action_size()];

        log::trace!("Searched {} simulations; root has {} visits over {} nodes.", done, root.n, self.tree.len());

        // Right after the root is expanded no child has visits yet; the 
        // priors stand in for the counts.

        let max_visits = children.iter().map(|c| c.n).fold(0.0_f32, f32::max);
        let weight = |child: & Node| match max_visits > 0.0 
        {
            true  => child.n / max_visits,
            false => child.p
        };

        if temperature <= 1e-3 
        {
            let mut best = None;
            let mut best_weight = f32::NEG_INFINITY;
            for child in children 
            {
                if weight(child) > best_weight 
                {
                    best_weight = weight(child);
                    best = Some(child.in_action);
                }
            }

            let action = best.ok_or_else(|| error!("The root has no children after searching."))?;
            probs[action] = 1.0;
        }
        else 
        {
            for child in children 
            {
                probs[child.in_action] = weight(child).powf(1.0 / temperature);
            }

            let total : f32 = probs.iter().sum();
            ensure!(total > 0.0 && total.is_finite(), "The root visit distribution is degenerate.");

            for p in & mut probs 
            {
                * p /= total;
            }
        }

        Ok(probs)
    }

    fn advance (& mut self, action: usize)
    {
        let root = & self.tree[0];
        let child = (root.oldest_child .. root.oldest_child + root.num_children)
            .find(|& id| self.tree[id].in_action == action);

        let child = match child 
        {
            Some(child) => child,
            None        => return self.reset()
        };

        // Copy the subtree breadth-first so that siblings stay contiguous.

        let mut tree = Vec::with_capacity(self.tree.len());
        let mut queue = VecDeque::new();

        let mut new_root = self.tree[child].clone();
        new_root.parent = None;
        tree.push(new_root);
        queue.push_back((child, 0));

        while let Some((old_id, new_id)) = queue.pop_front()
        {
            let old = & self.tree[old_id];
            if ! old.is_visited()
            {
                continue;
            }

            let oldest_child = tree.len();
            for old_child in old.oldest_child .. old.oldest_child + old.num_children 
            {
                let mut node = self.tree[old_child].clone();
                node.parent = Some(new_id);
                queue.push_back((old_child, tree.len()));
                tree.push(node);
            }

            tree[new_id].visit(oldest_child, old.num_children);
        }

        self.tree = tree;
    }

    fn reset (& mut self)
    {
        self.tree = vec![Node::root()];
    }
}
