
use std::sync::Arc;

use crate::config::*;
use crate::interfaces::display::Display;
use crate::mcts::search::Search;
use crate::mcts::SearchEngine;
use crate::neural::Evaluator;

use gomoku::{Game, Player};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use super::example::{PendingExample, TrainingExample};
use super::exploration::ExplorationPolicy;
use super::symmetry;

use utils::error::*;
use utils::log;

///
/// Runs self-play episodes against a shared evaluator.
///
/// Every episode owns its game and its search tree; only the evaluator 
/// is shared, so episodes of one round run concurrently on a pool of 
/// `parallel_play_size` workers and their batched requests meet in the 
/// same inference queue.
///
pub struct SelfPlay<E: Evaluator>
{
    game: GameConfig,
    mcts: MCTSConfig,
    selfplay: SelfplayConfig,
    exploration: ExplorationPolicy,
    evaluator: Arc<E>,
    display: Option<Display>
}

impl<E: Evaluator> SelfPlay<E>
{
    ///
    /// Creates an orchestrator. The display, when given, mirrors the 
    /// first episode of every round.
    ///
    pub fn new (config: & Config, evaluator: Arc<E>, display: Option<Display>) -> SelfPlay<E>
    {
        SelfPlay 
        {
            game: config.game,
            mcts: config.mcts,
            selfplay: config.selfplay,
            exploration: ExplorationPolicy::new(& config.selfplay),
            evaluator,
            display
        }
    }

    ///
    /// Plays one game to the end and returns its examples, 8 per move.
    ///
    pub fn run_episode (& self, first: Player, show: bool, rng: & mut StdRng) -> Result<Vec<TrainingExample>>
    {
        let n = self.game.n;
        let mut game = Game::new(n, self.game.n_in_row, first);
        let mut search = Search::new(self.mcts, self.evaluator.clone());
        let mut pending : Vec<PendingExample> = Vec::new();

        let display = self.display.as_ref().filter(|_| show);
        if let Some(display) = display 
        {
            display.reset();
        }

        let mut step = 0;
        while ! game.is_over()
        {
            step += 1;

            let probs = search.action_probabilities(& game, self.exploration.temperature(step))?;
            let noised = self.exploration.apply(& probs, & game.legal_moves(), rng)?;

            let target = match self.selfplay.record_noised_policy 
            {
                true  => & noised,
                false => & probs
            };

            let last_action = game.last_move();
            let current_player = game.current_player().value();

            for image in symmetry::augment(& game.board().rows(), target)?
            {
                pending.push(PendingExample 
                {
                    board: image.board,
                    last_action: last_action.map(|a| image.transform.apply_to_index(a, n)),
                    current_player,
                    policy: image.policy
                });
            }

            let action = ExplorationPolicy::sample(& noised, rng)?;
            if let Some(display) = display 
            {
                display.execute_move(game.current_player(), action);
            }

            game.execute_move(action)?;
            search.advance(action);
        }

        let (_, winner) = game.game_status();
        Ok(pending.into_iter().map(|p| p.finish(winner)).collect())
    }

    ///
    /// Plays `num_eps` episodes on the worker pool and returns their 
    /// examples in episode order. Odd episodes open with Black, even ones 
    /// with White, and only the first is shown.
    ///
    pub fn run_round (& self, iteration: usize, num_eps: usize) -> Result<Vec<Vec<TrainingExample>>>
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.selfplay.parallel_play_size.max(1))
            .thread_name(|i| format!("selfplay-{}", i))
            .build()
            .context("Failed to build the self-play worker pool.")?;

        pool.install(|| 
        {
            (1 ..= num_eps).into_par_iter()
                .map(|k| 
                {
                    let first = match k % 2 
                    {
                        1 => Player::Black,
                        _ => Player::White
                    };

                    let mut rng = match self.selfplay.seed 
                    {
                        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add((iteration * num_eps + k) as u64)),
                        None       => StdRng::from_entropy()
                    };

                    let examples = self.run_episode(first, k == 1, & mut rng)
                        .context(format!("Self-play episode {} failed.", k))?;

                    log::info!("Episode {}: {} steps", k, examples.len() / 8);
                    Ok(examples)
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;
    use crate::testing::Uniform;

    fn config (explore_num: usize, record_noised_policy: bool) -> Config 
    {
        let mut config = Config::default();
        config.game = GameConfig { n: 3, n_in_row: 3 };
        config.mcts = MCTSConfig { num_mcts_sims: 24, c_puct: 5.0, c_virtual_loss: 3.0, thread_pool_size: 2 };
        config.selfplay.parallel_play_size = 2;
        config.selfplay.explore_num = explore_num;
        config.selfplay.record_noised_policy = record_noised_policy;
        config.selfplay.seed = Some(7);
        config
    }

    fn selfplay (config: & Config) -> SelfPlay<Uniform>
    {
        SelfPlay::new(config, Arc::new(Uniform::default()), None)
    }

    #[test]
    fn values_agree_with_the_player_to_move ()
    {
        let selfplay = selfplay(& config(4, true));
        let examples = selfplay.run_episode(Player::Black, false, & mut StdRng::seed_from_u64(1)).unwrap();

        assert!(! examples.is_empty());
        assert_eq!(examples.len() % 8, 0);

        let black = examples.iter().find(|e| e.current_player == 1).unwrap().value;
        for example in & examples 
        {
            assert!([-1.0, 0.0, 1.0].contains(& example.value));
            assert_eq!(example.value, black * example.current_player as f32);
        }
    }

    #[test]
    fn policies_are_distributions_over_empty_points ()
    {
        let selfplay = selfplay(& config(9, true));
        let examples = selfplay.run_episode(Player::White, false, & mut StdRng::seed_from_u64(2)).unwrap();

        for example in & examples 
        {
            assert_eq!(example.policy.len(), 9);
            assert!((example.policy.iter().sum::<f32>() - 1.0).abs() < 1e-4);

            for (p, stone) in example.policy.iter().zip(example.board.concat())
            {
                if stone != 0 
                {
                    assert_eq!(* p, 0.0);
                }
            }
        }
    }

    #[test]
    fn episodes_open_on_an_empty_board ()
    {
        let selfplay = selfplay(& config(2, true));
        let examples = selfplay.run_episode(Player::Black, false, & mut StdRng::seed_from_u64(3)).unwrap();

        for example in & examples[.. 8]
        {
            assert!(example.board.concat().iter().all(|& s| s == 0));
            assert_eq!(example.last_action, None);
            assert_eq!(example.current_player, 1);
        }

        // The second move sees one stone, and its last action points at it.
        for example in & examples[8 .. 16]
        {
            let stones = example.board.concat();
            let last = example.last_action.unwrap();
            assert_eq!(stones[last], 1);
            assert_eq!(stones.iter().filter(|& & s| s != 0).count(), 1);
        }
    }

    #[test]
    fn a_round_alternates_the_opening_player ()
    {
        let selfplay = selfplay(& config(3, true));
        let round = selfplay.run_round(0, 4).unwrap();

        let openers : Vec<i8> = round.iter().map(|episode| episode[0].current_player).collect();
        assert_eq!(openers, vec![1, -1, 1, -1]);
    }

    #[test]
    fn raw_targets_are_one_hot_after_exploration ()
    {
        let selfplay = selfplay(& config(0, false));
        let examples = selfplay.run_episode(Player::Black, false, & mut StdRng::seed_from_u64(4)).unwrap();

        for example in & examples 
        {
            assert_eq!(example.policy.iter().filter(|& & p| p == 1.0).count(), 1);
            assert_eq!(example.policy.iter().filter(|& & p| p == 0.0).count(), 8);
        }
    }
}
