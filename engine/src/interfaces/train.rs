
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::*;
use crate::mcts::search::Search;
use crate::mcts::SearchEngine;
use crate::neural::inference::Inference;
use crate::neural::network::Network;
use crate::neural::{Evaluator, Slot, Trainer};
use crate::selfplay::arbiter::Arbiter;
use crate::selfplay::buffer::ExperienceBuffer;
use crate::selfplay::coordinator::TrainingCoordinator;
use crate::selfplay::orchestrator::SelfPlay;

use super::display::Display;

use utils::error::*;
use utils::log;

///
/// Where the learner gets its models from.
///
pub trait Backend 
{
    type Model: Trainer;
    type Evaluator: Evaluator;
    type Contestant: SearchEngine + 'static;

    ///
    /// Determines whether a checkpoint slot has been written before.
    ///
    fn checkpoint_exists (& self, slot: Slot) -> bool;

    ///
    /// Returns the model to train: freshly initialized, or with the 
    /// current checkpoint loaded when resuming.
    ///
    fn model (& self, resume: bool) -> Result<Self::Model>;

    ///
    /// Serves the given checkpoint, batching up to `width` positions.
    ///
    fn evaluator (& self, slot: Slot, width: usize) -> Result<Self::Evaluator>;

    ///
    /// Returns a contest player searching with the given checkpoint.
    ///
    fn contestant (& self, slot: Slot) -> Result<Self::Contestant>;
}

///
/// The libtorch backend: checkpoints are weight files under `neural.path`.
///
pub struct Torch 
{
    config: Config
}

impl Backend for Torch 
{
    type Model = Network;
    type Evaluator = Inference;
    type Contestant = Search<Inference>;

    fn checkpoint_exists (& self, slot: Slot) -> bool 
    {
        self.config.neural.slot_path(slot).exists()
    }

    fn model (& self, resume: bool) -> Result<Network>
    {
        let neural = & self.config.neural;
        let mut network = Network::from_template(neural, Network::device(neural.train_use_gpu))?;
        if resume 
        {
            network.load(Slot::Current)?;
        }
        Ok(network)
    }

    fn evaluator (& self, slot: Slot, width: usize) -> Result<Inference>
    {
        let neural = & self.config.neural;
        Inference::new(neural, & neural.slot_path(slot), neural.libtorch_use_gpu, width)
    }

    fn contestant (& self, slot: Slot) -> Result<Search<Inference>>
    {
        let inference = self.evaluator(slot, self.config.mcts.thread_pool_size)?;
        Ok(Search::new(self.config.mcts, Arc::new(inference)))
    }
}

///
/// What one iteration of the outer loop ended with.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome 
{
    Collected,
    Trained,
    Promoted,
    Rejected
}

///
/// The outer training loop: self-play, train, and every `check_freq` 
/// iterations a contest against the best checkpoint.
///
pub struct Learner<B: Backend>
{
    config: Config,
    backend: B,
    display: Option<(Display, JoinHandle<()>)>
}

impl Learner<Torch>
{
    ///
    /// Creates a learner on libtorch, starting the board view when configured.
    ///
    pub fn new (config: & Config) -> Result<Learner<Torch>>
    {
        let display = match config.selfplay.display 
        {
            true  => Some(Display::spawn(config.game.n)?),
            false => None
        };

        Ok(Learner::with_backend(config, Torch { config: config.clone() }, display))
    }
}

impl<B: Backend> Learner<B>
{
    ///
    /// Contests the current checkpoint against the best one and promotes 
    /// it when it wins often enough. Returns whether it was promoted.
    ///
    fn evaluate (& self, arbiter: & Arbiter, coordinator: & TrainingCoordinator<B::Model>) -> Result<bool>
    {
        let mut candidate = self.backend.contestant(Slot::Current)?;
        let mut incumbent = self.backend.contestant(Slot::Best)?;

        let record = arbiter.contest(& mut candidate, & mut incumbent, self.config.selfplay.contest_num)?;

        log::info!(
            "NEW/PREV WINS : {} / {} ; DRAWS : {} ({} games)\n{}", 
            record.candidate_wins, record.incumbent_wins, record.draws, record.games(), record.table()
        );

        match record.should_promote(self.config.selfplay.update_threshold)
        {
            true => 
            {
                log::info!("ACCEPTING NEW MODEL");
                coordinator.trainer().save(Slot::Best)?;
                Ok(true)
            },
            false => 
            {
                log::info!("REJECTING NEW MODEL");
                Ok(false)
            }
        }
    }

    ///
    /// Plays one round of self-play, trains once the buffer holds a batch, 
    /// and runs the contest on every `check_freq`-th iteration that trained.
    ///
    pub fn iterate (& self, iteration: usize, arbiter: & Arbiter, coordinator: & mut TrainingCoordinator<B::Model>) -> Result<Outcome>
    {
        let selfplay = & self.config.selfplay;
        log::info!("ITER :: {}", iteration);

        let width = self.config.mcts.thread_pool_size * selfplay.parallel_play_size;
        let evaluator = self.backend.evaluator(Slot::Current, width)?;

        let round = SelfPlay::new(& self.config, Arc::new(evaluator), self.view())
            .run_round(iteration, selfplay.num_eps)?;

        for examples in round 
        {
            coordinator.buffer_mut().append_many(examples);
        }
        log::debug!("The buffer holds {} examples.", coordinator.buffer().len());

        if ! coordinator.maybe_train()?
        {
            return Ok(Outcome::Collected);
        }

        if iteration % selfplay.check_freq != 0 
        {
            return Ok(Outcome::Trained);
        }

        match self.evaluate(arbiter, coordinator)?
        {
            true  => Ok(Outcome::Promoted),
            false => Ok(Outcome::Rejected)
        }
    }

    fn join_display (self)
    {
        if let Some((display, handle)) = self.display 
        {
            drop(display);
            if handle.join().is_err()
            {
                log::warn!("The display thread panicked.");
            }
        }
    }

    ///
    /// Runs every configured iteration.
    ///
    pub fn learn (self) -> Result<()>
    {
        let mut coordinator = self.prepare()?;
        let arbiter = Arbiter::new(self.config.game, self.view());

        for iteration in 1 ..= self.config.selfplay.num_iters 
        {
            self.iterate(iteration, & arbiter, & mut coordinator)?;
        }

        drop(arbiter);
        self.join_display();

        Ok(())
    }

    ///
    /// Loads the model and buffer, resuming when a saved buffer exists, and 
    /// writes the starting checkpoints. The best slot is only written when 
    /// it is absent.
    ///
    pub fn prepare (& self) -> Result<TrainingCoordinator<B::Model>>
    {
        let neural = & self.config.neural;
        let mut buffer = ExperienceBuffer::new(self.config.selfplay.examples_buffer_max_len);

        let examples_path = neural.examples_path();
        let resume = examples_path.exists();

        let model = self.backend.model(resume)?;
        if resume 
        {
            log::info!("Resuming from '{}'.", examples_path.display());
            buffer.load(& examples_path)?;
            if buffer.is_empty()
            {
                log::warn!("The saved buffer at '{}' holds no examples.", examples_path.display());
            }
            log::info!("The buffer holds {} of {} examples.", buffer.len(), buffer.capacity());
        }

        model.save(Slot::Current)?;
        if ! self.backend.checkpoint_exists(Slot::Best)
        {
            model.save(Slot::Best)?;
        }

        Ok(TrainingCoordinator::new(model, buffer, neural.batch_size, examples_path))
    }

    fn view (& self) -> Option<Display>
    {
        self.display.as_ref().map(|(display, _)| display.clone())
    }

    ///
    /// Creates a learner on any backend.
    ///
    pub fn with_backend (config: & Config, backend: B, display: Option<(Display, JoinHandle<()>)>) -> Learner<B>
    {
        Learner { config: config.clone(), backend, display }
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;
    use crate::selfplay::example::TrainingExample;
    use crate::testing::{Recorder, Scripted, Uniform};

    use std::cell::{Cell, RefCell};
    use std::path::Path;
    use std::rc::Rc;

    ///
    /// Models that record their saves, uniform self-play, and scripted 
    /// contestants where one side always wins.
    ///
    struct Doubles 
    {
        saved: Rc<RefCell<Vec<Slot>>>,
        best_exists: bool,
        candidate_wins: bool,
        resumed: Cell<Option<bool>>,
        contests: Cell<usize>
    }

    impl Doubles 
    {
        fn new (best_exists: bool, candidate_wins: bool) -> Doubles 
        {
            Doubles 
            {
                saved: Rc::default(),
                best_exists,
                candidate_wins,
                resumed: Cell::new(None),
                contests: Cell::new(0)
            }
        }

        fn saved (& self) -> Vec<Slot>
        {
            self.saved.borrow().clone()
        }
    }

    impl Backend for Rc<Doubles>
    {
        type Model = Recorder;
        type Evaluator = Uniform;
        type Contestant = Scripted;

        fn checkpoint_exists (& self, slot: Slot) -> bool 
        {
            slot == Slot::Current || self.best_exists
        }

        fn model (& self, resume: bool) -> Result<Recorder>
        {
            self.resumed.set(Some(resume));
            Ok(Recorder::sharing(self.saved.clone()))
        }

        fn evaluator (& self, _slot: Slot, _width: usize) -> Result<Uniform>
        {
            Ok(Uniform::default())
        }

        fn contestant (& self, slot: Slot) -> Result<Scripted>
        {
            // Centre, then corners: beats lowest-index play with either colour.
            let strong = || Scripted::new(vec![4, 2, 6, 0, 1, 3, 5, 7, 8]);

            if slot == Slot::Current 
            {
                self.contests.set(self.contests.get() + 1);
            }

            Ok(match (slot == Slot::Current) == self.candidate_wins 
            {
                true  => strong(),
                false => Scripted::lowest(9)
            })
        }
    }

    fn config (models: & Path, batch_size: usize, check_freq: usize) -> Config 
    {
        let mut config = Config::default();
        config.game = GameConfig { n: 3, n_in_row: 3 };
        config.mcts = MCTSConfig { num_mcts_sims: 8, c_puct: 5.0, c_virtual_loss: 3.0, thread_pool_size: 2 };
        config.neural.path = models.to_string_lossy().into_owned();
        config.neural.batch_size = batch_size;
        config.selfplay.num_eps = 2;
        config.selfplay.parallel_play_size = 2;
        config.selfplay.check_freq = check_freq;
        config.selfplay.contest_num = 4;
        config.selfplay.examples_buffer_max_len = 4096;
        config.selfplay.seed = Some(11);
        config
    }

    fn learner (config: & Config, doubles: & Rc<Doubles>) -> Learner<Rc<Doubles>>
    {
        Learner::with_backend(config, doubles.clone(), None)
    }

    #[test]
    fn cold_start_writes_both_slots ()
    {
        let dir = tempfile::tempdir().unwrap();
        let doubles = Rc::new(Doubles::new(false, true));
        let coordinator = learner(& config(dir.path(), 8, 1), & doubles).prepare().unwrap();

        assert_eq!(doubles.resumed.get(), Some(false));
        assert!(coordinator.buffer().is_empty());
        assert_eq!(doubles.saved(), vec![Slot::Current, Slot::Best]);
    }

    #[test]
    fn resume_loads_the_buffer_and_keeps_best ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 8, 1);

        let mut saved = ExperienceBuffer::new(16);
        saved.append_many(vec![TrainingExample 
        {
            board: vec![vec![0; 3]; 3],
            last_action: None,
            current_player: 1,
            policy: vec![1.0 / 9.0; 9],
            value: 0.0
        }; 5]);
        saved.save(& config.neural.examples_path()).unwrap();

        let doubles = Rc::new(Doubles::new(true, true));
        let coordinator = learner(& config, & doubles).prepare().unwrap();

        assert_eq!(doubles.resumed.get(), Some(true));
        assert_eq!(coordinator.buffer().len(), 5);
        assert_eq!(doubles.saved(), vec![Slot::Current]);
    }

    #[test]
    fn no_training_means_no_contest ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 4096, 1);
        let doubles = Rc::new(Doubles::new(true, true));
        let learner = learner(& config, & doubles);

        let mut coordinator = learner.prepare().unwrap();
        let arbiter = Arbiter::new(config.game, None);

        for iteration in 1 ..= 2 
        {
            assert_eq!(learner.iterate(iteration, & arbiter, & mut coordinator).unwrap(), Outcome::Collected);
        }

        assert_eq!(doubles.contests.get(), 0);
        assert!(coordinator.trainer().trained.is_empty());
        assert_eq!(doubles.saved(), vec![Slot::Current]);
        assert!(! config.neural.examples_path().exists());
    }

    #[test]
    fn contests_follow_check_freq_and_promotion_writes_best ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 8, 2);
        let doubles = Rc::new(Doubles::new(true, true));
        let learner = learner(& config, & doubles);

        let mut coordinator = learner.prepare().unwrap();
        let arbiter = Arbiter::new(config.game, None);

        let outcomes : Vec<Outcome> = (1 ..= 4)
            .map(|iteration| learner.iterate(iteration, & arbiter, & mut coordinator).unwrap())
            .collect();

        assert_eq!(outcomes, vec![Outcome::Trained, Outcome::Promoted, Outcome::Trained, Outcome::Promoted]);
        assert_eq!(doubles.contests.get(), 2);
        assert_eq!(doubles.saved(), vec![
            Slot::Current, 
            Slot::Current, 
            Slot::Current, Slot::Best, 
            Slot::Current, 
            Slot::Current, Slot::Best
        ]);
        assert!(config.neural.examples_path().exists());
    }

    #[test]
    fn rejection_leaves_best_alone ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 8, 1);
        let doubles = Rc::new(Doubles::new(false, false));
        let learner = learner(& config, & doubles);

        let mut coordinator = learner.prepare().unwrap();
        let arbiter = Arbiter::new(config.game, None);

        assert_eq!(learner.iterate(1, & arbiter, & mut coordinator).unwrap(), Outcome::Rejected);
        assert_eq!(doubles.contests.get(), 1);

        // The only Best write is the cold-start one.
        assert_eq!(doubles.saved(), vec![Slot::Current, Slot::Best, Slot::Current]);
    }
}
