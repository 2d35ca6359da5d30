
use std::io::BufRead;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::*;
use crate::mcts::search::Search;
use crate::mcts::SearchEngine;
use crate::neural::inference::Inference;
use crate::neural::Slot;
use crate::selfplay::arbiter::best_action;

use gomoku::{Game, Player, Point};

use super::display::Display;

use utils::error::*;
use utils::log;
use utils::notate::Notate;

///
/// A game between a human on standard input and the best checkpoint.
///
pub struct HumanPlay<S: SearchEngine>
{
    game: GameConfig,
    engine: S,
    human: Player,
    display: Display,
    handle: Option<JoinHandle<()>>
}

impl HumanPlay<Search<Inference>>
{
    ///
    /// Loads the best checkpoint with a wider and deeper search than 
    /// self-play uses. The human plays Black when moving first.
    ///
    pub fn new (config: & Config, human_first: bool) -> Result<HumanPlay<Search<Inference>>>
    {
        let neural = & config.neural;
        let mcts = MCTSConfig 
        {
            num_mcts_sims: config.mcts.num_mcts_sims * 4,
            thread_pool_size: config.mcts.thread_pool_size * 2,
            ..config.mcts
        };

        let inference = Inference::new(neural, & neural.slot_path(Slot::Best), neural.libtorch_use_gpu, mcts.thread_pool_size)?;
        let (display, handle) = Display::spawn(config.game.n)?;

        let human = match human_first 
        {
            true  => Player::Black,
            false => Player::White
        };

        Ok(HumanPlay 
        {
            game: config.game,
            engine: Search::new(mcts, Arc::new(inference)),
            human,
            display,
            handle: Some(handle)
        })
    }
}

impl<S: SearchEngine> HumanPlay<S>
{
    ///
    /// Reads moves until one parses and is legal. Bad input is logged and 
    /// prompted for again.
    ///
    fn read_move<R: BufRead> (& self, game: & Game, input: & mut R) -> Result<usize>
    {
        let n = self.game.n;
        let mut line = String::new();

        loop 
        {
            self.display.set_awaiting_human(true);

            line.clear();
            if input.read_line(& mut line)? == 0 
            {
                bail!("Standard input closed before the game ended.");
            }

            let point = match Point::parse(& line)
            {
                Ok(point) => point,
                Err(e) => 
                {
                    log::error!("{:#}", e);
                    continue;
                }
            };

            if ! point.in_bounds(n) || ! game.legal_moves()[point.index(n)]
            {
                log::error!("{} is not a legal move.", point.notate());
                continue;
            }

            self.display.set_awaiting_human(false);
            return Ok(point.index(n));
        }
    }

    ///
    /// Plays one game to the end and returns the winner.
    ///
    pub fn run<R: BufRead> (& mut self, input: & mut R) -> Result<Player>
    {
        let mut game = Game::new(self.game.n, self.game.n_in_row, Player::Black);
        self.engine.reset();
        self.display.reset();

        while ! game.is_over()
        {
            let player = game.current_player();
            let action = match player == self.human 
            {
                true  => self.read_move(& game, input)?,
                false => best_action(& self.engine.action_probabilities(& game, 0.0)?)?
            };

            self.display.execute_move(player, action);
            game.execute_move(action)?;
            self.engine.advance(action);
        }

        let (_, winner) = game.game_status();
        let winner = Player::from_sign(winner);

        match winner 
        {
            Player::None              => log::info!("draw"),
            w if w == self.human      => log::info!("human win"),
            _                         => log::info!("alpha win")
        }

        Ok(winner)
    }

    ///
    /// Plays one game on standard input, then waits for the view to close.
    ///
    pub fn run_loop (mut self) -> Result<()>
    {
        let stdin = std::io::stdin();
        self.run(& mut stdin.lock())?;

        let handle = self.handle.take();
        drop(self);

        if let Some(handle) = handle 
        {
            if handle.join().is_err()
            {
                log::warn!("The display thread panicked.");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;
    use crate::interfaces::display::DisplayEvent;
    use crate::testing::Scripted;

    use std::io::Cursor;
    use std::sync::mpsc::Receiver;

    fn session (human: Player) -> (HumanPlay<Scripted>, Receiver<DisplayEvent>)
    {
        let (display, events) = Display::detached();
        let play = HumanPlay { game: GameConfig { n: 3, n_in_row: 3 }, engine: Scripted::lowest(9), human, display, handle: None };
        (play, events)
    }

    fn count (events: & [DisplayEvent], matches: fn(& DisplayEvent) -> bool) -> usize 
    {
        events.iter().filter(|e| matches(e)).count()
    }

    #[test]
    fn human_can_win ()
    {
        // Human: down the first column. Engine: b1 c1.
        let (mut play, events) = session(Player::Black);
        let winner = play.run(& mut Cursor::new("a1\na2\na3\n")).unwrap();

        assert_eq!(winner, Player::Black);
        assert_eq!(play.engine.resets, 1);
        assert_eq!(play.engine.advances, 5);

        drop(play);
        let events : Vec<DisplayEvent> = events.iter().collect();

        assert_eq!(events[0], DisplayEvent::Reset);
        assert_eq!(events[1], DisplayEvent::Prompt);
        assert_eq!(count(& events, |e| matches!(e, DisplayEvent::Move { .. })), 5);
        assert_eq!(count(& events, |e| * e == DisplayEvent::Prompt), 3);
        assert_eq!(events.last(), Some(& DisplayEvent::Move { player: Player::Black, action: 6 }));
    }

    #[test]
    fn bad_input_is_prompted_again ()
    {
        // The engine opens at a1.
        let (mut play, events) = session(Player::White);
        let input = "zz\na1\nq9\nc3\nb3\na3\n";

        let winner = play.run(& mut Cursor::new(input)).unwrap();

        // Engine: a1 b1 c1 along the top row.
        assert_eq!(winner, Player::Black);

        drop(play);
        let events : Vec<DisplayEvent> = events.iter().collect();

        // Four attempts for the first move, one for the second.
        assert_eq!(count(& events, |e| * e == DisplayEvent::Prompt), 5);
        assert_eq!(count(& events, |e| matches!(e, DisplayEvent::Move { .. })), 5);
    }

    #[test]
    fn closed_input_is_an_error ()
    {
        let (mut play, _) = session(Player::Black);
        assert!(play.run(& mut Cursor::new("a1\n")).is_err());
    }
}
