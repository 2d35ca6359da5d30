
use crate::config::*;
use crate::interfaces::display::Display;
use crate::mcts::SearchEngine;

use gomoku::{Game, Player};

use tabled::{Table, Tabled};

use utils::error::*;
use utils::log;

///
/// The tally of a promotion contest, from the candidate's side.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Tabled)]
pub struct ContestRecord 
{
    pub candidate_wins: usize,
    pub incumbent_wins: usize,
    pub draws: usize
}

impl ContestRecord 
{
    ///
    /// Returns the candidate's share of the decisive games, or None when 
    /// every game was drawn.
    ///
    pub fn accept_rate (& self) -> Option<f32>
    {
        match self.candidate_wins + self.incumbent_wins 
        {
            0        => None,
            decisive => Some(self.candidate_wins as f32 / decisive as f32)
        }
    }

    pub fn games (& self) -> usize 
    {
        self.candidate_wins + self.incumbent_wins + self.draws
    }

    ///
    /// The candidate is promoted only when some game was decisive and its 
    /// share of those strictly exceeds the threshold.
    ///
    pub fn should_promote (& self, threshold: f32) -> bool 
    {
        self.accept_rate().map_or(false, |rate| rate > threshold)
    }

    ///
    /// Renders the record as a table for the log.
    ///
    pub fn table (& self) -> String 
    {
        Table::new(vec![* self]).to_string()
    }
}

///
/// Plays the candidate against the incumbent to decide promotions.
///
pub struct Arbiter 
{
    game: GameConfig,
    display: Option<Display>
}

impl Arbiter 
{
    ///
    /// Plays `num_games` deterministic games. The candidate opens the first 
    /// half and the incumbent the rest, which gets the extra game when the 
    /// count is odd. Both searches are reset before every game.
    ///
    pub fn contest (& self, candidate: & mut dyn SearchEngine, incumbent: & mut dyn SearchEngine, num_games: usize) -> Result<ContestRecord>
    {
        let mut record = ContestRecord::default();

        for game in 0 .. num_games 
        {
            let candidate_first = game < num_games / 2;
            let winner = match candidate_first 
            {
                true  => self.play(candidate, incumbent, game == 0)?,
                false => self.play(incumbent, candidate, game == 0)?
            };

            match (winner, candidate_first)
            {
                (Player::None, _)             => record.draws += 1,
                (Player::Black, true)  
                | (Player::White, false)      => record.candidate_wins += 1,
                _                             => record.incumbent_wins += 1
            }

            log::debug!("Contest game {}: winner {:?}, candidate first {}.", game + 1, winner, candidate_first);
        }

        Ok(record)
    }

    pub fn new (game: GameConfig, display: Option<Display>) -> Arbiter 
    {
        Arbiter { game, display }
    }

    ///
    /// Plays one game where the first engine has Black, and returns the 
    /// winner or Player::None on a draw.
    ///
    fn play (& self, black: & mut dyn SearchEngine, white: & mut dyn SearchEngine, show: bool) -> Result<Player>
    {
        let mut game = Game::new(self.game.n, self.game.n_in_row, Player::Black);

        black.reset();
        white.reset();

        let display = self.display.as_ref().filter(|_| show);
        if let Some(display) = display 
        {
            display.reset();
        }

        while ! game.is_over()
        {
            let player = game.current_player();
            let engine : & mut dyn SearchEngine = match player 
            {
                Player::Black => & mut * black,
                _             => & mut * white
            };

            let action = best_action(& engine.action_probabilities(& game, 0.0)?)?;

            if let Some(display) = display 
            {
                display.execute_move(player, action);
            }

            game.execute_move(action)?;
            black.advance(action);
            white.advance(action);
        }

        let (_, winner) = game.game_status();
        Ok(Player::from_sign(winner))
    }
}

///
/// Returns the most probable move, the lowest index on ties.
///
pub fn best_action (probs: & [f32]) -> Result<usize>
{
    probs.iter()
        .enumerate()
        .fold(None, |best : Option<(usize, f32)>, (i, & p)| match best 
        {
            Some((_, q)) if q >= p => best,
            _                      => Some((i, p))
        })
        .map(|(i, _)| i)
        .ok_or_else(|| error!("Cannot choose a move from an empty distribution."))
}
