
use thiserror::Error;

use utils::{Serialize, Deserialize};

pub use crate::mcts::config::Config as MCTSConfig;
pub use crate::neural::config::Config as NeuralConfig;
pub use crate::selfplay::config::Config as SelfplayConfig;

///
/// Represents a full configuration.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub mcts: MCTSConfig,

    #[serde(default)]
    pub neural: NeuralConfig,

    #[serde(default)]
    pub selfplay: SelfplayConfig,

    #[serde(default = "log_path")]
    pub log_path: String
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            game: GameConfig::default(),
            mcts: MCTSConfig::default(),
            neural: NeuralConfig::default(),
            selfplay: SelfplayConfig::default(),
            log_path: log_path()
        }
    }
}

///
/// The board being played.
///
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GameConfig 
{
    #[serde(default = "n")]
    pub n: usize,

    #[serde(default = "n_in_row")]
    pub n_in_row: usize
}

impl Default for GameConfig 
{
    fn default () -> GameConfig 
    {
        GameConfig { n: n(), n_in_row: n_in_row() }
    }
}

///
/// The first invalid setting found by Config::validate().
///
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError 
{
    #[error("game.n must be between 3 and 26 for point notation, got {0}")]
    BoardSize(usize),

    #[error("game.n_in_row must be between 2 and game.n ({1}), got {0}")]
    LineLength(usize, usize),

    #[error("{0} must be at least 1")]
    NotPositive(& 'static str),

    #[error("selfplay.dirichlet_alpha must be positive and finite, got {0}")]
    DirichletAlpha(f32),

    #[error("selfplay.temp must be non-negative and finite, got {0}")]
    Temperature(f32),

    #[error("selfplay.update_threshold must lie in [0, 1], got {0}")]
    Threshold(f32),

    #[error("selfplay.examples_buffer_max_len ({0}) is smaller than neural.batch_size ({1}), so training could never run")]
    BufferTooSmall(usize, usize)
}

impl Config 
{
    ///
    /// Checks every setting once, before anything is started.
    ///
    pub fn validate (& self) -> Result<(), ConfigError>
    {
        let game = & self.game;
        if ! (3 ..= 26).contains(& game.n)
        {
            return Err(ConfigError::BoardSize(game.n));
        }
        if ! (2 ..= game.n).contains(& game.n_in_row)
        {
            return Err(ConfigError::LineLength(game.n_in_row, game.n));
        }

        let counts = 
        [
            ("selfplay.num_iters", self.selfplay.num_iters),
            ("selfplay.num_eps", self.selfplay.num_eps),
            ("selfplay.parallel_play_size", self.selfplay.parallel_play_size),
            ("selfplay.check_freq", self.selfplay.check_freq),
            ("selfplay.contest_num", self.selfplay.contest_num),
            ("selfplay.examples_buffer_max_len", self.selfplay.examples_buffer_max_len),
            ("mcts.num_mcts_sims", self.mcts.num_mcts_sims),
            ("mcts.thread_pool_size", self.mcts.thread_pool_size),
            ("neural.epochs", self.neural.epochs),
            ("neural.batch_size", self.neural.batch_size)
        ];
        if let Some((name, _)) = counts.iter().find(|(_, value)| * value == 0)
        {
            return Err(ConfigError::NotPositive(* name));
        }

        let alpha = self.selfplay.dirichlet_alpha;
        if ! (alpha.is_finite() && alpha > 0.0)
        {
            return Err(ConfigError::DirichletAlpha(alpha));
        }

        let temp = self.selfplay.temp;
        if ! (temp.is_finite() && temp >= 0.0)
        {
            return Err(ConfigError::Temperature(temp));
        }

        let threshold = self.selfplay.update_threshold;
        if ! (0.0 ..= 1.0).contains(& threshold)
        {
            return Err(ConfigError::Threshold(threshold));
        }

        if self.selfplay.examples_buffer_max_len < self.neural.batch_size 
        {
            return Err(ConfigError::BufferTooSmall(self.selfplay.examples_buffer_max_len, self.neural.batch_size));
        }

        Ok(())
    }
}

///
/// Returns the default log path.
///
fn log_path () -> String 
{
    "logs".to_owned()
}

fn n () -> usize 
{
    15
}

fn n_in_row () -> usize 
{
    5
}

#[cfg(test)]
mod tests 
{
    use super::*;

    #[test]
    fn defaults_are_valid ()
    {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn shipped_config_is_valid ()
    {
        let config : Config = toml::from_str(include_str!("../../../config/config.toml")).unwrap();

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.game.n, 15);
        assert!(config.selfplay.record_noised_policy);
        assert_eq!(config.selfplay.seed, None);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults ()
    {
        let config : Config = toml::from_str("[game]\nn = 9\n\n[selfplay]\ncontest_num = 4\n").unwrap();

        assert_eq!(config.game.n, 9);
        assert_eq!(config.game.n_in_row, 5);
        assert_eq!(config.selfplay.contest_num, 4);
        assert_eq!(config.mcts.num_mcts_sims, MCTSConfig::default().num_mcts_sims);
        assert_eq!(config.log_path, "logs");
    }

    #[test]
    fn rejects_each_kind_of_bad_setting ()
    {
        let mut config = Config::default();
        config.game.n_in_row = 16;
        assert_eq!(config.validate(), Err(ConfigError::LineLength(16, 15)));

        let mut config = Config::default();
        config.mcts.thread_pool_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::NotPositive("mcts.thread_pool_size")));

        let mut config = Config::default();
        config.selfplay.update_threshold = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::Threshold(1.5)));

        let mut config = Config::default();
        config.selfplay.dirichlet_alpha = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::DirichletAlpha(0.0)));

        let mut config = Config::default();
        config.neural.batch_size = config.selfplay.examples_buffer_max_len + 1;
        assert!(matches!(config.validate(), Err(ConfigError::BufferTooSmall(_, _))));
    }
}
