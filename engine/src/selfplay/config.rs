
use utils::{Serialize, Deserialize};

///
/// Represents a selfplay config: the outer training loop, exploration 
/// during self-play, and the promotion contest.
///
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "num_iters")]
    pub num_iters: usize,

    #[serde(default = "num_eps")]
    pub num_eps: usize,

    #[serde(default = "parallel_play_size")]
    pub parallel_play_size: usize,

    #[serde(default = "check_freq")]
    pub check_freq: usize,

    #[serde(default = "contest_num")]
    pub contest_num: usize,

    #[serde(default = "dirichlet_alpha")]
    pub dirichlet_alpha: f32,

    #[serde(default = "temp")]
    pub temp: f32,

    #[serde(default = "update_threshold")]
    pub update_threshold: f32,

    #[serde(default = "explore_num")]
    pub explore_num: usize,

    #[serde(default = "examples_buffer_max_len")]
    pub examples_buffer_max_len: usize,

    #[serde(default = "record_noised_policy")]
    pub record_noised_policy: bool,

    #[serde(default)]
    pub display: bool,

    #[serde(default)]
    pub seed: Option<u64>
}

impl Default for Config 
{
    fn default () -> Config 
    { 
        Config 
        {
            num_iters: num_iters(),
            num_eps: num_eps(),
            parallel_play_size: parallel_play_size(),
            check_freq: check_freq(),
            contest_num: contest_num(),
            dirichlet_alpha: dirichlet_alpha(),
            temp: temp(),
            update_threshold: update_threshold(),
            explore_num: explore_num(),
            examples_buffer_max_len: examples_buffer_max_len(),
            record_noised_policy: record_noised_policy(),
            display: false,
            seed: None
        }
    }
}

fn num_iters () -> usize 
{
    10000
}

fn num_eps () -> usize 
{
    10
}

fn parallel_play_size () -> usize 
{
    5
}

fn check_freq () -> usize 
{
    20
}

fn contest_num () -> usize 
{
    10
}

fn dirichlet_alpha () -> f32 
{
    0.3
}

fn temp () -> f32 
{
    1.0
}

fn update_threshold () -> f32 
{
    0.55
}

fn explore_num () -> usize 
{
    10
}

fn examples_buffer_max_len () -> usize 
{
    20000
}

fn record_noised_policy () -> bool 
{
    true
}
