
use utils::{Serialize, Deserialize};

///
/// A configuration object for a search tree.
///
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "num_mcts_sims")]
    pub num_mcts_sims: usize,

    #[serde(default = "c_puct")]
    pub c_puct: f32,

    #[serde(default = "c_virtual_loss")]
    pub c_virtual_loss: f32,

    #[serde(default = "thread_pool_size")]
    pub thread_pool_size: usize
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            num_mcts_sims: num_mcts_sims(),
            c_puct: c_puct(),
            c_virtual_loss: c_virtual_loss(),
            thread_pool_size: thread_pool_size()
        }
    }
}

fn num_mcts_sims () -> usize 
{
    400
}

fn c_puct () -> f32 
{
    5.0
}

fn c_virtual_loss () -> f32 
{
    3.0
}

fn thread_pool_size () -> usize 
{
    4
}
