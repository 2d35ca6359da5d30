
use std::path::PathBuf;

use super::Slot;

use utils::{Serialize, Deserialize};

///
/// A configuration for the policy-value network and its training.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "path")]
    pub path: String,

    #[serde(default = "template")]
    pub template: String,

    #[serde(default = "lr")]
    pub lr: f64,

    #[serde(default = "l2")]
    pub l2: f64,

    #[serde(default = "epochs")]
    pub epochs: usize,

    #[serde(default = "batch_size")]
    pub batch_size: usize,

    #[serde(default = "use_gpu")]
    pub train_use_gpu: bool,

    #[serde(default = "use_gpu")]
    pub libtorch_use_gpu: bool
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            path: path(),
            template: template(),
            lr: lr(),
            l2: l2(),
            epochs: epochs(),
            batch_size: batch_size(),
            train_use_gpu: use_gpu(),
            libtorch_use_gpu: use_gpu()
        }
    }
}

impl Config 
{
    ///
    /// Returns the persisted experience buffer path.
    ///
    pub fn examples_path (& self) -> PathBuf 
    {
        PathBuf::from(& self.path).join("checkpoint.example")
    }

    ///
    /// Returns the weights file of a checkpoint slot.
    ///
    pub fn slot_path (& self, slot: Slot) -> PathBuf 
    {
        PathBuf::from(& self.path).join(format!("{}.ot", slot.stem()))
    }

    ///
    /// Returns the TorchScript architecture template.
    ///
    pub fn template_path (& self) -> PathBuf 
    {
        PathBuf::from(& self.path).join(& self.template)
    }
}

fn path () -> String 
{
    "models".to_owned()
}

fn template () -> String 
{
    "template.pt".to_owned()
}

fn lr () -> f64 
{
    0.001
}

fn l2 () -> f64 
{
    0.0001
}

fn epochs () -> usize 
{
    5
}

fn batch_size () -> usize 
{
    512
}

fn use_gpu () -> bool 
{
    true
}
