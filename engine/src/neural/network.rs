
use std::path::Path;

use crate::selfplay::example::TrainingExample;

use rand::seq::SliceRandom;

use super::config::Config as NeuralConfig;
use super::input::*;
use super::{Evaluation, Position, Slot, Trainer};

use tch::{Device, Kind, Reduction, Tensor};
use tch::jit::{IValue, TrainableCModule};
use tch::nn::{Adam, OptimizerConfig, VarStore};

use utils::error::*;
use utils::log;

///
/// A network that functions simultaneously as a policy and value head.
///
/// The architecture lives in a TorchScript template exported outside of 
/// this workspace; the weights live in a VarStore and are what the 
/// checkpoint slots hold. The input is a batch of [3, n, n] planes (see 
/// Input). The template returns a tuple of:
/// - log-probabilities over the n * n moves, unmasked; and
/// - a tanh value in the perspective of the player to move.
///
#[derive(Debug)]
pub struct Network 
{
    config: NeuralConfig,
    device: Device,
    vs: VarStore,
    model: TrainableCModule
}

// The inference service moves a network onto its batching thread; the 
// network is only ever touched from one thread at a time.
unsafe impl Send for Network {}

impl Network 
{
    ///
    /// Returns the device for a use-gpu flag.
    ///
    pub fn device (use_gpu: bool) -> Device 
    {
        match use_gpu 
        {
            true  => Device::cuda_if_available(),
            false => Device::Cpu
        }
    }

    ///
    /// For a batch of input planes, predicts the log-policy and value tensors.
    ///
    pub fn forward (& self, input: & Tensor) -> Result<(Tensor, Tensor)>
    {
        let output = self.model.forward_is(& [IValue::Tensor(input.shallow_clone())])?;

        if let IValue::Tuple(values) = & output 
        {
            if let [IValue::Tensor(policy), IValue::Tensor(value)] = values.as_slice()
            {
                return Ok((policy.shallow_clone(), value.shallow_clone()));
            }
        }

        Err(error!("Expected the model to return a (policy, value) tensor pair."))
    }

    ///
    /// Creates a network from the template and loads the weights file at the given path.
    ///
    pub fn from_checkpoint (config: & NeuralConfig, path: & Path, device: Device) -> Result<Network>
    {
        let mut net = Network::from_template(config, device)?;
        net.vs.load(path).context(format!("Failed to load weights file from '{}'.", path.display()))?;

        Ok(net)
    }

    ///
    /// Creates a freshly initialized network from the template file.
    ///
    pub fn from_template (config: & NeuralConfig, device: Device) -> Result<Network> 
    {
        let vs = VarStore::new(device);
        let template_path = config.template_path();
        let model = TrainableCModule::load(& template_path, vs.root()).context(format!("Failed to load template file from '{}'.", template_path.display()))?;

        let mut net = Network { config: config.clone(), device, vs, model };
        net.model.set_eval();

        Ok(net)
    }

    ///
    /// Overwrites the weights with those of a checkpoint slot.
    ///
    pub fn load (& mut self, slot: Slot) -> Result<()>
    {
        let path = self.config.slot_path(slot);
        self.vs.load(& path).context(format!("Failed to load weights file from '{}'.", path.display()))?;
        Ok(())
    }

    ///
    /// Predicts the policy and value of every position in one forward pass.
    ///
    pub fn predict (& self, positions: & [Position]) -> Result<Vec<Evaluation>>
    {
        if positions.is_empty()
        {
            return Ok(Vec::new());
        }

        let inputs : Vec<Tensor> = positions.iter().map(|p| Input::from(p).0).collect();
        let batch = Tensor::stack(& inputs, 0).to_device(self.device);

        let (log_policy, value) = tch::no_grad(|| self.forward(& batch))?;

        let count = positions.len();
        let action_size = log_policy.size().last().copied().unwrap_or(0) as usize;

        let mut policy_data = vec![0.0_f32; count * action_size];
        log_policy.exp().to_device(Device::Cpu).contiguous().copy_data(& mut policy_data, count * action_size);

        let mut value_data = vec![0.0_f32; count];
        value.reshape(& [-1]).to_device(Device::Cpu).contiguous().copy_data(& mut value_data, count);

        let evaluations = policy_data.chunks(action_size.max(1))
            .zip(value_data)
            .map(|(policy, value)| Evaluation { policy: policy.to_vec(), value })
            .collect();

        Ok(evaluations)
    }

    ///
    /// Stacks the examples at the given indices into input, policy-target 
    /// and value-target tensors on this network's device.
    ///
    fn batch (& self, examples: & [TrainingExample], indices: & [usize]) -> (Tensor, Tensor, Tensor)
    {
        let inputs : Vec<Tensor> = indices.iter()
            .map(|& i| Input::from(& examples[i].position()).0)
            .collect();

        let policies : Vec<f32> = indices.iter()
            .flat_map(|& i| examples[i].policy.iter().copied())
            .collect();

        let values : Vec<f32> = indices.iter()
            .map(|& i| examples[i].value)
            .collect();

        let action_size = examples[indices[0]].policy.len() as i64;

        (
            Tensor::stack(& inputs, 0).to_device(self.device),
            Tensor::of_slice(& policies).reshape(& [indices.len() as i64, action_size]).to_device(self.device),
            Tensor::of_slice(& values).to_device(self.device)
        )
    }
}

impl Trainer for Network 
{
    ///
    /// Runs the configured number of epochs over shuffled mini-batches. The 
    /// loss is the policy cross-entropy against the recorded distribution 
    /// plus the squared error against the game result.
    ///
    fn train (& mut self, examples: & [TrainingExample], batch_size: usize) -> Result<()>
    {
        ensure!(batch_size > 0, "The training batch size must be positive.");

        if examples.is_empty()
        {
            return Ok(());
        }

        self.model.set_train();

        let mut optimizer = Adam { wd: self.config.l2, ..Default::default() }.build(& self.vs, self.config.lr)?;
        let mut order : Vec<usize> = (0 .. examples.len()).collect();
        let mut rng = rand::thread_rng();

        for epoch in 1 ..= self.config.epochs 
        {
            order.shuffle(& mut rng);

            let mut total = 0.0;
            let mut batches = 0;

            for indices in order.chunks(batch_size)
            {
                let (input, target_policy, target_value) = self.batch(examples, indices);
                let (log_policy, value) = self.forward(& input)?;

                let loss_policy = - (target_policy * log_policy).sum_dim_intlist(& [1], false, Kind::Float).mean(Kind::Float);
                let loss_values = value.reshape(& [-1]).mse_loss(& target_value, Reduction::Mean);
                let loss = loss_policy + loss_values;

                optimizer.backward_step(& loss);

                total += loss.double_value(& []);
                batches += 1;
            }

            log::info!("Epoch {}/{}: mean loss {:.4} over {} batches.", epoch, self.config.epochs, total / batches as f64, batches);
        }

        self.model.set_eval();
        Ok(())
    }

    fn save (& self, slot: Slot) -> Result<()> 
    {
        let path = self.config.slot_path(slot);
        if let Some(parent) = path.parent()
        {
            std::fs::create_dir_all(parent).context(format!("Failed to create directory '{}'.", parent.display()))?;
        }
        self.vs.save(& path).context(format!("Failed to save model to path '{}'.", path.display()))?;
        Ok(())
    }
}
