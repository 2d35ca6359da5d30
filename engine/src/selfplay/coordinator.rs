
use std::path::PathBuf;

use crate::neural::{Slot, Trainer};

use super::buffer::ExperienceBuffer;

use utils::error::*;
use utils::log;

///
/// Decides when the model is trained, and persists what training used.
///
pub struct TrainingCoordinator<T: Trainer>
{
    trainer: T,
    buffer: ExperienceBuffer,
    batch_size: usize,
    buffer_path: PathBuf
}

impl<T: Trainer> TrainingCoordinator<T>
{
    pub fn buffer (& self) -> & ExperienceBuffer 
    {
        & self.buffer
    }

    pub fn buffer_mut (& mut self) -> & mut ExperienceBuffer 
    {
        & mut self.buffer
    }

    ///
    /// Trains over the whole buffer once it holds at least one batch, then 
    /// saves the current checkpoint and the buffer. Returns whether 
    /// training happened.
    ///
    pub fn maybe_train (& mut self) -> Result<bool>
    {
        if self.buffer.len() < self.batch_size 
        {
            log::debug!("Skipped training on {} examples, below one batch of {}.", self.buffer.len(), self.batch_size);
            return Ok(false);
        }

        let decisive = self.buffer.iter().filter(|e| e.value != 0.0).count();
        log::info!("Training on {} examples, {} from decisive games.", self.buffer.len(), decisive);

        self.trainer.train(self.buffer.as_slice(), self.batch_size)?;
        self.trainer.save(Slot::Current)?;
        self.buffer.save(& self.buffer_path)?;

        Ok(true)
    }

    pub fn new (trainer: T, buffer: ExperienceBuffer, batch_size: usize, buffer_path: PathBuf) -> TrainingCoordinator<T>
    {
        TrainingCoordinator { trainer, buffer, batch_size, buffer_path }
    }

    pub fn trainer (& self) -> & T 
    {
        & self.trainer
    }
}
