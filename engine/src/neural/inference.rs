
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::config::Config as NeuralConfig;
use super::network::Network;
use super::{Evaluation, Evaluator, Position};

use utils::error::*;
use utils::log;

///
/// A pending evaluation and the channel its answer goes back on.
///
struct Request 
{
    position: Position,
    reply: Sender<Result<Evaluation>>
}

///
/// The shared inference engine for a self-play round or a contest.
///
/// A single batching thread owns the network. Callers push requests onto 
/// a channel and block on their own reply channel; the batching thread 
/// waits for one request, drains up to `width` queued ones, and answers 
/// all of them with a single forward pass. Dropping the handle closes the 
/// queue and joins the thread.
///
pub struct Inference 
{
    queue: Option<Sender<Request>>,
    handle: Option<JoinHandle<()>>
}

impl Inference 
{
    ///
    /// Loads the weights at the given path and starts the batching thread.
    ///
    pub fn new (config: & NeuralConfig, checkpoint: & Path, use_gpu: bool, width: usize) -> Result<Inference>
    {
        let network = Network::from_checkpoint(config, checkpoint, Network::device(use_gpu))?;
        let (queue, requests) = mpsc::channel::<Request>();
        let width = width.max(1);

        let handle = thread::Builder::new()
            .name("inference".to_owned())
            .spawn(move || Inference::serve(network, requests, width))
            .context("Failed to spawn the inference thread.")?;

        log::debug!("Inference started on '{}' with batch width {}.", checkpoint.display(), width);

        Ok(Inference { queue: Some(queue), handle: Some(handle) })
    }

    ///
    /// Answers requests in batches until every sender is gone.
    ///
    fn serve (network: Network, requests: Receiver<Request>, width: usize)
    {
        while let Ok(first) = requests.recv()
        {
            let mut batch = vec![first];
            while batch.len() < width 
            {
                match requests.try_recv()
                {
                    Ok(request) => batch.push(request),
                    Err(_)      => break
                }
            }

            let positions : Vec<Position> = batch.iter().map(|r| r.position.clone()).collect();

            match network.predict(& positions)
            {
                Ok(evaluations) => 
                {
                    for (request, evaluation) in batch.into_iter().zip(evaluations)
                    {
                        let _ = request.reply.send(Ok(evaluation));
                    }
                },
                Err(e) => 
                {
                    log::error!("Inference failed on a batch of {}: {:#}", positions.len(), e);
                    for request in batch 
                    {
                        let _ = request.reply.send(Err(error!("Inference failed: {:#}", e)));
                    }
                }
            }
        }
    }
}

impl Evaluator for Inference 
{
    fn evaluate (& self, positions: Vec<Position>) -> Result<Vec<Evaluation>>
    {
        let queue = self.queue.as_ref().ok_or_else(|| error!("The inference queue is closed."))?;

        let mut replies = Vec::with_capacity(positions.len());
        for position in positions 
        {
            let (reply, answer) = mpsc::channel();
            queue.send(Request { position, reply }).map_err(|_| error!("The inference thread has stopped."))?;
            replies.push(answer);
        }

        replies.into_iter()
            .map(|answer| answer.recv().map_err(|_| error!("The inference thread dropped a request."))?)
            .collect()
    }
}

impl Drop for Inference 
{
    fn drop (& mut self)
    {
        self.queue.take();
        if let Some(handle) = self.handle.take()
        {
            let _ = handle.join();
        }
    }
}
