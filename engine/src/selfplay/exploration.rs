
use crate::config::*;

use rand::Rng;
use rand::distributions::WeightedIndex;
use rand_distr::{Distribution, Gamma};

use utils::error::*;

///
/// The share of the blended distribution that comes from the search.
///
const SEARCH_WEIGHT : f32 = 0.75;

///
/// The share of the blended distribution that comes from the noise.
///
const NOISE_WEIGHT : f32 = 0.25;

///
/// Adds exploration to self-play.
///
/// The search runs at the configured temperature for the first 
/// `explore_num` moves of an episode and at temperature zero afterwards. 
/// Whatever the search returns is blended with Dirichlet noise over the 
/// legal moves, and the move actually played is sampled from the blend.
///
#[derive(Clone, Copy, Debug)]
pub struct ExplorationPolicy 
{
    alpha: f32,
    temp: f32,
    explore_num: usize
}

impl ExplorationPolicy 
{
    ///
    /// Blends the search distribution with Dirichlet(alpha) noise drawn 
    /// over exactly the legal moves, and renormalizes. Illegal moves end 
    /// up with no mass.
    ///
    pub fn apply<R: Rng> (& self, probs: & [f32], legal: & [bool], rng: & mut R) -> Result<Vec<f32>>
    {
        ensure!(
            probs.len() == legal.len(), 
            "The search returned {} probabilities for {} moves.", probs.len(), legal.len()
        );
        ensure!(
            probs.iter().all(|p| p.is_finite() && * p >= 0.0), 
            "The search returned a malformed distribution."
        );

        let count = legal.iter().filter(|& & l| l).count();
        ensure!(count > 0, "Tried to explore a position without legal moves.");

        let noise = self.dirichlet(count, rng)?;
        let mut noise = noise.into_iter();

        let mut blended : Vec<f32> = probs.iter()
            .zip(legal)
            .map(|(& p, & legal)| match legal 
            {
                true  => SEARCH_WEIGHT * p + NOISE_WEIGHT * noise.next().unwrap_or(0.0),
                false => 0.0
            })
            .collect();

        let total : f32 = blended.iter().sum();
        ensure!(total > 0.0 && total.is_finite(), "The blended distribution has no mass.");

        for p in & mut blended 
        {
            * p /= total;
        }

        Ok(blended)
    }

    ///
    /// Samples a Dirichlet vector of the given length by normalizing 
    /// independent Gamma(alpha, 1) draws.
    ///
    fn dirichlet<R: Rng> (& self, count: usize, rng: & mut R) -> Result<Vec<f32>>
    {
        let gamma = Gamma::new(self.alpha as f64, 1.0).map_err(|e| error!("Invalid Dirichlet alpha {}: {:?}", self.alpha, e))?;
        let draws : Vec<f64> = (0 .. count).map(|_| gamma.sample(rng)).collect();
        let total : f64 = draws.iter().sum();

        // Tiny alphas can underflow every draw to zero.

        if ! (total > 0.0 && total.is_finite())
        {
            return Ok(vec![1.0 / count as f32; count]);
        }

        Ok(draws.into_iter().map(|d| (d / total) as f32).collect())
    }

    ///
    /// Creates the policy from the selfplay config.
    ///
    pub fn new (config: & SelfplayConfig) -> ExplorationPolicy 
    {
        ExplorationPolicy { alpha: config.dirichlet_alpha, temp: config.temp, explore_num: config.explore_num }
    }

    ///
    /// Draws a move index in proportion to its probability.
    ///
    pub fn sample<R: Rng> (probs: & [f32], rng: & mut R) -> Result<usize>
    {
        let index = WeightedIndex::new(probs).map_err(|e| error!("Cannot sample a move: {}", e))?;
        Ok(index.sample(rng))
    }

    ///
    /// Returns the search temperature for a 1-based episode step.
    ///
    pub fn temperature (& self, step: usize) -> f32 
    {
        match step <= self.explore_num 
        {
            true  => self.temp,
            false => 0.0
        }
    }
}
