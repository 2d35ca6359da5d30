
use std::collections::VecDeque;
use std::path::Path;

use super::example::TrainingExample;

use utils::error::*;
use utils::log;
use utils::serialize;

///
/// The bounded store of training examples. Appends go to the back; once 
/// the capacity is reached every append evicts from the front.
///
#[derive(Clone, Debug)]
pub struct ExperienceBuffer 
{
    capacity: usize,
    examples: VecDeque<TrainingExample>
}

impl ExperienceBuffer 
{
    ///
    /// Appends every example, evicting the oldest ones past capacity.
    ///
    pub fn append_many<I: IntoIterator<Item = TrainingExample>> (& mut self, examples: I)
    {
        for example in examples 
        {
            if self.examples.len() == self.capacity 
            {
                self.examples.pop_front();
            }
            if self.capacity > 0 
            {
                self.examples.push_back(example);
            }
        }
    }

    ///
    /// Returns the contents, oldest first, as one slice.
    ///
    pub fn as_slice (& mut self) -> & [TrainingExample]
    {
        self.examples.make_contiguous()
    }

    pub fn capacity (& self) -> usize 
    {
        self.capacity
    }

    pub fn is_empty (& self) -> bool 
    {
        self.examples.is_empty()
    }

    pub fn iter (& self) -> impl Iterator<Item = & TrainingExample>
    {
        self.examples.iter()
    }

    pub fn len (& self) -> usize 
    {
        self.examples.len()
    }

    ///
    /// Replaces the contents with those saved at the given path. Contents 
    /// saved under a larger capacity lose their oldest surplus.
    ///
    pub fn load (& mut self, path: & Path) -> Result<()>
    {
        let mut examples : VecDeque<TrainingExample> = serialize::load(path)
            .context(format!("Failed to load the experience buffer from '{}'.", path.display()))?;

        while examples.len() > self.capacity 
        {
            examples.pop_front();
        }

        log::info!("Loaded {} examples from '{}'.", examples.len(), path.display());

        self.examples = examples;
        Ok(())
    }

    ///
    /// Creates an empty buffer.
    ///
    pub fn new (capacity: usize) -> ExperienceBuffer 
    {
        ExperienceBuffer { capacity, examples: VecDeque::with_capacity(capacity.min(1 << 16)) }
    }

    ///
    /// Writes the whole contents to the given path.
    ///
    pub fn save (& self, path: & Path) -> Result<()>
    {
        serialize::save(path, & self.examples)
            .context(format!("Failed to save the experience buffer to '{}'.", path.display()))
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    fn example (value: f32) -> TrainingExample 
    {
        TrainingExample 
        {
            board: vec![vec![0, 1, 0], vec![0, -1, 0], vec![0, 0, 0]],
            last_action: Some(4),
            current_player: 1,
            policy: vec![0.125, 0.0, 0.125, 0.125, 0.0, 0.125, 0.125, 0.25, 0.125],
            value
        }
    }

    fn values (buffer: & ExperienceBuffer) -> Vec<f32>
    {
        buffer.iter().map(|e| e.value).collect()
    }

    #[test]
    fn never_exceeds_capacity ()
    {
        let mut buffer = ExperienceBuffer::new(5);

        for batch in 0 .. 7 
        {
            buffer.append_many((0 .. batch).map(|i| example(i as f32)));
            assert!(buffer.len() <= 5);
        }
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn evicts_oldest_first ()
    {
        let mut buffer = ExperienceBuffer::new(3);
        buffer.append_many([1.0, 2.0].map(example));
        buffer.append_many([3.0, 4.0, 5.0].map(example));

        assert_eq!(values(& buffer), vec![3.0, 4.0, 5.0]);
        assert_eq!(buffer.as_slice().len(), 3);
    }

    #[test]
    fn save_then_load_round_trips ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("checkpoint.example");

        let mut buffer = ExperienceBuffer::new(4);
        buffer.append_many([1.0, -1.0, 0.0].map(example));
        buffer.save(& path).unwrap();

        let mut restored = ExperienceBuffer::new(4);
        restored.append_many([7.0].map(example));
        restored.load(& path).unwrap();

        assert_eq!(restored.iter().cloned().collect::<Vec<_>>(), buffer.iter().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn load_trims_to_a_smaller_capacity ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.example");

        let mut buffer = ExperienceBuffer::new(4);
        buffer.append_many([1.0, 2.0, 3.0, 4.0].map(example));
        buffer.save(& path).unwrap();

        let mut restored = ExperienceBuffer::new(2);
        restored.load(& path).unwrap();

        assert_eq!(values(& restored), vec![3.0, 4.0]);
    }

    #[test]
    fn load_fails_on_corrupt_file ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.example");
        std::fs::write(& path, b"not a buffer").unwrap();

        let mut buffer = ExperienceBuffer::new(2);
        assert!(buffer.load(& path).is_err());
        assert!(buffer.is_empty());
    }
}
