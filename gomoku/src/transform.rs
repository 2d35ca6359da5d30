
use super::point::Point;

use utils::*;

///
/// An enum that represents the 8 symmetries of a square board.
///
/// Rotations are quarter turns counterclockwise; the Refl variants apply 
/// the rotation first and then mirror the board left to right. Every 
/// transform maps an n x n board onto itself, so it can be applied 
/// equally to stones, move indices and policy vectors.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transform
{
    Identity,
    IdenRot90,
    IdenRot180,
    IdenRot270,
    Reflect,
    ReflRot90,
    ReflRot180,
    ReflRot270
}

impl Transform 
{
    ///
    /// Maps a row-major linear index on an n x n board.
    ///
    pub fn apply_to_index (& self, index: usize, n: usize) -> usize 
    {
        self.apply_to_point(& Point::from_index(index, n), n).index(n)
    }

    ///
    /// Applies this transform to the given point on an n x n board.
    ///
    pub fn apply_to_point (& self, target: & Point, n: usize) -> Point
    {
        let last = n as i32 - 1;
        let r = target.row();
        let c = target.col();

        match self 
        {
            Transform::Identity   => Point::new(r,        c),
            Transform::IdenRot90  => Point::new(last - c, r),
            Transform::IdenRot180 => Point::new(last - r, last - c),
            Transform::IdenRot270 => Point::new(c,        last - r),
            Transform::Reflect    => Point::new(r,        last - c),
            Transform::ReflRot90  => Point::new(last - c, last - r),
            Transform::ReflRot180 => Point::new(last - r, c),
            Transform::ReflRot270 => Point::new(c,        r)
        }
    }

    ///
    /// Applies this transform to a flat row-major grid of any element type.
    ///
    pub fn apply_to_grid<T: Copy + Default> (& self, grid: & [T], n: usize) -> Vec<T>
    {
        let mut result = vec![T::default(); grid.len()];
        for (index, & value) in grid.iter().enumerate()
        {
            result[self.apply_to_index(index, n)] = value;
        }
        result
    }

    ///
    /// Returns a vector of all of the transforms.
    ///
    pub fn as_array () -> Vec<Transform>
    {
        vec!
        [
            Transform::Identity,
            Transform::IdenRot90,
            Transform::IdenRot180,
            Transform::IdenRot270,
            Transform::Reflect,
            Transform::ReflRot90,
            Transform::ReflRot180,
            Transform::ReflRot270
        ]
    }

    ///
    /// Returns the transform that undoes this one. Every mirrored 
    /// transform is its own inverse.
    ///
    pub fn inverse (& self) -> Transform 
    {
        match self 
        {
            Transform::IdenRot90  => Transform::IdenRot270,
            Transform::IdenRot270 => Transform::IdenRot90,
            _                     => * self
        }
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    #[test]
    fn transforms_are_distinct_permutations ()
    {
        let n = 4;
        let grid : Vec<usize> = (0 .. n * n).collect();
        let mut images = Vec::new();

        for transform in Transform::as_array()
        {
            let image = transform.apply_to_grid(& grid, n);
            let mut sorted = image.clone();
            sorted.sort();

            assert_eq!(sorted, grid, "{:?} is not a permutation", transform);
            assert!(! images.contains(& image), "{:?} duplicates another transform", transform);
            images.push(image);
        }
    }

    #[test]
    fn inverse_restores_every_index ()
    {
        let n = 5;
        for transform in Transform::as_array()
        {
            for index in 0 .. n * n 
            {
                let there = transform.apply_to_index(index, n);
                assert_eq!(transform.inverse().apply_to_index(there, n), index);
            }
        }
    }

    #[test]
    fn quarter_turn_is_counterclockwise ()
    {
        // 0 1      1 3
        // 2 3  ->  0 2
        let grid = [0, 1, 2, 3];
        assert_eq!(Transform::IdenRot90.apply_to_grid(& grid, 2), vec![1, 3, 0, 2]);
        assert_eq!(Transform::Reflect.apply_to_grid(& grid, 2), vec![1, 0, 3, 2]);
    }
}
