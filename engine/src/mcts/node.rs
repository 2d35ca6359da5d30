
///
/// An alias on usize for readability.
///
pub type NodeID = usize;

///
/// An alias on usize for readability.
///
pub type MoveID = usize;

///
/// Represents a state in a gametree, with the corresponding in-action that 
/// led to this state from its parent. Children of a node are stored 
/// contiguously in the arena, starting at oldest_child.
///
/// `v` accumulates values in the perspective of the player who played the 
/// in-action, so a parent picks the child with the highest mean.
///
#[derive(Clone, Debug)]
pub struct Node 
{
    pub parent: Option<NodeID>,
    pub oldest_child: NodeID,
    pub num_children: usize,

    pub in_action: MoveID,
    pub pending: bool,

    pub n: f32,
    pub p: f32, 
    pub v: f32
}

impl Node 
{
    ///
    /// Returns the mean value of this node, or zero when unvisited.
    ///
    pub fn q (& self) -> f32 
    {
        match self.n > 0.0 
        {
            true  => self.v / self.n,
            false => 0.0
        }
    }

    ///
    /// Determines whether this node has been expanded.
    ///
    pub fn is_visited (& self) -> bool 
    {
        self.num_children > 0
    }

    ///
    /// Creates a new unexpanded node.
    ///
    pub fn new (parent: Option<NodeID>, in_action: MoveID, p: f32) -> Node
    {
        Node 
        {
            parent,
            oldest_child: 0,
            num_children: 0,

            in_action,
            pending: false,

            n: 0.0,
            p,
            v: 0.0
        }
    }

    ///
    /// Returns a root node.
    ///
    pub fn root () -> Node 
    {
        Node::new(None, 0, 1.0)
    }

    ///
    /// Updates this node's stats.
    ///
    pub fn update (& mut self, value: f32, visits: f32)
    {
        self.n += visits;
        self.v += value;
    }

    ///
    /// Links this node to its children.
    ///
    pub fn visit (& mut self, oldest_child: NodeID, num_children: usize)
    {
        self.oldest_child = oldest_child;
        self.num_children = num_children;
    }
}
