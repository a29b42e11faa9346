/// What a graph is and which edges it accepts.
///
/// Fixed when a graph is built.
/// Adding an edge that would violate `self_edges` or `parallel_edges` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphCapabilities {
    pub directed: bool,
    pub self_edges: bool,
    pub parallel_edges: bool,
}

impl GraphCapabilities {
    pub fn new(directed: bool, self_edges: bool, parallel_edges: bool) -> Self {
        Self {
            directed,
            self_edges,
            parallel_edges,
        }
    }
}

impl Default for GraphCapabilities {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}
