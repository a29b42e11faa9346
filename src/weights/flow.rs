use super::*;
use crate::graph::{EdgeId, ElementKind};
use crate::Result;

/// Per-edge capacities and flows of a flow network, readable and writable.
///
/// Like [WeightFunction], an edge index out of range is reported as
/// [NoSuchEdge](crate::GraphError::NoSuchEdge).
pub trait FlowNetwork {
    fn capacity(&self, e: EdgeId) -> Result<f64>;
    fn set_capacity(&mut self, e: EdgeId, capacity: f64) -> Result<()>;
    fn flow(&self, e: EdgeId) -> Result<f64>;
    fn set_flow(&mut self, e: EdgeId, flow: f64) -> Result<()>;

    fn residual_capacity(&self, e: EdgeId) -> Result<f64> {
        Ok(self.capacity(e)? - self.flow(e)?)
    }
}

/// A flow network over two weight maps, one for capacities and one for flows.
///
/// The maps are typically attached to a graph, see
/// [IndexGraph::flow_network](crate::graph::IndexGraph::flow_network).
pub struct WeightsFlowNetwork<'a> {
    capacities: &'a mut Weights<f64>,
    flows: &'a mut Weights<f64>,
}

impl<'a> WeightsFlowNetwork<'a> {
    pub fn new(capacities: &'a mut Weights<f64>, flows: &'a mut Weights<f64>) -> Self {
        debug_assert_eq!(capacities.len(), flows.len());
        Self { capacities, flows }
    }
}

impl<'a> FlowNetwork for WeightsFlowNetwork<'a> {
    fn capacity(&self, e: EdgeId) -> Result<f64> {
        self.capacities.get(e)
    }

    fn set_capacity(&mut self, e: EdgeId, capacity: f64) -> Result<()> {
        self.capacities.set(e, capacity)
    }

    fn flow(&self, e: EdgeId) -> Result<f64> {
        self.flows.get(e)
    }

    fn set_flow(&mut self, e: EdgeId, flow: f64) -> Result<()> {
        self.flows.set(e, flow)
    }
}

/// A flow network owning its two maps, for graphs that should not carry them.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedFlowNetwork {
    capacities: Weights<f64>,
    flows: Weights<f64>,
}

impl OwnedFlowNetwork {
    /// `edge_size` edges, every one with capacity `capacity` and no flow.
    pub fn new(edge_size: usize, capacity: f64) -> Self {
        Self {
            capacities: Weights::new(ElementKind::Edge, edge_size, capacity),
            flows: Weights::new(ElementKind::Edge, edge_size, 0.0),
        }
    }

    /// Capacities and flows, as `(capacities, flows)`.
    pub fn into_parts(self) -> (Weights<f64>, Weights<f64>) {
        (self.capacities, self.flows)
    }

    pub fn edge_size(&self) -> usize {
        self.capacities.len()
    }

    /// The same network over borrowed maps.
    pub fn as_borrowed(&mut self) -> WeightsFlowNetwork<'_> {
        WeightsFlowNetwork::new(&mut self.capacities, &mut self.flows)
    }
}

impl FlowNetwork for OwnedFlowNetwork {
    fn capacity(&self, e: EdgeId) -> Result<f64> {
        self.capacities.get(e)
    }

    fn set_capacity(&mut self, e: EdgeId, capacity: f64) -> Result<()> {
        self.capacities.set(e, capacity)
    }

    fn flow(&self, e: EdgeId) -> Result<f64> {
        self.flows.get(e)
    }

    fn set_flow(&mut self, e: EdgeId, flow: f64) -> Result<()> {
        self.flows.set(e, flow)
    }
}
