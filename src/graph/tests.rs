//! Random operation sequences checked against a petgraph model, on every storage.

use crate::graph::storage::tests::MUTABLE_KINDS;
use crate::graph::*;
use crate::GraphError;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::{Directed, EdgeType, Undirected};
use quickcheck::Arbitrary;
use quickcheck_macros::quickcheck;
use rs_quickcheck_util::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    AddVertex(usize),
    RemoveVertex(usize),
    AddEdge((usize, usize, usize)),
    RemoveEdge(usize),
    ReverseEdge(usize),
}

#[derive(Clone)]
pub struct Ops {
    pub ops: Vec<Op>,
}

impl std::fmt::Debug for Ops {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.ops)
    }
}

impl Ops {
    pub fn iter(&self) -> impl Iterator<Item = &Op> + '_ {
        self.ops.iter()
    }
}

fn pick(g: &mut quickcheck::Gen, known: &BTreeSet<usize>) -> Option<usize> {
    if known.is_empty() {
        None
    } else {
        let idx = usize::arbitrary(g) % known.len();
        known.iter().nth(idx).copied()
    }
}

impl quickcheck::Arbitrary for Ops {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut next_vid = 0;
        let mut next_eid = 0;
        let mut known_vid = BTreeSet::new();
        let mut known_eid = BTreeSet::new();
        let ops = gen_bytes(g, b"abcde.", b'.', 0..)
            .iter()
            .filter_map(|_| match u8::arbitrary(g) % 5 {
                0 => {
                    let vid = next_vid;
                    next_vid += 1;
                    known_vid.insert(vid);
                    Some(Op::AddVertex(vid))
                }
                1 => {
                    let vid = pick(g, &known_vid)?;
                    known_vid.remove(&vid);
                    Some(Op::RemoveVertex(vid))
                }
                2 => {
                    let src = pick(g, &known_vid)?;
                    let snk = pick(g, &known_vid)?;
                    let eid = next_eid;
                    next_eid += 1;
                    known_eid.insert(eid);
                    Some(Op::AddEdge((src, snk, eid)))
                }
                3 => {
                    let eid = pick(g, &known_eid)?;
                    known_eid.remove(&eid);
                    Some(Op::RemoveEdge(eid))
                }
                4 => pick(g, &known_eid).map(Op::ReverseEdge),
                _ => unreachable!(),
            })
            .collect();
        Self { ops }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let l = self.ops.len();
        let me = self.clone();
        let it = std::iter::successors(Some(l / 2), move |n| {
            let nxt = (n + l) / 2 + 1;
            if nxt >= l {
                None
            } else {
                Some(nxt)
            }
        })
        .map(move |n| Ops {
            ops: me.ops[0..n].to_vec(),
        });
        Box::new(it)
    }
}

/// The expected graph, keyed by the same ids.
struct Model<Ty: EdgeType> {
    graph: StableGraph<usize, usize, Ty>,
    vertices: HashMap<usize, NodeIndex>,
    edges: HashMap<usize, EdgeIndex>,
}

impl<Ty: EdgeType> Model<Ty> {
    fn new() -> Self {
        Self {
            graph: StableGraph::default(),
            vertices: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    fn endpoints(&self, e: usize) -> (usize, usize) {
        let (s, t) = self.graph.edge_endpoints(self.edges[&e]).unwrap();
        (self.graph[s], self.graph[t])
    }

    fn connected(&self, s: usize, t: usize) -> usize {
        self.edges
            .keys()
            .filter(|e| {
                let ends = self.endpoints(**e);
                ends == (s, t) || (!Ty::is_directed() && ends == (t, s))
            })
            .count()
    }

    fn incident(&self, v: usize) -> Vec<usize> {
        self.edges
            .keys()
            .copied()
            .filter(|e| {
                let (s, t) = self.endpoints(*e);
                s == v || t == v
            })
            .collect()
    }

    fn apply(&mut self, op: &Op, trial: &mut Graph<usize, usize>, parallel: bool) {
        match *op {
            Op::AddVertex(v) => {
                trial.add_vertex_with_id(v).unwrap();
                trial.set_vertex_weight("id", &v, v).unwrap();
                self.vertices.insert(v, self.graph.add_node(v));
            }
            Op::RemoveVertex(v) => match self.vertices.remove(&v) {
                Some(n) => {
                    trial.remove_vertex(&v).unwrap();
                    for e in self.incident(v) {
                        self.edges.remove(&e);
                    }
                    self.graph.remove_node(n);
                }
                None => assert!(trial.remove_vertex(&v).is_err()),
            },
            Op::AddEdge((s, t, e)) => {
                if !self.vertices.contains_key(&s) || !self.vertices.contains_key(&t) {
                    assert!(matches!(
                        trial.add_edge_with_id(&s, &t, e),
                        Err(GraphError::NoSuchVertex(_))
                    ));
                } else if !parallel && self.connected(s, t) > 0 {
                    assert_eq!(
                        trial.add_edge_with_id(&s, &t, e),
                        Err(GraphError::ParallelEdgesNotAllowed)
                    );
                } else {
                    trial.add_edge_with_id(&s, &t, e).unwrap();
                    trial.set_edge_weight("id", &e, e).unwrap();
                    let idx = self.graph.add_edge(self.vertices[&s], self.vertices[&t], e);
                    self.edges.insert(e, idx);
                }
            }
            Op::RemoveEdge(e) => match self.edges.remove(&e) {
                Some(idx) => {
                    trial.remove_edge(&e).unwrap();
                    self.graph.remove_edge(idx);
                }
                None => assert!(matches!(
                    trial.remove_edge(&e),
                    Err(GraphError::NoSuchEdge(_))
                )),
            },
            Op::ReverseEdge(e) => {
                if !self.edges.contains_key(&e) {
                    assert!(trial.reverse_edge(&e).is_err());
                    return;
                }
                let (s, t) = self.endpoints(e);
                if Ty::is_directed() && s != t && !parallel && self.connected(t, s) > 0 {
                    assert_eq!(
                        trial.reverse_edge(&e),
                        Err(GraphError::ParallelEdgesNotAllowed)
                    );
                    return;
                }
                trial.reverse_edge(&e).unwrap();
                let idx = self.edges[&e];
                self.graph.remove_edge(idx);
                let idx = self.graph.add_edge(self.vertices[&t], self.vertices[&s], e);
                self.edges.insert(e, idx);
            }
        }
    }

    fn check(&self, trial: &Graph<usize, usize>) {
        assert_eq!(trial.vertex_size(), self.vertices.len());
        assert_eq!(trial.edge_size(), self.edges.len());
        let ids = trial.vertices_weights::<usize>("id").unwrap();
        for (v, _) in self.vertices.iter() {
            let index = trial.vertex_index(v).unwrap();
            assert!(index.to_raw() < trial.vertex_size());
            assert_eq!(trial.vertex_by_index(index).unwrap(), *v);
            assert_eq!(ids.get(index).unwrap(), *v);
        }
        let ids = trial.edges_weights::<usize>("id").unwrap();
        for e in self.edges.keys() {
            let index = trial.edge_index(e).unwrap();
            assert_eq!(trial.edge_by_index(index).unwrap(), *e);
            assert_eq!(ids.get(index).unwrap(), *e);
            let found = trial.find_edge(e).unwrap();
            let (s, t) = self.endpoints(*e);
            if Ty::is_directed() {
                assert_eq!((found.source, found.target), (s, t));
            } else {
                let mut got = [found.source, found.target];
                let mut expected = [s, t];
                got.sort();
                expected.sort();
                assert_eq!(got, expected);
            }
        }
        for v in self.vertices.keys() {
            let out = self
                .edges
                .keys()
                .filter(|e| {
                    let (s, t) = self.endpoints(**e);
                    s == *v || (!Ty::is_directed() && t == *v)
                })
                .count();
            let into = self
                .edges
                .keys()
                .filter(|e| {
                    let (s, t) = self.endpoints(**e);
                    t == *v || (!Ty::is_directed() && s == *v)
                })
                .count();
            assert_eq!(trial.out_degree(v).unwrap(), out);
            assert_eq!(trial.in_degree(v).unwrap(), into);
            for e in trial.out_edges(v).unwrap() {
                assert_eq!(e.source, *v);
            }
            for e in trial.in_edges(v).unwrap() {
                assert_eq!(e.target, *v);
            }
            for w in self.vertices.keys() {
                let n = trial.edges_connecting(v, w).unwrap().count();
                assert_eq!(n, self.connected(*v, *w));
            }
        }
    }
}

fn run<Ty: EdgeType>(ops: &Ops) {
    for kind in MUTABLE_KINDS {
        let parallel = kind != StorageKind::Matrix;
        let mut trial: Graph<usize, usize> = GraphFactory::new(Ty::is_directed())
            .configure(|f| f.storage(kind).allow_parallel_edges(parallel))
            .new_graph()
            .unwrap();
        trial.add_vertices_weights("id", usize::MAX).unwrap();
        trial.add_edges_weights("id", usize::MAX).unwrap();
        let mut model = Model::<Ty>::new();
        for op in ops.iter() {
            model.apply(op, &mut trial, parallel);
        }
        model.check(&trial);
        let copy = trial.copy(true);
        assert_eq!(copy, trial);
        model.check(&copy);
        let frozen = trial.immutable_copy();
        model.check(&frozen);
    }
}

#[quickcheck]
fn directed_against_model(ops: Ops) {
    run::<Directed>(&ops);
}

#[quickcheck]
fn undirected_against_model(ops: Ops) {
    run::<Undirected>(&ops);
}

#[quickcheck]
fn indices_stay_dense(ops: Ops) {
    let mut g = IndexGraphFactory::directed().new_graph().unwrap();
    let swaps = Arc::new(Mutex::new(0usize));
    let s = swaps.clone();
    g.add_vertex_listener(move |ev| {
        if let IndexEvent::Swap { from, to } = ev {
            assert!(to < from);
            *s.lock().unwrap() += 1;
        }
    });
    let mut expected_swaps = 0;
    for op in ops.iter() {
        match *op {
            Op::AddVertex(_) => {
                g.add_vertex().unwrap();
            }
            Op::RemoveVertex(v) if g.vertex_size() > 0 => {
                let v = VertexId(v % g.vertex_size());
                if v.to_raw() + 1 != g.vertex_size() {
                    expected_swaps += 1;
                }
                g.remove_vertex(&v).unwrap();
            }
            Op::AddEdge((s, t, _)) if g.vertex_size() > 0 => {
                let n = g.vertex_size();
                g.add_edge(&VertexId(s % n), &VertexId(t % n)).unwrap();
            }
            Op::RemoveEdge(e) if g.edge_size() > 0 => {
                g.remove_edge(&EdgeId(e % g.edge_size())).unwrap();
            }
            _ => {}
        }
        let n = g.vertex_size();
        assert!(g
            .iter_edges()
            .all(|e| e.source.to_raw() < n && e.target.to_raw() < n));
        assert_eq!(g.iter_vertices().count(), n);
    }
    assert_eq!(*swaps.lock().unwrap(), expected_swaps);
}

#[test]
fn undirected_four_cycle() {
    let mut g: Graph<u32, u32> = GraphFactory::undirected().new_graph().unwrap();
    for v in 0..4 {
        g.add_vertex_with_id(v).unwrap();
    }
    for (i, (s, t)) in [(0, 1), (1, 2), (2, 3), (3, 0)].iter().enumerate() {
        g.add_edge_with_id(s, t, i as u32).unwrap();
    }
    assert_eq!(g.iter_edges().count(), 4);
    let mut touching: Vec<_> = g.out_edges(&1).unwrap().map(|e| e.id).collect();
    touching.sort();
    assert_eq!(touching, vec![0, 1]);
}

#[test]
fn int_weights_with_default() {
    let mut g = IndexGraphFactory::directed().new_graph().unwrap();
    let vs: Vec<_> = (0..3).map(|_| g.add_vertex().unwrap()).collect();
    for i in 0..3 {
        g.add_edge(&vs[i], &vs[(i + 1) % 3]).unwrap();
    }
    g.add_edges_weights("cost", 0i32).unwrap().set(1usize, 7).unwrap();
    assert!(g.edges_weights_keys().any(|k| k == "cost"));
    let cost = g.edges_weights::<i32>("cost").unwrap();
    assert_eq!(cost.get(EdgeId(1)).unwrap(), 7);
    assert_eq!(cost.get(EdgeId(0)).unwrap(), 0);
    assert_eq!(*cost.default_value(), 0);
    assert!(matches!(
        g.edges_weights::<i64>("cost"),
        Err(GraphError::WeightsTypeMismatch { .. })
    ));
}

#[test]
fn self_edges_forbidden() {
    let mut g = IndexGraphFactory::directed()
        .allow_self_edges(false)
        .new_graph()
        .unwrap();
    let v = g.add_vertex().unwrap();
    assert_eq!(g.add_edge(&v, &v), Err(GraphError::SelfEdgesNotAllowed));
    assert_eq!(g.edge_size(), 0);
}

#[test]
fn removing_last_fires_nothing_but_remove_last() {
    let mut g = IndexGraphFactory::undirected().new_graph().unwrap();
    let a = g.add_vertex().unwrap();
    let b = g.add_vertex().unwrap();
    g.add_vertices_weights("w", 0u8).unwrap().set(b, 9).unwrap();
    let events = Arc::new(Mutex::new(vec![]));
    let ev = events.clone();
    g.add_vertex_listener(move |e| ev.lock().unwrap().push(e));
    g.remove_vertex(&b).unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec![IndexEvent::RemoveLast { index: 1 }]
    );
    assert_eq!(g.vertices_weights::<u8>("w").unwrap().len(), 1);
    g.remove_vertex(&a).unwrap();
    assert_eq!(g.vertex_size(), 0);
}
