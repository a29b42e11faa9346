use crate::graph::*;

/// An indented dump of a graph: every vertex followed by its out edges.
///
/// With [with_indices](GraphDebug::with_indices), ids are followed by the indices they live at,
/// which helps when following compaction of a [Graph].
pub struct GraphDebug<'a, G>
where
    G: QueryableGraph,
{
    graph: &'a G,
    init_indent: usize,
    indent_step: usize,
    show_indices: bool,
}

impl<'a, G> GraphDebug<'a, G>
where
    G: QueryableGraph,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            init_indent: 0,
            indent_step: 2,
            show_indices: false,
        }
    }

    pub fn indent(mut self, init: usize, step: usize) -> Self {
        self.init_indent = init;
        self.indent_step = step;
        self
    }

    pub fn with_indices(mut self) -> Self {
        self.show_indices = true;
        self
    }

    fn display_indent(&self, f: &mut std::fmt::Formatter<'_>, level: usize) -> std::fmt::Result {
        let indention = self.init_indent + self.indent_step * level;
        write!(f, "{:indention$}", "")
    }
}

impl<'a, G> std::fmt::Debug for GraphDebug<'a, G>
where
    G: QueryableGraph,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arrow = if self.graph.is_directed() { "->" } else { "--" };
        for v in self.graph.iter_vertices() {
            self.display_indent(f, 0)?;
            write!(f, "{:?}", v)?;
            if self.show_indices {
                let index = self.graph.vertex_index(&v).map_err(|_| std::fmt::Error)?;
                write!(f, " @{}", index.to_raw())?;
            }
            writeln!(f)?;
            let edges = self.graph.out_edges(&v).map_err(|_| std::fmt::Error)?;
            for e in edges {
                self.display_indent(f, 1)?;
                write!(f, "--{:?}{} {:?}", e.id, arrow, e.target)?;
                if self.show_indices {
                    let index = self.graph.edge_index(&e.id).map_err(|_| std::fmt::Error)?;
                    write!(f, " @{}", index.to_raw())?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump() {
        let mut g = IndexGraphFactory::directed().new_graph().unwrap();
        let a = g.add_vertex().unwrap();
        let b = g.add_vertex().unwrap();
        g.add_edge(&a, &b).unwrap();
        assert_eq!(
            format!("{:?}", g.debug().indent(1, 3)),
            " VertexId(0)\n    --EdgeId(0)-> VertexId(1)\n VertexId(1)\n"
        );
    }

    #[test]
    fn dump_ids_with_indices() {
        let mut g: Graph<char, u8> = GraphFactory::undirected().new_graph().unwrap();
        for v in ['p', 'q', 'r'] {
            g.add_vertex_with_id(v).unwrap();
        }
        g.add_edge_with_id(&'q', &'r', 5).unwrap();
        g.remove_vertex(&'p').unwrap();
        assert_eq!(
            format!("{:?}", g.debug().with_indices()),
            "'r' @0\n  --5-- 'q' @0\n'q' @1\n  --5-- 'r' @0\n"
        );
    }
}
