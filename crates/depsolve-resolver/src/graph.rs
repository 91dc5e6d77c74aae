//! Solution presentation: a directed graph over a resolved choices list.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::unit::UnitVersion;

/// Edge label: how the source came to require the target.
#[derive(Debug, Clone)]
pub struct SolutionEdge {
    /// True when an exact constraint pinned the target version.
    pub pinned: bool,
}

/// A resolved assignment viewed as a dependency graph.
///
/// Nodes are the chosen unit versions; an edge runs from a unit to the
/// choice covering each of its dependency names and constraint targets.
pub struct SolutionGraph {
    graph: DiGraph<Arc<UnitVersion>, SolutionEdge>,
    /// Lookup from package name to its node (one choice per name).
    index: HashMap<String, NodeIndex>,
}

impl SolutionGraph {
    pub fn from_choices(choices: &[Arc<UnitVersion>]) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for uv in choices {
            let idx = graph.add_node(uv.clone());
            index.insert(uv.name.clone(), idx);
        }

        let mut solution = Self { graph, index };
        for uv in choices {
            let from = solution.index[&uv.name];
            // Constraint edges first so the pinned flag survives the dedup.
            for c in uv.constraints.iter() {
                if let Some(&to) = solution.index.get(&c.name) {
                    solution.add_edge(from, to, SolutionEdge { pinned: c.is_exact() });
                }
            }
            for name in uv.dependencies.iter() {
                if let Some(&to) = solution.index.get(name) {
                    solution.add_edge(from, to, SolutionEdge { pinned: false });
                }
            }
        }
        solution
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: SolutionEdge) {
        if from != to && !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, edge);
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The choice for `name`, if it is part of this solution.
    pub fn find(&self, name: &str) -> Option<&Arc<UnitVersion>> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Choices no other choice requires, in choices order.
    pub fn roots(&self) -> Vec<&Arc<UnitVersion>> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// The choices that directly require `name`.
    pub fn dependents_of(&self, name: &str) -> Vec<&Arc<UnitVersion>> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| &self.graph[e.source()])
            .collect()
    }

    /// A path from some root choice to `name`, if one exists.
    pub fn find_path(&self, name: &str) -> Option<Vec<&Arc<UnitVersion>>> {
        let target = *self.index.get(name)?;
        for root in self.graph.node_indices().filter(|&idx| {
            self.graph
                .edges_directed(idx, Direction::Incoming)
                .next()
                .is_none()
        }) {
            let mut path = Vec::new();
            let mut visited = HashSet::new();
            if self.dfs_path(root, target, &mut path, &mut visited) {
                return Some(path.iter().map(|&idx| &self.graph[idx]).collect());
            }
        }
        None
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for edge in self.graph.edges(current) {
            if self.dfs_path(edge.target(), target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Render the solution as a tree from its roots, one line per choice,
    /// exact pins marked.
    pub fn render_tree(&self) -> String {
        let mut output = String::new();
        let roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();

        let mut visited = HashSet::new();
        let count = roots.len();
        for (i, root) in roots.iter().enumerate() {
            output.push_str(&format!("{}\n", self.graph[*root]));
            let children = self.children_of(*root);
            let child_count = children.len();
            visited.insert(*root);
            for (j, (child, edge)) in children.iter().enumerate() {
                let is_last = j == child_count - 1;
                self.render_subtree(&mut output, *child, edge, "", is_last, &mut visited);
            }
            visited.remove(root);
            if i + 1 < count {
                output.push('\n');
            }
        }
        output
    }

    fn children_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, SolutionEdge)> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().clone()))
            .collect()
    }

    fn render_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        edge: &SolutionEdge,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let marker = if edge.pinned { " (pinned)" } else { "" };
        output.push_str(&format!("{prefix}{connector}{}{marker}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.children_of(idx);
        let count = children.len();
        for (i, (child, edge)) in children.iter().enumerate() {
            let is_last = i == count - 1;
            self.render_subtree(output, *child, edge, &child_prefix, is_last, visited);
        }

        visited.remove(&idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolver;
    use depsolve_core::version::parse_version;

    fn unit(name: &str, ver: &str) -> UnitVersion {
        UnitVersion::new(name, parse_version(ver).unwrap(), parse_version(ver).unwrap())
    }

    fn sample() -> Vec<Arc<UnitVersion>> {
        let mut resolver = Resolver::new();
        let pin = resolver.get_constraint("c", "=3.0.0").unwrap();

        let mut a = unit("a", "1.0.0");
        a.add_dependency("b").unwrap();
        let mut b = unit("b", "2.0.0");
        b.add_dependency("c").unwrap();
        b.add_constraint(pin).unwrap();
        let c = unit("c", "3.0.0");

        vec![Arc::new(a), Arc::new(b), Arc::new(c)]
    }

    #[test]
    fn nodes_and_lookup() {
        let graph = SolutionGraph::from_choices(&sample());
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.find("b").unwrap().key(), "b@2.0.0");
        assert!(graph.find("missing").is_none());
    }

    #[test]
    fn roots_and_dependents() {
        let graph = SolutionGraph::from_choices(&sample());
        let roots = graph.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "a");

        let dependents = graph.dependents_of("c");
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].name, "b");
        assert!(graph.dependents_of("a").is_empty());
    }

    #[test]
    fn path_follows_edges() {
        let graph = SolutionGraph::from_choices(&sample());
        let path = graph.find_path("c").unwrap();
        let names: Vec<&str> = path.iter().map(|uv| uv.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(graph.find_path("missing").is_none());
    }

    #[test]
    fn tree_marks_pins() {
        let graph = SolutionGraph::from_choices(&sample());
        let tree = graph.render_tree();
        assert!(tree.contains("a@1.0.0"));
        assert!(tree.contains("├── ") || tree.contains("└── "));
        assert!(tree.contains("c@3.0.0 (pinned)"));
    }
}
