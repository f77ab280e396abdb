use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// 有向多重图: 类型 -> 父类型
///
/// 只增不删. 同一条边可重复出现, 按插入顺序保留.
/// 边表中出现的每个名字 (起点或终点) 都在节点集合中.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    nodes: BTreeSet<String>,
    edges: BTreeMap<String, Vec<String>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一条边
    pub fn add_edge(&mut self, source: &str, target: &str) {
        self.nodes.insert(source.to_string());
        self.nodes.insert(target.to_string());

        self.edges
            .entry(source.to_string())
            .or_default()
            .push(target.to_string());
    }

    /// 批量添加, `targets` 为空时也会登记 `source`
    pub fn add_edges<I, S>(&mut self, source: &str, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.nodes.insert(source.to_string());
        let list = self.edges.entry(source.to_string()).or_default();

        for target in targets {
            let target = target.as_ref();
            self.nodes.insert(target.to_string());
            list.push(target.to_string());
        }
    }

    /// 合并另一个图
    pub fn merge_with(&mut self, other: &Graph) {
        for (source, targets) in &other.edges {
            self.add_edges(source, targets);
        }
    }

    pub fn nodes(&self) -> &BTreeSet<String> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeMap<String, Vec<String>> {
        &self.edges
    }

    /// `source` 的所有出边终点
    pub fn targets(&self, source: &str) -> &[String] {
        self.edges.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// 单个文件的提取结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeInfos {
    pub classes_to_inherited_types: Graph,
}

impl TypeInfos {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 每个起点的出边按字典序排序, 比较多重集合
    fn edge_multiset(graph: &Graph) -> BTreeMap<String, Vec<String>> {
        graph
            .edges()
            .iter()
            .map(|(k, v)| {
                let mut v = v.clone();
                v.sort();
                (k.clone(), v)
            })
            .collect()
    }

    fn graph_of(edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new();
        for (s, t) in edges {
            graph.add_edge(s, t);
        }
        graph
    }

    #[test]
    fn test_add_edge_keeps_duplicates() {
        let mut graph = Graph::new();
        graph.add_edge("Foo", "Bar");
        graph.add_edge("Foo", "Bar");

        assert_eq!(graph.targets("Foo"), &["Bar".to_string(), "Bar".to_string()]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_add_edges_empty_registers_source() {
        let mut graph = Graph::new();
        graph.add_edges("Lonely", Vec::<String>::new());

        assert!(graph.contains_node("Lonely"));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edges().len(), 1);
        assert!(graph.targets("Lonely").is_empty());
    }

    #[test]
    fn test_add_edges_preserves_order() {
        let mut graph = Graph::new();
        graph.add_edges("Bar<Baz, Qux>", ["Baz", "Qux"]);
        graph.add_edge("Bar<Baz, Qux>", "Bar");

        assert_eq!(graph.targets("Bar<Baz, Qux>"), &["Baz", "Qux", "Bar"]);
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn test_every_edge_endpoint_is_a_node() {
        let graph = graph_of(&[("A", "B"), ("B", "C"), ("A", "C")]);
        for (source, targets) in graph.edges() {
            assert!(graph.contains_node(source));
            for t in targets {
                assert!(graph.contains_node(t));
            }
        }
    }

    #[test]
    fn test_targets_unknown_source() {
        let graph = graph_of(&[("A", "B")]);
        assert!(graph.targets("B").is_empty());
        assert!(graph.targets("Z").is_empty());
    }

    #[test]
    fn test_merge_with_appends() {
        let mut a = graph_of(&[("Foo", "Bar")]);
        let b = graph_of(&[("Foo", "Baz"), ("Qux", "Bar")]);

        a.merge_with(&b);

        assert_eq!(a.targets("Foo"), &["Bar", "Baz"]);
        assert_eq!(a.targets("Qux"), &["Bar"]);
        assert_eq!(a.node_count(), 4);
    }

    #[test]
    fn test_merge_is_associative() {
        let a = graph_of(&[("A", "B"), ("A", "C")]);
        let b = graph_of(&[("A", "D"), ("B", "C")]);
        let c = graph_of(&[("C", "A"), ("A", "B")]);

        let mut left = a.clone();
        left.merge_with(&b);
        left.merge_with(&c);

        let mut bc = b.clone();
        bc.merge_with(&c);
        let mut right = a.clone();
        right.merge_with(&bc);

        assert_eq!(left.nodes(), right.nodes());
        assert_eq!(edge_multiset(&left), edge_multiset(&right));
    }

    #[test]
    fn test_merge_is_commutative_up_to_order() {
        let a = graph_of(&[("A", "B"), ("X", "Y")]);
        let b = graph_of(&[("A", "C")]);

        let mut ab = a.clone();
        ab.merge_with(&b);
        let mut ba = b.clone();
        ba.merge_with(&a);

        assert_eq!(ab.nodes(), ba.nodes());
        assert_eq!(edge_multiset(&ab), edge_multiset(&ba));
        assert_ne!(ab.targets("A"), ba.targets("A"));
    }

    #[test]
    fn test_merge_empty_is_identity() {
        let mut a = graph_of(&[("A", "B")]);
        let before = a.clone();
        a.merge_with(&Graph::new());
        assert_eq!(a, before);
    }
}
