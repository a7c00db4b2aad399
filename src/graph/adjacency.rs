//! 邻接索引：由边集一次性构建的出边邻接表
//!
//! 由 `GraphState` 在一批编辑后的首次邻接查询时惰性重建，
//! 之后 `degree` 为 O(1)、`neighbors` 为 O(deg)。

use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub(crate) struct AdjacencyIndex {
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyIndex {
    /// 从边集构建邻接表。`BTreeSet` 的有序遍历保证邻居列表升序。
    pub fn build(num_nodes: usize, edges: &BTreeSet<(usize, usize)>) -> Self {
        let mut neighbors = vec![Vec::new(); num_nodes];
        for &(u, v) in edges {
            neighbors[u].push(v);
        }
        Self { neighbors }
    }

    pub fn degree(&self, u: usize) -> usize {
        self.neighbors[u].len()
    }

    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.neighbors[u]
    }
}
