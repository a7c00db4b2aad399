/*
 * @Author       : 老董
 * @Date         : 2026-08-12
 * @Description  : GraphState 模块：攻击器操作的图容器
 *
 * 公开 API：
 * - `GraphState`: 节点特征 + 边集 + 标签的图容器（邻接索引惰性重建）
 * - `io`: JSON / npy 持久化
 */

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::errors::AttackError;

mod adjacency;
pub mod io;

use adjacency::AdjacencyIndex;

#[cfg(test)]
mod tests;

/// 攻击器操作的图容器。
///
/// - `features`: 稠密特征矩阵，形状 [num_nodes, num_feats]；
/// - `edges`: 有向边对集合（对称图以镜像对形式存储）；
/// - `labels`: 节点标签（允许部分节点标签未知）。
///
/// 不变量：所有边端点 ∈ [0, num_nodes)；特征矩阵行数与标签长度
/// 始终等于节点数。邻接索引在一批编辑后的首次访问时惰性重建，
/// 避免每次翻转边都付出 O(n) 的重建开销。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphState {
    features: Array2<f32>,
    edges: BTreeSet<(usize, usize)>,
    labels: Vec<Option<usize>>,
    #[serde(skip)]
    adj: RefCell<Option<AdjacencyIndex>>,
}

impl GraphState {
    /// 从特征矩阵、边列表和标签构造图。
    ///
    /// 校验：边端点必须在 [0, num_nodes) 内，标签长度必须等于节点数。
    pub fn new(
        features: Array2<f32>,
        edges: &[(usize, usize)],
        labels: Vec<Option<usize>>,
    ) -> Result<Self, AttackError> {
        let num_nodes = features.nrows();
        if labels.len() != num_nodes {
            return Err(AttackError::DimensionMismatch {
                expected: num_nodes,
                got: labels.len(),
            });
        }
        let mut edge_set = BTreeSet::new();
        for &(u, v) in edges {
            check_node(u, num_nodes)?;
            check_node(v, num_nodes)?;
            edge_set.insert((u, v));
        }
        Ok(Self {
            features,
            edges: edge_set,
            labels,
            adj: RefCell::new(None),
        })
    }

    /// 从特征矩阵和边列表构造无标签图（所有标签为 None）
    pub fn unlabeled(features: Array2<f32>, edges: &[(usize, usize)]) -> Result<Self, AttackError> {
        let labels = vec![None; features.nrows()];
        Self::new(features, edges, labels)
    }

    // ========== 基础访问器 ==========

    pub fn num_nodes(&self) -> usize {
        self.features.nrows()
    }

    pub fn num_feats(&self) -> usize {
        self.features.ncols()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn features(&self) -> &Array2<f32> {
        &self.features
    }

    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    /// 获取单个节点的标签
    pub fn label(&self, u: usize) -> Result<Option<usize>, AttackError> {
        check_node(u, self.num_nodes())?;
        Ok(self.labels[u])
    }

    /// 有向边对集合（对称图中镜像对会各出现一次）
    pub fn edges(&self) -> &BTreeSet<(usize, usize)> {
        &self.edges
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.edges.contains(&(u, v))
    }

    // ========== 图编辑 ==========

    /// 添加一条有向边。边已存在时为幂等空操作，返回 `Ok(false)`。
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool, AttackError> {
        let num_nodes = self.num_nodes();
        check_node(u, num_nodes)?;
        check_node(v, num_nodes)?;
        let inserted = self.edges.insert((u, v));
        if inserted {
            self.invalidate_adjacency();
        }
        Ok(inserted)
    }

    /// 删除一条有向边。边本就不存在时为幂等空操作，返回 `Ok(false)`。
    pub fn remove_edge(&mut self, u: usize, v: usize) -> Result<bool, AttackError> {
        let num_nodes = self.num_nodes();
        check_node(u, num_nodes)?;
        check_node(v, num_nodes)?;
        let removed = self.edges.remove(&(u, v));
        if removed {
            self.invalidate_adjacency();
        }
        Ok(removed)
    }

    /// 追加一个携带给定特征行的新节点（标签为 None），返回新节点编号。
    ///
    /// 特征行宽度必须与现有特征维数一致。
    pub fn add_node(&mut self, feature_row: ArrayView1<f32>) -> Result<usize, AttackError> {
        if feature_row.len() != self.num_feats() {
            return Err(AttackError::DimensionMismatch {
                expected: self.num_feats(),
                got: feature_row.len(),
            });
        }
        self.features
            .push_row(feature_row)
            .map_err(|e| AttackError::InvalidOperation(format!("追加特征行失败：{e}")))?;
        self.labels.push(None);
        self.invalidate_adjacency();
        Ok(self.num_nodes() - 1)
    }

    // ========== 邻接查询（惰性索引） ==========

    /// 节点出度。索引缺失时先重建。
    pub fn degree(&self, u: usize) -> Result<usize, AttackError> {
        check_node(u, self.num_nodes())?;
        Ok(self.with_adjacency(|adj| adj.degree(u)))
    }

    /// 节点出边邻居（升序，确定性）。索引缺失时先重建。
    pub fn neighbors(&self, u: usize) -> Result<Vec<usize>, AttackError> {
        check_node(u, self.num_nodes())?;
        Ok(self.with_adjacency(|adj| adj.neighbors(u).to_vec()))
    }

    // ========== 私有方法 ==========

    fn invalidate_adjacency(&mut self) {
        *self.adj.borrow_mut() = None;
    }

    fn with_adjacency<R>(&self, f: impl FnOnce(&AdjacencyIndex) -> R) -> R {
        let mut cache = self.adj.borrow_mut();
        if cache.is_none() {
            *cache = Some(AdjacencyIndex::build(self.num_nodes(), &self.edges));
        }
        f(cache.as_ref().unwrap())
    }
}

/// 结构相等：特征、边集与标签逐一比较（邻接缓存不参与比较）
impl PartialEq for GraphState {
    fn eq(&self, other: &Self) -> bool {
        self.features == other.features && self.edges == other.edges && self.labels == other.labels
    }
}

fn check_node(id: usize, num_nodes: usize) -> Result<(), AttackError> {
    if id >= num_nodes {
        return Err(AttackError::InvalidNodeId { id, num_nodes });
    }
    Ok(())
}
