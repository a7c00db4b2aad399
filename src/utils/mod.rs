//! # 常用接口模块
//!
//! 攻击实验常用的小工具：top-k 选取、特征归一化、节点划分与批量边编辑。

use ndarray::Array2;
use num_traits::Float;
use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};

use crate::errors::AttackError;
use crate::graph::GraphState;



/// 返回前 k 大元素的下标，按值降序排列；同值时下标小者优先（确定性）。
/// k 超过元素总数时返回全部下标。
pub fn topk<F: Float>(values: &[F], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    indices.truncate(k);
    indices
}

/// 特征矩阵的行 L1 归一化：每行除以该行绝对值之和（全零行保持不变）
pub fn normalize_features(features: &Array2<f32>) -> Array2<f32> {
    let mut out = features.clone();
    for mut row in out.rows_mut() {
        let sum: f32 = row.iter().map(|x| x.abs()).sum();
        if sum > 0.0 {
            row.mapv_inplace(|x| x / sum);
        }
    }
    out
}

/// 节点三划分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSplits {
    pub train_nodes: Vec<usize>,
    pub val_nodes: Vec<usize>,
    pub test_nodes: Vec<usize>,
}

/// 把已标注节点按比例随机划分为训练/验证/测试三组（固定种子可复现）。
///
/// `train_ratio`、`val_ratio` 必须为正且二者之和小于 1，
/// 余下部分作为测试集。未标注节点不参与划分。
pub fn split_nodes(
    labels: &[Option<usize>],
    train_ratio: f64,
    val_ratio: f64,
    seed: u64,
) -> Result<NodeSplits, AttackError> {
    if !(train_ratio > 0.0 && val_ratio > 0.0 && train_ratio + val_ratio < 1.0) {
        return Err(AttackError::InvalidOperation(format!(
            "划分比例非法：train={train_ratio}, val={val_ratio}（须为正且和小于 1）"
        )));
    }
    let mut labeled: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter_map(|(i, l)| l.is_some().then_some(i))
        .collect();
    let mut rng = StdRng::seed_from_u64(seed);
    labeled.shuffle(&mut rng);

    let n = labeled.len();
    let train_end = (train_ratio * n as f64).floor() as usize;
    let val_end = train_end + (val_ratio * n as f64).floor() as usize;
    Ok(NodeSplits {
        train_nodes: labeled[..train_end].to_vec(),
        val_nodes: labeled[train_end..val_end.min(n)].to_vec(),
        test_nodes: labeled[val_end.min(n)..].to_vec(),
    })
}

/// 批量加边（对称模式下同步补镜像边），返回实际新增的边对数
/// （已存在的边为幂等空操作，不计入）。
pub fn add_edges(
    graph: &mut GraphState,
    edges: &[(usize, usize)],
    symmetric: bool,
) -> Result<usize, AttackError> {
    let mut added = 0;
    for &(u, v) in edges {
        if graph.add_edge(u, v)? {
            added += 1;
        }
        if symmetric && graph.add_edge(v, u)? {
            added += 1;
        }
    }
    Ok(added)
}

/// 批量删边（对称模式下同步删镜像边），返回实际删除的边对数
pub fn remove_edges(
    graph: &mut GraphState,
    edges: &[(usize, usize)],
    symmetric: bool,
) -> Result<usize, AttackError> {
    let mut removed = 0;
    for &(u, v) in edges {
        if graph.remove_edge(u, v)? {
            removed += 1;
        }
        if symmetric && graph.remove_edge(v, u)? {
            removed += 1;
        }
    }
    Ok(removed)
}
