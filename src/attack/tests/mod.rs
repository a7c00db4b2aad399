mod budget;
mod dispatch;

use crate::graph::GraphState;
use ndarray::Array2;

/// 构造一张 10 节点的对称测试图（链 + 两条弦），特征维数可调
pub(crate) fn ten_node_graph(num_feats: usize) -> GraphState {
    let mut features = Array2::<f32>::zeros((10, num_feats));
    for i in 0..10 {
        features[[i, i % num_feats]] = 1.0;
    }
    let undirected = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 8),
        (8, 9),
        (0, 2),
        (1, 3),
    ];
    let mut edges = Vec::new();
    for &(u, v) in &undirected {
        edges.push((u, v));
        edges.push((v, u));
    }
    let labels = (0..10).map(|i| Some(i % 3)).collect();
    GraphState::new(features, &edges, labels).unwrap()
}

/// 两张图边集的无向差异数（镜像对只计一次）
pub(crate) fn undirected_edge_diff(a: &GraphState, b: &GraphState) -> usize {
    let normalize = |g: &GraphState| {
        g.edges()
            .iter()
            .map(|&(u, v)| if u <= v { (u, v) } else { (v, u) })
            .collect::<std::collections::BTreeSet<_>>()
    };
    let ea = normalize(a);
    let eb = normalize(b);
    ea.symmetric_difference(&eb).count()
}
