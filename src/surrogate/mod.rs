/*
 * @Author       : 老董
 * @Date         : 2026-08-13
 * @Description  : 代理模型接口 + SGC 参考实现 + 攻击前后对比胶水
 *
 * 攻击器只通过窄接口消费代理模型：`predict` 给出单节点的类别概率，
 * `hops` 给出传播深度（定向攻击打分用它决定谱项的幂次）。
 * 训练代理模型本身是外部协作者的职责。
 */

use ndarray::{Array1, Array2, ArrayView1};

use crate::errors::AttackError;
use crate::graph::GraphState;
use crate::linalg::normalized_adjacency;

/// 代理模型：对候选扰动打分所依赖的已训练预测器。
///
/// 定向攻击只借助分解后的谱结构间接使用它（不会逐候选调用
/// `predict`），后门攻击的前后对比评估才会真正做推理。
pub trait Surrogate {
    /// 返回指定节点的类别概率向量
    fn predict(&self, graph: &GraphState, node: usize) -> Result<Array1<f32>, AttackError>;

    /// 图卷积传播深度（谱打分的幂次来源）
    fn hops(&self) -> usize {
        2
    }
}

/// SGC 风格的线性代理模型：特征经 k 跳归一化邻接传播后过一层线性权重。
///
/// 权重矩阵形状 [num_feats, num_classes]，由外部训练流程提供。
#[derive(Debug, Clone)]
pub struct SgcSurrogate {
    weight: Array2<f32>,
    hops: usize,
}

impl SgcSurrogate {
    pub fn new(weight: Array2<f32>, hops: usize) -> Self {
        Self { weight, hops }
    }

    pub fn num_classes(&self) -> usize {
        self.weight.ncols()
    }

    /// k 跳传播：x ← Â x，重复 hops 次
    fn propagate(&self, graph: &GraphState) -> Array2<f32> {
        let a_hat = normalized_adjacency(graph);
        let mut x = graph.features().clone();
        for _ in 0..self.hops {
            x = a_hat.dot(&x);
        }
        x
    }
}

impl Surrogate for SgcSurrogate {
    fn predict(&self, graph: &GraphState, node: usize) -> Result<Array1<f32>, AttackError> {
        if node >= graph.num_nodes() {
            return Err(AttackError::InvalidNodeId {
                id: node,
                num_nodes: graph.num_nodes(),
            });
        }
        if self.weight.nrows() != graph.num_feats() {
            return Err(AttackError::DimensionMismatch {
                expected: self.weight.nrows(),
                got: graph.num_feats(),
            });
        }
        let propagated = self.propagate(graph);
        let logits = propagated.row(node).dot(&self.weight);
        Ok(softmax(logits.view()))
    }

    fn hops(&self) -> usize {
        self.hops
    }
}

/// 数值稳定的 softmax（先减最大值再取指数）
pub fn softmax(logits: ArrayView1<f32>) -> Array1<f32> {
    let max = logits.iter().fold(f32::NEG_INFINITY, |m, &x| m.max(x));
    let exp: Array1<f32> = logits.mapv(|x| (x - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// 评估胶水：同一代理模型在攻击前后两张图上对同一节点的概率对比。
///
/// 返回 `(before_probs, after_probs)`，供外部训练/评估流程做
/// before/after 报告；本 crate 不包含任何训练逻辑。
pub fn compare<S: Surrogate>(
    surrogate: &S,
    before: &GraphState,
    after: &GraphState,
    node: usize,
) -> Result<(Array1<f32>, Array1<f32>), AttackError> {
    let before_probs = surrogate.predict(before, node)?;
    let after_probs = surrogate.predict(after, node)?;
    Ok((before_probs, after_probs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn toy_graph() -> GraphState {
        // 4 节点环，特征 3 维
        let features = array![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0],
        ];
        let edges = [(0, 1), (1, 0), (1, 2), (2, 1), (2, 3), (3, 2), (3, 0), (0, 3)];
        GraphState::unlabeled(features, &edges).unwrap()
    }

    /// softmax 输出应为合法概率分布
    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(array![1.0, 2.0, 3.0].view());
        assert_abs_diff_eq!(probs.sum(), 1.0, epsilon = 1e-6);
        assert!(probs.iter().all(|&p| p > 0.0));
        // 最大 logit 对应最大概率
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    /// predict 返回类别数长度的概率向量
    #[test]
    fn test_sgc_predict_shape() {
        let graph = toy_graph();
        let weight = array![[0.5, -0.5], [0.1, 0.2], [-0.3, 0.4]];
        let surrogate = SgcSurrogate::new(weight, 2);
        assert_eq!(surrogate.hops(), 2);

        let probs = surrogate.predict(&graph, 0).unwrap();
        assert_eq!(probs.len(), 2);
        assert_abs_diff_eq!(probs.sum(), 1.0, epsilon = 1e-6);
    }

    /// 节点越界与权重维度不匹配都应被拒绝
    #[test]
    fn test_sgc_predict_validation() {
        let graph = toy_graph();
        let surrogate = SgcSurrogate::new(array![[0.5], [0.1], [-0.3]], 2);
        assert_eq!(
            surrogate.predict(&graph, 99),
            Err(crate::errors::AttackError::InvalidNodeId {
                id: 99,
                num_nodes: 4
            })
        );

        let bad_surrogate = SgcSurrogate::new(array![[0.5], [0.1]], 2);
        assert_eq!(
            bad_surrogate.predict(&graph, 0),
            Err(crate::errors::AttackError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    /// 前后对比胶水：两张图各自出一份概率
    #[test]
    fn test_compare_before_after() {
        let before = toy_graph();
        let mut after = before.clone();
        after.add_edge(0, 2).unwrap();
        after.add_edge(2, 0).unwrap();

        let weight = array![[0.5, -0.5], [0.1, 0.2], [-0.3, 0.4]];
        let surrogate = SgcSurrogate::new(weight, 2);
        let (p_before, p_after) = compare(&surrogate, &before, &after, 0).unwrap();
        assert_eq!(p_before.len(), 2);
        assert_eq!(p_after.len(), 2);
        // 结构变了，传播结果应当不同
        assert!(p_before != p_after);
    }
}
