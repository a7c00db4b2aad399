/*
 * @Author       : 老董
 * @Description  : GraphState 构造与只读访问单元测试
 */

use crate::assert_err;
use crate::errors::AttackError;
use crate::graph::GraphState;
use ndarray::array;

fn triangle() -> GraphState {
    let features = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
    let edges = [(0, 1), (1, 0), (1, 2), (2, 1), (0, 2), (2, 0)];
    let labels = vec![Some(0), Some(1), None];
    GraphState::new(features, &edges, labels).unwrap()
}

/// 测试构造与基础访问器
#[test]
fn test_new_and_accessors() {
    let graph = triangle();
    assert_eq!(graph.num_nodes(), 3);
    assert_eq!(graph.num_feats(), 2);
    assert_eq!(graph.num_edges(), 6);
    assert!(graph.has_edge(0, 1));
    assert!(!graph.has_edge(0, 0));
    assert_eq!(graph.label(0).unwrap(), Some(0));
    assert_eq!(graph.label(2).unwrap(), None);
}

/// 构造时边端点越界应被拒绝
#[test]
fn test_new_rejects_bad_edge() {
    let features = array![[1.0, 0.0], [0.0, 1.0]];
    let result = GraphState::new(features, &[(0, 5)], vec![None, None]);
    assert_err!(result, AttackError::InvalidNodeId { id, num_nodes } if *id == 5 && *num_nodes == 2);
}

/// 构造时标签长度必须等于节点数
#[test]
fn test_new_rejects_bad_labels() {
    let features = array![[1.0, 0.0], [0.0, 1.0]];
    let result = GraphState::new(features, &[], vec![None]);
    assert_err!(
        result,
        AttackError::DimensionMismatch { expected: 2, got: 1 }
    );
}

/// 度与邻居查询（邻居升序）
#[test]
fn test_degree_and_neighbors() {
    let graph = triangle();
    assert_eq!(graph.degree(0).unwrap(), 2);
    assert_eq!(graph.neighbors(0).unwrap(), vec![1, 2]);
    assert_eq!(graph.neighbors(1).unwrap(), vec![0, 2]);

    assert_err!(graph.degree(9), AttackError::InvalidNodeId { .. });
    assert_err!(graph.neighbors(9), AttackError::InvalidNodeId { .. });
}

/// 结构相等：特征、边、标签逐一比较
#[test]
fn test_structural_equality() {
    let a = triangle();
    let b = triangle();
    assert_eq!(a, b);

    let mut c = triangle();
    c.remove_edge(0, 1).unwrap();
    assert_ne!(a, c);
}

/// clone 产生深拷贝：修改副本不影响原图
#[test]
fn test_clone_is_deep() {
    let original = triangle();
    let snapshot = original.clone();

    let mut cloned = original.clone();
    cloned.add_edge(0, 0).unwrap();
    cloned.add_node(array![9.0, 9.0].view()).unwrap();

    assert_eq!(original, snapshot);
    assert_ne!(original, cloned);
}
