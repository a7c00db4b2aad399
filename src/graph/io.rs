//! 图的持久化
//!
//! - JSON：整图快照（特征 + 边集 + 标签），便于实验留档与复现；
//! - npy：仅特征矩阵，便于与 numpy 生态互通。

use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::GraphState;
use crate::errors::AttackError;

/// 将整图序列化为 JSON 文件
pub fn save_json(graph: &GraphState, path: impl AsRef<Path>) -> Result<(), AttackError> {
    let file = File::create(path).map_err(|e| AttackError::IoError(e.to_string()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, graph).map_err(|e| AttackError::FormatError(e.to_string()))
}

/// 从 JSON 文件反序列化整图。
///
/// 反序列化后重新校验不变量（边端点范围、标签长度），
/// 防止手工编辑过的文件破坏图的一致性。
pub fn load_json(path: impl AsRef<Path>) -> Result<GraphState, AttackError> {
    let file = File::open(path).map_err(|e| AttackError::IoError(e.to_string()))?;
    let reader = BufReader::new(file);
    let graph: GraphState =
        serde_json::from_reader(reader).map_err(|e| AttackError::FormatError(e.to_string()))?;
    let edges: Vec<(usize, usize)> = graph.edges().iter().copied().collect();
    GraphState::new(graph.features().clone(), &edges, graph.labels().to_vec())
}

/// 将特征矩阵保存为 .npy 文件
pub fn save_features_npy(graph: &GraphState, path: impl AsRef<Path>) -> Result<(), AttackError> {
    write_npy(path, graph.features()).map_err(|e| AttackError::IoError(e.to_string()))
}

/// 从 .npy 文件读取特征矩阵
pub fn load_features_npy(path: impl AsRef<Path>) -> Result<Array2<f32>, AttackError> {
    read_npy(path).map_err(|e| AttackError::FormatError(e.to_string()))
}
