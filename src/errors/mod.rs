//! 攻击工具箱的错误类型定义

use thiserror::Error;

/// 攻击流程相关错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AttackError {
    // 生命周期
    /// 攻击器处于错误的生命周期状态
    #[error("攻击器尚未就绪：请先调用 reset()")]
    NotReady,

    // 预算
    /// 请求的扰动数超过配置/解析后的预算上限
    #[error("扰动预算超限：请求 {requested}，上限 {max}")]
    BudgetExceeded { requested: usize, max: usize },

    /// 解析后的预算为 0
    #[error("解析后的扰动预算为 0")]
    EmptyBudget,

    // 图编辑
    /// 节点编号越界
    #[error("无效节点编号：{id}（节点总数 {num_nodes}）")]
    InvalidNodeId { id: usize, num_nodes: usize },

    /// 特征维度不匹配
    #[error("特征维度不匹配：期望 {expected}，实际 {got}")]
    DimensionMismatch { expected: usize, got: usize },

    // 后门攻击
    /// 物化攻击图前必须先设置触发器
    #[error("触发器尚未设置")]
    MissingTrigger,

    /// 其余非法操作（如比例预算不在 (0, 1] 内）
    #[error("无效操作：{0}")]
    InvalidOperation(String),

    // 持久化
    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(String),

    /// 格式错误（如反序列化失败）
    #[error("格式错误: {0}")]
    FormatError(String),
}
