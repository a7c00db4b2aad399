//! 攻击会话：两类攻击器共享的生命周期载体（组合而非继承）
//!
//! 会话持有原始图（绝不修改）、工作副本（reset() 时克隆）、预算记账器
//! 与显式的状态机字段。原实现依赖隐式缓存与布尔标志维护生命周期，
//! 这里改为显式状态字段并在 reset() 时显式失效。

use tracing::debug;

use super::budget::BudgetLedger;
use crate::errors::AttackError;
use crate::graph::GraphState;

/// 会话生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// 尚未 reset
    Unreset,
    /// 已 reset，可发起攻击
    Ready,
    /// 攻击进行中
    InProgress,
    /// 攻击完成，可取物化图
    Done,
}

/// 张量放置的设备绑定。当前数值栈只支持 CPU；该字段对攻击逻辑透明，
/// 仅作为配置面保留。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,
}

/// 攻击会话：原始图 + 工作副本 + 记账器 + 状态机
#[derive(Debug, Clone)]
pub struct AttackSession {
    pristine: GraphState,
    working: Option<GraphState>,
    ledger: BudgetLedger,
    status: SessionStatus,
    device: Device,
}

impl AttackSession {
    pub fn new(graph: GraphState) -> Self {
        Self {
            pristine: graph,
            working: None,
            ledger: BudgetLedger::default(),
            status: SessionStatus::Unreset,
            device: Device::default(),
        }
    }

    pub fn bind_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn device(&self) -> Device {
        self.device
    }

    // ========== 状态机 ==========

    /// 重置会话：克隆原始图为工作副本、清零记账器、进入 Ready
    pub fn reset(&mut self) {
        self.working = Some(self.pristine.clone());
        self.ledger.reset();
        self.status = SessionStatus::Ready;
        debug!("攻击会话已重置（{} 节点）", self.pristine.num_nodes());
    }

    /// Ready → InProgress。其余状态下发起攻击均为 NotReady。
    pub fn begin_attack(&mut self) -> Result<(), AttackError> {
        if self.status != SessionStatus::Ready {
            return Err(AttackError::NotReady);
        }
        self.status = SessionStatus::InProgress;
        Ok(())
    }

    /// InProgress → Done
    pub fn finish(&mut self) {
        self.status = SessionStatus::Done;
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    // ========== 图访问 ==========

    /// 原始输入图（任何攻击器都不得修改）
    pub fn pristine(&self) -> &GraphState {
        &self.pristine
    }

    /// 攻击期间的可变工作副本
    pub fn working_mut(&mut self) -> Result<&mut GraphState, AttackError> {
        self.working.as_mut().ok_or(AttackError::NotReady)
    }

    /// 物化的攻击图。仅在 Done 状态下可取。
    pub fn data(&self) -> Result<&GraphState, AttackError> {
        if self.status != SessionStatus::Done {
            return Err(AttackError::NotReady);
        }
        self.working.as_ref().ok_or(AttackError::NotReady)
    }

    // ========== 记账 ==========

    pub fn ledger(&self) -> &BudgetLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut BudgetLedger {
        &mut self.ledger
    }
}
