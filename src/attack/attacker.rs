//! 攻击器的统一派发层
//!
//! 两类攻击器共享生命周期查询面（reset / status / spent / data），
//! 具体的 `attack(...)` 签名各不相同，留在各自的具体类型上。

use enum_dispatch::enum_dispatch;

use super::backdoor::BackdoorAttacker;
use super::session::SessionStatus;
use super::targeted::TargetedStructureAttacker;
use crate::errors::AttackError;
use crate::graph::GraphState;

/// 攻击器共享的生命周期接口
#[enum_dispatch]
pub trait Attack {
    /// 重置攻击器：克隆输入图、清零记账、清除上次攻击的产物
    fn reset(&mut self);

    /// 会话当前状态
    fn status(&self) -> SessionStatus;

    /// 已花费的结构扰动数
    fn spent_structure(&self) -> usize;

    /// 已花费的特征扰动数
    fn spent_feature(&self) -> usize;

    /// 原始输入图（攻击器绝不修改它）
    fn graph(&self) -> &GraphState;

    /// 物化的攻击图（仅 Done 状态可取）
    fn data(&self) -> Result<&GraphState, AttackError>;
}

/// 攻击器变体的标签化封装，供需要统一持有多种攻击器的调用方使用
#[enum_dispatch(Attack)]
pub enum AnyAttacker {
    Targeted(TargetedStructureAttacker),
    Backdoor(BackdoorAttacker),
}
