/*
 * @Author       : 老董
 * @Date         : 2026-08-14
 * @Description  : 攻击子系统：会话生命周期、预算记账与两类攻击器
 *
 * 公开 API：
 * - `TargetedStructureAttacker`: 定向结构攻击（谱近似打分的边翻转搜索）
 * - `BackdoorAttacker`: 后门触发攻击（特征触发器 + 图拼接）
 * - `Attack` / `AnyAttacker`: 统一的生命周期接口与标签化派发
 * - `AttackSession` / `SessionStatus` / `Device`: 会话与状态机
 * - `NumBudgets` / `BudgetLedger`: 预算解析与记账
 */

mod attacker;
mod backdoor;
mod budget;
mod session;
mod targeted;

pub use attacker::{AnyAttacker, Attack};
pub use backdoor::BackdoorAttacker;
pub use budget::{BudgetLedger, NumBudgets};
pub use session::{AttackSession, Device, SessionStatus};
pub use targeted::{EdgeFlip, FlipKind, TargetedStructureAttacker};

#[cfg(test)]
mod tests;
