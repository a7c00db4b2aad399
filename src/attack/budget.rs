//! 扰动预算：请求解析 + 双计数器记账
//!
//! 预算既可以是绝对数量也可以是可扰动总量的比例；结构扰动与特征扰动
//! 各有一条独立封顶的计数器（目前没有攻击器同时消费两者，但记账层
//! 必须支持）。

use crate::errors::AttackError;

/// 攻击请求的预算：绝对数量或可扰动总量的比例
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumBudgets {
    Count(usize),
    Ratio(f64),
}

impl NumBudgets {
    /// 按候选总量解析为整数预算（不设硬上限）。
    ///
    /// - `Count(n)`：n 为 0 时为 `EmptyBudget`，其余原样返回——
    ///   超出候选总量不算错误，攻击循环会在候选耗尽时提前成功结束；
    /// - `Ratio(r)`：r 必须落在 (0, 1]，按 `floor(r × eligible)` 取整
    ///   且不超过候选总量，取整结果为 0 时为 `EmptyBudget`。
    pub fn resolve(self, eligible: usize) -> Result<usize, AttackError> {
        match self {
            Self::Count(0) => Err(AttackError::EmptyBudget),
            Self::Count(n) => Ok(n),
            Self::Ratio(r) => {
                if !(r > 0.0 && r <= 1.0) {
                    return Err(AttackError::InvalidOperation(format!(
                        "比例预算必须落在 (0, 1]，实际为 {r}"
                    )));
                }
                let n = ((r * eligible as f64).floor() as usize).min(eligible);
                if n == 0 {
                    return Err(AttackError::EmptyBudget);
                }
                Ok(n)
            }
        }
    }

    /// 按硬上限解析（后门攻击用：预算不得超过特征维数）。
    ///
    /// `Count(n)` 超过 `max` 时为 `BudgetExceeded`；比例预算按 `max` 解析。
    pub fn resolve_capped(self, max: usize) -> Result<usize, AttackError> {
        let n = self.resolve(max)?;
        if n > max {
            return Err(AttackError::BudgetExceeded { requested: n, max });
        }
        Ok(n)
    }
}

impl From<usize> for NumBudgets {
    fn from(n: usize) -> Self {
        Self::Count(n)
    }
}

impl From<f64> for NumBudgets {
    fn from(r: f64) -> Self {
        Self::Ratio(r)
    }
}

/// 扰动记账器：结构预算与特征预算两条独立封顶的计数器。
///
/// `reserve_*` 遵循 fail-fast：超限请求不产生任何记账变化。
/// 记账器归属单个攻击会话，绝不跨会话共享。
#[derive(Debug, Clone, Default)]
pub struct BudgetLedger {
    max_structure: usize,
    spent_structure: usize,
    max_feature: usize,
    spent_feature: usize,
}

impl BudgetLedger {
    /// 绑定结构扰动预算上限（同时清零已花费计数）
    pub fn bind_structure(&mut self, max: usize) {
        self.max_structure = max;
        self.spent_structure = 0;
    }

    /// 绑定特征扰动预算上限（同时清零已花费计数）
    pub fn bind_feature(&mut self, max: usize) {
        self.max_feature = max;
        self.spent_feature = 0;
    }

    /// 预扣 n 次结构扰动，成功时返回新的已花费计数
    pub fn reserve_structure(&mut self, n: usize) -> Result<usize, AttackError> {
        if self.spent_structure + n > self.max_structure {
            return Err(AttackError::BudgetExceeded {
                requested: n,
                max: self.max_structure - self.spent_structure,
            });
        }
        self.spent_structure += n;
        Ok(self.spent_structure)
    }

    /// 预扣 n 次特征扰动，成功时返回新的已花费计数
    pub fn reserve_feature(&mut self, n: usize) -> Result<usize, AttackError> {
        if self.spent_feature + n > self.max_feature {
            return Err(AttackError::BudgetExceeded {
                requested: n,
                max: self.max_feature - self.spent_feature,
            });
        }
        self.spent_feature += n;
        Ok(self.spent_feature)
    }

    /// 回退 n 次特征扰动（触发器被替换时释放旧触发器占用的预算）
    pub fn release_feature(&mut self, n: usize) {
        self.spent_feature = self.spent_feature.saturating_sub(n);
    }

    pub fn spent_structure(&self) -> usize {
        self.spent_structure
    }

    pub fn spent_feature(&self) -> usize {
        self.spent_feature
    }

    pub fn max_structure(&self) -> usize {
        self.max_structure
    }

    pub fn max_feature(&self) -> usize {
        self.max_feature
    }

    /// 清零两条计数器及其上限（reset() 时调用）
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
