/*
 * @Author       : 老董
 * @Description  : 预算解析与记账器单元测试
 */

use crate::assert_err;
use crate::attack::{BudgetLedger, NumBudgets};
use crate::errors::AttackError;

/// 绝对数量解析：0 为 EmptyBudget，其余原样返回（不设硬上限）
#[test]
fn test_resolve_count() {
    assert_err!(NumBudgets::Count(0).resolve(10), AttackError::EmptyBudget);
    assert_eq!(NumBudgets::Count(3).resolve(10).unwrap(), 3);
    // 超出候选总量不算错误，由攻击循环在候选耗尽时提前结束
    assert_eq!(NumBudgets::Count(99).resolve(10).unwrap(), 99);
}

/// 比例解析：floor(r × eligible)，不超过候选总量，取整为 0 时报 EmptyBudget
#[test]
fn test_resolve_ratio() {
    assert_eq!(NumBudgets::Ratio(0.5).resolve(10).unwrap(), 5);
    assert_eq!(NumBudgets::Ratio(1.0).resolve(10).unwrap(), 10);
    assert_eq!(NumBudgets::Ratio(0.19).resolve(10).unwrap(), 1);
    assert_err!(NumBudgets::Ratio(0.05).resolve(10), AttackError::EmptyBudget);
    assert_err!(
        NumBudgets::Ratio(1.5).resolve(10),
        AttackError::InvalidOperation(_)
    );
    assert_err!(
        NumBudgets::Ratio(0.0).resolve(10),
        AttackError::InvalidOperation(_)
    );
}

/// 硬上限解析：超过上限为 BudgetExceeded（后门攻击对特征维数的约束）
#[test]
fn test_resolve_capped() {
    assert_eq!(NumBudgets::Count(4).resolve_capped(16).unwrap(), 4);
    assert_err!(
        NumBudgets::Count(17).resolve_capped(16),
        AttackError::BudgetExceeded { requested: 17, max: 16 }
    );
    assert_eq!(NumBudgets::Ratio(0.25).resolve_capped(16).unwrap(), 4);
}

/// 记账器：两条计数器独立封顶，fail-fast 不产生部分记账
#[test]
fn test_ledger_two_counters() {
    let mut ledger = BudgetLedger::default();
    ledger.bind_structure(2);
    ledger.bind_feature(3);

    assert_eq!(ledger.reserve_structure(1).unwrap(), 1);
    assert_eq!(ledger.reserve_structure(1).unwrap(), 2);
    assert_err!(
        ledger.reserve_structure(1),
        AttackError::BudgetExceeded { .. }
    );
    // 结构预算耗尽不影响特征预算
    assert_eq!(ledger.reserve_feature(3).unwrap(), 3);
    assert_err!(ledger.reserve_feature(1), AttackError::BudgetExceeded { .. });

    assert_eq!(ledger.spent_structure(), 2);
    assert_eq!(ledger.spent_feature(), 3);
}

/// 超限请求被拒绝时已花费计数保持不变
#[test]
fn test_ledger_fail_fast() {
    let mut ledger = BudgetLedger::default();
    ledger.bind_structure(5);
    ledger.reserve_structure(3).unwrap();
    assert_err!(
        ledger.reserve_structure(4),
        AttackError::BudgetExceeded { requested: 4, max: 2 }
    );
    assert_eq!(ledger.spent_structure(), 3);
}

/// 释放特征预算（触发器替换场景）
#[test]
fn test_ledger_release_feature() {
    let mut ledger = BudgetLedger::default();
    ledger.bind_feature(4);
    ledger.reserve_feature(4).unwrap();
    ledger.release_feature(2);
    assert_eq!(ledger.spent_feature(), 2);
    assert_eq!(ledger.reserve_feature(2).unwrap(), 4);
}

/// reset 清零两条计数器
#[test]
fn test_ledger_reset() {
    let mut ledger = BudgetLedger::default();
    ledger.bind_structure(2);
    ledger.bind_feature(2);
    ledger.reserve_structure(2).unwrap();
    ledger.reserve_feature(1).unwrap();

    ledger.reset();
    assert_eq!(ledger.spent_structure(), 0);
    assert_eq!(ledger.spent_feature(), 0);
    assert_eq!(ledger.max_structure(), 0);
    assert_eq!(ledger.max_feature(), 0);
}
