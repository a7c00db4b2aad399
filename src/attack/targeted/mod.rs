/*
 * @Author       : 老董
 * @Date         : 2026-08-14
 * @Description  : 定向结构攻击器：谱近似打分引导的预算化边翻转搜索
 *
 * 算法（对目标节点 t、预算 B）：
 * 1. 对归一化图算子做一次 rank-T 截断特征分解（每次 attack 只做一次）；
 * 2. 对每个候选节点 v ≠ t：已有边 (t,v) 只能删、没有的边只能加，
 *    用一阶特征值扰动 λ'ᵢ = λᵢ + 2s·uᵢ[t]·uᵢ[v] 闭式估计该翻转对
 *    目标传播表征的谱扰动量，单候选 O(T)，不做逐候选的整图重传播；
 * 3. 按得分降序排序，得分相同按节点编号升序（确定性）；
 * 4. 贪心提交前 B 个翻转，每次提交前先向记账器预扣 1；
 * 5. 候选不足 B 时花完即止，属于成功完成（spent < B 不是错误）。
 */

use tracing::{debug, info};

use super::budget::NumBudgets;
use super::session::{AttackSession, Device, SessionStatus};
use crate::errors::AttackError;
use crate::graph::GraphState;
use crate::linalg::{DEFAULT_MAX_ITERS, DEFAULT_TOL, normalized_adjacency, truncated_eigh};
use crate::surrogate::Surrogate;

/// 边翻转方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipKind {
    Add,
    Remove,
}

/// 一次已提交的边翻转（对称模式下镜像边随主边一起提交，只计一次扰动）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFlip {
    pub u: usize,
    pub v: usize,
    pub kind: FlipKind,
}

/// 定向结构攻击器
pub struct TargetedStructureAttacker {
    session: AttackSession,
    /// 截断分解的秩 T（精度/开销旋钮）
    rank: usize,
    /// 传播深度 k，来自绑定的代理模型（默认 2）
    hops: usize,
    /// 对称模式：翻转时同步处理镜像边
    symmetric: bool,
    /// 本次攻击提交的翻转记录（reset 时清空）
    flips: Vec<EdgeFlip>,
}

impl TargetedStructureAttacker {
    pub fn new(graph: GraphState) -> Self {
        let rank = graph.num_nodes().min(32).max(1);
        Self {
            session: AttackSession::new(graph),
            rank,
            hops: 2,
            symmetric: true,
            flips: Vec::new(),
        }
    }

    // ========== builder 风格配置 ==========

    /// 设置截断分解的秩 T（T 越小越快、近似越粗）
    pub fn rank(mut self, t: usize) -> Self {
        self.rank = t;
        self
    }

    /// 设置对称模式
    pub fn symmetric(mut self, yes: bool) -> Self {
        self.symmetric = yes;
        self
    }

    /// 设置设备绑定（对攻击逻辑透明）
    pub fn device(mut self, device: Device) -> Self {
        self.session.bind_device(device);
        self
    }

    /// 绑定代理模型：只读取其传播深度用于谱打分的幂次，
    /// 不会在候选循环里做逐候选推理。
    pub fn bind_surrogate<S: Surrogate>(&mut self, surrogate: &S) {
        self.hops = surrogate.hops().max(1);
    }

    /// 本次攻击提交的翻转记录
    pub fn flips(&self) -> &[EdgeFlip] {
        &self.flips
    }

    // ========== 攻击 ==========

    /// 对目标节点发起预算化边翻转攻击。
    ///
    /// 所有校验（生命周期、目标范围、预算解析）先于任何图修改；
    /// 校验失败时会话保持 Ready，不留下部分扰动状态。
    pub fn attack(
        &mut self,
        target: usize,
        num_budgets: impl Into<NumBudgets>,
    ) -> Result<&mut Self, AttackError> {
        // 校验在前：失败不消耗状态机转移
        if self.session.status() != SessionStatus::Ready {
            return Err(AttackError::NotReady);
        }
        let n = self.session.pristine().num_nodes();
        if target >= n {
            return Err(AttackError::InvalidNodeId {
                id: target,
                num_nodes: n,
            });
        }
        // 候选集：所有 v ≠ target（自环排除）
        let eligible = n - 1;
        if eligible == 0 {
            return Err(AttackError::InvalidOperation(
                "单节点图没有可翻转的候选边".to_string(),
            ));
        }
        let budget = num_budgets.into().resolve(eligible)?;

        self.session.begin_attack()?;
        self.session.ledger_mut().bind_structure(budget);

        // 每次 attack 只做一次的截断分解（主要开销所在，T 为上界旋钮）
        let a_hat = normalized_adjacency(self.session.pristine());
        let (vals, vecs) = truncated_eigh(&a_hat, self.rank, DEFAULT_MAX_ITERS, DEFAULT_TOL)?;
        let t_rank = vals.len();
        let power = (2 * self.hops) as i32;

        // 目标节点当前的谱基线
        let base: f32 = (0..t_rank)
            .map(|i| vals[i].powi(power) * vecs[[target, i]].powi(2))
            .sum();

        // 逐候选 O(T) 打分（(节点, 翻转方向, 得分) 三元组仅存活到排序提交完成）
        let pristine = self.session.pristine();
        let mut scored: Vec<(usize, FlipKind, f32)> = Vec::with_capacity(eligible);
        for v in 0..n {
            if v == target {
                continue;
            }
            let (kind, sign) = if pristine.has_edge(target, v) {
                (FlipKind::Remove, -1.0f32)
            } else {
                (FlipKind::Add, 1.0f32)
            };
            let disturbed: f32 = (0..t_rank)
                .map(|i| {
                    let perturbed = vals[i] + 2.0 * sign * vecs[[target, i]] * vecs[[v, i]];
                    perturbed.powi(power) * vecs[[target, i]].powi(2)
                })
                .sum();
            scored.push((v, kind, disturbed - base));
        }

        // 得分降序，平分时节点编号小者优先（全序，保证可复现）
        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        // 贪心提交：每次提交前向记账器预扣；预算已预先解析，
        // 记账器拒绝是防御性的停止条件
        let symmetric = self.symmetric;
        let mut flips = Vec::with_capacity(budget.min(eligible));
        for &(v, kind, score) in &scored {
            if flips.len() >= budget {
                break;
            }
            if self.session.ledger_mut().reserve_structure(1).is_err() {
                break;
            }
            let working = self.session.working_mut()?;
            match kind {
                FlipKind::Add => {
                    working.add_edge(target, v)?;
                    if symmetric {
                        working.add_edge(v, target)?;
                    }
                }
                FlipKind::Remove => {
                    working.remove_edge(target, v)?;
                    if symmetric {
                        working.remove_edge(v, target)?;
                    }
                }
            }
            debug!("提交翻转 ({target}, {v}) {kind:?}，得分 {score:.6}");
            flips.push(EdgeFlip { u: target, v, kind });
        }

        self.flips = flips;
        self.session.finish();
        info!(
            "定向攻击完成：target={target}，预算 {budget}，实际花费 {}",
            self.session.ledger().spent_structure()
        );
        Ok(self)
    }
}

impl super::attacker::Attack for TargetedStructureAttacker {
    fn reset(&mut self) {
        self.flips.clear();
        self.session.reset();
    }

    fn status(&self) -> SessionStatus {
        self.session.status()
    }

    fn spent_structure(&self) -> usize {
        self.session.ledger().spent_structure()
    }

    fn spent_feature(&self) -> usize {
        self.session.ledger().spent_feature()
    }

    fn graph(&self) -> &GraphState {
        self.session.pristine()
    }

    fn data(&self) -> Result<&GraphState, AttackError> {
        self.session.data()
    }
}
