/*
 * @Author       : 老董
 * @Date         : 2026-08-14
 * @Description  : 后门触发攻击器：预算化特征触发器 + 图拼接
 *
 * 职责边界：本组件只负责预算校验、触发器的持有/校验与拼接力学；
 * 触发器本身的优化由外部策略（协作者）完成后经 set_trigger 注入。
 * 物化时向图中追加一个携带触发器特征的新节点，接到目标节点上
 * （对称模式下补镜像边），并给新节点加自环——卷积算子默认每个节点
 * 至少有自环，漏掉会让新节点的聚合表征静默偏向零信号。
 */

use tracing::info;
use ndarray::Array1;

use super::budget::NumBudgets;
use super::session::{AttackSession, Device, SessionStatus};
use crate::errors::AttackError;
use crate::graph::GraphState;
use crate::utils::topk;

/// 后门触发攻击器
pub struct BackdoorAttacker {
    session: AttackSession,
    /// 解析后的特征预算（attack 时绑定）
    num_budgets: Option<usize>,
    /// 诱导的目标类别（attack 时绑定）
    targets_class: Option<usize>,
    /// 触发器特征向量（会话独占；物化时才进入图）
    trigger: Option<Array1<f32>>,
}

impl BackdoorAttacker {
    pub fn new(graph: GraphState) -> Self {
        Self {
            session: AttackSession::new(graph),
            num_budgets: None,
            targets_class: None,
            trigger: None,
        }
    }

    /// 设置设备绑定（对攻击逻辑透明）
    pub fn device(mut self, device: Device) -> Self {
        self.session.bind_device(device);
        self
    }

    // ========== 攻击 ==========

    /// 校验并绑定特征预算与目标类别。
    ///
    /// 预算以特征维数为硬上限：`num_budgets > num_feats` 为
    /// `BudgetExceeded`。校验通过后会话直接进入 Done——触发器优化
    /// 是外部策略的职责，本组件不在 attack 内迭代。
    pub fn attack(
        &mut self,
        num_budgets: impl Into<NumBudgets>,
        targets_class: usize,
    ) -> Result<&mut Self, AttackError> {
        if self.session.status() != SessionStatus::Ready {
            return Err(AttackError::NotReady);
        }
        let num_feats = self.session.pristine().num_feats();
        let budget = num_budgets.into().resolve_capped(num_feats)?;

        self.session.begin_attack()?;
        self.session.ledger_mut().bind_feature(budget);
        self.num_budgets = Some(budget);
        self.targets_class = Some(targets_class);
        self.session.finish();
        info!("后门攻击就绪：特征预算 {budget}，目标类别 {targets_class}");
        Ok(self)
    }

    // ========== 触发器 ==========

    /// 注入外部策略产出的触发器。
    ///
    /// 宽度必须等于特征维数；非零元素数不得超过解析后的特征预算
    /// （逐个向记账器预扣）。重复注入时旧触发器占用的预算会被释放并
    /// 改记新触发器；任何校验失败都不改动已存的触发器与记账。
    pub fn set_trigger(&mut self, trigger: Array1<f32>) -> Result<&mut Self, AttackError> {
        if self.session.status() != SessionStatus::Done {
            return Err(AttackError::NotReady);
        }
        let num_feats = self.session.pristine().num_feats();
        if trigger.len() != num_feats {
            return Err(AttackError::DimensionMismatch {
                expected: num_feats,
                got: trigger.len(),
            });
        }
        let nnz = trigger.iter().filter(|&&x| x != 0.0).count();
        let prev_nnz = self
            .trigger
            .as_ref()
            .map(|prev| prev.iter().filter(|&&x| x != 0.0).count())
            .unwrap_or(0);
        // 可行性先行：替换必须整体可容纳，拒绝时触发器与记账均保持原样
        let retained = self.session.ledger().spent_feature() - prev_nnz;
        let remaining = self.session.ledger().max_feature() - retained;
        if nnz > remaining {
            return Err(AttackError::BudgetExceeded {
                requested: nnz,
                max: remaining,
            });
        }
        self.session.ledger_mut().release_feature(prev_nnz);
        self.session.ledger_mut().reserve_feature(nnz)?;
        self.trigger = Some(trigger);
        Ok(self)
    }

    /// 缺省触发器策略：取目标类别已标注节点的特征均值，
    /// 保留其中最大的 `num_budgets` 个分量，其余清零。
    pub fn init_trigger_from_class_mean(&mut self) -> Result<&mut Self, AttackError> {
        if self.session.status() != SessionStatus::Done {
            return Err(AttackError::NotReady);
        }
        let targets_class = self.targets_class.ok_or(AttackError::NotReady)?;
        let budget = self.num_budgets.ok_or(AttackError::NotReady)?;

        let pristine = self.session.pristine();
        let members: Vec<usize> = pristine
            .labels()
            .iter()
            .enumerate()
            .filter_map(|(i, l)| (*l == Some(targets_class)).then_some(i))
            .collect();
        if members.is_empty() {
            return Err(AttackError::InvalidOperation(format!(
                "图中没有类别为 {targets_class} 的已标注节点"
            )));
        }

        let num_feats = pristine.num_feats();
        let mut mean = Array1::<f32>::zeros(num_feats);
        for &i in &members {
            mean += &pristine.features().row(i);
        }
        mean /= members.len() as f32;

        // 预算外的分量清零
        let mean_vec: Vec<f32> = mean.to_vec();
        let keep = topk(&mean_vec, budget);
        let mut trigger = Array1::<f32>::zeros(num_feats);
        for idx in keep {
            trigger[idx] = mean[idx];
        }
        self.set_trigger(trigger)
    }

    /// 当前触发器
    pub fn trigger(&self) -> Option<&Array1<f32>> {
        self.trigger.as_ref()
    }

    /// 绑定的目标类别
    pub fn targets_class(&self) -> Option<usize> {
        self.targets_class
    }

    // ========== 物化 ==========

    /// 物化攻击图：克隆 + 追加触发器节点 + 接线到单个目标。
    pub fn g(&self, target_node: usize, symmetric: bool) -> Result<GraphState, AttackError> {
        self.splice(&[target_node], symmetric)
    }

    /// 物化攻击图（多目标版本）：触发器节点与每个目标之间都接一条边
    /// （对称模式下补镜像边），最后给触发器节点加自环。
    pub fn splice(&self, targets: &[usize], symmetric: bool) -> Result<GraphState, AttackError> {
        if self.session.status() != SessionStatus::Done {
            return Err(AttackError::NotReady);
        }
        let trigger = self.trigger.as_ref().ok_or(AttackError::MissingTrigger)?;
        let num_nodes = self.session.pristine().num_nodes();
        for &t in targets {
            if t >= num_nodes {
                return Err(AttackError::InvalidNodeId {
                    id: t,
                    num_nodes,
                });
            }
        }

        let mut graph = self.session.data()?.clone();
        let new_node = graph.add_node(trigger.view())?;
        for &t in targets {
            graph.add_edge(new_node, t)?;
            if symmetric {
                graph.add_edge(t, new_node)?;
            }
        }
        // 自环最后补（顺序不影响正确性，邻接索引是惰性重建的）
        graph.add_edge(new_node, new_node)?;
        Ok(graph)
    }
}

impl super::attacker::Attack for BackdoorAttacker {
    fn reset(&mut self) {
        self.num_budgets = None;
        self.targets_class = None;
        self.trigger = None;
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
