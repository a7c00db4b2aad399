//! # Graph Attack
//!
//! `graph_attack`项目旨在用纯rust打造一个图结构数据上的对抗鲁棒性研究工具箱：
//! 提供定向结构攻击（基于截断谱近似打分的预算化边翻转搜索）与后门触发攻击
//! （预算化特征触发器+图拼接），二者共享统一的攻击会话生命周期
//! （reset → attack → 物化攻击图）与扰动预算记账机制。
//!

pub mod attack;
pub mod errors;
pub mod graph;
pub mod linalg;
pub mod surrogate;
pub mod utils;
