/*
 * @Author       : 老董
 * @Description  : AnyAttacker 标签化派发单元测试
 */

use super::ten_node_graph;
use crate::attack::{AnyAttacker, Attack, BackdoorAttacker, SessionStatus, TargetedStructureAttacker};

/// 统一接口可以无差别驱动两类攻击器的生命周期
#[test]
fn test_uniform_lifecycle_over_variants() {
    let mut attackers: Vec<AnyAttacker> = vec![
        TargetedStructureAttacker::new(ten_node_graph(4)).rank(4).into(),
        BackdoorAttacker::new(ten_node_graph(4)).into(),
    ];

    for attacker in &mut attackers {
        assert_eq!(attacker.status(), SessionStatus::Unreset);
        attacker.reset();
        assert_eq!(attacker.status(), SessionStatus::Ready);
        assert_eq!(attacker.spent_structure(), 0);
        assert_eq!(attacker.spent_feature(), 0);
        assert_eq!(attacker.graph().num_nodes(), 10);
    }

    // 具体的 attack 调用仍走各自的类型
    for attacker in &mut attackers {
        match attacker {
            AnyAttacker::Targeted(t) => {
                t.attack(1, 2usize).unwrap();
                assert_eq!(t.spent_structure(), 2);
            }
            AnyAttacker::Backdoor(b) => {
                b.attack(2usize, 0).unwrap();
                assert_eq!(b.spent_structure(), 0);
            }
        }
        assert_eq!(attacker.status(), SessionStatus::Done);
    }
}
