/*
 * @Author       : 老董
 * @Date         : 2026-08-13
 * @Description  : 谱近似模块：归一化图算子 + 截断特征分解
 *
 * 定向攻击的打分依赖这里的一次性 rank-T 截断分解；T 是精度/开销旋钮，
 * T 越小分解越快、近似越粗。
 */

use ndarray::{Array1, Array2};

use crate::errors::AttackError;
use crate::graph::GraphState;


/// 子空间迭代的默认最大轮数
pub const DEFAULT_MAX_ITERS: usize = 300;
/// 子空间迭代的默认收敛阈值（迭代间子空间基的变化量）
pub const DEFAULT_TOL: f32 = 1e-6;

/// 计算对称归一化邻接算子 `D^{-1/2} (A + I) D^{-1/2}`（稠密）。
///
/// 自环总是补齐（度数计入自环）；孤立节点的度为 0 时按 0 处理，
/// 避免除零。
pub fn normalized_adjacency(graph: &GraphState) -> Array2<f32> {
    let n = graph.num_nodes();
    let mut a = Array2::<f32>::zeros((n, n));
    for &(u, v) in graph.edges() {
        a[[u, v]] = 1.0;
    }
    // 补自环（若图中已有自环则保持为 1）
    for i in 0..n {
        a[[i, i]] = 1.0;
    }
    let inv_sqrt_deg: Vec<f32> = (0..n)
        .map(|i| {
            let d = a.row(i).sum();
            if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 }
        })
        .collect();
    for i in 0..n {
        for j in 0..n {
            a[[i, j]] *= inv_sqrt_deg[i] * inv_sqrt_deg[j];
        }
    }
    a
}

/// 对称矩阵的 rank-T 截断特征分解（正交子空间迭代）。
///
/// 返回 `(eigenvalues, eigenvectors)`：特征值按 |λ| 降序排列，
/// 特征向量矩阵形状 [n, t]，第 j 列对应第 j 个特征值。
///
/// 起始基是确定性的（不依赖随机数），因此相同输入必然得到相同输出，
/// 这是攻击排序可复现的前提。`t == 0` 非法；`t > n` 时收紧到 n。
pub fn truncated_eigh(
    mat: &Array2<f32>,
    t: usize,
    max_iters: usize,
    tol: f32,
) -> Result<(Array1<f32>, Array2<f32>), AttackError> {
    let n = mat.nrows();
    if mat.ncols() != n {
        return Err(AttackError::DimensionMismatch {
            expected: n,
            got: mat.ncols(),
        });
    }
    if t == 0 {
        return Err(AttackError::InvalidOperation(
            "截断秩 T 必须大于 0".to_string(),
        ));
    }
    if n == 0 {
        return Err(AttackError::InvalidOperation(
            "矩阵阶数必须大于 0".to_string(),
        ));
    }
    let t = t.min(n);

    // 确定性起始基：错位单位向量叠加微小扰动，保证各列线性无关
    let mut q = Array2::<f32>::zeros((n, t));
    for j in 0..t {
        for i in 0..n {
            q[[i, j]] = if i % t == j { 1.0 } else { 0.0 } + 1e-3 * ((i * t + j + 1) as f32).sin();
        }
    }
    orthonormalize(&mut q);

    for _ in 0..max_iters {
        let mut z = mat.dot(&q);
        orthonormalize(&mut z);
        // 子空间变化量（逐列符号对齐后取最大列差）
        let mut diff: f32 = 0.0;
        for j in 0..t {
            let dot: f32 = q.column(j).dot(&z.column(j));
            let sign = if dot < 0.0 { -1.0 } else { 1.0 };
            let col_diff: f32 = q
                .column(j)
                .iter()
                .zip(z.column(j).iter())
                .map(|(a, b)| (a - sign * b).powi(2))
                .sum::<f32>()
                .sqrt();
            diff = diff.max(col_diff);
        }
        q = z;
        if diff < tol {
            break;
        }
    }

    // Rayleigh 商给出各基向量对应的特征值估计
    let mq = mat.dot(&q);
    let mut pairs: Vec<(f32, usize)> = (0..t)
        .map(|j| (q.column(j).dot(&mq.column(j)), j))
        .collect();
    pairs.sort_by(|a, b| {
        b.0.abs()
            .partial_cmp(&a.0.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    let mut eigenvalues = Array1::<f32>::zeros(t);
    let mut eigenvectors = Array2::<f32>::zeros((n, t));
    for (out_j, &(val, src_j)) in pairs.iter().enumerate() {
        eigenvalues[out_j] = val;
        eigenvectors.column_mut(out_j).assign(&q.column(src_j));
    }
    Ok((eigenvalues, eigenvectors))
}

/// 对列向量组做 Gram-Schmidt 正交归一化（就地）。
///
/// 退化列（范数过小，出现在重复特征值或 t 接近 n 的场景）
/// 用确定性的单位向量替换后继续，保证基始终满秩。
fn orthonormalize(q: &mut Array2<f32>) {
    let (n, t) = (q.nrows(), q.ncols());
    for j in 0..t {
        for k in 0..j {
            let proj: f32 = {
                let qk = q.column(k);
                let qj = q.column(j);
                qk.dot(&qj)
            };
            for i in 0..n {
                let correction = proj * q[[i, k]];
                q[[i, j]] -= correction;
            }
        }
        let norm: f32 = q.column(j).dot(&q.column(j)).sqrt();
        if norm > 1e-12 {
            for i in 0..n {
                q[[i, j]] /= norm;
            }
        } else {
            // 退化列：替换为第 j 个单位向量再重新正交化一次
            for i in 0..n {
                q[[i, j]] = if i == j % n { 1.0 } else { 0.0 };
            }
            for k in 0..j {
                let proj: f32 = {
                    let qk = q.column(k);
                    let qj = q.column(j);
                    qk.dot(&qj)
                };
                for i in 0..n {
                    let correction = proj * q[[i, k]];
                    q[[i, j]] -= correction;
                }
            }
            let norm2: f32 = q.column(j).dot(&q.column(j)).sqrt().max(1e-12);
            for i in 0..n {
                q[[i, j]] /= norm2;
            }
        }
    }
}
