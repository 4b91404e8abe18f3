//! Lotka-Volterra 模型的数值积分
//!
//! 模型为：
//!
//! ```text
//! d(prey)/dt     = alpha * prey - beta * prey * predator
//! d(predator)/dt = delta * prey * predator - gamma * predator
//! ```
//!
//! 积分器采用 Dormand-Prince 5(4) 自适应步长方法。所有调用共用同一组容差，保证不同实验之间的误差可以直接比较。

use crate::参数向量;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Display;

/// 状态向量，依次为猎物数量、捕食者数量
pub type 状态 = [f64; 2];

/// 数值积分失败的原因
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum 积分错误 {
    /// 导数或者状态出现了 NaN 或无穷大
    非有限值 { 时间: f64 },
    /// 步长缩小到了浮点精度以下
    步长过小 { 时间: f64, 步长: f64 },
    /// 在一个输出区间内用完了步数预算
    步数超限 { 时间: f64, 步数: usize },
}

impl Display for 积分错误 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            积分错误::非有限值 { 时间 } => write!(f, "积分在 t = {时间} 处出现非有限值"),
            积分错误::步长过小 { 时间, 步长 } => {
                write!(f, "积分在 t = {时间} 处步长缩小到 {步长:.3e}，无法继续")
            }
            积分错误::步数超限 { 时间, 步数 } => {
                write!(f, "积分在 t = {时间} 处已执行 {步数} 步仍未到达下一个时间点")
            }
        }
    }
}

impl std::error::Error for 积分错误 {}

/// 积分器的容差和步数限制
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct 积分选项 {
    pub rtol: f64,
    pub atol: f64,
    /// 每个输出区间内的最大步数
    pub max_steps: usize,
    pub first_step: Option<f64>,
    pub max_step: Option<f64>,
}

impl Default for 积分选项 {
    fn default() -> Self {
        Self {
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            max_steps: 500,
            first_step: None,
            max_step: None,
        }
    }
}

// Dormand-Prince 5(4) 系数。模型是自治的，各级的时间节点用不到
const A: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ],
];
const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];
// 五阶解与四阶解之差，最后一项对应 FSAL 的第七级
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// 计算模型在某一状态下的导数
#[inline(always)]
pub fn 导数(参数: &参数向量, 状态: &状态) -> 状态 {
    let [alpha, beta, gamma, delta] = *参数;
    let [prey, predator] = *状态;
    [
        alpha * prey - beta * prey * predator,
        delta * prey * predator - gamma * predator,
    ]
}

fn 有限(状态: &状态) -> bool {
    状态.iter().all(|x| x.is_finite())
}

fn 误差范数(误差: &状态, 旧: &状态, 新: &状态, 选项: &积分选项) -> f64 {
    let mut sum = 0.0;
    for i in 0..2 {
        let scale = 选项.atol + 选项.rtol * 旧[i].abs().max(新[i].abs());
        sum += (误差[i] / scale).powi(2);
    }
    (sum / 2.0).sqrt()
}

/// 估计初始步长，做法与常见的 Runge-Kutta 实现相同：先按一阶导数估计，再用二阶差分修正
fn 初始步长(参数: &参数向量, y0: &状态, f0: &状态, 方向区间: f64, 选项: &积分选项) -> f64 {
    let scale = |y: f64| 选项.atol + y.abs() * 选项.rtol;
    let norm = |v: [f64; 2]| ((v[0].powi(2) + v[1].powi(2)) / 2.0).sqrt();
    let d0 = norm([y0[0] / scale(y0[0]), y0[1] / scale(y0[1])]);
    let d1 = norm([f0[0] / scale(y0[0]), f0[1] / scale(y0[1])]);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(方向区间);
    let y1 = [y0[0] + h0 * f0[0], y0[1] + h0 * f0[1]];
    let f1 = 导数(参数, &y1);
    let d2 = norm([
        (f1[0] - f0[0]) / scale(y0[0]),
        (f1[1] - f0[1]) / scale(y0[1]),
    ]) / h0;
    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / 5.0)
    };
    let h = (100.0 * h0).min(h1);
    if h.is_finite() && h > 0.0 {
        h
    } else {
        1e-6
    }
}

/// 一个 Dormand-Prince 步，返回新状态、新导数（FSAL）和误差估计
fn 单步(参数: &参数向量, y: &状态, f0: &状态, h: f64) -> (状态, 状态, 状态) {
    let mut k = [[0.0; 2]; 7];
    k[0] = *f0;
    for s in 1..6 {
        let mut ys = *y;
        for (j, kj) in k.iter().enumerate().take(s) {
            ys[0] += h * A[s][j] * kj[0];
            ys[1] += h * A[s][j] * kj[1];
        }
        k[s] = 导数(参数, &ys);
    }
    let mut 新 = *y;
    for (s, ks) in k.iter().enumerate().take(6) {
        新[0] += h * B[s] * ks[0];
        新[1] += h * B[s] * ks[1];
    }
    k[6] = 导数(参数, &新);
    let mut 误差 = [0.0; 2];
    for (s, ks) in k.iter().enumerate() {
        误差[0] += h * E[s] * ks[0];
        误差[1] += h * E[s] * ks[1];
    }
    (新, k[6], 误差)
}

/// 在给定的时间点上积分 Lotka-Volterra 模型
///
/// 时间点必须升序排列，第一个时间点对应初值。返回猎物、捕食者在每个时间点上的数量。
pub fn 模拟(
    参数: &参数向量,
    初值: 状态,
    时间: &[f64],
    选项: &积分选项,
) -> Result<(Vec<f64>, Vec<f64>), 积分错误> {
    let mut 猎物 = Vec::with_capacity(时间.len());
    let mut 捕食者 = Vec::with_capacity(时间.len());
    if 时间.is_empty() {
        return Ok((猎物, 捕食者));
    }
    if !有限(&初值) {
        return Err(积分错误::非有限值 { 时间: 时间[0] });
    }
    猎物.push(初值[0]);
    捕食者.push(初值[1]);
    let mut t = 时间[0];
    let mut y = 初值;
    let mut f = 导数(参数, &y);
    if !有限(&f) {
        return Err(积分错误::非有限值 { 时间: t });
    }
    let 最大步长 = 选项.max_step.unwrap_or(f64::INFINITY);
    let mut h = match 选项.first_step {
        Some(h) => h,
        None => {
            let 总区间 = 时间[时间.len() - 1] - 时间[0];
            初始步长(参数, &y, &f, if 总区间 > 0.0 { 总区间 } else { 1.0 }, 选项)
        }
    }
    .min(最大步长);

    for &目标 in &时间[1..] {
        let mut 步数 = 0;
        while t < 目标 {
            if 步数 >= 选项.max_steps {
                return Err(积分错误::步数超限 { 时间: t, 步数 });
            }
            let 最小步长 = 16.0 * f64::EPSILON * t.abs().max(1.0);
            if h < 最小步长 {
                return Err(积分错误::步长过小 { 时间: t, 步长: h });
            }
            // 最后一步截断到目标时间点上
            let 截断 = t + h >= 目标;
            let 实际步长 = if 截断 { 目标 - t } else { h };
            let (新, 新导数, 误差) = 单步(参数, &y, &f, 实际步长);
            步数 += 1;
            if !有限(&新) || !有限(&新导数) {
                // 过大的步长也可能导致溢出，先尝试缩小步长
                h = 实际步长 * MIN_FACTOR;
                continue;
            }
            let 范数 = 误差范数(&误差, &y, &新, 选项);
            if 范数 <= 1.0 {
                t = if 截断 { 目标 } else { t + 实际步长 };
                y = 新;
                f = 新导数;
                let factor = if 范数 == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * 范数.powf(ERROR_EXPONENT)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                // 截断步不代表真实的误差尺度，不放大步长
                if !截断 {
                    h = (实际步长 * factor).min(最大步长);
                }
            } else {
                let factor = (SAFETY * 范数.powf(ERROR_EXPONENT)).clamp(MIN_FACTOR, 1.0);
                h = 实际步长 * factor;
            }
        }
        猎物.push(y[0]);
        捕食者.push(y[1]);
    }
    Ok((猎物, 捕食者))
}
