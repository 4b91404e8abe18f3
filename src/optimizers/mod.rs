//! 优化方法的公共部分，以及若干优化方法的实现
//!

use crate::objectives::目标函数;
use crate::{参数向量, 评估轨迹};
pub mod genetic;
pub mod hill_climbing;
pub mod simulated_annealing;

/// 数值积分失败时使用的误差，使搜索远离数值不稳定的参数区域
pub const 惩罚误差: f64 = 100.0;

/// 计算目标函数，积分失败或结果不是有限值时返回惩罚误差
pub fn 评估<O: 目标函数 + ?Sized>(目标函数: &mut O, 参数: &参数向量) -> f64 {
    match 目标函数.计算(参数) {
        Ok(误差) if 误差.is_finite() => 误差,
        _ => 惩罚误差,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct 优化结果 {
    pub 参数: 参数向量,
    pub 分数: f64,
    pub 轨迹: 评估轨迹,
}
