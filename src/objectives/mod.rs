//! 目标函数接口，以及默认目标函数的实现
//!

use crate::simulator::积分错误;
use crate::参数向量;
pub mod default;
pub mod metric;

/// 优化方法只通过这个接口访问目标函数：输入一组参数，输出一个非负的误差
///
/// 数值积分失败时返回 `Err`，由优化方法决定如何处理
pub trait 目标函数 {
    fn 计算(&mut self, 参数: &参数向量) -> Result<f64, 积分错误>;
}

impl<F> 目标函数 for F
where
    F: FnMut(&参数向量) -> Result<f64, 积分错误>,
{
    fn 计算(&mut self, 参数: &参数向量) -> Result<f64, 积分错误> {
        self(参数)
    }
}
