//! 算子接口，以及默认操作的实现（包含变异算子和杂交算子）
//!

use crate::参数向量;
use rand::Rng;

pub mod default;

pub trait 变异 {
    /// 基于现有的一组参数通过随机扰动创建一组新的参数
    fn 变异<R: Rng + ?Sized>(&self, 参数: &参数向量, rng: &mut R) -> 参数向量;
}

pub trait 杂交 {
    /// 基于两组参数组合出一组新的参数
    fn 杂交<R: Rng + ?Sized>(&self, 参数一: &参数向量, 参数二: &参数向量, rng: &mut R)
        -> 参数向量;
}
