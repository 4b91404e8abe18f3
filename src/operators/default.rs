use super::{变异, 杂交};
use crate::参数向量;
use rand::Rng;
use rand_distr::StandardNormal;

/// 局部搜索时参数的取值范围
pub const 参数下界: f64 = 0.0;
pub const 参数上界: f64 = 10.0;

/// 每个分量独立地加上 [-步长, 步长] 上的均匀随机数，然后截断到取值范围内
#[derive(Debug, Clone, Copy)]
pub struct 均匀扰动 {
    pub 步长: f64,
    pub 下界: f64,
    pub 上界: f64,
}

impl 均匀扰动 {
    pub fn 新建(步长: f64) -> Self {
        Self {
            步长,
            下界: 参数下界,
            上界: 参数上界,
        }
    }
}

impl 变异 for 均匀扰动 {
    fn 变异<R: Rng + ?Sized>(&self, 参数: &参数向量, rng: &mut R) -> 参数向量 {
        参数.map(|x| {
            let 扰动 = rng.random_range(-1.0..1.0) * self.步长;
            (x + 扰动).clamp(self.下界, self.上界)
        })
    }
}

/// 每个分量独立地加上正态噪声，负值截断为 0，没有上界
#[derive(Debug, Clone, Copy)]
pub struct 高斯扰动 {
    pub 尺度: f64,
}

impl Default for 高斯扰动 {
    fn default() -> Self {
        Self { 尺度: 1.0 / 20.0 }
    }
}

impl 变异 for 高斯扰动 {
    fn 变异<R: Rng + ?Sized>(&self, 参数: &参数向量, rng: &mut R) -> 参数向量 {
        参数.map(|x| {
            let 噪声: f64 = rng.sample(StandardNormal);
            (x + 噪声 * self.尺度).max(参数下界)
        })
    }
}

/// 算术杂交：子代 = a * 参数一 + (1 - a) * 参数二，a 在 [0, 1) 上均匀分布，所有分量共用同一个 a
#[derive(Debug, Clone, Copy, Default)]
pub struct 算术杂交;

impl 杂交 for 算术杂交 {
    fn 杂交<R: Rng + ?Sized>(
        &self,
        参数一: &参数向量,
        参数二: &参数向量,
        rng: &mut R,
    ) -> 参数向量 {
        let a: f64 = rng.random();
        std::array::from_fn(|i| a * 参数一[i] + (1.0 - a) * 参数二[i])
    }
}
