//! 退火算法
//!
//! 外层循环按轮次降温，内层循环在固定温度下做 `n_inner` 步随机搜索。每轮结束时，内层的最终状态直接成为新的当前解，即使它比上一轮更差。

use super::{评估, 优化结果};
use crate::interfaces::{消息, 界面};
use crate::objectives::目标函数;
use crate::operators::{default::均匀扰动, 变异};
use crate::{参数向量, 评估轨迹};
use itertools::repeat_n;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use web_time::Instant;

/// 降温方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum 降温方式 {
    /// 每轮乘以固定倍数，最后一轮恰好降到最低温
    Exponential,
    /// 每轮减去固定差值
    Linear,
    /// 温度与轮次的平方成反比
    #[default]
    Quadratic,
}

/// 退火算法的温度随轮次变化的规律，包括最高温、最低温、轮数
#[derive(Debug, Clone, Copy)]
pub struct 降温时间表 {
    pub t_max: f64,
    pub t_min: f64,
    pub epochs: usize,
    pub 方式: 降温方式,
    系数: f64,
}

impl 降温时间表 {
    pub fn 新建(t_max: f64, t_min: f64, epochs: usize, 方式: 降温方式) -> Self {
        let e = epochs.max(1) as f64;
        let 系数 = match 方式 {
            降温方式::Exponential if epochs > 1 => (t_min / t_max).powf(1.0 / (e - 1.0)),
            降温方式::Exponential => t_min / t_max,
            降温方式::Linear => (t_max - t_min) / e,
            降温方式::Quadratic => (t_max / t_min - 1.0) / (e * e),
        };
        Self {
            t_max,
            t_min,
            epochs,
            方式,
            系数,
        }
    }

    /// 第 `轮次` 轮（从 0 开始）使用的温度
    pub fn 温度(&self, 轮次: usize) -> f64 {
        let k = 轮次 as f64;
        match self.方式 {
            降温方式::Exponential => self.t_max * self.系数.powf(k),
            降温方式::Linear => self.t_max - self.系数 * k,
            降温方式::Quadratic => self.t_max / (1.0 + self.系数 * k * k),
        }
    }

    /// 一轮结束后更新温度。指数和线性方式在当前温度上递推，平方方式按轮次重新计算
    pub fn 降温(&self, 当前温度: f64, 下一轮次: usize) -> f64 {
        match self.方式 {
            降温方式::Exponential => 当前温度 * self.系数,
            降温方式::Linear => 当前温度 - self.系数,
            降温方式::Quadratic => self.温度(下一轮次),
        }
    }
}

/// Metropolis 准则：改进（误差减小）总是接受，否则以 exp(-改进 / 温度) 的概率接受
pub fn 接受<R: Rng + ?Sized>(改进: f64, 温度: f64, rng: &mut R) -> bool {
    改进 < 0.0 || rng.random::<f64>() < (-改进 / 温度).exp()
}

/// 把每轮一个值的轨迹展开成每步一个值，去掉初始值，每轮的值重复 `n_inner` 次
pub fn 展开轨迹(轨迹: &[f64], n_inner: usize) -> 评估轨迹 {
    轨迹
        .iter()
        .skip(1)
        .flat_map(|&x| repeat_n(x, n_inner))
        .collect()
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct 退火方法 {
    pub n_iter: usize,
    pub n_inner: usize,
    pub stepsize: f64,
    pub t_max: f64,
    pub t_min: f64,
    pub cooling: 降温方式,
    pub start: Option<参数向量>,
    /// 是否记录历史最优解；默认不记录，每轮直接采用内层的最终状态
    pub track_best: Option<bool>,
    pub update_interval: Option<usize>,
}

impl Default for 退火方法 {
    fn default() -> Self {
        Self {
            n_iter: 5000,
            n_inner: 50,
            stepsize: 0.25,
            t_max: 1.0,
            t_min: 1e-3,
            cooling: 降温方式::Quadratic,
            start: None,
            track_best: None,
            update_interval: None,
        }
    }
}

impl 退火方法 {
    pub fn 初始解(&self) -> 参数向量 {
        self.start.unwrap_or([0.0; 4])
    }

    pub fn 轮数(&self) -> usize {
        self.n_iter.checked_div(self.n_inner).unwrap_or(0)
    }

    pub fn 降温时间表(&self) -> 降温时间表 {
        降温时间表::新建(self.t_max, self.t_min, self.轮数(), self.cooling)
    }

    /// 退火算法求解的主函数，返回的轨迹每轮一个值
    pub fn 优化<O: 目标函数 + ?Sized, R: Rng + ?Sized>(
        &self,
        初始解: &参数向量,
        目标函数: &mut O,
        rng: &mut R,
        界面: &dyn 界面,
    ) -> 优化结果 {
        let 操作 = 均匀扰动::新建(self.stepsize);
        let 时间表 = self.降温时间表();
        let 记录最优 = self.track_best.unwrap_or(false);
        let 更新频率 = self.update_interval.unwrap_or(10).max(1);
        let mut 当前解 = *初始解;
        let mut 当前分数 = 评估(目标函数, &当前解);
        let mut 最优解 = 当前解;
        let mut 最优分数 = 当前分数;
        let mut 轨迹 = Vec::with_capacity(时间表.epochs + 1);
        轨迹.push(当前分数);
        let mut 温度 = self.t_max;
        let 开始时间 = Instant::now();

        for 轮次 in 0..时间表.epochs {
            let mut 内层解 = 当前解;
            let mut 内层分数 = 当前分数;
            for _ in 0..self.n_inner {
                let 尝试解 = 操作.变异(&内层解, rng);
                let 尝试分数 = 评估(目标函数, &尝试解);
                if 接受(尝试分数 - 内层分数, 温度, rng) {
                    内层解 = 尝试解;
                    内层分数 = 尝试分数;
                }
            }
            当前解 = 内层解;
            当前分数 = 内层分数;
            if 当前分数 < 最优分数 {
                最优解 = 当前解;
                最优分数 = 当前分数;
            }
            轨迹.push(if 记录最优 { 最优分数 } else { 当前分数 });
            if 轮次 == 0 && self.n_inner > 0 {
                let elapsed = 开始时间.elapsed().as_micros() as u64 / self.n_inner as u64;
                界面.发送(消息::Elapsed { time: elapsed });
            }
            if 轮次 % 更新频率 == 0 || 轮次 + 1 == 时间表.epochs {
                界面.发送(消息::Progress {
                    steps: (轮次 + 1) * self.n_inner,
                    temperature: Some(温度),
                    error: 当前分数,
                });
            }
            温度 = 时间表.降温(温度, 轮次 + 1);
        }

        if 记录最优 {
            优化结果 {
                参数: 最优解,
                分数: 最优分数,
                轨迹,
            }
        } else {
            优化结果 {
                参数: 当前解,
                分数: 当前分数,
                轨迹,
            }
        }
    }
}
