//! 爬山算法
//!
//! 每一步对当前最优解做一次均匀扰动，新解不比当前解差就接受。误差相等时也接受新解，这样搜索可以在平台上漂移。

use super::{评估, 优化结果};
use crate::interfaces::{消息, 界面};
use crate::objectives::目标函数;
use crate::operators::{default::均匀扰动, 变异};
use crate::参数向量;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use web_time::Instant;

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct 爬山方法 {
    pub n_iter: usize,
    pub stepsize: f64,
    pub start: Option<参数向量>,
    pub update_interval: Option<usize>,
}

impl Default for 爬山方法 {
    fn default() -> Self {
        Self {
            n_iter: 1000,
            stepsize: 0.5,
            start: None,
            update_interval: None,
        }
    }
}

impl 爬山方法 {
    pub fn 初始解(&self) -> 参数向量 {
        self.start.unwrap_or([0.0; 4])
    }

    pub fn 优化<O: 目标函数 + ?Sized, R: Rng + ?Sized>(
        &self,
        初始解: &参数向量,
        目标函数: &mut O,
        rng: &mut R,
        界面: &dyn 界面,
    ) -> 优化结果 {
        let 操作 = 均匀扰动::新建(self.stepsize);
        let mut 最优解 = *初始解;
        let mut 最优分数 = 评估(目标函数, &最优解);
        let mut 轨迹 = Vec::with_capacity(self.n_iter + 1);
        轨迹.push(最优分数);
        let 更新频率 = self.update_interval.unwrap_or(1000).max(1);
        let 开始时间 = Instant::now();

        for 步骤 in 1..=self.n_iter {
            let 尝试解 = 操作.变异(&最优解, rng);
            let 尝试分数 = 评估(目标函数, &尝试解);
            if 尝试分数 <= 最优分数 {
                最优解 = 尝试解;
                最优分数 = 尝试分数;
            }
            轨迹.push(最优分数);
            if 步骤 % 更新频率 == 0 {
                if 步骤 == 更新频率 {
                    let elapsed = 开始时间.elapsed().as_micros() as u64 / 更新频率 as u64;
                    界面.发送(消息::Elapsed { time: elapsed });
                }
                界面.发送(消息::Progress {
                    steps: 步骤,
                    temperature: None,
                    error: 最优分数,
                });
            }
        }
        优化结果 {
            参数: 最优解,
            分数: 最优分数,
            轨迹,
        }
    }
}
