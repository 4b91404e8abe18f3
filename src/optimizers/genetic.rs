//! 遗传算法
//!
//! 初始种群在 [0, 2]^4 上均匀生成。每一代选出误差最低的若干个体作为父代，打乱后两两配对，每对产生 1 到 3 个子代；子代加入种群后，按误差截断回原来的规模。

use super::评估;
use crate::interfaces::{消息, 界面};
use crate::objectives::目标函数;
use crate::operators::default::{算术杂交, 高斯扰动};
use crate::operators::{变异, 杂交};
use crate::{参数向量, 评估轨迹};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 初始种群每个参数的取值上界
const 初始上界: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct 遗传算法 {
    pub population_size: usize,
    pub generations: usize,
    pub parents: usize,
    pub mutation_rate: f64,
}

impl Default for 遗传算法 {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 25,
            parents: 30,
            mutation_rate: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct 个体 {
    pub 参数: 参数向量,
    pub 分数: f64,
}

#[derive(Debug, Clone)]
pub struct 遗传结果 {
    pub 参数: 参数向量,
    pub 分数: f64,
    /// 按误差升序排列的最终种群
    pub 种群: Vec<个体>,
    pub 最优轨迹: 评估轨迹,
    pub 平均轨迹: 评估轨迹,
}

fn 排序(种群: &mut [个体]) {
    种群.sort_by(|a, b| a.分数.total_cmp(&b.分数));
}

fn 平均分数(种群: &[个体]) -> f64 {
    种群.iter().map(|x| x.分数).sum::<f64>() / 种群.len() as f64
}

impl 遗传算法 {
    /// 遗传算法求解的主函数
    ///
    /// # Panics
    ///
    /// `population_size` 为 0 时没有可返回的个体
    pub fn 优化<O: 目标函数 + ?Sized, R: Rng + ?Sized>(
        &self,
        目标函数: &mut O,
        rng: &mut R,
        界面: &dyn 界面,
    ) -> 遗传结果 {
        let 杂交算子 = 算术杂交;
        let 变异算子 = 高斯扰动::default();
        let mut 种群 = Vec::with_capacity(self.population_size);
        for _ in 0..self.population_size {
            let 参数: 参数向量 = std::array::from_fn(|_| rng.random_range(0.0..初始上界));
            let 分数 = 评估(目标函数, &参数);
            种群.push(个体 { 参数, 分数 });
        }
        排序(&mut 种群);
        let mut 最优轨迹 = vec![种群[0].分数];
        let mut 平均轨迹 = vec![平均分数(&种群)];

        for 代数 in 1..=self.generations {
            let 父代数量 = self.parents.min(种群.len());
            let mut 父代: Vec<参数向量> = 种群[..父代数量].iter().map(|x| x.参数).collect();
            父代.shuffle(rng);
            let 配对数 = 父代.len() / 2;
            for j in 0..配对数 {
                let 子代数量: usize = rng.random_range(1..=3);
                for _ in 0..子代数量 {
                    let mut 参数 = 杂交算子.杂交(&父代[j], &父代[j + 配对数], rng);
                    if rng.random::<f64>() <= self.mutation_rate {
                        参数 = 变异算子.变异(&参数, rng);
                    }
                    // 目标函数是确定性的，已有个体的误差不需要重新计算
                    let 分数 = 评估(目标函数, &参数);
                    种群.push(个体 { 参数, 分数 });
                }
            }
            排序(&mut 种群);
            种群.truncate(self.population_size);
            最优轨迹.push(种群[0].分数);
            平均轨迹.push(平均分数(&种群));
            界面.发送(消息::Generation {
                generation: 代数,
                best: 种群[0].分数,
                mean: 平均分数(&种群),
            });
        }

        遗传结果 {
            参数: 种群[0].参数,
            分数: 种群[0].分数,
            种群,
            最优轨迹,
            平均轨迹,
        }
    }
}
