//! 实验配置文件的定义
//!
//! 配置文件为 YAML 格式，描述观测数据的位置、随机数种子、每个实验的重复次数、要比较的误差指标，以及一组带标签的优化方法配置。

use crate::data::子采样策略;
use crate::objectives::metric::误差指标;
use crate::optimizers::{
    genetic::遗传算法, hill_climbing::爬山方法, simulated_annealing::退火方法,
};
use crate::simulator::积分选项;
use crate::错误;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum 优化方法配置 {
    HillClimbing(爬山方法),
    SimulatedAnnealing(退火方法),
    Genetic(遗传算法),
}

impl 优化方法配置 {
    fn 校验(&self) -> Result<(), 错误> {
        match self {
            优化方法配置::HillClimbing(爬山) => {
                if !(爬山.stepsize >= 0.0) {
                    return Err("爬山算法的步长不能为负数".into());
                }
            }
            优化方法配置::SimulatedAnnealing(退火) => {
                if 退火.n_inner == 0 {
                    return Err("退火算法的内层步数必须大于 0".into());
                }
                if !(退火.stepsize >= 0.0) {
                    return Err("退火算法的步长不能为负数".into());
                }
                if !(退火.t_min > 0.0 && 退火.t_max > 退火.t_min) {
                    return Err(format!(
                        "退火算法的温度范围无效：t_max = {}，t_min = {}",
                        退火.t_max, 退火.t_min
                    )
                    .into());
                }
            }
            优化方法配置::Genetic(遗传) => {
                if 遗传.population_size == 0 {
                    return Err("遗传算法的种群规模必须大于 0".into());
                }
                if !(0.0..=1.0).contains(&遗传.mutation_rate) {
                    return Err("遗传算法的变异概率必须在 0 和 1 之间".into());
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct 实验配置 {
    pub label: String,
    #[serde(flatten)]
    pub method: 优化方法配置,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct 部分数据配置 {
    pub strategies: Vec<子采样策略>,
    /// 每个通道保留的时间点数量，从大到小依次实验
    pub sizes: Vec<usize>,
    pub threshold: f64,
    pub experiments: Vec<实验配置>,
}

impl Default for 部分数据配置 {
    fn default() -> Self {
        Self {
            strategies: vec![
                子采样策略::LessX,
                子采样策略::LessY,
                子采样策略::LessBoth,
                子采样策略::OnlyPeaks,
                子采样策略::NoPeaks,
            ],
            sizes: (1..=10).rev().map(|x| x * 10).collect(),
            threshold: 2.0,
            experiments: vec![],
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct 配置 {
    pub data: Option<PathBuf>,
    pub seed: u64,
    pub replications: usize,
    pub metrics: Vec<误差指标>,
    pub integration: 积分选项,
    pub experiments: Vec<实验配置>,
    pub partial: Option<部分数据配置>,
}

impl Default for 配置 {
    fn default() -> Self {
        Self {
            data: None,
            seed: 12345,
            replications: 25,
            metrics: vec![误差指标::RMSE, 误差指标::MAE],
            integration: 积分选项::default(),
            experiments: vec![],
            partial: None,
        }
    }
}

fn 校验实验列表(实验列表: &[实验配置]) -> Result<(), 错误> {
    let mut 标签 = HashSet::new();
    for 实验 in 实验列表 {
        if !标签.insert(实验.label.as_str()) {
            return Err(format!("实验标签 {} 重复", 实验.label).into());
        }
        实验
            .method
            .校验()
            .map_err(|e| 错误::from(format!("实验 {}：{}", 实验.label, e.message)))?;
    }
    Ok(())
}

impl 配置 {
    pub fn 从字符串(内容: &str) -> Result<Self, 错误> {
        let 配置: 配置 = serde_yaml::from_str(内容)?;
        配置.校验()?;
        Ok(配置)
    }

    /// 检查优化算法视为前提条件的那些约束，避免在搜索过程中才出错
    pub fn 校验(&self) -> Result<(), 错误> {
        if self.replications == 0 {
            return Err("重复次数必须大于 0".into());
        }
        if self.metrics.is_empty() {
            return Err("至少需要一个误差指标".into());
        }
        if !(self.integration.rtol > 0.0 && self.integration.atol > 0.0) {
            return Err("积分容差必须为正数".into());
        }
        if self.integration.max_steps == 0 {
            return Err("积分步数限制必须大于 0".into());
        }
        校验实验列表(&self.experiments)?;
        if let Some(部分数据) = &self.partial {
            if 部分数据.sizes.iter().any(|&x| x < 2) {
                return Err("部分数据实验的样本量不能小于 2".into());
            }
            校验实验列表(&部分数据.experiments)?;
        }
        Ok(())
    }
}
