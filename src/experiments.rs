//! 实验流程：对每个误差指标、每个带标签的优化方法重复运行若干次，汇总误差、收敛轨迹和最优参数
//!
//! 每次运行使用从主随机数生成器派生出来的独立生成器，所以在种子相同时，整个实验是可复现的。

use crate::config::{优化方法配置, 实验配置, 部分数据配置, 配置};
use crate::data::{子采样策略, 索引选择, 观测序列};
use crate::interfaces::{消息, 界面};
use crate::objectives::default::默认目标函数;
use crate::objectives::metric::误差指标;
use crate::objectives::目标函数;
use crate::optimizers::simulated_annealing::展开轨迹;
use crate::optimizers::评估;
use crate::simulator::积分选项;
use crate::{参数向量, 评估轨迹};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::iter::zip;
use tracing::{debug, info};
use web_time::Instant;

/// 一次优化运行的结果。退火算法的轨迹已经展开为每步一个值
#[derive(Debug, Clone)]
pub struct 单次结果 {
    pub 参数: 参数向量,
    pub 分数: f64,
    pub 轨迹: 评估轨迹,
    /// 只有遗传算法有：每一代的种群平均误差
    pub 平均轨迹: Option<评估轨迹>,
}

/// 用给定的优化方法运行一次
pub fn 运行<O: 目标函数 + ?Sized, R: Rng + ?Sized>(
    方法: &优化方法配置,
    目标函数: &mut O,
    rng: &mut R,
    界面: &dyn 界面,
) -> 单次结果 {
    match 方法 {
        优化方法配置::HillClimbing(爬山) => {
            let 结果 = 爬山.优化(&爬山.初始解(), 目标函数, rng, 界面);
            单次结果 {
                参数: 结果.参数,
                分数: 结果.分数,
                轨迹: 结果.轨迹,
                平均轨迹: None,
            }
        }
        优化方法配置::SimulatedAnnealing(退火) => {
            let 结果 = 退火.优化(&退火.初始解(), 目标函数, rng, 界面);
            单次结果 {
                参数: 结果.参数,
                分数: 结果.分数,
                轨迹: 展开轨迹(&结果.轨迹, 退火.n_inner),
                平均轨迹: None,
            }
        }
        优化方法配置::Genetic(遗传) => {
            let 结果 = 遗传.优化(目标函数, rng, 界面);
            单次结果 {
                参数: 结果.参数,
                分数: 结果.分数,
                轨迹: 结果.最优轨迹,
                平均轨迹: Some(结果.平均轨迹),
            }
        }
    }
}

/// 把第 `已有次数 + 1` 条轨迹并入前 `已有次数` 条轨迹的均值。长度不同时截断到较短的一条
pub fn 轨迹均值(均值: 评估轨迹, 已有次数: usize, 轨迹: &[f64]) -> 评估轨迹 {
    if 已有次数 == 0 {
        return 轨迹.to_vec();
    }
    let n = (已有次数 + 1) as f64;
    zip(均值, 轨迹).map(|(m, &x)| m + (x - m) / n).collect()
}

/// 均值和总体标准差
pub fn 均值与标准差(样本: &[f64]) -> (f64, f64) {
    if 样本.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = 样本.len() as f64;
    let 均值 = 样本.iter().sum::<f64>() / n;
    let 方差 = 样本.iter().map(|x| (x - 均值).powi(2)).sum::<f64>() / n;
    (均值, 方差.sqrt())
}

/// 一个带标签的实验在某个误差指标下的汇总
#[derive(Debug, Clone, Serialize)]
pub struct 实验汇总 {
    pub label: String,
    /// 每次重复最终解在完整数据上的误差
    pub errors: Vec<f64>,
    /// 各次重复轨迹的均值
    pub convergence: 评估轨迹,
    pub mean_convergence: Option<评估轨迹>,
    /// 所有重复中误差最低的参数
    pub best_params: 参数向量,
    pub best_error: f64,
}

/// 拟合所需的全部输入
pub struct 拟合任务<'a> {
    pub 观测: &'a 观测序列,
    pub 指标: 误差指标,
    pub 积分选项: &'a 积分选项,
    pub 重复次数: usize,
    /// 只在这些索引上拟合；为空时使用完整数据
    pub 索引选择: Option<索引选择>,
}

/// 对一个实验重复运行，拟合使用索引选择，最终误差始终在完整数据上计算
pub fn 拟合<R: Rng>(
    任务: &拟合任务,
    实验: &实验配置,
    rng: &mut R,
    界面: &dyn 界面,
) -> 实验汇总 {
    let 拟合任务 {
        观测,
        指标,
        积分选项,
        重复次数,
        ..
    } = *任务;
    let mut 完整目标函数 = 默认目标函数::新建(观测, 指标, 积分选项.clone());
    let mut 汇总 = 实验汇总 {
        label: 实验.label.clone(),
        errors: Vec::with_capacity(重复次数),
        convergence: vec![],
        mean_convergence: None,
        best_params: [0.0; 4],
        best_error: f64::INFINITY,
    };
    let 开始时间 = Instant::now();
    for 重复 in 0..重复次数 {
        let mut 子生成器 = StdRng::from_rng(rng);
        let 结果 = match &任务.索引选择 {
            Some(选择) => {
                let mut 目标函数 =
                    默认目标函数::部分数据(观测, 指标, 选择.clone(), 积分选项.clone());
                运行(&实验.method, &mut 目标函数, &mut 子生成器, 界面)
            }
            None => 运行(&实验.method, &mut 完整目标函数, &mut 子生成器, 界面),
        };
        let 误差 = if 任务.索引选择.is_some() {
            评估(&mut 完整目标函数, &结果.参数)
        } else {
            结果.分数
        };
        debug!("{} 第 {} 次重复，{} = {误差}", 实验.label, 重复 + 1, 指标);
        界面.发送(消息::Finished {
            label: 实验.label.clone(),
            metric: 指标.to_string(),
            replication: 重复,
            error: 误差,
        });
        汇总.convergence = 轨迹均值(std::mem::take(&mut 汇总.convergence), 重复, &结果.轨迹);
        if let Some(平均轨迹) = &结果.平均轨迹 {
            let 均值 = 汇总.mean_convergence.take().unwrap_or_default();
            汇总.mean_convergence = Some(轨迹均值(均值, 重复, 平均轨迹));
        }
        if 误差 < 汇总.best_error {
            汇总.best_error = 误差;
            汇总.best_params = 结果.参数;
        }
        汇总.errors.push(误差);
    }
    info!(
        "{} 在 {} 下完成 {} 次重复，用时 {:.2} 秒",
        实验.label,
        指标,
        重复次数,
        开始时间.elapsed().as_secs_f64()
    );
    汇总
}

/// 部分数据实验中，一个子采样策略在某个误差指标下的汇总，每行对应一个样本量
#[derive(Debug, Clone, Serialize)]
pub struct 部分数据汇总 {
    pub strategy: 子采样策略,
    /// 基于阈值的策略与样本量无关，对应的值为空
    pub sizes: Vec<Option<usize>>,
    /// 每个实验一列：标签、每个样本量下的均值、每个样本量下的标准差
    pub columns: Vec<(String, Vec<f64>, Vec<f64>)>,
}

pub fn 部分数据实验<R: Rng>(
    观测: &观测序列,
    指标: 误差指标,
    配置: &配置,
    部分数据: &部分数据配置,
    rng: &mut R,
    界面: &dyn 界面,
) -> Vec<部分数据汇总> {
    let mut 汇总列表 = vec![];
    for &策略 in &部分数据.strategies {
        info!("部分数据实验：{策略}，{指标}");
        let 样本量列表: Vec<Option<usize>> = if 策略.依赖样本量() {
            部分数据.sizes.iter().copied().map(Some).collect()
        } else {
            vec![None]
        };
        let mut columns: Vec<(String, Vec<f64>, Vec<f64>)> = 部分数据
            .experiments
            .iter()
            .map(|x| (x.label.clone(), vec![], vec![]))
            .collect();
        for &样本量 in &样本量列表 {
            let 选择 = 策略.生成(
                观测,
                样本量.unwrap_or(观测.len()),
                部分数据.threshold,
                rng,
            );
            let 任务 = 拟合任务 {
                观测,
                指标,
                积分选项: &配置.integration,
                重复次数: 配置.replications,
                索引选择: Some(选择),
            };
            for (实验, (_, 均值列, 标准差列)) in zip(&部分数据.experiments, &mut columns) {
                let 汇总 = 拟合(&任务, 实验, rng, 界面);
                let (均值, 标准差) = 均值与标准差(&汇总.errors);
                均值列.push(均值);
                标准差列.push(标准差);
            }
        }
        汇总列表.push(部分数据汇总 {
            strategy: 策略,
            sizes: 样本量列表,
            columns,
        });
    }
    汇总列表
}

/// 一个误差指标下的全部结果
#[derive(Debug, Clone, Serialize)]
pub struct 指标报告 {
    pub metric: 误差指标,
    pub experiments: Vec<实验汇总>,
    pub partial: Vec<部分数据汇总>,
}

/// 按配置运行全部实验
pub fn 运行实验(配置: &配置, 观测: &观测序列, 界面: &dyn 界面) -> Vec<指标报告> {
    let mut rng = StdRng::seed_from_u64(配置.seed);
    let mut 报告 = vec![];
    for &指标 in &配置.metrics {
        info!("以 {指标} 为误差指标运行 {} 个实验", 配置.experiments.len());
        let 任务 = 拟合任务 {
            观测,
            指标,
            积分选项: &配置.integration,
            重复次数: 配置.replications,
            索引选择: None,
        };
        let experiments = 配置
            .experiments
            .iter()
            .map(|实验| 拟合(&任务, 实验, &mut rng, 界面))
            .collect();
        let partial = match &配置.partial {
            Some(部分数据) => 部分数据实验(观测, 指标, 配置, 部分数据, &mut rng, 界面),
            None => vec![],
        };
        报告.push(指标报告 {
            metric: 指标,
            experiments,
            partial,
        });
    }
    报告
}
