// 误差指标的定义以及它们输出到命令行的方式

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::iter::zip;

/// 模拟值与观测值之间的误差度量
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum 误差指标 {
    /// 均方根误差
    #[default]
    RMSE,
    /// 均方误差
    MSE,
    /// 平均绝对误差
    MAE,
}

impl Display for 误差指标 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            误差指标::RMSE => "RMSE",
            误差指标::MSE => "MSE",
            误差指标::MAE => "MAE",
        };
        f.write_str(name)
    }
}

impl 误差指标 {
    /// 计算单个通道的误差
    pub fn 计算(&self, 模拟值: &[f64], 观测值: &[f64]) -> f64 {
        let n = 模拟值.len() as f64;
        let 残差 = zip(模拟值, 观测值).map(|(x, y)| x - y);
        match self {
            误差指标::MSE => 残差.map(|r| r * r).sum::<f64>() / n,
            误差指标::RMSE => (残差.map(|r| r * r).sum::<f64>() / n).sqrt(),
            误差指标::MAE => 残差.map(f64::abs).sum::<f64>() / n,
        }
    }
}
