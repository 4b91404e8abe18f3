//! volterra: 捕食者-猎物模型参数拟合［命令行版］
//!
//! `volterra` 是一个使用 Rust 编写的命令行程序。用户提供观测数据以及实验配置文件，本程序能够生成模拟数据、计算给定参数的误差，以及用爬山算法、退火算法和遗传算法拟合模型参数。
//!
//! 具体用法详见 README.md。

use clap::Parser;
use tracing::info;
use volterra::data::{索引选择, 观测序列};
use volterra::experiments::运行实验;
use volterra::interfaces::command_line::{命令, 命令行, 命令行参数, 转为参数向量};
use volterra::objectives::default::计算误差;
use volterra::simulator::{模拟, 积分选项};
use volterra::错误;

fn main() -> Result<(), 错误> {
    tracing_subscriber::fmt::init();
    let 参数 = 命令行参数::parse();
    let 命令行 = 命令行::新建(参数.clone(), 参数.output.clone())?;
    match 参数.command {
        命令::Simulate {
            params,
            init,
            t_end,
            points,
        } => {
            let 模型参数 = 转为参数向量(&params)?;
            let 初值: [f64; 2] = init
                .as_slice()
                .try_into()
                .map_err(|_| 错误::from("初值需要 2 个数：猎物,捕食者"))?;
            if points < 2 || !(t_end > 0.0) {
                return Err("至少需要 2 个时间点，且结束时间必须为正数".into());
            }
            let 时间: Vec<f64> = (0..points)
                .map(|i| t_end * i as f64 / (points - 1) as f64)
                .collect();
            let (猎物, 捕食者) = 模拟(&模型参数, 初值, &时间, &积分选项::default())?;
            let 观测 = 观测序列::新建(时间, 猎物, 捕食者)?;
            let 路径 = 命令行.输出观测(&观测)?;
            println!("模拟数据保存在 {} 中", 路径.display());
        }
        命令::Evaluate { params, metric } => {
            let 配置 = 命令行.读取配置()?;
            let 观测 = 命令行.读取观测(&配置)?;
            let 模型参数 = 转为参数向量(&params)?;
            let 选择 = 索引选择::全部(观测.len());
            let 误差 = 计算误差(&模型参数, &观测, metric, &选择, &配置.integration)?;
            println!("{metric} = {误差}");
        }
        命令::Optimize => {
            let 配置 = 命令行.读取配置()?;
            let 观测 = 命令行.读取观测(&配置)?;
            info!(
                "共 {} 个实验，每个重复 {} 次，随机数种子为 {}",
                配置.experiments.len(),
                配置.replications,
                配置.seed
            );
            let 报告 = 运行实验(&配置, &观测, &命令行);
            命令行.输出实验报告(&报告)?;
        }
    }
    Ok(())
}
