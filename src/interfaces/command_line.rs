use crate::config::配置;
use crate::data::{原始观测, 观测序列};
use crate::experiments::{指标报告, 部分数据汇总};
use crate::interfaces::{消息, 界面};
use crate::objectives::metric::误差指标;
use crate::{参数名称, 参数向量, 错误};
use chrono::Local;
use clap::{Parser, Subcommand};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{create_dir_all, read_to_string, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 命令行参数的定义
#[derive(Parser, Clone)]
#[command(name = "捕食者-猎物模型参数拟合")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct 命令行参数 {
    #[command(subcommand)]
    pub command: 命令,
    /// 实验配置文件，默认为 config.yaml
    pub config: Option<PathBuf>,
    /// 观测数据文件，默认使用配置文件中的 data 字段，再默认为 predator-prey-data.csv
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,
    /// 输出目录，默认为以当前时间命名的目录
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
    /// 随机数种子，覆盖配置文件中的 seed 字段
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// 命令行中所有可用的子命令
#[derive(Subcommand, Clone)]
pub enum 命令 {
    /// 用给定的参数和初值积分模型，生成一组模拟的观测数据
    Simulate {
        /// alpha,beta,gamma,delta
        #[arg(long, value_delimiter = ',', default_values_t = [1.0, 0.5, 0.75, 0.25])]
        params: Vec<f64>,
        /// 猎物和捕食者的初始数量
        #[arg(long, value_delimiter = ',', default_values_t = [10.0, 5.0])]
        init: Vec<f64>,
        /// 模拟的结束时间，起始时间为 0
        #[arg(long, default_value_t = 20.0)]
        t_end: f64,
        /// 等间距输出的时间点数量
        #[arg(long, default_value_t = 100)]
        points: usize,
    },
    /// 计算给定参数在观测数据上的误差
    Evaluate {
        /// alpha,beta,gamma,delta
        #[arg(long, value_delimiter = ',', required = true)]
        params: Vec<f64>,
        #[arg(short, long, value_enum, default_value_t = 误差指标::RMSE)]
        metric: 误差指标,
    },
    /// 按配置文件运行全部优化实验
    Optimize,
}

pub fn 转为参数向量(参数: &[f64]) -> Result<参数向量, 错误> {
    参数.try_into().map_err(|_| {
        let 信息 = format!("需要 4 个参数（alpha,beta,gamma,delta），实际为 {} 个", 参数.len());
        信息.into()
    })
}

/// 通过命令行来使用 libvolterra 的入口，实现了界面特征
pub struct 命令行 {
    pub 参数: 命令行参数,
    pub 输出目录: PathBuf,
}

fn 写入列(路径: &Path, 表头: &[String], 列: &[Vec<String>]) -> Result<(), 错误> {
    let mut writer = WriterBuilder::new().from_path(路径)?;
    writer.write_record(表头)?;
    let 行数 = 列.iter().map(Vec::len).max().unwrap_or(0);
    for i in 0..行数 {
        // 较短的列留空
        let 行 = 列.iter().map(|x| x.get(i).map(String::as_str).unwrap_or(""));
        writer.write_record(行)?;
    }
    writer.flush()?;
    Ok(())
}

fn 格式化(序列: &[f64]) -> Vec<String> {
    序列.iter().map(f64::to_string).collect()
}

impl 命令行 {
    pub fn 新建(参数: 命令行参数, maybe_output_dir: Option<PathBuf>) -> Result<Self, 错误> {
        let 输出目录 = maybe_output_dir.unwrap_or_else(|| {
            let time = Local::now().format("%m-%d+%H_%M_%S").to_string();
            PathBuf::from(format!("output-{time}"))
        });
        create_dir_all(&输出目录)?;
        Ok(Self { 参数, 输出目录 })
    }

    /// 读取配置文件。没有指定配置文件并且 config.yaml 不存在时，使用默认配置
    pub fn 读取配置(&self) -> Result<配置, 错误> {
        let mut 配置 = match &self.参数.config {
            Some(路径) => 配置::从字符串(&read_to_string(路径)?)?,
            None => {
                let 默认路径 = Path::new("config.yaml");
                if 默认路径.exists() {
                    配置::从字符串(&read_to_string(默认路径)?)?
                } else {
                    warn!("未找到 config.yaml，使用默认配置");
                    配置::default()
                }
            }
        };
        if let Some(seed) = self.参数.seed {
            配置.seed = seed;
        }
        Ok(配置)
    }

    pub fn 读取观测(&self, 配置: &配置) -> Result<观测序列, 错误> {
        let 路径 = self
            .参数
            .data
            .clone()
            .or_else(|| 配置.data.clone())
            .unwrap_or_else(|| PathBuf::from("predator-prey-data.csv"));
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&路径)?;
        let 原始观测列表 = reader
            .deserialize::<(f64, f64, f64)>()
            .map(|x| x.map(|(t, prey, predator)| 原始观测 { t, prey, predator }))
            .collect::<Result<Vec<_>, _>>()?;
        let 观测 = 观测序列::从原始观测(原始观测列表)?;
        info!("从 {} 读取了 {} 个时间点", 路径.display(), 观测.len());
        Ok(观测)
    }

    pub fn 输出观测(&self, 观测: &观测序列) -> Result<PathBuf, 错误> {
        let 路径 = self.输出目录.join("simulated.csv");
        let mut writer = WriterBuilder::new().from_path(&路径)?;
        for 行 in 观测.转为原始观测() {
            writer.serialize(行)?;
        }
        writer.flush()?;
        Ok(路径)
    }

    fn 输出部分数据汇总(&self, 指标: 误差指标, 汇总: &部分数据汇总) -> Result<(), 错误> {
        let 路径 = self
            .输出目录
            .join(format!("fracdata-{}-{指标}.csv", 汇总.strategy));
        let mut 表头 = vec!["size".to_string()];
        let mut 列: Vec<Vec<String>> = vec![汇总
            .sizes
            .iter()
            .map(|x| x.map(|s| s.to_string()).unwrap_or_default())
            .collect()];
        for (label, 均值, 标准差) in &汇总.columns {
            表头.push(format!("{label}_mean"));
            表头.push(format!("{label}_std"));
            列.push(格式化(均值));
            列.push(格式化(标准差));
        }
        写入列(&路径, &表头, &列)
    }

    /// 每个误差指标输出最终误差、平均收敛轨迹、最优参数三张表，以及部分数据实验的表
    pub fn 输出实验报告(&self, 报告: &[指标报告]) -> Result<(), 错误> {
        for 指标报告 {
            metric,
            experiments,
            partial,
        } in 报告
        {
            if !experiments.is_empty() {
                let 表头: Vec<String> = experiments.iter().map(|x| x.label.clone()).collect();
                let 误差列: Vec<_> = experiments.iter().map(|x| 格式化(&x.errors)).collect();
                写入列(&self.输出目录.join(format!("{metric}.csv")), &表头, &误差列)?;

                let mut 轨迹表头 = vec![];
                let mut 轨迹列 = vec![];
                for 汇总 in experiments {
                    轨迹表头.push(汇总.label.clone());
                    轨迹列.push(格式化(&汇总.convergence));
                    if let Some(平均轨迹) = &汇总.mean_convergence {
                        轨迹表头.push(format!("{}-mean", 汇总.label));
                        轨迹列.push(格式化(平均轨迹));
                    }
                }
                写入列(
                    &self.输出目录.join(format!("{metric}-conv.csv")),
                    &轨迹表头,
                    &轨迹列,
                )?;

                let mut 参数表头 = vec!["parameter".to_string()];
                参数表头.extend(表头);
                let mut 参数列: Vec<Vec<String>> =
                    vec![参数名称.iter().map(|x| x.to_string()).collect()];
                参数列.extend(experiments.iter().map(|x| 格式化(&x.best_params)));
                写入列(
                    &self.输出目录.join(format!("{metric}-params.csv")),
                    &参数表头,
                    &参数列,
                )?;
            }
            for 汇总 in partial {
                self.输出部分数据汇总(*metric, 汇总)?;
            }
        }
        info!("结果保存在 {} 中", self.输出目录.display());
        Ok(())
    }

    fn 写入日志(&self, 内容: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.输出目录.join("log.txt"))?;
        writeln!(file, "{内容}")
    }
}

impl 界面 for 命令行 {
    fn 发送(&self, 消息: 消息) {
        if let 消息::Finished {
            label,
            metric,
            replication,
            error,
        } = &消息
        {
            println!("{label} 第 {} 次重复完成，{metric} = {error:.6}", replication + 1);
            return;
        }
        let result = serde_json::to_string(&消息)
            .map_err(std::io::Error::from)
            .and_then(|x| self.写入日志(&x));
        if let Err(e) = result {
            warn!("写入日志失败：{e}");
        }
    }
}
