//! libvolterra 是使用 Rust 实现的捕食者-猎物（Lotka-Volterra）模型参数拟合算法。它同时发布为一个 Rust crate 和一个 NPM 模块。
//!
//! volterra 是使用 libvolterra 实现的命令行程序，用户提供观测数据和实验配置文件，本程序能够用爬山算法、退火算法和遗传算法搜索模型的四个参数，并把误差轨迹和最优参数输出到文件中。

pub mod config;
pub mod data;
pub mod experiments;
pub mod interfaces;
pub mod objectives;
pub mod operators;
pub mod optimizers;
pub mod simulator;

use wasm_bindgen::JsError;

/// 模型参数，依次为 alpha、beta、gamma、delta
///
/// - alpha：猎物的自然增长率
/// - beta：捕食对猎物的消耗率
/// - gamma：捕食者的自然死亡率
/// - delta：捕食对捕食者的增益率
pub type 参数向量 = [f64; 4];

/// 输出文件中参数的名称
pub const 参数名称: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

/// 误差轨迹，每次迭代（或每代、每轮）记录一个误差值，第一个值为初始解的误差
pub type 评估轨迹 = Vec<f64>;

/// 错误类型
#[derive(Debug, Clone)]
pub struct 错误 {
    pub message: String,
}

impl From<String> for 错误 {
    fn from(value: String) -> Self {
        Self { message: value }
    }
}

impl From<&str> for 错误 {
    fn from(value: &str) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

impl From<std::io::Error> for 错误 {
    fn from(value: std::io::Error) -> Self {
        Self {
            message: format!("读写文件失败：{value}"),
        }
    }
}

impl From<csv::Error> for 错误 {
    fn from(value: csv::Error) -> Self {
        Self {
            message: format!("CSV 解析失败：{value}"),
        }
    }
}

impl From<serde_yaml::Error> for 错误 {
    fn from(value: serde_yaml::Error) -> Self {
        Self {
            message: format!("配置解析失败：{value}"),
        }
    }
}

impl From<simulator::积分错误> for 错误 {
    fn from(value: simulator::积分错误) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

impl From<错误> for JsError {
    fn from(value: 错误) -> Self {
        JsError::new(&value.message)
    }
}

impl std::fmt::Display for 错误 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
