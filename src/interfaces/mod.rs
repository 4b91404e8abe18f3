use serde::Serialize;
use serde_with::skip_serializing_none;

pub mod command_line;
pub mod web;

/// 向用户反馈的消息类型
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum 消息 {
    Progress {
        steps: usize,
        temperature: Option<f64>,
        error: f64,
    },
    Generation {
        generation: usize,
        best: f64,
        mean: f64,
    },
    Elapsed {
        time: u64,
    },
    Finished {
        label: String,
        metric: String,
        replication: usize,
        error: f64,
    },
}

/// 定义了向用户报告消息的接口，用于统一命令行和图形界面的输出方式
///
/// 命令行界面、图形界面只需要各自实现发送方法，就可向用户报告各种用户数据
pub trait 界面 {
    fn 发送(&self, 消息: 消息);
}

/// 丢弃所有消息，用于测试和性能测试
pub struct 静默界面;

impl 界面 for 静默界面 {
    fn 发送(&self, _消息: 消息) {}
}
