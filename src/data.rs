//! 观测数据的定义
//!
//! 观测序列由时间列、猎物数量列和捕食者数量列组成，读入之后不再修改。索引选择用于部分数据实验，只在一部分时间点上计算误差。

use crate::simulator::状态;
use crate::错误;
use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// CSV 文件中的一行：时间、猎物数量、捕食者数量
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct 原始观测 {
    #[serde(rename = "time")]
    pub t: f64,
    pub prey: f64,
    pub predator: f64,
}

/// 按时间升序排列的观测序列
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct 观测序列 {
    pub 时间: Vec<f64>,
    pub 猎物: Vec<f64>,
    pub 捕食者: Vec<f64>,
}

impl 观测序列 {
    pub fn 新建(时间: Vec<f64>, 猎物: Vec<f64>, 捕食者: Vec<f64>) -> Result<Self, 错误> {
        if 时间.len() != 猎物.len() || 时间.len() != 捕食者.len() {
            return Err(format!(
                "观测序列长度不一致：时间 {}，猎物 {}，捕食者 {}",
                时间.len(),
                猎物.len(),
                捕食者.len()
            )
            .into());
        }
        if 时间.is_empty() {
            return Err("观测序列为空".into());
        }
        if 时间.windows(2).any(|w| w[1] < w[0]) {
            return Err("观测序列的时间列必须升序排列".into());
        }
        Ok(Self {
            时间,
            猎物,
            捕食者,
        })
    }

    pub fn 从原始观测(原始观测列表: Vec<原始观测>) -> Result<Self, 错误> {
        let mut 时间 = vec![];
        let mut 猎物 = vec![];
        let mut 捕食者 = vec![];
        for 原始观测 { t, prey, predator } in 原始观测列表 {
            时间.push(t);
            猎物.push(prey);
            捕食者.push(predator);
        }
        Self::新建(时间, 猎物, 捕食者)
    }

    pub fn 转为原始观测(&self) -> Vec<原始观测> {
        (0..self.len())
            .map(|i| 原始观测 {
                t: self.时间[i],
                prey: self.猎物[i],
                predator: self.捕食者[i],
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.时间.len()
    }

    pub fn is_empty(&self) -> bool {
        self.时间.is_empty()
    }

    /// 从两个通道各自选中的第一个索引处取初值；完整数据时即为第一个时间点
    pub fn 初值(&self, 索引选择: &索引选择) -> 状态 {
        let 猎物索引 = 索引选择.猎物.first().copied().unwrap_or(0);
        let 捕食者索引 = 索引选择.捕食者.first().copied().unwrap_or(0);
        [self.猎物[猎物索引], self.捕食者[捕食者索引]]
    }
}

/// 计算误差时使用的时间点索引，两个通道可以不同
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct 索引选择 {
    pub 猎物: Vec<usize>,
    pub 捕食者: Vec<usize>,
}

impl 索引选择 {
    pub fn 全部(长度: usize) -> Self {
        Self {
            猎物: (0..长度).collect(),
            捕食者: (0..长度).collect(),
        }
    }

    /// 检查索引是否有效：不能为空，不能越界
    pub fn 校验(&self, 长度: usize) -> Result<(), 错误> {
        for (名称, 索引) in [("猎物", &self.猎物), ("捕食者", &self.捕食者)] {
            if 索引.is_empty() {
                return Err(format!("{名称}通道的索引选择为空").into());
            }
            if let Some(越界) = 索引.iter().find(|&&i| i >= 长度) {
                return Err(format!("{名称}通道的索引 {越界} 超出观测序列长度 {长度}").into());
            }
        }
        Ok(())
    }
}

/// 部分数据实验中，生成索引选择的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum 子采样策略 {
    /// 只对猎物通道随机抽样
    #[serde(rename = "lessx")]
    LessX,
    /// 只对捕食者通道随机抽样
    #[serde(rename = "lessy")]
    LessY,
    /// 两个通道各自独立随机抽样
    #[serde(rename = "lessboth")]
    LessBoth,
    /// 只保留高于阈值的时间点
    #[serde(rename = "onlypeaks")]
    OnlyPeaks,
    /// 只保留低于阈值的时间点
    #[serde(rename = "nopeaks")]
    NoPeaks,
}

impl Display for 子采样策略 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            子采样策略::LessX => "lessx",
            子采样策略::LessY => "lessy",
            子采样策略::LessBoth => "lessboth",
            子采样策略::OnlyPeaks => "onlypeaks",
            子采样策略::NoPeaks => "nopeaks",
        };
        f.write_str(name)
    }
}

impl 子采样策略 {
    /// 基于阈值的策略与样本量无关，每种只需要运行一次
    pub fn 依赖样本量(&self) -> bool {
        matches!(self, Self::LessX | Self::LessY | Self::LessBoth)
    }

    pub fn 生成<R: Rng + ?Sized>(
        &self,
        观测: &观测序列,
        样本量: usize,
        阈值: f64,
        rng: &mut R,
    ) -> 索引选择 {
        let 长度 = 观测.len();
        let 全部: Vec<usize> = (0..长度).collect();
        match self {
            Self::LessX => 索引选择 {
                猎物: 随机抽样(长度, 样本量, rng),
                捕食者: 全部,
            },
            Self::LessY => 索引选择 {
                猎物: 全部,
                捕食者: 随机抽样(长度, 样本量, rng),
            },
            Self::LessBoth => {
                let 猎物 = 随机抽样(长度, 样本量, rng);
                let 捕食者 = 随机抽样(长度, 样本量, rng);
                索引选择 { 猎物, 捕食者 }
            }
            Self::OnlyPeaks => 索引选择 {
                猎物: 按阈值筛选(&观测.猎物, |x| x > 阈值),
                捕食者: 按阈值筛选(&观测.捕食者, |x| x > 阈值),
            },
            Self::NoPeaks => 索引选择 {
                猎物: 按阈值筛选(&观测.猎物, |x| x < 阈值),
                捕食者: 按阈值筛选(&观测.捕食者, |x| x < 阈值),
            },
        }
    }
}

/// 始终保留首尾两个时间点，其余从中间无放回地抽取
fn 随机抽样<R: Rng + ?Sized>(长度: usize, 样本量: usize, rng: &mut R) -> Vec<usize> {
    if 长度 <= 2 || 样本量 >= 长度 {
        return (0..长度).collect();
    }
    let 中间数量 = 样本量.saturating_sub(2);
    let mut 索引: Vec<usize> = sample(rng, 长度 - 2, 中间数量)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    索引.push(0);
    索引.push(长度 - 1);
    索引.sort_unstable();
    索引
}

fn 按阈值筛选(序列: &[f64], 条件: impl Fn(f64) -> bool) -> Vec<usize> {
    let 末尾 = 序列.len() - 1;
    序列
        .iter()
        .enumerate()
        .filter(|&(i, &x)| 条件(x) || i == 0 || i == 末尾)
        .map(|(i, _)| i)
        .collect()
}
