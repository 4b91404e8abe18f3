use super::metric::误差指标;
use super::目标函数;
use crate::data::{索引选择, 观测序列};
use crate::simulator::{模拟, 积分选项, 积分错误};
use crate::参数向量;

/// 计算一组参数在观测数据上的误差
///
/// 从两个通道选中的第一个时间点取初值，在全部时间点上积分，然后只在选中的索引上和观测值比较。两个通道的误差取平均。
pub fn 计算误差(
    参数: &参数向量,
    观测: &观测序列,
    指标: 误差指标,
    索引选择: &索引选择,
    选项: &积分选项,
) -> Result<f64, 积分错误> {
    let 初值 = 观测.初值(索引选择);
    let (猎物, 捕食者) = 模拟(参数, 初值, &观测.时间, 选项)?;
    let 通道误差 = |模拟值: &[f64], 观测值: &[f64], 索引: &[usize]| {
        let 选中模拟值: Vec<f64> = 索引.iter().map(|&i| 模拟值[i]).collect();
        let 选中观测值: Vec<f64> = 索引.iter().map(|&i| 观测值[i]).collect();
        指标.计算(&选中模拟值, &选中观测值)
    };
    let 猎物误差 = 通道误差(&猎物, &观测.猎物, &索引选择.猎物);
    let 捕食者误差 = 通道误差(&捕食者, &观测.捕食者, &索引选择.捕食者);
    Ok((猎物误差 + 捕食者误差) / 2.0)
}

/// 默认目标函数：固定观测数据、误差指标和索引选择，只把参数作为输入
#[derive(Debug, Clone)]
pub struct 默认目标函数<'a> {
    观测: &'a 观测序列,
    指标: 误差指标,
    索引选择: 索引选择,
    选项: 积分选项,
    评估次数: usize,
}

impl<'a> 默认目标函数<'a> {
    /// 用完整数据构造目标函数
    pub fn 新建(观测: &'a 观测序列, 指标: 误差指标, 选项: 积分选项) -> Self {
        let 索引选择 = 索引选择::全部(观测.len());
        Self::部分数据(观测, 指标, 索引选择, 选项)
    }

    /// 只在给定索引上计算误差的目标函数
    pub fn 部分数据(
        观测: &'a 观测序列,
        指标: 误差指标,
        索引选择: 索引选择,
        选项: 积分选项,
    ) -> Self {
        Self {
            观测,
            指标,
            索引选择,
            选项,
            评估次数: 0,
        }
    }

    pub fn 指标(&self) -> 误差指标 {
        self.指标
    }

    pub fn 评估次数(&self) -> usize {
        self.评估次数
    }
}

impl 目标函数 for 默认目标函数<'_> {
    fn 计算(&mut self, 参数: &参数向量) -> Result<f64, 积分错误> {
        self.评估次数 += 1;
        计算误差(参数, self.观测, self.指标, &self.索引选择, &self.选项)
    }
}
