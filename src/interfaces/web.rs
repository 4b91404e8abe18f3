use crate::config::配置;
use crate::data::{原始观测, 索引选择, 观测序列};
use crate::experiments::运行实验;
use crate::interfaces::{消息, 界面};
use crate::objectives::default::计算误差;
use crate::objectives::metric::误差指标;
use crate::参数向量;
use js_sys::Function;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value, Serializer};
use wasm_bindgen::{prelude::*, JsError};

fn 设置错误处理() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// 图形界面参数的定义
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct 图形界面参数 {
    pub 配置: 配置,
    pub 观测: Vec<原始观测>,
}

/// 通过图形界面来使用 libvolterra 的入口，实现了界面特征
#[wasm_bindgen]
pub struct Web {
    回调: Function,
    参数: 图形界面参数,
}

/// 用于在图形界面验证输入的配置是否正确
#[wasm_bindgen]
pub fn validate(js_config: JsValue) -> Result<JsValue, JsError> {
    设置错误处理();
    let 配置: 配置 = from_value(js_config)?;
    配置.校验()?;
    let 序列化 = Serializer::json_compatible();
    Ok(配置.serialize(&序列化)?)
}

#[wasm_bindgen]
impl Web {
    pub fn new(回调: Function) -> Web {
        设置错误处理();
        let 参数 = 图形界面参数::default();
        Self { 回调, 参数 }
    }

    pub fn sync(&mut self, 前端参数: JsValue) -> Result<(), JsError> {
        self.参数 = from_value(前端参数)?;
        Ok(())
    }

    /// 计算一组参数在完整观测数据上的误差
    pub fn evaluate(&self, 前端参数向量: JsValue, 前端指标: JsValue) -> Result<JsValue, JsError> {
        let 参数: 参数向量 = from_value(前端参数向量)?;
        let 指标: 误差指标 = from_value(前端指标)?;
        let 观测 = 观测序列::从原始观测(self.参数.观测.clone())?;
        let 选择 = 索引选择::全部(观测.len());
        let 误差 = 计算误差(&参数, &观测, 指标, &选择, &self.参数.配置.integration)
            .map_err(crate::错误::from)?;
        Ok(to_value(&误差)?)
    }

    /// 运行配置中的全部实验，返回每个误差指标下的汇总
    pub fn optimize(&self) -> Result<JsValue, JsError> {
        let 图形界面参数 { 配置, 观测 } = self.参数.clone();
        配置.校验()?;
        let 观测 = 观测序列::从原始观测(观测)?;
        let 报告 = 运行实验(&配置, &观测, self);
        let 序列化 = Serializer::json_compatible();
        Ok(报告.serialize(&序列化)?)
    }
}

impl 界面 for Web {
    fn 发送(&self, 消息: 消息) {
        let 序列化 = Serializer::json_compatible();
        if let Ok(前端消息) = 消息.serialize(&序列化) {
            // 回调抛出的异常不影响优化过程
            let _ = self.回调.call1(&JsValue::null(), &前端消息);
        }
    }
}
