//! 会话配置

use serde::{Deserialize, Serialize};

/// 捕获会话的可调参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 启动的绘图命令
    pub command: String,
    /// 开放边界首尾间距不超过该值时自动闭合
    pub closing_tolerance: f64,
    /// 生成的钢筋所在图层
    pub bar_layer: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command: "PLINE".to_string(),
            closing_tolerance: 1.0,
            bar_layer: "REBAR".to_string(),
        }
    }
}
