//! 运行结果
//!
//! 每次成功的会话生成一个 `RunResult`，创建后不再修改，交给导出模块持久化。

use crate::aggregate::{BarAggregator, BarGroup};
use crate::config::{AxisMode, FillConfig};
use crate::entity::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub boundary_id: EntityId,
    pub axis_mode: AxisMode,
    pub spacing_horizontal: f64,
    pub spacing_vertical: f64,
    pub total_bars: usize,
    pub total_length: f64,
    pub groups: Vec<BarGroup>,
}

impl RunResult {
    /// 由汇总器生成最终结果
    pub fn new(boundary_id: EntityId, config: &FillConfig, aggregator: BarAggregator) -> Self {
        let total_bars = aggregator.total_bars();
        let total_length = aggregator.total_length();
        Self {
            boundary_id,
            axis_mode: config.axis_mode,
            spacing_horizontal: config.spacing_horizontal,
            spacing_vertical: config.spacing_vertical,
            total_bars,
            total_length,
            groups: aggregator.into_groups(),
        }
    }

    /// 四行摘要，仅供日志/命令行显示
    pub fn summary_lines(&self) -> [String; 4] {
        let spacing = match self.axis_mode {
            AxisMode::Horizontal => format!("{:.2}", self.spacing_horizontal),
            AxisMode::Vertical => format!("{:.2}", self.spacing_vertical),
            AxisMode::Both => format!(
                "{:.2} / {:.2}",
                self.spacing_horizontal, self.spacing_vertical
            ),
        };
        [
            format!("Boundary: {}", self.boundary_id),
            format!("Mode: {}  Spacing: {}", self.axis_mode, spacing),
            format!("Bars: {} in {} groups", self.total_bars, self.groups.len()),
            format!("Total length: {:.2}", self.total_length),
        ]
    }
}
