//! 填充配置
//!
//! 由设置对话（外部协作方）提供，会话开始前校验。

use crate::error::ConfigError;
use crate::scanline::SweepAxis;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 布筋方向模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AxisMode {
    #[default]
    Horizontal,
    Vertical,
    Both,
}

impl AxisMode {
    /// 需要执行的扫描方向（Both 先水平后竖直）
    pub fn axes(&self) -> &'static [SweepAxis] {
        match self {
            AxisMode::Horizontal => &[SweepAxis::Horizontal],
            AxisMode::Vertical => &[SweepAxis::Vertical],
            AxisMode::Both => &[SweepAxis::Horizontal, SweepAxis::Vertical],
        }
    }
}

impl fmt::Display for AxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisMode::Horizontal => "Horizontal",
            AxisMode::Vertical => "Vertical",
            AxisMode::Both => "Both",
        };
        f.write_str(name)
    }
}

/// 间距与方向配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    pub axis_mode: AxisMode,
    /// 水平钢筋间距（沿 Y 步进）
    pub spacing_horizontal: f64,
    /// 竖直钢筋间距（沿 X 步进）
    pub spacing_vertical: f64,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            axis_mode: AxisMode::Horizontal,
            spacing_horizontal: 200.0,
            spacing_vertical: 200.0,
        }
    }
}

impl FillConfig {
    pub fn new(axis_mode: AxisMode, spacing_horizontal: f64, spacing_vertical: f64) -> Self {
        Self {
            axis_mode,
            spacing_horizontal,
            spacing_vertical,
        }
    }

    pub fn spacing(&self, axis: SweepAxis) -> f64 {
        match axis {
            SweepAxis::Horizontal => self.spacing_horizontal,
            SweepAxis::Vertical => self.spacing_vertical,
        }
    }

    /// 只检查所选方向实际用到的间距
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &axis in self.axis_mode.axes() {
            let value = self.spacing(axis);
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSpacing { axis, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_only_required_axes() {
        assert!(FillConfig::new(AxisMode::Horizontal, 100.0, 0.0).validate().is_ok());
        assert!(FillConfig::new(AxisMode::Vertical, -1.0, 50.0).validate().is_ok());
        assert!(FillConfig::new(AxisMode::Both, 100.0, 50.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_spacing() {
        let err = FillConfig::new(AxisMode::Horizontal, 0.0, 100.0).validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSpacing {
                axis: SweepAxis::Horizontal,
                value: 0.0
            }
        );
        assert!(FillConfig::new(AxisMode::Vertical, 100.0, -5.0).validate().is_err());
        assert!(FillConfig::new(AxisMode::Both, 100.0, 0.0).validate().is_err());
        assert!(FillConfig::new(AxisMode::Both, f64::NAN, 10.0).validate().is_err());
        assert!(FillConfig::new(AxisMode::Both, f64::INFINITY, 10.0).validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: FillConfig =
            serde_json::from_str(r#"{"axis_mode":"Both","spacing_vertical":50.0}"#).unwrap();
        assert_eq!(config.axis_mode, AxisMode::Both);
        assert_eq!(config.spacing_horizontal, 200.0);
        assert_eq!(config.spacing_vertical, 50.0);
    }
}
