//! 扫描线填充流水线
//!
//! 求交 → 去重 → 配对，纯计算，不接触宿主文档。

use crate::bar::{BarBuilder, BarSet};
use crate::boundary::BoundaryCurve;
use crate::config::FillConfig;
use crate::dedup::dedup_points;
use crate::scanline::Intersector;

/// 按配置的方向依次扫描边界，生成全部钢筋
///
/// 配置须已通过 [`FillConfig::validate`]。
pub fn plan_bars(boundary: &BoundaryCurve, config: &FillConfig) -> BarSet {
    let mut builder = BarBuilder::new();

    for &axis in config.axis_mode.axes() {
        let intersector = Intersector::new(config.spacing(axis), axis);
        let scanlines = intersector.sweep(boundary);
        let before = builder.bar_count();
        for scanline in &scanlines {
            let points = dedup_points(scanline.points.clone(), axis);
            builder.add_scanline(&points, axis);
        }
        tracing::debug!(
            "{} sweep of boundary {}: {} scanlines, {} bars",
            axis,
            boundary.id(),
            scanlines.len(),
            builder.bar_count() - before
        );
    }

    builder.finish()
}
