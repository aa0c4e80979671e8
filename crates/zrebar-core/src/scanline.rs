//! 扫描线求交
//!
//! 沿扫描轴以固定间距生成贯穿边界包围盒的测试直线，
//! 返回每条测试直线与边界的原始交点。

use crate::boundary::BoundaryCurve;
use crate::geometry::Line;
use crate::math::{BoundingBox2, Point2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 测试直线最小外延长度
pub const MIN_SWEEP_MARGIN: f64 = 1000.0;

/// 步数计算的浮点裕量，保证恰好落在 max 上的最后一条线不被漏掉
const STEP_SLACK: f64 = 1e-9;

/// 扫描方向
///
/// 顺序固定为 Horizontal < Vertical，汇总报表按此排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SweepAxis {
    /// 水平测试线，沿 Y 步进，交点按 X 配对
    Horizontal,
    /// 竖直测试线，沿 X 步进，交点按 Y 配对
    Vertical,
}

impl SweepAxis {
    pub fn name(&self) -> &'static str {
        match self {
            SweepAxis::Horizontal => "Horizontal",
            SweepAxis::Vertical => "Vertical",
        }
    }

    /// 步进方向上的范围
    fn sweep_range(&self, bbox: &BoundingBox2) -> (f64, f64) {
        match self {
            SweepAxis::Horizontal => (bbox.min.y, bbox.max.y),
            SweepAxis::Vertical => (bbox.min.x, bbox.max.x),
        }
    }

    /// 配对方向上的坐标
    pub fn pairing_coord(&self, point: &Point2) -> f64 {
        match self {
            SweepAxis::Horizontal => point.x,
            SweepAxis::Vertical => point.y,
        }
    }
}

impl fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 一条扫描线及其原始交点
#[derive(Debug, Clone)]
pub struct Scanline {
    pub axis: SweepAxis,
    /// 扫描线在步进方向上的坐标
    pub offset: f64,
    /// 原始交点（无序，可能重复）
    pub points: Vec<Point2>,
}

/// 扫描线求交器
#[derive(Debug, Clone, Copy)]
pub struct Intersector {
    spacing: f64,
    axis: SweepAxis,
}

impl Intersector {
    /// `spacing` 必须为正，由配置校验保证
    pub fn new(spacing: f64, axis: SweepAxis) -> Self {
        debug_assert!(spacing > 0.0);
        Self { spacing, axis }
    }

    /// 测试直线的外延长度：max(1000, 宽 + 高)，避免短测试线的切线伪影
    pub fn margin(bbox: &BoundingBox2) -> f64 {
        MIN_SWEEP_MARGIN.max(bbox.width() + bbox.height())
    }

    /// 扫描线坐标序列：min, min+spacing, … ≤ max（含 max）
    ///
    /// 间距大于边界在步进方向上的跨度时不生成任何扫描线。
    pub fn offsets(&self, bbox: &BoundingBox2) -> Vec<f64> {
        if bbox.is_empty() {
            return vec![];
        }
        let (min, max) = self.axis.sweep_range(bbox);
        if self.spacing > (max - min) * (1.0 + STEP_SLACK) {
            return vec![];
        }
        let steps = ((max - min) / self.spacing + STEP_SLACK).floor() as usize;
        (0..=steps).map(|i| min + i as f64 * self.spacing).collect()
    }

    /// 构造贯穿包围盒的测试直线
    fn test_line(&self, offset: f64, bbox: &BoundingBox2, margin: f64) -> Line {
        match self.axis {
            SweepAxis::Horizontal => Line::new(
                Point2::new(bbox.min.x - margin, offset),
                Point2::new(bbox.max.x + margin, offset),
            ),
            SweepAxis::Vertical => Line::new(
                Point2::new(offset, bbox.min.y - margin),
                Point2::new(offset, bbox.max.y + margin),
            ),
        }
    }

    /// 执行扫描；交点少于 2 个的扫描线（相切或未命中）被跳过
    pub fn sweep(&self, boundary: &BoundaryCurve) -> Vec<Scanline> {
        let bbox = boundary.bounding_box();
        let margin = Self::margin(&bbox);

        self.offsets(&bbox)
            .into_iter()
            .filter_map(|offset| {
                let line = self.test_line(offset, &bbox, margin);
                let points = boundary.intersect_line(&line);
                if points.len() < 2 {
                    tracing::trace!("{} scanline {:.4} skipped ({} hits)", self.axis, offset, points.len());
                    return None;
                }
                Some(Scanline {
                    axis: self.axis,
                    offset,
                    points,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::geometry::Polyline;

    fn square(size: f64) -> BoundaryCurve {
        let pl = Polyline::from_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(size, 0.0),
                Point2::new(size, size),
                Point2::new(0.0, size),
            ],
            true,
        );
        BoundaryCurve::new(EntityId::new(1), pl, 1.0).unwrap()
    }

    #[test]
    fn test_offsets_include_max() {
        let bbox = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(1000.0, 1000.0));
        let offsets = Intersector::new(100.0, SweepAxis::Horizontal).offsets(&bbox);
        assert_eq!(offsets.len(), 11);
        assert_eq!(offsets[0], 0.0);
        assert_eq!(offsets[10], 1000.0);
    }

    #[test]
    fn test_offsets_no_accumulated_drift() {
        // 0.1 累加 10 次不等于 1.0，按步数计算不会漏掉最后一条线
        let bbox = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let offsets = Intersector::new(0.1, SweepAxis::Vertical).offsets(&bbox);
        assert_eq!(offsets.len(), 11);
        assert!((offsets[10] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_margin() {
        let small = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        assert_eq!(Intersector::margin(&small), MIN_SWEEP_MARGIN);
        let large = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(3000.0, 500.0));
        assert_eq!(Intersector::margin(&large), 3500.0);
    }

    #[test]
    fn test_sweep_square_edges_are_swept() {
        let scanlines = Intersector::new(100.0, SweepAxis::Horizontal).sweep(&square(1000.0));
        assert_eq!(scanlines.len(), 11);
        for line in &scanlines {
            assert!(line.points.len() >= 2);
            for p in &line.points {
                assert!((p.y - line.offset).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_spacing_larger_than_extent() {
        let scanlines = Intersector::new(5000.0, SweepAxis::Vertical).sweep(&square(1000.0));
        assert!(scanlines.is_empty());

        // 间距恰好等于跨度时两条边线都被扫描
        let scanlines = Intersector::new(1000.0, SweepAxis::Vertical).sweep(&square(1000.0));
        assert_eq!(scanlines.len(), 2);
    }
}
