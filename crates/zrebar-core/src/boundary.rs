//! 填充边界
//!
//! 边界只通过句柄引用宿主实体，几何数据是从宿主读取后派生的副本。
//! 扫描之前边界必须闭合：首尾间距在闭合容差内的开放多段线会被自动闭合。

use crate::entity::EntityId;
use crate::error::BoundaryError;
use crate::geometry::{Line, Polyline, Segment};
use crate::math::{BoundingBox2, Point2, EPSILON};

/// 已校验的闭合边界
#[derive(Debug, Clone)]
pub struct BoundaryCurve {
    id: EntityId,
    polyline: Polyline,
    segments: Vec<Segment>,
    bbox: BoundingBox2,
    auto_closed: bool,
}

impl BoundaryCurve {
    /// 校验并（必要时）自动闭合边界
    ///
    /// 直线边界至少需要 3 个互不重合的顶点；带弧线段时 2 个即可（例如两段半圆组成的整圆）。
    pub fn new(
        id: EntityId,
        mut polyline: Polyline,
        closing_tolerance: f64,
    ) -> Result<Self, BoundaryError> {
        let distinct = polyline.distinct_vertex_count();
        if distinct < 2 {
            return Err(BoundaryError::Degenerate {
                id,
                reason: format!("at least 2 distinct vertices required, got {}", distinct),
            });
        }

        let mut auto_closed = false;
        if let Some(gap) = polyline.closing_gap() {
            if gap > closing_tolerance {
                return Err(BoundaryError::NotClosed {
                    id,
                    gap,
                    tolerance: closing_tolerance,
                });
            }
            // 首尾重合时去掉重复的末点，避免零长度闭合边
            if gap < EPSILON {
                polyline.vertices.pop();
            }
            polyline.closed = true;
            auto_closed = true;
            tracing::debug!("Auto-closed boundary {} (gap {:.6})", id, gap);
        }

        let segments = polyline.segments();
        let has_arc = segments.iter().any(|s| matches!(s, Segment::Arc(_)));
        if distinct < 3 && !has_arc {
            return Err(BoundaryError::Degenerate {
                id,
                reason: format!(
                    "straight boundary needs at least 3 distinct vertices, got {}",
                    distinct
                ),
            });
        }

        let bbox = polyline.bounding_box();
        Ok(Self {
            id,
            polyline,
            segments,
            bbox,
            auto_closed,
        })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        self.bbox
    }

    pub fn is_closed(&self) -> bool {
        self.polyline.closed
    }

    /// 是否由本库自动闭合（宿主实体需同步标记为闭合）
    pub fn was_auto_closed(&self) -> bool {
        self.auto_closed
    }

    /// 与直线的全部交点（无序，可能包含线段连接处的重复点）
    pub fn intersect_line(&self, line: &Line) -> Vec<Point2> {
        self.segments
            .iter()
            .flat_map(|s| s.intersect_line(line))
            .collect()
    }

    /// 点到边界的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.segments
            .iter()
            .map(|s| s.distance_to_point(point))
            .fold(f64::MAX, f64::min)
    }
}
