//! 钢筋生成
//!
//! 将去重后的交点按 (0,1)、(2,3)… 两两配对成钢筋线段。

use crate::geometry::Line;
use crate::math::Point2;
use crate::scanline::SweepAxis;
use serde::{Deserialize, Serialize};

/// 钢筋最小长度，不超过该值的配对视为近似重合交点造成的退化线段
pub const MIN_BAR_LENGTH: f64 = 1e-4;

/// 一根钢筋（不可变）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// 序号，两个方向共用同一递增序列
    pub index: usize,
    pub start: Point2,
    pub end: Point2,
    pub length: f64,
    pub axis: SweepAxis,
}

impl Bar {
    pub fn as_line(&self) -> Line {
        Line::new(self.start, self.end)
    }

    /// 坐标有限且长度大于最小值
    pub fn is_valid(&self) -> bool {
        let finite = [self.start.x, self.start.y, self.end.x, self.end.y]
            .iter()
            .all(|v| v.is_finite());
        finite && self.length > MIN_BAR_LENGTH
    }
}

/// 钢筋生成器，维护跨扫描方向的序号与累计长度
#[derive(Debug, Default)]
pub struct BarBuilder {
    bars: Vec<Bar>,
    total_length: f64,
    discarded: usize,
}

impl BarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 配对一条扫描线上已去重的交点，返回新增钢筋数量
    pub fn add_scanline(&mut self, points: &[Point2], axis: SweepAxis) -> usize {
        let before = self.bars.len();
        for pair in points.chunks_exact(2) {
            let (start, end) = (pair[0], pair[1]);
            let length = (end - start).norm();
            if length <= MIN_BAR_LENGTH {
                self.discarded += 1;
                continue;
            }
            self.bars.push(Bar {
                index: self.bars.len(),
                start,
                end,
                length,
                axis,
            });
            self.total_length += length;
        }
        self.bars.len() - before
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// 被过滤的退化配对数量
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn finish(self) -> BarSet {
        BarSet {
            bars: self.bars,
            total_length: self.total_length,
        }
    }
}

/// 生成结果
#[derive(Debug, Clone, Default)]
pub struct BarSet {
    pub bars: Vec<Bar>,
    pub total_length: f64,
}

impl BarSet {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
