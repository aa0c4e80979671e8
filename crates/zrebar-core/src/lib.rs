//! ZRebar 核心几何引擎
//!
//! 将闭合的二维边界转换为规则的钢筋网格。
//!
//! # 流水线
//!
//! - `scanline`: 沿扫描轴生成测试直线并与边界求交
//! - `dedup`: 合并线段连接处产生的重复交点
//! - `bar`: 交点两两配对成钢筋，过滤退化线段
//! - `aggregate`: 按方向和取整长度汇总
//!
//! # 示例
//!
//! ```rust
//! use zrebar_core::prelude::*;
//!
//! let square = Polyline::from_points(
//!     [
//!         Point2::new(0.0, 0.0),
//!         Point2::new(1000.0, 0.0),
//!         Point2::new(1000.0, 1000.0),
//!         Point2::new(0.0, 1000.0),
//!     ],
//!     true,
//! );
//! let boundary = BoundaryCurve::new(EntityId::new(1), square, 1.0).unwrap();
//! let config = FillConfig::new(AxisMode::Horizontal, 100.0, 0.0);
//!
//! let bars = plan_bars(&boundary, &config);
//! assert_eq!(bars.len(), 11);
//! ```

pub mod aggregate;
pub mod bar;
pub mod boundary;
pub mod config;
pub mod dedup;
pub mod entity;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod math;
pub mod result;
pub mod scanline;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::aggregate::{BarAggregator, BarGroup, GroupKey};
    pub use crate::bar::{Bar, BarBuilder, BarSet, MIN_BAR_LENGTH};
    pub use crate::boundary::BoundaryCurve;
    pub use crate::config::{AxisMode, FillConfig};
    pub use crate::dedup::{dedup_points, DEDUP_TOLERANCE};
    pub use crate::entity::{EntityId, EntityKind};
    pub use crate::error::{BoundaryError, ConfigError};
    pub use crate::fill::plan_bars;
    pub use crate::geometry::{Arc, Geometry, Line, Polyline, PolylineVertex, Segment};
    pub use crate::math::{BoundingBox2, Point2, Vector2, EPSILON};
    pub use crate::result::RunResult;
    pub use crate::scanline::{Intersector, Scanline, SweepAxis};
}
