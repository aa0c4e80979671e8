//! 几何图元定义
//!
//! 支持的基本图元：
//! - 线段 (Line)
//! - 圆弧 (Arc)
//! - 多段线 (Polyline)，顶点可带凸度（bulge）表示弧线段

use crate::entity::EntityKind;
use crate::math::{BoundingBox2, Point2, Vector2, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// 线段参数的包含容差（扫描线与端点重合时仍算相交）
const PARAM_EPSILON: f64 = 1e-9;

/// 几何类型枚举
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Geometry {
    Line(Line),
    Arc(Arc),
    Polyline(Polyline),
}

impl Geometry {
    /// 宿主侧的实体类别
    pub fn kind(&self) -> EntityKind {
        match self {
            Geometry::Line(_) => EntityKind::Line,
            Geometry::Arc(_) => EntityKind::Arc,
            Geometry::Polyline(_) => EntityKind::Polyline,
        }
    }
}

/// 线段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 计算点到线段的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        let v = self.end - self.start;
        let w = point - self.start;

        let c1 = w.dot(&v);
        if c1 <= 0.0 {
            return (point - self.start).norm();
        }

        let c2 = v.dot(&v);
        if c2 <= c1 {
            return (point - self.end).norm();
        }

        let b = c1 / c2;
        let pb = self.start + v * b;
        (point - pb).norm()
    }

    /// 线段-线段交点（端点包含在内），返回 `self` 上的点
    ///
    /// 平行（含共线）线段不返回交点，共线边的端点由相邻边报告。
    /// 以边界边作为 `self` 调用，交点不受长扫描线的舍入误差影响。
    pub fn intersect_line(&self, other: &Line) -> Option<Point2> {
        let d1 = self.end - self.start;
        let d2 = other.end - other.start;

        let cross = d1.x * d2.y - d1.y * d2.x;
        if cross.abs() < EPSILON {
            return None;
        }

        let d = other.start - self.start;
        let t1 = (d.x * d2.y - d.y * d2.x) / cross;
        let t2 = (d.x * d1.y - d.y * d1.x) / cross;

        let inside = |t: f64| (-PARAM_EPSILON..=1.0 + PARAM_EPSILON).contains(&t);
        if inside(t1) && inside(t2) {
            Some(self.start + d1 * t1.clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

/// 圆弧（从 start_angle 逆时针到 end_angle）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（弧度）
    pub start_angle: f64,
    /// 终止角度（弧度）
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// 计算扫过的角度
    pub fn sweep_angle(&self) -> f64 {
        let sweep = (self.end_angle - self.start_angle).rem_euclid(TAU);
        if sweep < EPSILON {
            TAU
        } else {
            sweep
        }
    }

    /// 计算弧长
    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn start_point(&self) -> Point2 {
        self.point_at_angle(self.start_angle)
    }

    pub fn end_point(&self) -> Point2 {
        self.point_at_angle(self.end_angle)
    }

    /// 检查角度是否在弧的范围内（带角度容差）
    pub fn contains_angle(&self, angle: f64) -> bool {
        let offset = (angle - self.start_angle).rem_euclid(TAU);
        let sweep = self.sweep_angle();
        offset <= sweep + PARAM_EPSILON || offset >= TAU - PARAM_EPSILON
    }

    /// 计算点到圆弧的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        let angle = (point.y - self.center.y).atan2(point.x - self.center.x);
        if self.contains_angle(angle) {
            ((point - self.center).norm() - self.radius).abs()
        } else {
            let d1 = (point - self.start_point()).norm();
            let d2 = (point - self.end_point()).norm();
            d1.min(d2)
        }
    }

    /// 线段-圆弧交点
    ///
    /// 先求线段与完整圆的交点，再过滤落在弧范围内的。
    pub fn intersect_line(&self, line: &Line) -> Vec<Point2> {
        let d = line.end - line.start;
        let len_sq = d.dot(&d);
        if len_sq < EPSILON {
            return vec![];
        }

        // 圆心在直线上的垂足
        let t_foot = (self.center - line.start).dot(&d) / len_sq;
        let foot = line.start + d * t_foot;
        let h = (self.center - foot).norm();

        let tangent_tol = PARAM_EPSILON * self.radius.max(1.0);
        let params: Vec<f64> = if h > self.radius + tangent_tol {
            vec![]
        } else if (h - self.radius).abs() <= tangent_tol {
            // 相切
            vec![t_foot]
        } else {
            let half_chord = (self.radius * self.radius - h * h).sqrt();
            let dt = half_chord / len_sq.sqrt();
            vec![t_foot - dt, t_foot + dt]
        };

        params
            .into_iter()
            .filter(|t| (-PARAM_EPSILON..=1.0 + PARAM_EPSILON).contains(t))
            .map(|t| line.start + d * t)
            .filter(|p| {
                let angle = (p.y - self.center.y).atan2(p.x - self.center.x);
                self.contains_angle(angle)
            })
            .collect()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start_point(), self.end_point()]);

        // 检查象限点
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            if self.contains_angle(angle) {
                bbox.expand_to_include(&self.point_at_angle(angle));
            }
        }

        bbox
    }
}

/// 多段线顶点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    pub point: Point2,
    /// 凸度（bulge）- 用于弧线段，0表示直线，正值为逆时针
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(point: Point2) -> Self {
        Self { point, bulge: 0.0 }
    }

    pub fn with_bulge(point: Point2, bulge: f64) -> Self {
        Self { point, bulge }
    }
}

/// 多段线的单个线段
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    Arc(Arc),
}

impl Segment {
    /// 与直线求交
    pub fn intersect_line(&self, line: &Line) -> Vec<Point2> {
        match self {
            Segment::Line(seg) => seg.intersect_line(line).into_iter().collect(),
            Segment::Arc(arc) => arc.intersect_line(line),
        }
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        match self {
            Segment::Line(seg) => seg.distance_to_point(point),
            Segment::Arc(arc) => arc.distance_to_point(point),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Segment::Line(seg) => seg.length(),
            Segment::Arc(arc) => arc.length(),
        }
    }
}

/// 多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<PolylineVertex>,
    /// 是否闭合
    pub closed: bool,
}

impl Polyline {
    pub fn new(vertices: Vec<PolylineVertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// 从点列表创建（所有顶点都是直线连接）
    pub fn from_points(points: impl IntoIterator<Item = Point2>, closed: bool) -> Self {
        Self {
            vertices: points.into_iter().map(PolylineVertex::new).collect(),
            closed,
        }
    }

    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 线段数量
    pub fn segment_count(&self) -> usize {
        if self.vertices.len() < 2 {
            return 0;
        }
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len() - 1
        }
    }

    /// 展开为直线段/弧线段
    pub fn segments(&self) -> Vec<Segment> {
        let n = self.vertices.len();
        (0..self.segment_count())
            .map(|i| {
                let v1 = &self.vertices[i];
                let v2 = &self.vertices[(i + 1) % n];
                if v1.bulge.abs() < EPSILON {
                    Segment::Line(Line::new(v1.point, v2.point))
                } else {
                    match Self::vertex_pair_to_arc(v1, v2) {
                        Some(arc) => Segment::Arc(arc),
                        // 回退到直线
                        None => Segment::Line(Line::new(v1.point, v2.point)),
                    }
                }
            })
            .collect()
    }

    /// 计算总长度
    pub fn length(&self) -> f64 {
        self.segments().iter().map(Segment::length).sum()
    }

    /// 计算点到多段线的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        match self.vertices.len() {
            0 => f64::MAX,
            1 => (point - self.vertices[0].point).norm(),
            _ => self
                .segments()
                .iter()
                .map(|s| s.distance_to_point(point))
                .fold(f64::MAX, f64::min),
        }
    }

    /// 开放多段线首尾端点的间距；闭合或顶点不足时为 None
    pub fn closing_gap(&self) -> Option<f64> {
        if self.closed || self.vertices.len() < 2 {
            return None;
        }
        let first = self.vertices[0].point;
        let last = self.vertices[self.vertices.len() - 1].point;
        Some((last - first).norm())
    }

    /// 互不重合的顶点数量
    pub fn distinct_vertex_count(&self) -> usize {
        let mut distinct: Vec<Point2> = Vec::with_capacity(self.vertices.len());
        for v in &self.vertices {
            if !distinct.iter().any(|p| (p - v.point).norm() < EPSILON) {
                distinct.push(v.point);
            }
        }
        distinct.len()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        if self.vertices.is_empty() {
            return BoundingBox2::empty();
        }
        let mut bbox = BoundingBox2::from_points(self.vertices.iter().map(|v| v.point));
        for segment in self.segments() {
            if let Segment::Arc(arc) = segment {
                let arc_box = arc.bounding_box();
                bbox.expand_to_include(&arc_box.min);
                bbox.expand_to_include(&arc_box.max);
            }
        }
        bbox
    }

    /// 将顶点对转换为圆弧
    fn vertex_pair_to_arc(v1: &PolylineVertex, v2: &PolylineVertex) -> Option<Arc> {
        let chord = v2.point - v1.point;
        let chord_len = chord.norm();

        if chord_len < EPSILON {
            return None;
        }

        let bulge = v1.bulge;
        let s = chord_len / 2.0;
        let h = s * bulge.abs(); // 弧高

        let mid = Point2::new(
            (v1.point.x + v2.point.x) / 2.0,
            (v1.point.y + v2.point.y) / 2.0,
        );

        let radius = (s * s + h * h) / (2.0 * h);
        let d = radius - h; // 圆心到弦的有向距离

        // 弦的垂直方向（指向圆心一侧）
        let perp = if bulge > 0.0 {
            Vector2::new(-chord.y, chord.x).normalize()
        } else {
            Vector2::new(chord.y, -chord.x).normalize()
        };

        let center = mid + perp * d;

        let a1 = (v1.point.y - center.y).atan2(v1.point.x - center.x);
        let a2 = (v2.point.y - center.y).atan2(v2.point.x - center.x);

        // 顺时针弧等价于反向的逆时针弧
        if bulge > 0.0 {
            Some(Arc::new(center, radius, a1, a2))
        } else {
            Some(Arc::new(center, radius, a2, a1))
        }
    }
}
