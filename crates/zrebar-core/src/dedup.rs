//! 交点去重
//!
//! 测试直线穿过多段线顶点时，相邻两条线段都会报告同一个交点。

use crate::math::Point2;
use crate::scanline::SweepAxis;

/// 两点视为同一点的距离阈值（图形单位）
pub const DEDUP_TOLERANCE: f64 = 0.01;

/// 按配对轴排序并合并近似重合的交点
///
/// 每个簇只保留第一个点（不取平均）。结果为奇数个时丢弃最后一个未配对的点，
/// 这是测试直线擦过顶点（相切）时的既定策略，不视为错误。
pub fn dedup_points(mut points: Vec<Point2>, axis: SweepAxis) -> Vec<Point2> {
    points.sort_by(|a, b| axis.pairing_coord(a).total_cmp(&axis.pairing_coord(b)));

    let mut result: Vec<Point2> = Vec::with_capacity(points.len());
    let mut cluster_head: Option<Point2> = None;
    for p in points {
        match cluster_head {
            Some(head) if (p - head).norm() <= DEDUP_TOLERANCE => {}
            _ => {
                result.push(p);
                cluster_head = Some(p);
            }
        }
    }

    if result.len() % 2 == 1 {
        let dropped = result.pop();
        tracing::debug!("Dropped unpaired intersection point {:?}", dropped);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_along_pairing_axis() {
        let points = vec![
            Point2::new(30.0, 5.0),
            Point2::new(10.0, 5.0),
            Point2::new(20.0, 5.0),
            Point2::new(0.0, 5.0),
        ];
        let result = dedup_points(points, SweepAxis::Horizontal);
        let xs: Vec<f64> = result.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0]);

        let points = vec![Point2::new(5.0, 8.0), Point2::new(5.0, -3.0)];
        let result = dedup_points(points, SweepAxis::Vertical);
        assert_eq!(result[0].y, -3.0);
        assert_eq!(result[1].y, 8.0);
    }

    #[test]
    fn test_cluster_keeps_first_point() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.005, 0.0),
            Point2::new(100.0, 0.0),
        ];
        let result = dedup_points(points, SweepAxis::Horizontal);
        assert_eq!(result, vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]);
    }

    #[test]
    fn test_points_beyond_tolerance_survive() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.02, 0.0),
            Point2::new(50.0, 0.0),
            Point2::new(100.0, 0.0),
        ];
        assert_eq!(dedup_points(points, SweepAxis::Horizontal).len(), 4);
    }

    #[test]
    fn test_odd_trailing_point_dropped() {
        // 擦过顶点的测试线：三个交点，最后一个被丢弃
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(40.0, 0.0),
            Point2::new(90.0, 0.0),
        ];
        let result = dedup_points(points, SweepAxis::Horizontal);
        assert_eq!(result, vec![Point2::new(0.0, 0.0), Point2::new(40.0, 0.0)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_points(Vec::new(), SweepAxis::Vertical).is_empty());
    }
}
