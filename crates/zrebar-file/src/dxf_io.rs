//! DXF文件导入/导出
//!
//! 导入：读取图纸中的闭合轮廓（LWPOLYLINE / POLYLINE / CIRCLE）作为边界。
//! 导出：把边界和生成的钢筋写成 DXF，按图层区分。

use crate::error::FileError;
use std::collections::BTreeSet;
use std::path::Path;
use zrebar_core::geometry::{Geometry, Polyline, PolylineVertex};
use zrebar_core::math::Point2;

/// 从 DXF 中读出的边界
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedBoundary {
    pub polyline: Polyline,
    pub layer: String,
}

/// 读取全部候选边界（按图纸中的顺序）
pub fn import_boundaries(path: &Path) -> Result<Vec<ImportedBoundary>, FileError> {
    let drawing = dxf::Drawing::load_file(path).map_err(|e| FileError::Dxf(e.to_string()))?;

    let boundaries: Vec<ImportedBoundary> = drawing
        .entities()
        .filter_map(|entity| {
            convert_dxf_entity(entity).map(|polyline| ImportedBoundary {
                polyline,
                layer: entity.common.layer.clone(),
            })
        })
        .collect();

    tracing::info!(
        "Found {} boundary candidates in {}",
        boundaries.len(),
        path.display()
    );
    Ok(boundaries)
}

/// 读取一个边界：优先第一个闭合轮廓，否则取第一个候选（交给自动闭合判断）
pub fn import_boundary(path: &Path) -> Result<ImportedBoundary, FileError> {
    let mut boundaries = import_boundaries(path)?;
    if boundaries.is_empty() {
        return Err(FileError::NoBoundary(path.display().to_string()));
    }

    let index = boundaries
        .iter()
        .position(|b| b.polyline.closed)
        .unwrap_or(0);
    Ok(boundaries.swap_remove(index))
}

/// 将DXF实体转换为边界多段线
fn convert_dxf_entity(entity: &dxf::entities::Entity) -> Option<Polyline> {
    match &entity.specific {
        dxf::entities::EntityType::LwPolyline(lwpoly) => {
            let vertices: Vec<PolylineVertex> = lwpoly
                .vertices
                .iter()
                .map(|v| PolylineVertex::with_bulge(Point2::new(v.x, v.y), v.bulge))
                .collect();

            Some(Polyline::new(vertices, lwpoly.is_closed()))
        }

        dxf::entities::EntityType::Polyline(poly) => {
            let vertices: Vec<PolylineVertex> = poly
                .vertices()
                .map(|v| {
                    PolylineVertex::with_bulge(Point2::new(v.location.x, v.location.y), v.bulge)
                })
                .collect();

            Some(Polyline::new(vertices, poly.is_closed()))
        }

        // 整圆拆成两段半圆弧
        dxf::entities::EntityType::Circle(circle) => {
            if circle.radius <= 0.0 {
                return None;
            }
            let (cx, cy, r) = (circle.center.x, circle.center.y, circle.radius);
            Some(Polyline::new(
                vec![
                    PolylineVertex::with_bulge(Point2::new(cx - r, cy), 1.0),
                    PolylineVertex::with_bulge(Point2::new(cx + r, cy), 1.0),
                ],
                true,
            ))
        }

        _ => None,
    }
}

/// 导出到DXF文件，每个实体带上所属图层
pub fn export_entities<'a, I>(path: &Path, entities: I) -> Result<(), FileError>
where
    I: IntoIterator<Item = (&'a Geometry, &'a str)>,
{
    let mut drawing = dxf::Drawing::new();
    drawing.header.version = dxf::enums::AcadVersion::R2000;

    let mut layers = BTreeSet::new();
    let mut count = 0usize;
    for (geometry, layer) in entities {
        let mut dxf_entity = dxf::entities::Entity::new(convert_to_dxf_entity(geometry));
        dxf_entity.common.layer = layer.to_string();
        drawing.add_entity(dxf_entity);
        layers.insert(layer.to_string());
        count += 1;
    }

    for name in layers.into_iter().filter(|name| name != "0") {
        let mut dxf_layer = dxf::tables::Layer::default();
        dxf_layer.name = name;
        drawing.add_layer(dxf_layer);
    }

    drawing
        .save_file(path)
        .map_err(|e| FileError::Dxf(e.to_string()))?;

    tracing::info!("Exported {} entities to {}", count, path.display());
    Ok(())
}

fn convert_to_dxf_entity(geometry: &Geometry) -> dxf::entities::EntityType {
    match geometry {
        Geometry::Line(line) => {
            let mut dxf_line = dxf::entities::Line::default();
            dxf_line.p1 = dxf::Point::new(line.start.x, line.start.y, 0.0);
            dxf_line.p2 = dxf::Point::new(line.end.x, line.end.y, 0.0);
            dxf::entities::EntityType::Line(dxf_line)
        }

        Geometry::Arc(arc) => {
            let mut dxf_arc = dxf::entities::Arc::default();
            dxf_arc.center = dxf::Point::new(arc.center.x, arc.center.y, 0.0);
            dxf_arc.radius = arc.radius;
            dxf_arc.start_angle = arc.start_angle.to_degrees();
            dxf_arc.end_angle = arc.end_angle.to_degrees();
            dxf::entities::EntityType::Arc(dxf_arc)
        }

        Geometry::Polyline(polyline) => {
            let mut lwpoly = dxf::entities::LwPolyline::default();
            lwpoly.set_is_closed(polyline.closed);
            lwpoly.vertices = polyline
                .vertices
                .iter()
                .map(|v| {
                    let mut vertex = dxf::LwPolylineVertex::default();
                    vertex.x = v.point.x;
                    vertex.y = v.point.y;
                    vertex.bulge = v.bulge;
                    vertex
                })
                .collect();
            dxf::entities::EntityType::LwPolyline(lwpoly)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zrebar_core::geometry::Line;

    fn square() -> Polyline {
        Polyline::from_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(1000.0, 0.0),
                Point2::new(1000.0, 1000.0),
                Point2::new(0.0, 1000.0),
            ],
            true,
        )
    }

    #[test]
    fn test_export_then_import_boundary() {
        let file_path = std::env::temp_dir().join("zrebar_test_boundary.dxf");

        let outline = Geometry::Polyline(square());
        let bar = Geometry::Line(Line::new(Point2::new(0.0, 500.0), Point2::new(1000.0, 500.0)));
        export_entities(&file_path, [(&outline, "OUTLINE"), (&bar, "REBAR")])
            .expect("Failed to export");

        let imported = import_boundary(&file_path).expect("Failed to import");
        assert_eq!(imported.layer, "OUTLINE");
        assert!(imported.polyline.closed);
        assert_eq!(imported.polyline.vertex_count(), 4);
        assert!((imported.polyline.length() - 4000.0).abs() < 1e-6);

        let drawing = dxf::Drawing::load_file(&file_path).expect("Failed to reload");
        let rebar_lines = drawing
            .entities()
            .filter(|e| e.common.layer == "REBAR")
            .filter(|e| matches!(e.specific, dxf::entities::EntityType::Line(_)))
            .count();
        assert_eq!(rebar_lines, 1);

        std::fs::remove_file(&file_path).ok();
    }

    #[test]
    fn test_circle_becomes_bulge_boundary() {
        let file_path = std::env::temp_dir().join("zrebar_test_circle.dxf");

        let mut drawing = dxf::Drawing::new();
        drawing.header.version = dxf::enums::AcadVersion::R2000;
        let mut circle = dxf::entities::Circle::default();
        circle.center = dxf::Point::new(500.0, 500.0, 0.0);
        circle.radius = 500.0;
        drawing.add_entity(dxf::entities::Entity::new(
            dxf::entities::EntityType::Circle(circle),
        ));
        drawing.save_file(&file_path).expect("Failed to save");

        let imported = import_boundary(&file_path).expect("Failed to import");
        assert!(imported.polyline.closed);
        let circumference = std::f64::consts::PI * 1000.0;
        assert!((imported.polyline.length() - circumference).abs() < 1e-6);

        std::fs::remove_file(&file_path).ok();
    }

    #[test]
    fn test_prefers_closed_boundary() {
        let file_path = std::env::temp_dir().join("zrebar_test_prefers_closed.dxf");

        let open = Geometry::Polyline(Polyline::from_points(
            [Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(10.0, 10.0)],
            false,
        ));
        let closed = Geometry::Polyline(square());
        export_entities(&file_path, [(&open, "0"), (&closed, "SLAB")]).expect("Failed to export");

        assert_eq!(import_boundaries(&file_path).expect("Failed to import").len(), 2);
        let imported = import_boundary(&file_path).expect("Failed to import");
        assert_eq!(imported.layer, "SLAB");

        std::fs::remove_file(&file_path).ok();
    }

    #[test]
    fn test_no_boundary() {
        let file_path = std::env::temp_dir().join("zrebar_test_no_boundary.dxf");

        let line = Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)));
        export_entities(&file_path, [(&line, "0")]).expect("Failed to export");

        assert!(matches!(import_boundary(&file_path), Err(FileError::NoBoundary(_))));

        std::fs::remove_file(&file_path).ok();
    }
}
