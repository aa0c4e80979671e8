//! 几何流水线与原子写入
//!
//! 在宿主空闲后运行：读取边界 → 扫描生成钢筋 → 在一个事务内全部写入 → 汇总。
//! 写入阶段任何失败都会回滚整个事务，文档保持不变。

use crate::config::SessionConfig;
use crate::error::FailureReason;
use crate::host::Host;
use zrebar_core::aggregate::BarAggregator;
use zrebar_core::bar::{Bar, BarSet};
use zrebar_core::boundary::BoundaryCurve;
use zrebar_core::config::FillConfig;
use zrebar_core::entity::EntityId;
use zrebar_core::fill::plan_bars;
use zrebar_core::geometry::Geometry;
use zrebar_core::result::RunResult;

/// 运行完整流水线
pub fn run<H: Host + ?Sized>(
    host: &mut H,
    candidate: Option<EntityId>,
    fill: &FillConfig,
    config: &SessionConfig,
) -> Result<RunResult, FailureReason> {
    let id = candidate.ok_or(FailureReason::MissingBoundary { candidate: None })?;
    let polyline = host.polyline(id).map_err(|err| {
        tracing::warn!("Boundary {} unavailable: {}", id, err);
        FailureReason::MissingBoundary {
            candidate: Some(id),
        }
    })?;

    let boundary = BoundaryCurve::new(id, polyline, config.closing_tolerance)?;
    let bars = plan_bars(&boundary, fill);

    let handles = write_bars(host, &boundary, &bars, &config.bar_layer)?;

    let mut aggregator = BarAggregator::new();
    for (bar, &handle) in bars.bars.iter().zip(&handles) {
        tracing::info!(
            "Bar #{} [{}] {} L={:.2} ({:.2}, {:.2}) -> ({:.2}, {:.2})",
            bar.index + 1,
            handle,
            bar.axis,
            bar.length,
            bar.start.x,
            bar.start.y,
            bar.end.x,
            bar.end.y
        );
        aggregator.add(bar, handle);
    }

    let result = RunResult::new(id, fill, aggregator);
    for line in result.summary_lines() {
        tracing::info!("{}", line);
    }
    Ok(result)
}

/// 在单个事务内写入全部钢筋，返回与钢筋一一对应的句柄
fn write_bars<H: Host + ?Sized>(
    host: &mut H,
    boundary: &BoundaryCurve,
    bars: &BarSet,
    layer: &str,
) -> Result<Vec<EntityId>, FailureReason> {
    host.begin_transaction().map_err(FailureReason::Write)?;

    match append_all(host, boundary, &bars.bars, layer) {
        Ok(handles) => match host.commit_transaction() {
            Ok(()) => Ok(handles),
            Err(err) => {
                host.abort_transaction();
                Err(FailureReason::Write(err))
            }
        },
        Err(reason) => {
            tracing::warn!("Aborting bar write: {}", reason);
            host.abort_transaction();
            Err(reason)
        }
    }
}

fn append_all<H: Host + ?Sized>(
    host: &mut H,
    boundary: &BoundaryCurve,
    bars: &[Bar],
    layer: &str,
) -> Result<Vec<EntityId>, FailureReason> {
    if boundary.was_auto_closed() {
        host.close_polyline(boundary.id())
            .map_err(FailureReason::Write)?;
    }

    let mut handles = Vec::with_capacity(bars.len());
    for bar in bars {
        if !bar.is_valid() {
            return Err(FailureReason::InvalidBar { index: bar.index });
        }
        let handle = host
            .append_entity(Geometry::Line(bar.as_line()), layer)
            .map_err(FailureReason::Write)?;
        handles.push(handle);
    }
    Ok(handles)
}
