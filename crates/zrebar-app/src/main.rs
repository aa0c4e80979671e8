//! ZRebar 命令行程序
//!
//! 用内存文档扮演宿主：读入边界，模拟一次多段线绘制，
//! 让捕获会话完成钢筋生成，再导出结果。
//!
//! ```text
//! zrebar <boundary.dxf|boundary.json> [--config config.json] [--out report.{json,zrb,txt}] [--dxf bars.dxf]
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use zrebar_core::config::FillConfig;
use zrebar_core::geometry::{Geometry, Polyline};
use zrebar_core::result::RunResult;
use zrebar_session::{
    CaptureSession, DocumentId, HostEvent, MemoryHost, SessionConfig, SessionOutcome,
    SessionRegistry,
};

/// 配置文件内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    fill: FillConfig,
    session: SessionConfig,
}

/// 命令行参数
#[derive(Parser, Debug, PartialEq)]
#[command(name = "zrebar")]
#[command(about = "Fill a closed boundary with a regular rebar grid", version)]
struct Args {
    /// 边界文件（.dxf 或 .json）
    boundary: PathBuf,
    /// 配置文件（JSON，含 fill 与 session 两节）
    #[arg(long)]
    config: Option<PathBuf>,
    /// 报告输出（.json / .zrb / .txt）
    #[arg(long)]
    out: Option<PathBuf>,
    /// 钢筋与边界的 DXF 输出
    #[arg(long)]
    dxf: Option<PathBuf>,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

fn load_boundary(path: &Path) -> Result<Polyline> {
    match extension(path).as_str() {
        "dxf" => {
            let imported = zrebar_file::import_boundary(path)?;
            info!("Using boundary on layer {}", imported.layer);
            Ok(imported.polyline)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read boundary {}", path.display()))?;
            Ok(serde_json::from_str(&text)?)
        }
        other => bail!("Unsupported boundary format: .{}", other),
    }
}

/// 在内存文档上完成一次捕获会话
fn run_capture(host: &mut MemoryHost, boundary: Polyline, config: &AppConfig) -> Result<RunResult> {
    let outcome: Rc<RefCell<Option<SessionOutcome>>> = Rc::default();
    let sink = outcome.clone();

    let mut session = CaptureSession::start(
        host,
        SessionRegistry::global(),
        config.fill,
        config.session.clone(),
        move |result| {
            sink.borrow_mut().replace(result);
        },
    )?;

    // 宿主的事件顺序：实体追加 → 命令结束 → 空闲
    let appended = host.draw(Geometry::Polyline(boundary));
    session.handle_event(host, appended);
    session.handle_event(
        host,
        HostEvent::CommandEnded {
            command: format!("_{}", config.session.command),
        },
    );
    session.handle_event(host, HostEvent::Idle);

    let outcome = outcome.borrow_mut().take();
    match outcome {
        Some(SessionOutcome::Completed(result)) => Ok(result),
        Some(SessionOutcome::Cancelled) => bail!("Session cancelled"),
        Some(SessionOutcome::Failed(reason)) => bail!("Session failed: {}", reason),
        None => {
            session.abort(host);
            bail!("Session did not finish")
        }
    }
}

fn export(host: &MemoryHost, result: &RunResult, args: &Args) -> Result<()> {
    if let Some(path) = &args.out {
        match extension(path).as_str() {
            "json" => zrebar_file::save_json(result, path)?,
            "zrb" => zrebar_file::save_binary(result, path)?,
            "txt" => zrebar_file::write_text_report(result, path)?,
            other => bail!("Unsupported report format: .{}", other),
        }
    }

    if let Some(path) = &args.dxf {
        zrebar_file::export_entities(
            path,
            host.entities().map(|e| (&e.geometry, e.layer.as_str())),
        )?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(Level::INFO).finish(),
    )?;

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let boundary = load_boundary(&args.boundary)?;

    info!("Starting ZRebar on {}", args.boundary.display());

    let mut host = MemoryHost::new(DocumentId(1));
    let result = run_capture(&mut host, boundary, &config)?;
    export(&host, &result, &args)?;

    for line in result.summary_lines() {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zrebar_core::config::AxisMode;
    use zrebar_core::math::Point2;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("zrebar").chain(list.iter().copied()))
    }

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
    fn test_parse_args() {
        let parsed = args(&["slab.dxf", "--out", "r.zrb", "--dxf", "bars.dxf"]).unwrap();
        assert_eq!(parsed.boundary, PathBuf::from("slab.dxf"));
        assert_eq!(parsed.out, Some(PathBuf::from("r.zrb")));
        assert_eq!(parsed.dxf, Some(PathBuf::from("bars.dxf")));
        assert_eq!(parsed.config, None);

        assert!(args(&[]).is_err());
        assert!(args(&["a.dxf", "b.dxf"]).is_err());
        assert!(args(&["a.dxf", "--out"]).is_err());
        assert!(args(&["a.dxf", "--verbose"]).is_err());
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: AppConfig =
            serde_json::from_str(r#"{"fill": {"axis_mode": "Both", "spacing_vertical": 150.0}}"#)
                .unwrap();
        assert_eq!(config.fill.axis_mode, AxisMode::Both);
        assert_eq!(config.fill.spacing_horizontal, 200.0);
        assert_eq!(config.fill.spacing_vertical, 150.0);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_run_capture_on_square() {
        let mut host = MemoryHost::new(DocumentId(1001));
        let config = AppConfig {
            fill: FillConfig::new(AxisMode::Horizontal, 100.0, 0.0),
            ..AppConfig::default()
        };

        let result = run_capture(&mut host, square(), &config).unwrap();
        assert_eq!(result.total_bars, 11);
        assert_eq!(host.entities_on_layer("REBAR").count(), 11);
    }

    #[test]
    fn test_run_capture_reports_failure() {
        let mut host = MemoryHost::new(DocumentId(1002));
        let open = Polyline::from_points([Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)], false);

        let err = run_capture(&mut host, open, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Session failed"));
        assert_eq!(host.entities_on_layer("REBAR").count(), 0);
    }
}
