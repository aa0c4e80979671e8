//! ZRebar 文件处理
//!
//! 支持：
//! - 运行结果的 JSON、`.zrb` 压缩二进制和纯文本报告
//! - `.dxf` 边界导入与钢筋导出

pub mod dxf_io;
pub mod error;
pub mod report;

pub use dxf_io::{export_entities, import_boundaries, import_boundary, ImportedBoundary};
pub use error::FileError;
pub use report::{format_report, load_binary, load_json, save_binary, save_json, write_text_report};
