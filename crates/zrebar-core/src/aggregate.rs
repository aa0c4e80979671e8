//! 钢筋汇总
//!
//! 按 (方向, 四舍五入到两位小数的长度) 分组统计重复根数。

use crate::bar::Bar;
use crate::entity::EntityId;
use crate::scanline::SweepAxis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 分组键：方向 + 以百分之一为单位的取整长度
///
/// 用整数保存取整后的长度，键比较是精确的。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub axis: SweepAxis,
    pub hundredths: i64,
}

impl GroupKey {
    /// 两位小数，远离零取整（`f64::round` 语义）
    pub fn new(axis: SweepAxis, length: f64) -> Self {
        Self {
            axis,
            hundredths: (length * 100.0).round() as i64,
        }
    }

    pub fn length(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }
}

/// 一个分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGroup {
    pub axis: SweepAxis,
    /// 取整后的长度
    pub length: f64,
    /// 重复根数
    pub repetition: usize,
    /// 组内钢筋的宿主句柄（按加入顺序）
    pub handles: Vec<EntityId>,
}

/// 钢筋汇总器
#[derive(Debug, Default)]
pub struct BarAggregator {
    groups: BTreeMap<GroupKey, BarGroup>,
    total_bars: usize,
    total_length: f64,
}

impl BarAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一根已写入宿主的钢筋
    pub fn add(&mut self, bar: &Bar, handle: EntityId) {
        let key = GroupKey::new(bar.axis, bar.length);
        let group = self.groups.entry(key).or_insert_with(|| BarGroup {
            axis: key.axis,
            length: key.length(),
            repetition: 0,
            handles: Vec::new(),
        });
        group.repetition += 1;
        group.handles.push(handle);

        self.total_bars += 1;
        self.total_length += bar.length;
    }

    pub fn total_bars(&self) -> usize {
        self.total_bars
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// 按方向、再按长度升序输出
    pub fn into_groups(self) -> Vec<BarGroup> {
        self.groups.into_values().collect()
    }
}
