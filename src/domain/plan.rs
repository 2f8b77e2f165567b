// ==========================================
// 门店库存调拨系统 - 调拨方案领域模型
// ==========================================
// 红线: 方案装配完成后不可变，只能整体落库或丢弃
// 红线: 汇总值永远由明细行求和得出，不允许独立维护
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// AllocationLine - 调拨明细行
// ==========================================
/// 调拨方案的一行: 从货源门店向目的门店调拨某商品若干数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub product_id: String,            // 商品编号
    pub source_outlet_id: String,      // 货源门店
    pub destination_outlet_id: String, // 目的门店
    pub quantity: i64,                 // 调拨数量（启用整箱取整时必为外箱规格整数倍）
}

// ==========================================
// UnmetDemand - 未满足需求
// ==========================================
/// 目标未被完全满足的商品（报告项，不视为失败）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetDemand {
    pub product_id: String,
    pub target_qty: i64,    // 预测目标数量
    pub assigned_qty: i64,  // 实际分派数量
    pub shortfall_qty: i64, // 缺口 = target - assigned
}

// ==========================================
// PlanTotals - 方案汇总
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanTotals {
    pub products_count: usize, // 涉及商品数
    pub total_quantity: i64,   // 总调拨单位数
    pub source_stores: usize,  // 涉及货源门店数
}

impl PlanTotals {
    /// 由明细行求和计算汇总
    pub fn from_lines(lines: &[AllocationLine]) -> Self {
        let mut products: BTreeSet<&str> = BTreeSet::new();
        let mut sources: BTreeSet<&str> = BTreeSet::new();
        let mut total: i64 = 0;

        for line in lines {
            products.insert(line.product_id.as_str());
            sources.insert(line.source_outlet_id.as_str());
            total += line.quantity;
        }

        Self {
            products_count: products.len(),
            total_quantity: total,
            source_stores: sources.len(),
        }
    }
}

// ==========================================
// TransferPlan - 调拨方案
// ==========================================
/// 一次计划运行的产物（值对象）
///
/// 装配完成后不再修改；模拟运行打 simulation 标记且绝不落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPlan {
    pub plan_id: String,               // 方案ID (uuid)
    pub destination_outlet_id: String, // 目的门店
    pub created_at: DateTime<Utc>,     // 生成时间
    pub simulation: bool,              // 模拟标记
    pub lines: Vec<AllocationLine>,    // 明细行（有序）
    pub unmet: Vec<UnmetDemand>,       // 未满足需求报告
    pub totals: PlanTotals,            // 汇总（由 lines 求和）
}

impl TransferPlan {
    /// 方案中是否包含任何明细行
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
