// ==========================================
// 门店库存调拨系统 - 调拨运行配置
// ==========================================
// 职责: 封闭的、可枚举的配置项集合
// 说明: deny_unknown_fields —— 未知配置键在反序列化阶段即被拒绝，
//       不允许静默忽略
// ==========================================

use crate::domain::types::RoundingMode;
use serde::{Deserialize, Serialize};

// ==========================================
// AllocationConfig - 调拨运行配置
// ==========================================

/// 单次调拨计划运行的配置包
///
/// 随请求传入，运行期间不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AllocationConfig {
    /// 预测覆盖天数（调拨应维持目的门店几天的销售）
    pub cover_days: i64,

    /// 安全余量百分比（叠加在原始预测需求之上）
    pub buffer_pct: f64,

    /// 默认起送量（低于该数量的调拨不值得执行）
    pub default_floor_qty: i64,

    /// 最多调拨商品数（0 = 不限制）
    pub max_products: usize,

    /// 整箱取整模式
    pub rounding_mode: RoundingMode,

    /// 货源门店最低保留库存（在库低于等于该值的门店不参与供货）
    pub min_source_stock: i64,

    /// 单店单品贡献上限（同一货源门店对同一商品的累计调出上限）
    pub max_contribution_per_store: i64,

    /// 候选对数量上限（成本/运行时长保护，必须为正）
    pub candidate_limit: usize,

    /// 是否启用整箱取整
    pub respect_pack_outers: bool,

    /// 是否启用品类均衡（限制单一品类的货源门店数）
    pub balance_categories: bool,

    /// 排除的品类列表
    pub excluded_categories: Vec<String>,

    /// 排除的品牌列表
    pub excluded_brands: Vec<String>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            cover_days: 14,
            buffer_pct: 10.0,
            default_floor_qty: 0,
            max_products: 0,
            rounding_mode: RoundingMode::Nearest,
            min_source_stock: 5,
            max_contribution_per_store: 200,
            candidate_limit: 500,
            respect_pack_outers: true,
            balance_categories: false,
            excluded_categories: Vec::new(),
            excluded_brands: Vec::new(),
        }
    }
}

impl AllocationConfig {
    /// 销量流速推算窗口（天）
    ///
    /// 取覆盖天数的两倍，让过旧的历史自然衰减出窗口
    pub fn velocity_window_days(&self) -> i64 {
        (self.cover_days * 2).max(1)
    }
}
