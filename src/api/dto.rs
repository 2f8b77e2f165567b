// ==========================================
// 门店库存调拨系统 - API层数据传输对象
// ==========================================
// 职责: 调用契约的请求/响应结构
// 红线: 响应必须携带 success 标志与可读错误描述
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::plan::TransferPlan;
use crate::engine::insight::PlanInsight;
use crate::engine::orchestrator::AllocationRunResult;
use serde::{Deserialize, Serialize};

// ==========================================
// AllocationRequest - 调拨请求
// ==========================================

/// 一次调拨计划运行的请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllocationRequest {
    /// 目的门店编号
    pub destination_outlet_id: String,

    /// 模拟标记：true 时只计算不落库
    #[serde(default)]
    pub simulate: bool,

    /// 运行配置（缺省字段取默认值，未知键被拒绝）
    #[serde(default)]
    pub config: AllocationConfig,
}

// ==========================================
// AllocationResponse - 调拨响应
// ==========================================

/// 调拨计划运行的结构化结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResponse {
    /// 运行是否成功
    pub success: bool,

    /// 装配完成的方案（失败时为 None）
    pub plan: Option<TransferPlan>,

    /// 涉及商品数
    pub products_count: usize,

    /// 总调拨单位数
    pub total_quantity: i64,

    /// 涉及货源门店数
    pub source_stores: usize,

    /// 是否已落库（模拟运行恒为 false）
    pub committed: bool,

    /// 建议服务评注（可选）
    pub insight: Option<PlanInsight>,

    /// 可读错误描述（成功时为 None）
    pub error: Option<String>,

    /// 存储失败时的尝试次数
    pub attempts: Option<u32>,

    /// 运行诊断信息
    pub diagnostics: Vec<String>,
}

impl AllocationResponse {
    /// 由运行结果构造成功响应
    pub fn from_run_result(result: AllocationRunResult) -> Self {
        Self {
            success: true,
            products_count: result.plan.totals.products_count,
            total_quantity: result.plan.totals.total_quantity,
            source_stores: result.plan.totals.source_stores,
            committed: result.committed,
            insight: result.insight,
            error: None,
            attempts: None,
            diagnostics: result.diagnostics,
            plan: Some(result.plan),
        }
    }

    /// 构造失败响应
    pub fn failure(error: String, attempts: Option<u32>, diagnostics: Vec<String>) -> Self {
        Self {
            success: false,
            plan: None,
            products_count: 0,
            total_quantity: 0,
            source_stores: 0,
            committed: false,
            insight: None,
            error: Some(error),
            attempts,
            diagnostics,
        }
    }
}
