// ==========================================
// 门店库存调拨系统 - 建议服务接口
// ==========================================
// 职责: 定义推荐/洞察协作方 trait，实现依赖倒置
// 说明: Engine 层定义 trait，外部服务实现适配器
// 红线: 建议输出只附加在结果上供展示，绝不参与分派计算；
//       协作方缺席、缓慢或报错时引擎行为完全不变
// ==========================================

use crate::domain::plan::TransferPlan;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

// ==========================================
// PlanInsight - 方案建议
// ==========================================

/// 建议服务对完成方案的评注
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInsight {
    /// 建议评分（协作方自定义口径）
    pub score: Option<f64>,
    /// 评注文本
    pub notes: Vec<String>,
}

// ==========================================
// 建议服务 Trait
// ==========================================

/// 推荐/洞察协作方 Trait
///
/// Engine 层定义，外部服务实现
///
/// # 实现说明
/// - 返回 Ok(None) 表示无建议
/// - 返回 Err 由编排器记录日志后忽略，不影响方案
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// 为完成的方案生成建议评注
    async fn annotate(
        &self,
        plan: &TransferPlan,
    ) -> Result<Option<PlanInsight>, Box<dyn Error + Send + Sync>>;
}

/// 空实现：不产生任何建议
pub struct NoOpInsightProvider;

#[async_trait]
impl InsightProvider for NoOpInsightProvider {
    async fn annotate(
        &self,
        _plan: &TransferPlan,
    ) -> Result<Option<PlanInsight>, Box<dyn Error + Send + Sync>> {
        Ok(None)
    }
}
