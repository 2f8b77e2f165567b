// ==========================================
// 门店库存调拨系统 - 方案校验与装配引擎
// ==========================================
// 职责: 对分派结果复查全部不变量，计算汇总并装配最终方案
// 说明: 复查是针对规划器缺陷的防御；任何违反都是致命的内部
//       一致性失败，整个方案放弃产出，绝不返回半校验的方案
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::candidate::TransferCandidate;
use crate::domain::plan::{PlanTotals, TransferPlan, UnmetDemand};
use crate::domain::product::Product;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::planner::PlanningOutcome;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

// ==========================================
// PlanAssembler - 方案校验与装配引擎
// ==========================================
pub struct PlanAssembler {
    // 无状态引擎，不需要注入依赖
}

impl PlanAssembler {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 校验并装配调拨方案
    ///
    /// 复查的不变量：
    /// 1) 每行数量 > 0；启用整箱取整时必为外箱规格整数倍
    /// 2) 每行数量不超过该候选在计划开始时的可转出余量
    /// 3) 单店单品累计调出不超过贡献上限
    /// 4) 目的门店不出现在货源侧
    /// 5) 汇总值由明细行求和得出
    ///
    /// # 参数
    /// - destination_outlet_id: 目的门店
    /// - simulation: 模拟标记
    /// - outcome: 规划结果
    /// - targets: 规划时使用的单品目标
    /// - candidates: 规划时消费的候选（校验余量不变量用）
    /// - products: 商品档案
    /// - config: 运行配置
    ///
    /// # 返回
    /// - Ok(TransferPlan): 装配完成的不可变方案
    /// - Err(EngineError::ConsistencyViolation): 任一不变量被违反
    pub fn assemble(
        &self,
        destination_outlet_id: &str,
        simulation: bool,
        outcome: &PlanningOutcome,
        targets: &HashMap<String, i64>,
        candidates: &[TransferCandidate],
        products: &HashMap<String, Product>,
        config: &AllocationConfig,
    ) -> EngineResult<TransferPlan> {
        let surplus_by_pair: HashMap<(&str, &str), i64> = candidates
            .iter()
            .map(|c| {
                (
                    (c.product_id.as_str(), c.source_outlet_id.as_str()),
                    c.surplus_qty,
                )
            })
            .collect();

        let mut contribution: HashMap<(&str, &str), i64> = HashMap::new();

        for line in &outcome.lines {
            if line.quantity <= 0 {
                return Err(EngineError::ConsistencyViolation {
                    rule: "POSITIVE_QUANTITY".to_string(),
                    detail: format!(
                        "product={} source={} quantity={}",
                        line.product_id, line.source_outlet_id, line.quantity
                    ),
                });
            }

            if line.source_outlet_id == line.destination_outlet_id
                || line.source_outlet_id == destination_outlet_id
            {
                return Err(EngineError::ConsistencyViolation {
                    rule: "SELF_TRANSFER".to_string(),
                    detail: format!(
                        "product={} source={} destination={}",
                        line.product_id, line.source_outlet_id, line.destination_outlet_id
                    ),
                });
            }

            if line.destination_outlet_id != destination_outlet_id {
                return Err(EngineError::ConsistencyViolation {
                    rule: "DESTINATION_MISMATCH".to_string(),
                    detail: format!(
                        "product={} line_destination={} run_destination={}",
                        line.product_id, line.destination_outlet_id, destination_outlet_id
                    ),
                });
            }

            if config.respect_pack_outers {
                let pack = products
                    .get(&line.product_id)
                    .map(|p| p.effective_pack_size(true))
                    .unwrap_or(1);
                if line.quantity % pack != 0 {
                    return Err(EngineError::ConsistencyViolation {
                        rule: "PACK_MULTIPLE".to_string(),
                        detail: format!(
                            "product={} quantity={} pack_outer_size={}",
                            line.product_id, line.quantity, pack
                        ),
                    });
                }
            }

            let pair = (line.product_id.as_str(), line.source_outlet_id.as_str());
            let surplus = surplus_by_pair.get(&pair).copied().unwrap_or(0);
            let assigned = contribution.entry(pair).or_insert(0);
            *assigned += line.quantity;

            if *assigned > surplus {
                return Err(EngineError::ConsistencyViolation {
                    rule: "SURPLUS_EXCEEDED".to_string(),
                    detail: format!(
                        "product={} source={} assigned={} surplus={}",
                        line.product_id, line.source_outlet_id, assigned, surplus
                    ),
                });
            }

            if *assigned > config.max_contribution_per_store {
                return Err(EngineError::ConsistencyViolation {
                    rule: "CONTRIBUTION_CAP_EXCEEDED".to_string(),
                    detail: format!(
                        "product={} source={} assigned={} cap={}",
                        line.product_id,
                        line.source_outlet_id,
                        assigned,
                        config.max_contribution_per_store
                    ),
                });
            }
        }

        // 未满足需求报告：部分满足不是失败
        let mut assigned_by_product: HashMap<&str, i64> = HashMap::new();
        for line in &outcome.lines {
            *assigned_by_product
                .entry(line.product_id.as_str())
                .or_insert(0) += line.quantity;
        }

        let mut unmet: Vec<UnmetDemand> = targets
            .iter()
            .filter_map(|(product_id, target)| {
                let assigned = assigned_by_product
                    .get(product_id.as_str())
                    .copied()
                    .unwrap_or(0);
                let shortfall = target - assigned;
                if shortfall > 0 {
                    Some(UnmetDemand {
                        product_id: product_id.clone(),
                        target_qty: *target,
                        assigned_qty: assigned,
                        shortfall_qty: shortfall,
                    })
                } else {
                    None
                }
            })
            .collect();
        unmet.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        Ok(TransferPlan {
            plan_id: Uuid::new_v4().to_string(),
            destination_outlet_id: destination_outlet_id.to_string(),
            created_at: Utc::now(),
            simulation,
            totals: PlanTotals::from_lines(&outcome.lines),
            lines: outcome.lines.clone(),
            unmet,
        })
    }
}

impl Default for PlanAssembler {
    fn default() -> Self {
        Self::new()
    }
}
