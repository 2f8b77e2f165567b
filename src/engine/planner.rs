// ==========================================
// 门店库存调拨系统 - 分派规划引擎
// ==========================================
// 红线: 单行数量不得超过货源门店可用余量
// 红线: 单店单品累计调出不得超过贡献上限
// ==========================================
// 职责: 按排序消费候选，产出调拨明细行
// 输入: 排序后候选列表 + 单品目标 + 商品档案
// 输出: AllocationLine 列表 + 跳过原因列表 + 剩余目标
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::candidate::TransferCandidate;
use crate::domain::plan::AllocationLine;
use crate::domain::product::Product;
use crate::engine::rounding::RoundingPolicy;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

/// 品类均衡：单一品类允许的货源门店数上限
pub const CATEGORY_SOURCE_CAP: usize = 1;

// ==========================================
// AllocationPlanner - 分派规划引擎
// ==========================================
pub struct AllocationPlanner {
    rounding: RoundingPolicy,
    respect_pack_outers: bool,
    max_contribution_per_store: i64,
    balance_categories: bool,
}

/// 单次规划结果
#[derive(Debug, Clone)]
pub struct PlanningOutcome {
    pub lines: Vec<AllocationLine>,
    pub skipped_candidates: Vec<(TransferCandidate, String)>,
    /// 规划结束时每个商品的剩余目标（>0 表示部分满足）
    pub remaining_targets: HashMap<String, i64>,
}

impl AllocationPlanner {
    /// 从运行配置构造规划器
    pub fn from_config(config: &AllocationConfig) -> Self {
        Self {
            rounding: RoundingPolicy::new(config.rounding_mode, config.default_floor_qty),
            respect_pack_outers: config.respect_pack_outers,
            max_contribution_per_store: config.max_contribution_per_store.max(1),
            balance_categories: config.balance_categories,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行分派循环
    ///
    /// 规则：
    /// 1) 候选按给定顺序消费；全部目标满足后提前终止
    /// 2) proposed = min(候选余量, 剩余目标, 单店单品贡献余额)
    /// 3) proposed 经取整策略换算；取整结果若超出余量/贡献余额，
    ///    向下收敛到约束内最大的整箱倍数
    /// 4) 品类均衡开启时，单一品类的货源门店数不超过上限；
    ///    被跳过的候选本轮不再重试
    /// 5) 结果为 0 的候选被放弃（跳过原因必须输出）
    ///
    /// 确定性：相同快照 + 相同配置 => 逐行一致的输出
    ///
    /// # 参数
    /// - destination_outlet_id: 目的门店
    /// - targets: 单品目标数量
    /// - candidates: 排序后的候选列表
    /// - products: 商品档案（按 product_id 索引）
    ///
    /// # 返回
    /// 规划结果（明细行 + 跳过列表 + 剩余目标）
    #[instrument(skip(self, targets, candidates, products), fields(
        destination = %destination_outlet_id,
        targets_count = targets.len(),
        candidates_count = candidates.len()
    ))]
    pub fn assign(
        &self,
        destination_outlet_id: &str,
        targets: &HashMap<String, i64>,
        candidates: &[TransferCandidate],
        products: &HashMap<String, Product>,
    ) -> PlanningOutcome {
        let mut lines = Vec::new();
        let mut skipped_candidates = Vec::new();

        let mut remaining: HashMap<String, i64> = targets
            .iter()
            .map(|(k, v)| (k.clone(), (*v).max(0)))
            .collect();

        // 单店单品贡献余额，首次触达时初始化为上限
        let mut cap_remaining: HashMap<(String, String), i64> = HashMap::new();

        // 品类 -> 已供货门店集合（仅品类均衡开启时维护）
        let mut category_sources: HashMap<String, HashSet<String>> = HashMap::new();

        for candidate in candidates {
            // 全部目标满足即终止，后续候选无需再看
            if remaining.values().all(|qty| *qty <= 0) {
                break;
            }

            let product = match products.get(&candidate.product_id) {
                Some(p) => p,
                None => {
                    skipped_candidates.push((
                        candidate.clone(),
                        "UNKNOWN_PRODUCT: 候选商品不在商品档案中".to_string(),
                    ));
                    continue;
                }
            };

            let remaining_target = remaining.get(&candidate.product_id).copied().unwrap_or(0);
            if remaining_target <= 0 {
                skipped_candidates.push((
                    candidate.clone(),
                    format!("TARGET_MET: product={} 目标已满足", candidate.product_id),
                ));
                continue;
            }

            // 品类均衡门控
            if self.balance_categories {
                let sources = category_sources
                    .entry(product.category.clone())
                    .or_default();
                if !sources.contains(&candidate.source_outlet_id)
                    && sources.len() >= CATEGORY_SOURCE_CAP
                {
                    skipped_candidates.push((
                        candidate.clone(),
                        format!(
                            "CATEGORY_SOURCE_CAP: category={} 货源门店数已达上限 {}",
                            product.category, CATEGORY_SOURCE_CAP
                        ),
                    ));
                    continue;
                }
            }

            let cap_key = (
                candidate.source_outlet_id.clone(),
                candidate.product_id.clone(),
            );
            let cap_left = cap_remaining
                .entry(cap_key.clone())
                .or_insert(self.max_contribution_per_store);
            if *cap_left <= 0 {
                skipped_candidates.push((
                    candidate.clone(),
                    format!(
                        "CONTRIBUTION_CAP_EXHAUSTED: source={} product={} 贡献上限已用尽",
                        candidate.source_outlet_id, candidate.product_id
                    ),
                ));
                continue;
            }

            let pack = product.effective_pack_size(self.respect_pack_outers);
            let hard_limit = candidate.surplus_qty.min(*cap_left);
            let proposed = hard_limit.min(remaining_target);

            let mut qty = self.rounding.round(proposed as f64, pack);
            if qty > hard_limit {
                // 取整越过余量/贡献余额时，收敛到约束内最大整箱倍数
                qty = RoundingPolicy::floor_to_pack(hard_limit, pack);
            }

            if qty <= 0 {
                skipped_candidates.push((
                    candidate.clone(),
                    format!(
                        "ROUNDED_TO_ZERO: proposed={} pack={} 取整后为 0",
                        proposed, pack
                    ),
                ));
                continue;
            }

            lines.push(AllocationLine {
                product_id: candidate.product_id.clone(),
                source_outlet_id: candidate.source_outlet_id.clone(),
                destination_outlet_id: destination_outlet_id.to_string(),
                quantity: qty,
            });

            *cap_left -= qty;
            if let Some(target) = remaining.get_mut(&candidate.product_id) {
                // 整箱取整可能略超目标，剩余目标收敛到 0
                *target = (*target - qty).max(0);
            }

            if self.balance_categories {
                category_sources
                    .entry(product.category.clone())
                    .or_default()
                    .insert(candidate.source_outlet_id.clone());
            }
        }

        PlanningOutcome {
            lines,
            skipped_candidates,
            remaining_targets: remaining,
        }
    }
}
