// ==========================================
// 门店库存调拨系统 - 候选筛选引擎
// ==========================================
// 职责: 扫描货源门店库存，过滤并排序可调拨的 (商品, 货源门店) 候选对
// 红线: 目的门店绝不作为货源
// 说明: candidate_limit 是成本保护而非正确性要求，截断可能漏掉
//       可调拨库存，属于刻意的规模取舍
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::candidate::TransferCandidate;
use crate::domain::inventory::InventoryRecord;
use crate::domain::outlet::Outlet;
use crate::domain::product::Product;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

// ==========================================
// CandidateSelector - 候选筛选引擎
// ==========================================
pub struct CandidateSelector {
    // 无状态引擎，不需要注入依赖
}

impl CandidateSelector {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 筛选并排序调拨候选
    ///
    /// 规则：
    /// 1) 货源门店必须营业中、未删除、且不是目的门店
    /// 2) 商品不在排除品类/品牌列表中
    /// 3) 在库超过保留底线（min_source_stock 与再订货点取严）才有余量
    /// 4) 按余量降序排序；余量相同时按货源门店编号升序（保证确定性），
    ///    再按商品编号升序兜底
    /// 5) 截断到 candidate_limit
    ///
    /// # 参数
    /// - destination_outlet_id: 目的门店编号
    /// - outlets: 全部营业中门店
    /// - products: 全部商品
    /// - inventory: 库存快照
    /// - config: 运行配置
    ///
    /// # 返回
    /// 排序后的候选列表（规划器按序消费，目标满足后可提前终止）
    pub fn select(
        &self,
        destination_outlet_id: &str,
        outlets: &[Outlet],
        products: &[Product],
        inventory: &[InventoryRecord],
        config: &AllocationConfig,
    ) -> Vec<TransferCandidate> {
        let eligible_sources: HashSet<&str> = outlets
            .iter()
            .filter(|o| o.is_eligible_source(destination_outlet_id))
            .map(|o| o.outlet_id.as_str())
            .collect();

        let excluded_categories: HashSet<&str> =
            config.excluded_categories.iter().map(String::as_str).collect();
        let excluded_brands: HashSet<&str> =
            config.excluded_brands.iter().map(String::as_str).collect();

        let eligible_products: HashMap<&str, &Product> = products
            .iter()
            .filter(|p| {
                !excluded_categories.contains(p.category.as_str())
                    && !excluded_brands.contains(p.brand.as_str())
            })
            .map(|p| (p.product_id.as_str(), p))
            .collect();

        let mut candidates: Vec<TransferCandidate> = inventory
            .iter()
            .filter(|record| !record.deleted_flag)
            .filter(|record| eligible_sources.contains(record.outlet_id.as_str()))
            .filter(|record| eligible_products.contains_key(record.product_id.as_str()))
            .filter_map(|record| {
                let surplus = record.transferable_surplus(config.min_source_stock);
                if surplus > 0 {
                    Some(TransferCandidate {
                        product_id: record.product_id.clone(),
                        source_outlet_id: record.outlet_id.clone(),
                        surplus_qty: surplus,
                    })
                } else {
                    None
                }
            })
            .collect();

        // 余量降序，平局按货源门店编号升序，再按商品编号升序
        candidates.sort_by(|a, b| {
            b.surplus_qty
                .cmp(&a.surplus_qty)
                .then_with(|| a.source_outlet_id.cmp(&b.source_outlet_id))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });

        if candidates.len() > config.candidate_limit {
            info!(
                total = candidates.len(),
                candidate_limit = config.candidate_limit,
                "候选数超过上限，按排序截断"
            );
            candidates.truncate(config.candidate_limit);
        }

        debug!(
            destination = destination_outlet_id,
            candidates_count = candidates.len(),
            "候选筛选完成"
        );

        candidates
    }
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn outlet(id: &str, active: bool, deleted: bool) -> Outlet {
        Outlet {
            outlet_id: id.to_string(),
            outlet_name: format!("门店{}", id),
            active_flag: active,
            deleted_flag: deleted,
        }
    }

    fn product(id: &str, category: &str, brand: &str) -> Product {
        Product {
            product_id: id.to_string(),
            product_name: format!("商品{}", id),
            category: category.to_string(),
            brand: brand.to_string(),
            pack_outer_size: 6,
        }
    }

    fn stock(product_id: &str, outlet_id: &str, on_hand: i64) -> InventoryRecord {
        InventoryRecord {
            product_id: product_id.to_string(),
            outlet_id: outlet_id.to_string(),
            on_hand_qty: on_hand,
            reorder_point: 0,
            deleted_flag: false,
        }
    }

    fn base_config() -> AllocationConfig {
        AllocationConfig {
            min_source_stock: 5,
            candidate_limit: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_surplus_computation_and_ranking() {
        let selector = CandidateSelector::new();
        let outlets = vec![outlet("S001", true, false), outlet("S002", true, false)];
        let products = vec![product("P001", "饮料", "品牌A")];
        let inventory = vec![stock("P001", "S001", 40), stock("P001", "S002", 25)];

        let candidates =
            selector.select("D001", &outlets, &products, &inventory, &base_config());

        assert_eq!(candidates.len(), 2);
        // 40-5=35 排在 25-5=20 之前
        assert_eq!(candidates[0].source_outlet_id, "S001");
        assert_eq!(candidates[0].surplus_qty, 35);
        assert_eq!(candidates[1].surplus_qty, 20);
    }

    #[test]
    fn test_tie_broken_by_source_outlet_id() {
        let selector = CandidateSelector::new();
        let outlets = vec![outlet("S002", true, false), outlet("S001", true, false)];
        let products = vec![product("P001", "饮料", "品牌A")];
        let inventory = vec![stock("P001", "S002", 30), stock("P001", "S001", 30)];

        let candidates =
            selector.select("D001", &outlets, &products, &inventory, &base_config());

        assert_eq!(candidates[0].source_outlet_id, "S001");
        assert_eq!(candidates[1].source_outlet_id, "S002");
    }

    #[test]
    fn test_destination_excluded_as_source() {
        let selector = CandidateSelector::new();
        let outlets = vec![outlet("D001", true, false), outlet("S001", true, false)];
        let products = vec![product("P001", "饮料", "品牌A")];
        let inventory = vec![stock("P001", "D001", 100), stock("P001", "S001", 40)];

        let candidates =
            selector.select("D001", &outlets, &products, &inventory, &base_config());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source_outlet_id, "S001");
    }

    #[test]
    fn test_inactive_and_deleted_outlets_excluded() {
        let selector = CandidateSelector::new();
        let outlets = vec![
            outlet("S001", false, false),
            outlet("S002", true, true),
            outlet("S003", true, false),
        ];
        let products = vec![product("P001", "饮料", "品牌A")];
        let inventory = vec![
            stock("P001", "S001", 40),
            stock("P001", "S002", 40),
            stock("P001", "S003", 40),
        ];

        let candidates =
            selector.select("D001", &outlets, &products, &inventory, &base_config());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source_outlet_id, "S003");
    }

    #[test]
    fn test_stock_at_or_below_min_source_stock_excluded() {
        let selector = CandidateSelector::new();
        let outlets = vec![outlet("S001", true, false), outlet("S002", true, false)];
        let products = vec![product("P001", "饮料", "品牌A")];
        // 在库 5 = 保留底线 5 => 余量 0，不产生候选
        let inventory = vec![stock("P001", "S001", 5), stock("P001", "S002", 6)];

        let candidates =
            selector.select("D001", &outlets, &products, &inventory, &base_config());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source_outlet_id, "S002");
        assert_eq!(candidates[0].surplus_qty, 1);
    }

    #[test]
    fn test_reorder_point_raises_retained_floor() {
        let selector = CandidateSelector::new();
        let outlets = vec![outlet("S001", true, false)];
        let products = vec![product("P001", "饮料", "品牌A")];
        let mut record = stock("P001", "S001", 40);
        record.reorder_point = 20;
        let inventory = vec![record];

        let candidates =
            selector.select("D001", &outlets, &products, &inventory, &base_config());

        assert_eq!(candidates[0].surplus_qty, 20);
    }

    #[test]
    fn test_category_and_brand_exclusion() {
        let selector = CandidateSelector::new();
        let outlets = vec![outlet("S001", true, false)];
        let products = vec![
            product("P001", "烟草", "品牌A"),
            product("P002", "饮料", "禁售品牌"),
            product("P003", "饮料", "品牌A"),
        ];
        let inventory = vec![
            stock("P001", "S001", 40),
            stock("P002", "S001", 40),
            stock("P003", "S001", 40),
        ];
        let config = AllocationConfig {
            excluded_categories: vec!["烟草".to_string()],
            excluded_brands: vec!["禁售品牌".to_string()],
            ..base_config()
        };

        let candidates = selector.select("D001", &outlets, &products, &inventory, &config);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].product_id, "P003");
    }

    #[test]
    fn test_candidate_limit_truncates() {
        let selector = CandidateSelector::new();
        let outlets = vec![outlet("S001", true, false)];
        let products: Vec<Product> = (0..10)
            .map(|i| product(&format!("P{:03}", i), "饮料", "品牌A"))
            .collect();
        let inventory: Vec<InventoryRecord> = (0..10)
            .map(|i| stock(&format!("P{:03}", i), "S001", 100 - i))
            .collect();
        let config = AllocationConfig {
            candidate_limit: 3,
            ..base_config()
        };

        let candidates = selector.select("D001", &outlets, &products, &inventory, &config);

        assert_eq!(candidates.len(), 3);
        // 截断保留余量最高的候选
        assert_eq!(candidates[0].product_id, "P000");
    }

    #[test]
    fn test_soft_deleted_inventory_excluded() {
        let selector = CandidateSelector::new();
        let outlets = vec![outlet("S001", true, false)];
        let products = vec![product("P001", "饮料", "品牌A")];
        let mut record = stock("P001", "S001", 40);
        record.deleted_flag = true;
        let inventory = vec![record];

        let candidates =
            selector.select("D001", &outlets, &products, &inventory, &base_config());

        assert!(candidates.is_empty());
    }
}
