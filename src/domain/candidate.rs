// ==========================================
// 门店库存调拨系统 - 调拨候选
// ==========================================
// 说明: (商品, 货源门店) 候选对，每次计划运行重新推导，不落库
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// TransferCandidate - 调拨候选
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCandidate {
    pub product_id: String,       // 商品编号
    pub source_outlet_id: String, // 货源门店编号
    pub surplus_qty: i64,         // 可转出余量（在库 - 保留底线）
}
