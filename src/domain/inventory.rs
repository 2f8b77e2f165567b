// ==========================================
// 门店库存调拨系统 - 库存领域模型
// ==========================================
// 红线: 库存快照在计划开始时读取一次，引擎绝不直接改写库存源数据
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryRecord - 库存记录
// ==========================================
/// (商品, 门店) 维度的在库数量快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_id: String,   // 商品编号
    pub outlet_id: String,    // 门店编号
    pub on_hand_qty: i64,     // 在库数量
    pub reorder_point: i64,   // 再订货点（门店自留底线）
    pub deleted_flag: bool,   // 软删除标志
}

impl InventoryRecord {
    /// 计算可转出余量
    ///
    /// # 参数
    /// - min_source_stock: 配置的货源门店最低保留库存
    ///
    /// # 返回
    /// 在库数量减去保留底线（取 min_source_stock 与再订货点中更严格者），
    /// 不足时为 0
    pub fn transferable_surplus(&self, min_source_stock: i64) -> i64 {
        let retained = min_source_stock.max(self.reorder_point);
        (self.on_hand_qty - retained).max(0)
    }
}

// ==========================================
// MovementRecord - 销量历史记录
// ==========================================
/// (商品, 门店, 日期) 维度的销量记录，用于流速推算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub product_id: String,
    pub outlet_id: String,
    pub movement_date: NaiveDate,
    pub qty_sold: i64,
}
