// ==========================================
// 门店库存调拨系统 - 商品领域模型
// ==========================================
// 说明: 商品为只读参考数据，计划运行期间不可变
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,    // 商品编号
    pub product_name: String,  // 商品名称
    pub category: String,      // 品类
    pub brand: String,         // 品牌
    pub pack_outer_size: i64,  // 外箱规格（每箱可售单位数，>=1）
}

impl Product {
    /// 取有效外箱规格
    ///
    /// # 参数
    /// - respect_pack_outers: 是否启用整箱取整
    ///
    /// # 返回
    /// 启用时返回外箱规格（至少为 1），未启用时按 1 处理
    pub fn effective_pack_size(&self, respect_pack_outers: bool) -> i64 {
        if respect_pack_outers {
            self.pack_outer_size.max(1)
        } else {
            1
        }
    }
}
