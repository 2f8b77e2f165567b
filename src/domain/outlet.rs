// ==========================================
// 门店库存调拨系统 - 门店领域模型
// ==========================================
// 说明: 门店为只读参考数据，由存储协作方维护
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Outlet - 门店
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    pub outlet_id: String,   // 门店编号
    pub outlet_name: String, // 门店名称
    pub active_flag: bool,   // 是否营业中
    pub deleted_flag: bool,  // 软删除标志
}

impl Outlet {
    /// 判断门店是否可参与调拨（营业中且未删除）
    pub fn is_operational(&self) -> bool {
        self.active_flag && !self.deleted_flag
    }

    /// 判断门店是否可作为货源（可参与调拨且不是目的门店）
    pub fn is_eligible_source(&self, destination_outlet_id: &str) -> bool {
        self.is_operational() && self.outlet_id != destination_outlet_id
    }
}
