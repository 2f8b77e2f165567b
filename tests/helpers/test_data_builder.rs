// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate, Utc};
use store_allocation::domain::inventory::{InventoryRecord, MovementRecord};
use store_allocation::domain::outlet::Outlet;
use store_allocation::domain::product::Product;

// ==========================================
// Outlet 构建器
// ==========================================

pub struct OutletBuilder {
    outlet_id: String,
    outlet_name: Option<String>,
    active_flag: bool,
    deleted_flag: bool,
}

impl OutletBuilder {
    pub fn new(outlet_id: &str) -> Self {
        Self {
            outlet_id: outlet_id.to_string(),
            outlet_name: None,
            active_flag: true,
            deleted_flag: false,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.outlet_name = Some(name.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active_flag = false;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.deleted_flag = true;
        self
    }

    pub fn build(self) -> Outlet {
        Outlet {
            outlet_name: self
                .outlet_name
                .unwrap_or_else(|| format!("门店{}", self.outlet_id)),
            outlet_id: self.outlet_id,
            active_flag: self.active_flag,
            deleted_flag: self.deleted_flag,
        }
    }
}

// ==========================================
// Product 构建器
// ==========================================

pub struct ProductBuilder {
    product_id: String,
    product_name: Option<String>,
    category: String,
    brand: String,
    pack_outer_size: i64,
}

impl ProductBuilder {
    pub fn new(product_id: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            product_name: None,
            category: "饮料".to_string(),
            brand: "品牌A".to_string(),
            pack_outer_size: 1,
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn brand(mut self, brand: &str) -> Self {
        self.brand = brand.to_string();
        self
    }

    pub fn pack(mut self, pack_outer_size: i64) -> Self {
        self.pack_outer_size = pack_outer_size;
        self
    }

    pub fn build(self) -> Product {
        Product {
            product_name: self
                .product_name
                .unwrap_or_else(|| format!("商品{}", self.product_id)),
            product_id: self.product_id,
            category: self.category,
            brand: self.brand,
            pack_outer_size: self.pack_outer_size,
        }
    }
}

// ==========================================
// InventoryRecord 构建器
// ==========================================

pub struct InventoryBuilder {
    product_id: String,
    outlet_id: String,
    on_hand_qty: i64,
    reorder_point: i64,
    deleted_flag: bool,
}

impl InventoryBuilder {
    pub fn new(product_id: &str, outlet_id: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            outlet_id: outlet_id.to_string(),
            on_hand_qty: 0,
            reorder_point: 0,
            deleted_flag: false,
        }
    }

    pub fn on_hand(mut self, qty: i64) -> Self {
        self.on_hand_qty = qty;
        self
    }

    pub fn reorder_point(mut self, qty: i64) -> Self {
        self.reorder_point = qty;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.deleted_flag = true;
        self
    }

    pub fn build(self) -> InventoryRecord {
        InventoryRecord {
            product_id: self.product_id,
            outlet_id: self.outlet_id,
            on_hand_qty: self.on_hand_qty,
            reorder_point: self.reorder_point,
            deleted_flag: self.deleted_flag,
        }
    }
}

// ==========================================
// MovementRecord 构建辅助
// ==========================================

/// 生成最近 days 天、每天 qty_per_day 的销量历史
pub fn recent_movements(
    product_id: &str,
    outlet_id: &str,
    days: i64,
    qty_per_day: i64,
) -> Vec<MovementRecord> {
    let today = Utc::now().date_naive();
    (1..=days)
        .map(|offset| MovementRecord {
            product_id: product_id.to_string(),
            outlet_id: outlet_id.to_string(),
            movement_date: today - Duration::days(offset),
            qty_sold: qty_per_day,
        })
        .collect()
}

/// 指定日期的单条销量记录
pub fn movement_on(
    product_id: &str,
    outlet_id: &str,
    date: NaiveDate,
    qty_sold: i64,
) -> MovementRecord {
    MovementRecord {
        product_id: product_id.to_string(),
        outlet_id: outlet_id.to_string(),
        movement_date: date,
        qty_sold,
    }
}
