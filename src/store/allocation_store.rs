// ==========================================
// 门店库存调拨系统 - 存储协作方接口
// ==========================================
// 职责: 引擎在候选筛选/预测/落库阶段的全部存储访问走此接口
// 红线: 所有方法均视为可失败、可重试的外部调用
// ==========================================

use crate::domain::inventory::InventoryRecord;
use crate::domain::outlet::Outlet;
use crate::domain::plan::TransferPlan;
use crate::domain::product::Product;
use crate::repository::error::RepositoryResult;
use crate::repository::{
    InventoryRepository, OutletRepository, PlanRepository, ProductRepository,
};
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// AllocationStore Trait
// ==========================================
// 用途: 调拨引擎所需的存储读写接口
// 实现者: SqliteAllocationStore（委托各仓储）、测试中的 Mock
#[async_trait]
pub trait AllocationStore: Send + Sync {
    // ===== 读操作 =====

    /// 查询所有营业中、未删除的门店
    async fn fetch_active_outlets(&self) -> RepositoryResult<Vec<Outlet>>;

    /// 查询全部商品
    async fn fetch_products(&self) -> RepositoryResult<Vec<Product>>;

    /// 读取指定门店集合的库存快照
    ///
    /// # 参数
    /// - outlet_ids: 门店编号列表
    async fn fetch_inventory_snapshot(
        &self,
        outlet_ids: &[String],
    ) -> RepositoryResult<Vec<InventoryRecord>>;

    /// 推算单店日均流速
    ///
    /// # 返回
    /// - Some(f64): 窗口内有销量记录
    /// - None: 无销量记录（新开门店的常见情况）
    async fn fetch_outlet_velocity(
        &self,
        product_id: &str,
        outlet_id: &str,
        window_days: i64,
    ) -> RepositoryResult<Option<f64>>;

    /// 推算全网日均流速（单店无历史时的回退值）
    async fn fetch_network_velocity(
        &self,
        product_id: &str,
        window_days: i64,
    ) -> RepositoryResult<Option<f64>>;

    // ===== 写操作 =====

    /// 落库一份已通过校验的正式方案
    ///
    /// # 红线
    /// - 模拟运行绝不调用此方法
    async fn persist_plan(&self, plan: &TransferPlan) -> RepositoryResult<()>;
}

// ==========================================
// SqliteAllocationStore - SQLite 适配器
// ==========================================
/// SQLite 存储适配器
///
/// 各仓储共享同一连接，保证同一次计划运行读到一致的快照
pub struct SqliteAllocationStore {
    outlet_repo: OutletRepository,
    product_repo: ProductRepository,
    inventory_repo: InventoryRepository,
    plan_repo: PlanRepository,
}

impl SqliteAllocationStore {
    /// 创建新的 SqliteAllocationStore 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            outlet_repo: OutletRepository::from_connection(conn.clone()),
            product_repo: ProductRepository::from_connection(conn.clone()),
            inventory_repo: InventoryRepository::from_connection(conn.clone()),
            plan_repo: PlanRepository::from_connection(conn),
        }
    }
}

#[async_trait]
impl AllocationStore for SqliteAllocationStore {
    async fn fetch_active_outlets(&self) -> RepositoryResult<Vec<Outlet>> {
        self.outlet_repo.fetch_active_outlets()
    }

    async fn fetch_products(&self) -> RepositoryResult<Vec<Product>> {
        self.product_repo.fetch_all_products()
    }

    async fn fetch_inventory_snapshot(
        &self,
        outlet_ids: &[String],
    ) -> RepositoryResult<Vec<InventoryRecord>> {
        self.inventory_repo.fetch_snapshot(outlet_ids)
    }

    async fn fetch_outlet_velocity(
        &self,
        product_id: &str,
        outlet_id: &str,
        window_days: i64,
    ) -> RepositoryResult<Option<f64>> {
        self.inventory_repo
            .fetch_outlet_velocity(product_id, outlet_id, window_days)
    }

    async fn fetch_network_velocity(
        &self,
        product_id: &str,
        window_days: i64,
    ) -> RepositoryResult<Option<f64>> {
        self.inventory_repo
            .fetch_network_velocity(product_id, window_days)
    }

    async fn persist_plan(&self, plan: &TransferPlan) -> RepositoryResult<()> {
        self.plan_repo.insert_plan(plan)
    }
}
