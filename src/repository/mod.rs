// ==========================================
// 门店库存调拨系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 说明: 流速聚合（AVG/SUM）属于数据访问，业务含义由引擎层赋予
// ==========================================

pub mod error;
pub mod inventory_repo;
pub mod outlet_repo;
pub mod plan_repo;
pub mod product_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::InventoryRepository;
pub use outlet_repo::OutletRepository;
pub use plan_repo::PlanRepository;
pub use product_repo::ProductRepository;
