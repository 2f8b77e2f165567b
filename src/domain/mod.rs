// ==========================================
// 门店库存调拨系统 - 领域层
// ==========================================
// 职责: 实体与类型定义，不含数据访问与业务编排
// 红线: 领域对象只是数据快照，引擎不得反向修改库存源数据
// ==========================================

pub mod candidate;
pub mod inventory;
pub mod outlet;
pub mod plan;
pub mod product;
pub mod types;

pub use candidate::TransferCandidate;
pub use inventory::{InventoryRecord, MovementRecord};
pub use outlet::Outlet;
pub use plan::{AllocationLine, PlanTotals, TransferPlan, UnmetDemand};
pub use product::Product;
pub use types::RoundingMode;
