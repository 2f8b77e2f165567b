// ==========================================
// 门店库存调拨系统 - 存储协作层
// ==========================================
// 职责: 定义引擎所依赖的存储协作方接口，与具体后端解耦
// 说明: Engine 层依赖 trait，SQLite 实现只是其中一个适配器
// ==========================================

pub mod allocation_store;
pub mod retry;

pub use allocation_store::{AllocationStore, SqliteAllocationStore};
pub use retry::{NoDelayBackoff, RetryBackoff, RetryError, RetryPolicy, TokioBackoff};
