// ==========================================
// 门店库存调拨系统 - 配置层
// ==========================================
// 职责: 每次计划运行的显式配置值对象
// 红线: 核心引擎不持有进程级可变状态，配置随请求传入
// ==========================================

pub mod allocation_config;

pub use allocation_config::AllocationConfig;
