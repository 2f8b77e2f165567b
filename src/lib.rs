// ==========================================
// 门店库存调拨系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (计算调拨方案，人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 运行配置
pub mod config;

// 数据仓储层 - 数据访问
pub mod repository;

// 存储协作层 - 引擎依赖的存储接口与重试
pub mod store;

// 引擎层 - 业务规则
pub mod engine;

// API 层 - 业务接口
pub mod api;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::RoundingMode;

// 领域实体
pub use domain::{
    AllocationLine, InventoryRecord, MovementRecord, Outlet, PlanTotals, Product,
    TransferCandidate, TransferPlan, UnmetDemand,
};

// 配置
pub use config::AllocationConfig;

// API
pub use api::{AllocationApi, AllocationRequest, AllocationResponse};

/// 系统版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
