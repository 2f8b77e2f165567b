// ==========================================
// 门店库存调拨系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎，不拼 SQL
// 红线: Engine 不拼 SQL, 所有规则必须输出 reason
// ==========================================

pub mod assembler;
pub mod candidate_selector;
pub mod error;
pub mod forecast;
pub mod insight;
pub mod orchestrator;
pub mod planner;
pub mod rounding;

// 重导出核心引擎
pub use assembler::PlanAssembler;
pub use candidate_selector::CandidateSelector;
pub use error::{EngineError, EngineResult};
pub use forecast::DemandForecaster;
pub use insight::{InsightProvider, NoOpInsightProvider, PlanInsight};
pub use orchestrator::{AllocationOrchestrator, AllocationRunError, AllocationRunResult};
pub use planner::{AllocationPlanner, PlanningOutcome, CATEGORY_SOURCE_CAP};
pub use rounding::RoundingPolicy;
