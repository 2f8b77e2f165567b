// ==========================================
// 门店库存调拨系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 一致性校验失败属于逻辑缺陷，致命且不可重试
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 装配后不变量校验失败（致命，终止方案产出）
    #[error("内部一致性校验失败: rule={rule}, 详情: {detail}")]
    ConsistencyViolation { rule: String, detail: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
