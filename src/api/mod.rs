// ==========================================
// 门店库存调拨系统 - API层
// ==========================================
// 职责: 调用契约（请求/响应）、输入校验、错误格式化
// ==========================================

pub mod allocation_api;
pub mod dto;
pub mod error;
pub mod validator;

pub use allocation_api::AllocationApi;
pub use dto::{AllocationRequest, AllocationResponse};
pub use error::{ApiError, ApiResult};
pub use validator::RequestValidator;
