// ==========================================
// 门店库存调拨系统 - 调拨业务接口
// ==========================================
// 职责: 对外唯一入口，串联 校验 → 编排器 → 响应格式化
// 红线: 任何失败路径都返回结构化响应，不向调用方抛出未格式化异常
// ==========================================

use crate::api::dto::{AllocationRequest, AllocationResponse};
use crate::api::error::ApiError;
use crate::api::validator::RequestValidator;
use crate::engine::insight::InsightProvider;
use crate::engine::orchestrator::AllocationOrchestrator;
use crate::store::retry::RetryPolicy;
use crate::store::AllocationStore;
use std::sync::Arc;
use tracing::{error, info};

// ==========================================
// AllocationApi - 调拨业务接口
// ==========================================

pub struct AllocationApi<S>
where
    S: AllocationStore,
{
    validator: RequestValidator,
    orchestrator: AllocationOrchestrator<S>,
}

impl<S> AllocationApi<S>
where
    S: AllocationStore,
{
    /// 创建新的 AllocationApi 实例（默认重试策略、无建议服务）
    pub fn new(store: Arc<S>) -> Self {
        Self {
            validator: RequestValidator::new(),
            orchestrator: AllocationOrchestrator::new(store),
        }
    }

    /// 以显式重试策略与建议服务构造（测试注入用）
    pub fn with_parts(
        store: Arc<S>,
        retry: RetryPolicy,
        insight: Arc<dyn InsightProvider>,
    ) -> Self {
        Self {
            validator: RequestValidator::new(),
            orchestrator: AllocationOrchestrator::with_parts(store, retry, insight),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次调拨计划运行
    ///
    /// # 参数
    /// - request: 调拨请求（目的门店 + 模拟标记 + 配置包）
    ///
    /// # 返回
    /// 结构化响应；失败时 success=false 并携带可读错误描述，
    /// 存储失败额外携带尝试次数
    pub async fn run_allocation(&self, request: &AllocationRequest) -> AllocationResponse {
        // 字段级校验先行，畸形请求不进入任何计划步骤
        if let Err(e) = self.validator.validate(request) {
            info!(error = %e, "请求校验失败");
            return AllocationResponse::failure(e.to_string(), None, Vec::new());
        }

        match self
            .orchestrator
            .execute(
                &request.destination_outlet_id,
                request.simulate,
                &request.config,
            )
            .await
        {
            Ok(result) => AllocationResponse::from_run_result(result),
            Err(run_err) => {
                let api_err: ApiError = run_err.into();
                error!(error = %api_err, "调拨计划运行失败");
                AllocationResponse::failure(api_err.to_string(), api_err.attempts(), Vec::new())
            }
        }
    }
}
