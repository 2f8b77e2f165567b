// ==========================================
// 门店库存调拨系统 - 请求校验器
// ==========================================
// 职责: 字段级输入校验（存在性、类型、长度、格式），
//       在任何计划步骤开始前拒绝畸形请求
// 红线: 校验失败必须指明字段与被违反的规则
// ==========================================

use crate::api::dto::AllocationRequest;
use crate::api::error::{ApiError, ApiResult};

/// 门店编号最大长度
pub const MAX_OUTLET_ID_LEN: usize = 32;

// ==========================================
// RequestValidator - 请求校验器
// ==========================================

/// 请求校验器
///
/// 职责：
/// 1. 门店编号格式校验
/// 2. 配置项取值范围校验（candidate_limit=0 必须拒绝，不得当作不限制）
pub struct RequestValidator {
    // 无状态校验器，不需要注入依赖
}

impl RequestValidator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 校验调拨请求
    ///
    /// # 返回
    /// - Ok(()): 校验通过
    /// - Err(ApiError::FieldValueError): 指明字段与规则的校验失败
    pub fn validate(&self, request: &AllocationRequest) -> ApiResult<()> {
        Self::validate_outlet_id("destination_outlet_id", &request.destination_outlet_id)?;

        let config = &request.config;

        if config.cover_days < 1 {
            return Err(field_error("cover_days", "必须为正整数天数"));
        }
        if !config.buffer_pct.is_finite() || config.buffer_pct < 0.0 {
            return Err(field_error("buffer_pct", "必须为非负百分比"));
        }
        if config.default_floor_qty < 0 {
            return Err(field_error("default_floor_qty", "不允许为负数"));
        }
        if config.min_source_stock < 0 {
            return Err(field_error("min_source_stock", "不允许为负数"));
        }
        if config.max_contribution_per_store < 1 {
            return Err(field_error("max_contribution_per_store", "必须为正整数"));
        }
        if config.candidate_limit < 1 {
            // 0 必须被拒绝，不得静默当作不限制
            return Err(field_error("candidate_limit", "必须为正整数，0 不代表不限制"));
        }

        Ok(())
    }

    /// 校验门店编号格式
    ///
    /// 规则: 非空、长度不超过 32、只允许字母/数字/下划线/连字符
    pub fn validate_outlet_id(field: &str, outlet_id: &str) -> ApiResult<()> {
        let trimmed = outlet_id.trim();
        if trimmed.is_empty() {
            return Err(field_error(field, "不允许为空"));
        }
        if trimmed.len() != outlet_id.len() {
            return Err(field_error(field, "不允许首尾空白字符"));
        }
        if outlet_id.len() > MAX_OUTLET_ID_LEN {
            return Err(field_error(
                field,
                &format!("长度不得超过 {} 个字符", MAX_OUTLET_ID_LEN),
            ));
        }
        if !outlet_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(field_error(field, "只允许字母、数字、下划线、连字符"));
        }
        Ok(())
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// 构造字段级校验错误
fn field_error(field: &str, rule: &str) -> ApiError {
    ApiError::FieldValueError {
        field: field.to_string(),
        rule: rule.to_string(),
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllocationConfig;

    fn valid_request() -> AllocationRequest {
        AllocationRequest {
            destination_outlet_id: "D001".to_string(),
            simulate: true,
            config: AllocationConfig::default(),
        }
    }

    fn assert_field_rejected(request: AllocationRequest, expected_field: &str) {
        let validator = RequestValidator::new();
        match validator.validate(&request) {
            Err(ApiError::FieldValueError { field, .. }) => {
                assert_eq!(field, expected_field);
            }
            other => panic!("Expected FieldValueError({}), got {:?}", expected_field, other),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let validator = RequestValidator::new();
        assert!(validator.validate(&valid_request()).is_ok());
    }

    #[test]
    fn test_empty_outlet_id_rejected() {
        let mut request = valid_request();
        request.destination_outlet_id = "".to_string();
        assert_field_rejected(request, "destination_outlet_id");
    }

    #[test]
    fn test_outlet_id_bad_charset_rejected() {
        let mut request = valid_request();
        request.destination_outlet_id = "D001 店".to_string();
        assert_field_rejected(request, "destination_outlet_id");
    }

    #[test]
    fn test_outlet_id_too_long_rejected() {
        let mut request = valid_request();
        request.destination_outlet_id = "D".repeat(MAX_OUTLET_ID_LEN + 1);
        assert_field_rejected(request, "destination_outlet_id");
    }

    #[test]
    fn test_candidate_limit_zero_rejected() {
        // candidate_limit=0 是输入校验失败，不得当作不限制
        let mut request = valid_request();
        request.config.candidate_limit = 0;
        assert_field_rejected(request, "candidate_limit");
    }

    #[test]
    fn test_cover_days_zero_rejected() {
        let mut request = valid_request();
        request.config.cover_days = 0;
        assert_field_rejected(request, "cover_days");
    }

    #[test]
    fn test_negative_buffer_pct_rejected() {
        let mut request = valid_request();
        request.config.buffer_pct = -5.0;
        assert_field_rejected(request, "buffer_pct");
    }

    #[test]
    fn test_nan_buffer_pct_rejected() {
        let mut request = valid_request();
        request.config.buffer_pct = f64::NAN;
        assert_field_rejected(request, "buffer_pct");
    }

    #[test]
    fn test_zero_contribution_cap_rejected() {
        let mut request = valid_request();
        request.config.max_contribution_per_store = 0;
        assert_field_rejected(request, "max_contribution_per_store");
    }

    #[test]
    fn test_negative_floor_rejected() {
        let mut request = valid_request();
        request.config.default_floor_qty = -1;
        assert_field_rejected(request, "default_floor_qty");
    }
}
