// ==========================================
// 门店库存调拨系统 - 需求预测引擎
// ==========================================
// 职责: 由历史流速 + 覆盖天数 + 安全余量推算目的门店的目标在库量
// 红线: 所有规则必须输出 reason
// 红线: Engine 不拼 SQL —— 流速由存储协作方聚合后传入
// ==========================================

// ==========================================
// DemandForecaster - 需求预测引擎
// ==========================================
pub struct DemandForecaster {
    // 无状态引擎，不需要注入依赖
}

impl DemandForecaster {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单品目标在库量
    ///
    /// 规则：
    /// 1) 优先使用目的门店自身流速
    /// 2) 目的门店无历史（新开门店）时回退到全网平均流速
    /// 3) target = ceil(流速 × 覆盖天数 × (1 + 安全余量/100))
    /// 4) 结果不低于起送量 floor_qty
    /// 5) 完全无流速数据时直接取 floor_qty
    ///
    /// # 参数
    /// - outlet_velocity: 目的门店日均流速
    /// - network_velocity: 全网日均流速（回退值）
    /// - cover_days: 覆盖天数
    /// - buffer_pct: 安全余量百分比
    /// - floor_qty: 起送量
    ///
    /// # 返回
    /// (目标数量, 推算原因)
    pub fn target_qty(
        &self,
        outlet_velocity: Option<f64>,
        network_velocity: Option<f64>,
        cover_days: i64,
        buffer_pct: f64,
        floor_qty: i64,
    ) -> (i64, String) {
        let floor = floor_qty.max(0);

        let (velocity, source) = match (outlet_velocity, network_velocity) {
            (Some(v), _) if v > 0.0 => (v, "OUTLET_VELOCITY"),
            (_, Some(v)) if v > 0.0 => (v, "NETWORK_FALLBACK"),
            _ => {
                return (
                    floor,
                    format!("NO_VELOCITY_DATA: floor_qty={}", floor),
                );
            }
        };

        let raw = velocity * cover_days as f64 * (1.0 + buffer_pct / 100.0);
        let target = (raw.ceil() as i64).max(floor);

        (
            target,
            format!(
                "{}: velocity={:.4}/day, cover_days={}, buffer_pct={}, raw={:.2}",
                source, velocity, cover_days, buffer_pct, raw
            ),
        )
    }
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self::new()
    }
}
