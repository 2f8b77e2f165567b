// ==========================================
// 门店库存调拨系统 - 整箱取整策略
// ==========================================
// 职责: 把原始目标数量换算为符合外箱规格的数量
// 红线: 结果必为外箱规格的非负整数倍（0 表示放弃该候选）
// ==========================================

use crate::domain::types::RoundingMode;

// ==========================================
// RoundingPolicy - 整箱取整策略
// ==========================================
pub struct RoundingPolicy {
    mode: RoundingMode,
    floor_qty: i64,
}

impl RoundingPolicy {
    /// 构造函数
    ///
    /// # 参数
    /// - mode: 取整模式
    /// - floor_qty: 起送量（smart 模式下调时的下限）
    pub fn new(mode: RoundingMode, floor_qty: i64) -> Self {
        Self {
            mode,
            floor_qty: floor_qty.max(0),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按策略取整
    ///
    /// 规则：
    /// - raw_qty <= 0 时一律返回 0
    /// - nearest: 就近取整，平局向上
    /// - up: 向上取整到最小的不小于 raw_qty 的整数倍
    /// - down: 向下取整到最大的不超过 raw_qty 的整数倍（可能为 0）
    /// - smart: 先向上取整；若超发量大于半箱，且下调一箱后仍不低于
    ///   起送量（且大于 0），则改用下调值，避免低流速商品超发
    ///
    /// # 参数
    /// - raw_qty: 原始目标数量
    /// - pack_size: 外箱规格（<1 时按 1 处理）
    ///
    /// # 返回
    /// 非负的 pack_size 整数倍
    pub fn round(&self, raw_qty: f64, pack_size: i64) -> i64 {
        if raw_qty <= 0.0 || !raw_qty.is_finite() {
            return 0;
        }
        let pack = pack_size.max(1);
        let pack_f = pack as f64;

        match self.mode {
            RoundingMode::Up => (raw_qty / pack_f).ceil() as i64 * pack,
            RoundingMode::Down => (raw_qty / pack_f).floor() as i64 * pack,
            RoundingMode::Nearest => {
                // f64::round 对正数平局向上（half away from zero）
                (raw_qty / pack_f).round() as i64 * pack
            }
            RoundingMode::Smart => {
                let up = (raw_qty / pack_f).ceil() as i64 * pack;
                let overshoot = up as f64 - raw_qty;
                if overshoot > pack_f / 2.0 {
                    let lower = up - pack;
                    if lower > 0 && lower >= self.floor_qty {
                        return lower;
                    }
                }
                up
            }
        }
    }

    /// 向下取整到 pack_size 的整数倍
    ///
    /// 用于把已取整的数量收敛到余量/上限之内
    pub fn floor_to_pack(qty: i64, pack_size: i64) -> i64 {
        let pack = pack_size.max(1);
        (qty.max(0) / pack) * pack
    }
}
