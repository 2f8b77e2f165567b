// ==========================================
// 门店库存调拨系统 - 调拨方案数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 模拟方案绝不落库（由调用方保证，本层只提供写入能力）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::plan::{AllocationLine, PlanTotals, TransferPlan, UnmetDemand};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// PlanRepository - 调拨方案仓储
// ==========================================
/// 调拨方案仓储
/// 职责: 管理 transfer_plan / transfer_plan_line 表的数据访问
pub struct PlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlanRepository {
    /// 创建新的 PlanRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入完整方案（方案头 + 明细行，单事务）
    ///
    /// # 说明
    /// - 方案是装配完成的不可变值对象，整体写入或整体失败
    pub fn insert_plan(&self, plan: &TransferPlan) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let unmet_json = serde_json::to_string(&plan.unmet)
            .map_err(|e| RepositoryError::InternalError(format!("未满足需求序列化失败: {}", e)))?;

        tx.execute(
            r#"
            INSERT INTO transfer_plan (
                plan_id, destination_outlet_id, created_at, simulation,
                products_count, total_quantity, source_stores, unmet_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                plan.plan_id,
                plan.destination_outlet_id,
                plan.created_at.to_rfc3339(),
                plan.simulation as i64,
                plan.totals.products_count as i64,
                plan.totals.total_quantity,
                plan.totals.source_stores as i64,
                unmet_json,
            ],
        )?;

        for line in &plan.lines {
            tx.execute(
                r#"
                INSERT INTO transfer_plan_line (
                    plan_id, product_id, source_outlet_id, destination_outlet_id, quantity
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    plan.plan_id,
                    line.product_id,
                    line.source_outlet_id,
                    line.destination_outlet_id,
                    line.quantity,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// 按 plan_id 读取完整方案
    ///
    /// # 返回
    /// - Ok(Some(TransferPlan)): 找到记录（明细行按写入顺序）
    /// - Ok(None): 未找到记录
    pub fn find_by_id(&self, plan_id: &str) -> RepositoryResult<Option<TransferPlan>> {
        let conn = self.get_conn()?;

        let header = conn.query_row(
            r#"
            SELECT plan_id, destination_outlet_id, created_at, simulation,
                   products_count, total_quantity, source_stores, unmet_json
            FROM transfer_plan
            WHERE plan_id = ?1
            "#,
            params![plan_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)? != 0,
                    row.get::<_, i64>(4)? as usize,
                    row.get::<_, i64>(5)?,
                    row.get::<_, i64>(6)? as usize,
                    row.get::<_, Option<String>>(7)?,
                ))
            },
        );

        let (
            plan_id,
            destination_outlet_id,
            created_at_raw,
            simulation,
            products_count,
            total_quantity,
            source_stores,
            unmet_json,
        ) = match header {
            Ok(h) => h,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
            .map_err(|e| RepositoryError::FieldValueError {
                field: "created_at".to_string(),
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        let unmet: Vec<UnmetDemand> = match unmet_json {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                RepositoryError::FieldValueError {
                    field: "unmet_json".to_string(),
                    message: e.to_string(),
                }
            })?,
            None => Vec::new(),
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, source_outlet_id, destination_outlet_id, quantity
            FROM transfer_plan_line
            WHERE plan_id = ?1
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map(params![plan_id], |row| {
            Ok(AllocationLine {
                product_id: row.get(0)?,
                source_outlet_id: row.get(1)?,
                destination_outlet_id: row.get(2)?,
                quantity: row.get(3)?,
            })
        })?;

        let mut lines = Vec::new();
        for row in rows {
            lines.push(row?);
        }

        Ok(Some(TransferPlan {
            plan_id,
            destination_outlet_id,
            created_at,
            simulation,
            lines,
            unmet,
            totals: PlanTotals {
                products_count,
                total_quantity,
                source_stores,
            },
        }))
    }

    /// 统计已落库方案数（测试与诊断用）
    pub fn count_plans(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transfer_plan", [], |row| row.get(0))?;
        Ok(count)
    }
}
