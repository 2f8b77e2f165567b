// ==========================================
// 门店库存调拨系统 - 库存与销量数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 流速 = 窗口内销量合计 / 窗口天数，属于数据访问层的聚合查询；
//       覆盖天数/安全余量等业务含义由引擎层赋予
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::{InventoryRecord, MovementRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Duration, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// InventoryRepository - 库存仓储
// ==========================================
/// 库存仓储
/// 职责: 管理 inventory / movement_history 表的数据访问
pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
    /// 创建新的 InventoryRepository 实例
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

    /// 读取指定门店集合的库存快照（未删除记录）
    ///
    /// # 参数
    /// - outlet_ids: 门店编号列表
    ///
    /// # 返回
    /// - Ok(Vec<InventoryRecord>): 按 (product_id, outlet_id) 升序
    ///
    /// # 说明
    /// - 快照在计划开始时读取一次，运行中不再刷新
    pub fn fetch_snapshot(&self, outlet_ids: &[String]) -> RepositoryResult<Vec<InventoryRecord>> {
        if outlet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let placeholders = vec!["?"; outlet_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT product_id, outlet_id, on_hand_qty, reorder_point, deleted_flag
            FROM inventory
            WHERE deleted_flag = 0 AND outlet_id IN ({})
            ORDER BY product_id, outlet_id
            "#,
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(outlet_ids.iter()), |row| {
            Ok(InventoryRecord {
                product_id: row.get(0)?,
                outlet_id: row.get(1)?,
                on_hand_qty: row.get(2)?,
                reorder_point: row.get(3)?,
                deleted_flag: row.get::<_, i64>(4)? != 0,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// 推算单店日均流速
    ///
    /// # 参数
    /// - product_id: 商品编号
    /// - outlet_id: 门店编号
    /// - window_days: 回看窗口天数（>=1）
    ///
    /// # 返回
    /// - Ok(Some(f64)): 窗口内销量合计 / 窗口天数
    /// - Ok(None): 窗口内无销量记录
    pub fn fetch_outlet_velocity(
        &self,
        product_id: &str,
        outlet_id: &str,
        window_days: i64,
    ) -> RepositoryResult<Option<f64>> {
        let window = window_days.max(1);
        let cutoff = Self::window_cutoff(window);
        let conn = self.get_conn()?;

        let total: Option<i64> = conn.query_row(
            r#"
            SELECT SUM(qty_sold)
            FROM movement_history
            WHERE product_id = ?1 AND outlet_id = ?2 AND movement_date >= ?3
            "#,
            params![product_id, outlet_id, cutoff.to_string()],
            |row| row.get(0),
        )?;

        Ok(total.map(|sum| sum as f64 / window as f64))
    }

    /// 推算全网日均流速（营业中门店的平均）
    ///
    /// # 参数
    /// - product_id: 商品编号
    /// - window_days: 回看窗口天数（>=1）
    ///
    /// # 返回
    /// - Ok(Some(f64)): 窗口内销量合计 / (窗口天数 × 有销量门店数)
    /// - Ok(None): 全网无销量记录
    pub fn fetch_network_velocity(
        &self,
        product_id: &str,
        window_days: i64,
    ) -> RepositoryResult<Option<f64>> {
        let window = window_days.max(1);
        let cutoff = Self::window_cutoff(window);
        let conn = self.get_conn()?;

        let (total, outlet_count): (Option<i64>, i64) = conn.query_row(
            r#"
            SELECT SUM(m.qty_sold), COUNT(DISTINCT m.outlet_id)
            FROM movement_history m
            JOIN outlet o ON o.outlet_id = m.outlet_id
            WHERE m.product_id = ?1
              AND m.movement_date >= ?2
              AND o.active_flag = 1
              AND o.deleted_flag = 0
            "#,
            params![product_id, cutoff.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        match total {
            Some(sum) if outlet_count > 0 => {
                Ok(Some(sum as f64 / (window as f64 * outlet_count as f64)))
            }
            _ => Ok(None),
        }
    }

    /// 批量插入库存记录（INSERT OR REPLACE）
    pub fn batch_insert_inventory(
        &self,
        records: &[InventoryRecord],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for record in records {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO inventory (
                    product_id, outlet_id, on_hand_qty, reorder_point, deleted_flag
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record.product_id,
                    record.outlet_id,
                    record.on_hand_qty,
                    record.reorder_point,
                    record.deleted_flag as i64,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 批量插入销量历史（INSERT OR REPLACE）
    pub fn batch_insert_movements(
        &self,
        records: &[MovementRecord],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for record in records {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO movement_history (
                    product_id, outlet_id, movement_date, qty_sold
                ) VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    record.product_id,
                    record.outlet_id,
                    record.movement_date.to_string(),
                    record.qty_sold,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 计算窗口起始日期
    fn window_cutoff(window_days: i64) -> NaiveDate {
        Utc::now().date_naive() - Duration::days(window_days)
    }
}
