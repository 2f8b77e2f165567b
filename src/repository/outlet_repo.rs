// ==========================================
// 门店库存调拨系统 - 门店数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::outlet::Outlet;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// OutletRepository - 门店仓储
// ==========================================
/// 门店仓储
/// 职责: 管理 outlet 表的数据访问
pub struct OutletRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OutletRepository {
    /// 创建新的 OutletRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 查询所有营业中、未删除的门店
    ///
    /// # 返回
    /// - Ok(Vec<Outlet>): 按 outlet_id 升序
    pub fn fetch_active_outlets(&self) -> RepositoryResult<Vec<Outlet>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT outlet_id, outlet_name, active_flag, deleted_flag
            FROM outlet
            WHERE active_flag = 1 AND deleted_flag = 0
            ORDER BY outlet_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Outlet {
                outlet_id: row.get(0)?,
                outlet_name: row.get(1)?,
                active_flag: row.get::<_, i64>(2)? != 0,
                deleted_flag: row.get::<_, i64>(3)? != 0,
            })
        })?;

        let mut outlets = Vec::new();
        for row in rows {
            outlets.push(row?);
        }
        Ok(outlets)
    }

    /// 按 outlet_id 查询门店
    ///
    /// # 返回
    /// - Ok(Some(Outlet)): 找到记录
    /// - Ok(None): 未找到记录
    pub fn find_by_id(&self, outlet_id: &str) -> RepositoryResult<Option<Outlet>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT outlet_id, outlet_name, active_flag, deleted_flag
            FROM outlet
            WHERE outlet_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![outlet_id], |row| {
            Ok(Outlet {
                outlet_id: row.get(0)?,
                outlet_name: row.get(1)?,
                active_flag: row.get::<_, i64>(2)? != 0,
                deleted_flag: row.get::<_, i64>(3)? != 0,
            })
        });

        match result {
            Ok(outlet) => Ok(Some(outlet)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 批量插入门店（INSERT OR REPLACE）
    ///
    /// # 说明
    /// - 使用 INSERT OR REPLACE 实现 upsert 语义
    /// - 使用事务确保原子性
    pub fn batch_insert_outlets(&self, outlets: &[Outlet]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for outlet in outlets {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO outlet (
                    outlet_id, outlet_name, active_flag, deleted_flag
                ) VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    outlet.outlet_id,
                    outlet.outlet_name,
                    outlet.active_flag as i64,
                    outlet.deleted_flag as i64,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }
}
