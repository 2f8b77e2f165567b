// ==========================================
// 门店库存调拨系统 - 商品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 商品仓储
// ==========================================
/// 商品仓储
/// 职责: 管理 product 表的数据访问
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 创建新的 ProductRepository 实例
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

    /// 查询全部商品
    ///
    /// # 返回
    /// - Ok(Vec<Product>): 按 product_id 升序
    pub fn fetch_all_products(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, product_name, category, brand, pack_outer_size
            FROM product
            ORDER BY product_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Product {
                product_id: row.get(0)?,
                product_name: row.get(1)?,
                category: row.get(2)?,
                brand: row.get(3)?,
                pack_outer_size: row.get(4)?,
            })
        })?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }
        Ok(products)
    }

    /// 按 product_id 查询商品
    pub fn find_by_id(&self, product_id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, product_name, category, brand, pack_outer_size
            FROM product
            WHERE product_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![product_id], |row| {
            Ok(Product {
                product_id: row.get(0)?,
                product_name: row.get(1)?,
                category: row.get(2)?,
                brand: row.get(3)?,
                pack_outer_size: row.get(4)?,
            })
        });

        match result {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 批量插入商品（INSERT OR REPLACE）
    pub fn batch_insert_products(&self, products: &[Product]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for product in products {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO product (
                    product_id, product_name, category, brand, pack_outer_size
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    product.product_id,
                    product.product_name,
                    product.category,
                    product.brand,
                    product.pack_outer_size,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }
}
