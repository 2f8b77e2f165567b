// ==========================================
// 门店库存调拨系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// 说明：
/// - 门店/商品/库存/销量历史为引擎的只读参考数据
/// - transfer_plan / transfer_plan_line 仅在正式运行提交时写入
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS outlet (
            outlet_id     TEXT PRIMARY KEY,
            outlet_name   TEXT NOT NULL,
            active_flag   INTEGER NOT NULL DEFAULT 1,
            deleted_flag  INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS product (
            product_id      TEXT PRIMARY KEY,
            product_name    TEXT NOT NULL,
            category        TEXT NOT NULL,
            brand           TEXT NOT NULL,
            pack_outer_size INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS inventory (
            product_id    TEXT NOT NULL,
            outlet_id     TEXT NOT NULL,
            on_hand_qty   INTEGER NOT NULL DEFAULT 0,
            reorder_point INTEGER NOT NULL DEFAULT 0,
            deleted_flag  INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (product_id, outlet_id)
        );

        CREATE TABLE IF NOT EXISTS movement_history (
            product_id    TEXT NOT NULL,
            outlet_id     TEXT NOT NULL,
            movement_date TEXT NOT NULL,
            qty_sold      INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (product_id, outlet_id, movement_date)
        );

        CREATE TABLE IF NOT EXISTS transfer_plan (
            plan_id               TEXT PRIMARY KEY,
            destination_outlet_id TEXT NOT NULL,
            created_at            TEXT NOT NULL,
            simulation            INTEGER NOT NULL DEFAULT 0,
            products_count        INTEGER NOT NULL DEFAULT 0,
            total_quantity        INTEGER NOT NULL DEFAULT 0,
            source_stores         INTEGER NOT NULL DEFAULT 0,
            unmet_json            TEXT
        );

        CREATE TABLE IF NOT EXISTS transfer_plan_line (
            plan_id               TEXT NOT NULL,
            product_id            TEXT NOT NULL,
            source_outlet_id      TEXT NOT NULL,
            destination_outlet_id TEXT NOT NULL,
            quantity              INTEGER NOT NULL,
            PRIMARY KEY (plan_id, product_id, source_outlet_id),
            FOREIGN KEY (plan_id) REFERENCES transfer_plan(plan_id)
        );
        "#,
    )?;
    Ok(())
}
