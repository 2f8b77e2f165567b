// ==========================================
// 门店库存调拨系统 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统
// 用法: store-allocation <db_path> <destination_outlet_id> [--commit]
//       默认模拟运行，--commit 时方案落库
// ==========================================

use std::process::ExitCode;
use std::sync::Arc;

use store_allocation::api::{AllocationApi, AllocationRequest};
use store_allocation::config::AllocationConfig;
use store_allocation::store::SqliteAllocationStore;

#[tokio::main]
async fn main() -> ExitCode {
    // 初始化日志系统
    store_allocation::logging::init();

    tracing::info!("==================================================");
    tracing::info!("门店库存调拨系统 - 决策支持系统");
    tracing::info!("系统版本: {}", store_allocation::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "用法: {} <db_path> <destination_outlet_id> [--commit]",
            args[0]
        );
        return ExitCode::from(2);
    }
    let db_path = &args[1];
    let destination_outlet_id = args[2].clone();
    let simulate = !args.iter().any(|a| a == "--commit");

    tracing::info!("使用数据库: {}", db_path);

    // 打开数据库并确保 schema 存在
    let conn = match store_allocation::db::open_sqlite_connection(db_path) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("无法打开数据库: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = store_allocation::db::ensure_schema(&conn) {
        tracing::error!("schema 初始化失败: {}", e);
        return ExitCode::FAILURE;
    }

    let store = Arc::new(SqliteAllocationStore::from_connection(Arc::new(
        std::sync::Mutex::new(conn),
    )));
    let api = AllocationApi::new(store);

    let request = AllocationRequest {
        destination_outlet_id,
        simulate,
        config: AllocationConfig::default(),
    };

    let response = api.run_allocation(&request).await;

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!("响应序列化失败: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
