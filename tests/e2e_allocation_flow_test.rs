// ==========================================
// 端到端调拨流程测试（真实 SQLite）
// ==========================================
// 场景: 建库 → 种子数据 → 模拟运行 → 正式运行 → 验证落库
// ==========================================


#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use std::sync::Arc;

use store_allocation::api::{AllocationApi, AllocationRequest};
use store_allocation::config::AllocationConfig;
use store_allocation::repository::{
    InventoryRepository, OutletRepository, PlanRepository, ProductRepository,
};
use store_allocation::store::SqliteAllocationStore;

use test_data_builder::{recent_movements, InventoryBuilder, OutletBuilder, ProductBuilder};
use test_helpers::{create_test_db, open_test_connection};

// ==========================================
// 测试辅助函数
// ==========================================

/// 种子数据: 新开门店 D001，两家货源门店，两个商品
fn seed_database(db_path: &str) {
    let conn = open_test_connection(db_path).expect("Failed to open db");

    let outlet_repo = OutletRepository::from_connection(conn.clone());
    let product_repo = ProductRepository::from_connection(conn.clone());
    let inventory_repo = InventoryRepository::from_connection(conn);

    outlet_repo
        .batch_insert_outlets(&[
            OutletBuilder::new("D001").name("新开门店").build(),
            OutletBuilder::new("S001").build(),
            OutletBuilder::new("S002").build(),
        ])
        .unwrap();

    product_repo
        .batch_insert_products(&[
            ProductBuilder::new("P001").pack(6).category("饮料").build(),
            ProductBuilder::new("P002").pack(4).category("零食").build(),
        ])
        .unwrap();

    inventory_repo
        .batch_insert_inventory(&[
            InventoryBuilder::new("P001", "S001").on_hand(60).build(),
            InventoryBuilder::new("P001", "S002").on_hand(30).build(),
            InventoryBuilder::new("P002", "S001").on_hand(25).build(),
        ])
        .unwrap();

    // D001 无历史；货源门店有稳定销量供全网流速回退
    let mut movements = recent_movements("P001", "S001", 14, 3);
    movements.extend(recent_movements("P001", "S002", 14, 1));
    movements.extend(recent_movements("P002", "S001", 14, 2));
    inventory_repo.batch_insert_movements(&movements).unwrap();
}

fn request(simulate: bool) -> AllocationRequest {
    AllocationRequest {
        destination_outlet_id: "D001".to_string(),
        simulate,
        config: AllocationConfig {
            cover_days: 7,
            buffer_pct: 10.0,
            min_source_stock: 5,
            ..Default::default()
        },
    }
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_full_flow_simulate_then_commit() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    seed_database(&db_path);

    let store = Arc::new(SqliteAllocationStore::from_connection(
        open_test_connection(&db_path).unwrap(),
    ));
    let api = AllocationApi::new(store);

    // 1. 模拟运行: 产出方案但不落库
    let simulated = api.run_allocation(&request(true)).await;
    assert!(simulated.success, "error={:?}", simulated.error);
    let simulated_plan = simulated.plan.clone().unwrap();
    assert!(simulated_plan.simulation);
    assert!(!simulated_plan.lines.is_empty());

    let plan_repo = PlanRepository::from_connection(open_test_connection(&db_path).unwrap());
    assert_eq!(plan_repo.count_plans().unwrap(), 0, "模拟运行不得落库");

    // 2. 正式运行: 相同快照 => 相同明细行，且方案落库
    let committed = api.run_allocation(&request(false)).await;
    assert!(committed.success, "error={:?}", committed.error);
    assert!(committed.committed);
    let committed_plan = committed.plan.clone().unwrap();

    // 模拟运行如实预告正式运行的结果
    assert_eq!(simulated_plan.lines, committed_plan.lines);
    assert_eq!(simulated_plan.unmet, committed_plan.unmet);
    assert_eq!(simulated_plan.totals, committed_plan.totals);

    assert_eq!(plan_repo.count_plans().unwrap(), 1);
    let persisted = plan_repo
        .find_by_id(&committed_plan.plan_id)
        .unwrap()
        .expect("正式方案应当已落库");
    assert_eq!(persisted.lines, committed_plan.lines);
    assert_eq!(persisted.totals, committed_plan.totals);
}

#[tokio::test]
async fn test_full_flow_invariants_hold() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    seed_database(&db_path);

    let store = Arc::new(SqliteAllocationStore::from_connection(
        open_test_connection(&db_path).unwrap(),
    ));
    let api = AllocationApi::new(store);

    let response = api.run_allocation(&request(true)).await;
    assert!(response.success, "error={:?}", response.error);
    let plan = response.plan.unwrap();

    for line in &plan.lines {
        // 目的门店不出现在货源侧
        assert_ne!(line.source_outlet_id, "D001");
        // 整箱取整默认开启: 行数量为外箱规格整数倍
        let pack = match line.product_id.as_str() {
            "P001" => 6,
            "P002" => 4,
            other => panic!("unexpected product {}", other),
        };
        assert_eq!(line.quantity % pack, 0, "line={:?}", line);
        assert!(line.quantity > 0);
    }

    // 汇总值 = 明细行求和
    let sum: i64 = plan.lines.iter().map(|l| l.quantity).sum();
    assert_eq!(plan.totals.total_quantity, sum);
}
