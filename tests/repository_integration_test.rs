// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 验证 SQLite 仓储的读写往返与聚合查询
// ==========================================


#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use chrono::Utc;
use store_allocation::domain::plan::{
    AllocationLine, PlanTotals, TransferPlan, UnmetDemand,
};
use store_allocation::repository::{
    InventoryRepository, OutletRepository, PlanRepository, ProductRepository,
};

use test_data_builder::{recent_movements, InventoryBuilder, OutletBuilder, ProductBuilder};
use test_helpers::{create_test_db, open_test_connection};

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_outlet_roundtrip_and_active_filter() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let repo = OutletRepository::from_connection(conn);

    let outlets = vec![
        OutletBuilder::new("S001").name("旗舰店").build(),
        OutletBuilder::new("S002").inactive().build(),
        OutletBuilder::new("S003").deleted().build(),
    ];
    assert_eq!(repo.batch_insert_outlets(&outlets).unwrap(), 3);

    // 营业中过滤: 停业与已删除门店不返回
    let active = repo.fetch_active_outlets().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].outlet_id, "S001");
    assert_eq!(active[0].outlet_name, "旗舰店");

    // find_by_id 不过滤状态
    let inactive = repo.find_by_id("S002").unwrap().unwrap();
    assert!(!inactive.active_flag);
    assert!(repo.find_by_id("S999").unwrap().is_none());
}

#[test]
fn test_product_roundtrip() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let repo = ProductRepository::from_connection(conn);

    let products = vec![
        ProductBuilder::new("P001").pack(6).category("饮料").build(),
        ProductBuilder::new("P002").pack(12).brand("品牌B").build(),
    ];
    assert_eq!(repo.batch_insert_products(&products).unwrap(), 2);

    let all = repo.fetch_all_products().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].product_id, "P001");
    assert_eq!(all[0].pack_outer_size, 6);

    let p2 = repo.find_by_id("P002").unwrap().unwrap();
    assert_eq!(p2.brand, "品牌B");
}

#[test]
fn test_inventory_snapshot_scoped_to_outlets() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let repo = InventoryRepository::from_connection(conn);

    let records = vec![
        InventoryBuilder::new("P001", "S001").on_hand(40).build(),
        InventoryBuilder::new("P001", "S002").on_hand(25).build(),
        InventoryBuilder::new("P001", "S003").on_hand(60).build(),
        InventoryBuilder::new("P002", "S001").on_hand(10).deleted().build(),
    ];
    assert_eq!(repo.batch_insert_inventory(&records).unwrap(), 4);

    let snapshot = repo
        .fetch_snapshot(&["S001".to_string(), "S002".to_string()])
        .unwrap();

    // S003 不在范围内；软删除记录不返回
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().all(|r| r.outlet_id != "S003"));
    assert!(snapshot.iter().all(|r| !r.deleted_flag));

    // 空门店列表 => 空快照
    assert!(repo.fetch_snapshot(&[]).unwrap().is_empty());
}

#[test]
fn test_outlet_velocity_aggregation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let repo = InventoryRepository::from_connection(conn);

    // 最近 10 天每天卖 3 件，窗口 10 天 => 流速 3.0/day
    let movements = recent_movements("P001", "S001", 10, 3);
    repo.batch_insert_movements(&movements).unwrap();

    let velocity = repo
        .fetch_outlet_velocity("P001", "S001", 10)
        .unwrap()
        .unwrap();
    assert!((velocity - 3.0).abs() < 1e-9, "velocity={}", velocity);

    // 无历史 => None
    assert!(repo
        .fetch_outlet_velocity("P001", "S999", 10)
        .unwrap()
        .is_none());
}

#[test]
fn test_network_velocity_averages_active_outlets() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");

    let outlet_repo = OutletRepository::from_connection(conn.clone());
    let inventory_repo = InventoryRepository::from_connection(conn);

    outlet_repo
        .batch_insert_outlets(&[
            OutletBuilder::new("S001").build(),
            OutletBuilder::new("S002").build(),
            OutletBuilder::new("S003").deleted().build(),
        ])
        .unwrap();

    // S001 每天 4 件，S002 每天 2 件，S003 已删除（不计入）
    let mut movements = recent_movements("P001", "S001", 10, 4);
    movements.extend(recent_movements("P001", "S002", 10, 2));
    movements.extend(recent_movements("P001", "S003", 10, 100));
    inventory_repo.batch_insert_movements(&movements).unwrap();

    // (4×10 + 2×10) / (10 × 2 家) = 3.0/day
    let velocity = inventory_repo
        .fetch_network_velocity("P001", 10)
        .unwrap()
        .unwrap();
    assert!((velocity - 3.0).abs() < 1e-9, "velocity={}", velocity);

    // 无任何销量 => None
    assert!(inventory_repo
        .fetch_network_velocity("P999", 10)
        .unwrap()
        .is_none());
}

#[test]
fn test_plan_insert_and_find_roundtrip() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    let repo = PlanRepository::from_connection(conn);

    let lines = vec![
        AllocationLine {
            product_id: "P001".to_string(),
            source_outlet_id: "S001".to_string(),
            destination_outlet_id: "D001".to_string(),
            quantity: 30,
        },
        AllocationLine {
            product_id: "P002".to_string(),
            source_outlet_id: "S002".to_string(),
            destination_outlet_id: "D001".to_string(),
            quantity: 12,
        },
    ];
    let plan = TransferPlan {
        plan_id: "plan-test-001".to_string(),
        destination_outlet_id: "D001".to_string(),
        created_at: Utc::now(),
        simulation: false,
        totals: PlanTotals::from_lines(&lines),
        lines,
        unmet: vec![UnmetDemand {
            product_id: "P001".to_string(),
            target_qty: 34,
            assigned_qty: 30,
            shortfall_qty: 4,
        }],
    };

    repo.insert_plan(&plan).unwrap();
    assert_eq!(repo.count_plans().unwrap(), 1);

    let loaded = repo.find_by_id("plan-test-001").unwrap().unwrap();
    assert_eq!(loaded.destination_outlet_id, "D001");
    assert_eq!(loaded.lines, plan.lines);
    assert_eq!(loaded.unmet, plan.unmet);
    assert_eq!(loaded.totals, plan.totals);
    assert!(!loaded.simulation);

    assert!(repo.find_by_id("plan-missing").unwrap().is_none());
}
