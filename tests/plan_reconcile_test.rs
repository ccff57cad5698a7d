// ==========================================
// 生产计划对账集成测试
// ==========================================
// 测试范围:
// 1. 目标日期过滤 + 按输入顺序落库
// 2. 按日期整体替换（幂等 / 其他日期不受影响）
// 3. 原子性: 插入失败时旧数据保持不变
// 4. 载荷无法打开: ImportValidationError，未写库
// 5. 计划分页查询
// 6. xlsx 夹具走完整载荷路径（文本日期 / 日期单元格 / 数值计数 / 备注列）
// ==========================================

mod test_helpers;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use test_helpers::*;
use vmi_analytics::api::{ApiError, PlanApi};
use vmi_analytics::domain::{HorizonCounts, PageRequest};
use vmi_analytics::importer::{ImportError, PlanReconciler, SkipReason};
use vmi_analytics::logging;
use vmi_analytics::query::{predicates, EqFilters, SqlParam};
use vmi_analytics::repository::ProductionPlanRepository;

struct Env {
    _temp: tempfile::NamedTempFile,
    conn: Arc<Mutex<Connection>>,
    repo: Arc<ProductionPlanRepository>,
    reconciler: PlanReconciler,
}

impl Env {
    fn new() -> Self {
        logging::init_test();
        let (temp, db_path) = create_test_db().expect("无法创建测试数据库");
        let conn = open_shared(&db_path).expect("无法打开连接");
        let repo = Arc::new(ProductionPlanRepository::new(conn.clone()));
        let reconciler = PlanReconciler::new(repo.clone());
        Self {
            _temp: temp,
            conn,
            repo,
            reconciler,
        }
    }
}

#[test]
fn test_reconcile_keeps_target_date_rows_in_order() {
    let env = Env::new();
    let target = date(2025, 8, 21);

    let sheet = plan_sheet(vec![
        plan_row("M001", "2025-08-21", (100, 80), (50, 50)),
        plan_row("M002", "2025-08-22", (10, 0), (0, 0)),
        plan_row("M003", "25-08-21", (30, 35), (0, 0)),
        vec!["短行".to_string(), "x".to_string()],
        plan_row("M004", "2025/08/21", (1, 1), (1, 1)),
    ]);

    let report = env.reconciler.reconcile_rows(&sheet, target).unwrap();

    let codes: Vec<&str> = report.rows.iter().map(|r| r.material_code.as_str()).collect();
    assert_eq!(codes, vec!["M001", "M003"]);
    assert!(report.rows.iter().all(|r| r.id.is_some()));
    assert!(report.rows[0].id < report.rows[1].id);
    assert_eq!(report.deleted, 0);
    assert!(!report.run_id.is_empty());

    // 派生字段
    let m001 = &report.rows[0];
    assert_eq!(m001.t.unfinished, 20);
    assert_eq!(m001.total_planned, 150);
    assert_eq!(m001.total_inspected, 130);
    let m003 = &report.rows[1];
    assert_eq!(m003.t.unfinished, -5);

    // 跳过明细（行号以表头为 0）
    let reasons: Vec<(usize, &SkipReason)> =
        report.skipped.iter().map(|s| (s.row_index, &s.reason)).collect();
    assert_eq!(reasons.len(), 3);
    assert!(matches!(reasons[0], (2, SkipReason::DateMismatch { .. })));
    assert!(matches!(reasons[1], (4, SkipReason::InsufficientColumns { found: 2 })));
    assert!(matches!(reasons[2], (5, SkipReason::InvalidPlanDate { .. })));

    // 落库结果与返回一致
    let stored = env.repo.find_by_plan_date(target).unwrap();
    assert_eq!(stored, report.rows);
}

#[test]
fn test_reconcile_is_idempotent() {
    let env = Env::new();
    let target = date(2025, 8, 21);
    let sheet = plan_sheet(vec![
        plan_row("M001", "2025-08-21", (100, 80), (0, 0)),
        plan_row("M002", "2025-08-21", (20, 20), (0, 0)),
    ]);

    let first = env.reconciler.reconcile_rows(&sheet, target).unwrap();
    let second = env.reconciler.reconcile_rows(&sheet, target).unwrap();

    assert_eq!(second.deleted, 2);
    assert_eq!(count_plans_for(&env.conn, target), 2);

    let strip = |rows: &[vmi_analytics::ProductionPlanRow]| {
        rows.iter()
            .map(|r| {
                let mut r = r.clone();
                r.id = None;
                r
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(strip(&first.rows), strip(&second.rows));
}

#[test]
fn test_reconcile_without_matching_rows_clears_target_date() {
    let env = Env::new();
    let target = date(2025, 8, 21);
    let other = date(2025, 8, 22);

    env.reconciler
        .reconcile_rows(
            &plan_sheet(vec![plan_row("OLD", "2025-08-21", (5, 5), (0, 0))]),
            target,
        )
        .unwrap();
    env.reconciler
        .reconcile_rows(
            &plan_sheet(vec![plan_row("KEEP", "2025-08-22", (5, 5), (0, 0))]),
            other,
        )
        .unwrap();

    // 载荷中全部是其他日期的行
    let report = env
        .reconciler
        .reconcile_rows(
            &plan_sheet(vec![plan_row("M009", "2025-08-22", (1, 0), (0, 0))]),
            target,
        )
        .unwrap();

    assert!(report.rows.is_empty());
    assert_eq!(report.deleted, 1);
    assert_eq!(count_plans_for(&env.conn, target), 0);
    // 其他日期不受影响
    let kept = env.repo.find_by_plan_date(other).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].material_code, "KEEP");
}

#[test]
fn test_reconcile_header_only() {
    let env = Env::new();
    let report = env
        .reconciler
        .reconcile_rows(&plan_sheet(vec![]), date(2025, 8, 21))
        .unwrap();

    assert!(report.rows.is_empty());
    assert!(report.skipped.is_empty());
}

#[test]
fn test_reconcile_failure_keeps_previous_rows() {
    let env = Env::new();
    let target = date(2025, 8, 21);

    env.reconciler
        .reconcile_rows(
            &plan_sheet(vec![
                plan_row("OLD1", "2025-08-21", (5, 5), (0, 0)),
                plan_row("OLD2", "2025-08-21", (6, 6), (0, 0)),
            ]),
            target,
        )
        .unwrap();

    env.conn
        .lock()
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER fail_on_boom BEFORE INSERT ON production_plans
             WHEN NEW.material_code = 'BOOM'
             BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
        )
        .unwrap();

    let result = env.reconciler.reconcile_rows(
        &plan_sheet(vec![
            plan_row("NEW1", "2025-08-21", (1, 1), (0, 0)),
            plan_row("BOOM", "2025-08-21", (1, 1), (0, 0)),
        ]),
        target,
    );

    assert!(matches!(result, Err(ImportError::Repository(_))));
    let api_err: ApiError = result.unwrap_err().into();
    assert!(matches!(api_err, ApiError::DataAccessError(_)));

    // 删除与插入一并回滚
    let stored = env.repo.find_by_plan_date(target).unwrap();
    let codes: Vec<&str> = stored.iter().map(|r| r.material_code.as_str()).collect();
    assert_eq!(codes, vec!["OLD1", "OLD2"]);
}

#[test]
fn test_unreadable_payload_is_validation_error() {
    let env = Env::new();
    let target = date(2025, 8, 21);
    env.reconciler
        .reconcile_rows(
            &plan_sheet(vec![plan_row("OLD", "2025-08-21", (5, 5), (0, 0))]),
            target,
        )
        .unwrap();

    let api = PlanApi::new(env.repo.clone());
    let result = api.reconcile_production_plan(b"definitely not a workbook", target);

    assert!(matches!(result, Err(ApiError::ImportValidationError(_))));
    assert_eq!(count_plans_for(&env.conn, target), 1);
}

#[test]
fn test_list_production_plans_paging_and_filters() {
    let env = Env::new();
    let target = date(2025, 8, 21);
    let rows: Vec<Vec<String>> = (1..=5)
        .map(|i| plan_row(&format!("M00{}", i), "2025-08-21", (i * 10, i), (0, 0)))
        .collect();
    env.reconciler.reconcile_rows(&plan_sheet(rows), target).unwrap();
    env.reconciler
        .reconcile_rows(
            &plan_sheet(vec![plan_row("X001", "2025-08-22", (1, 1), (0, 0))]),
            date(2025, 8, 22),
        )
        .unwrap();

    let api = PlanApi::new(env.repo.clone());

    // 等值过滤 + 分页
    let mut filters = EqFilters::new();
    filters.insert("plan_date".to_string(), SqlParam::Text("2025-08-21".to_string()));
    let page = api
        .list_production_plans(&filters, &[], PageRequest::new(2, 2))
        .unwrap();
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.page_size, 2);
    let codes: Vec<&str> = page.items.iter().map(|r| r.material_code.as_str()).collect();
    assert_eq!(codes, vec!["M003", "M004"]);

    // 导出全部: page_size 等于总数，顺序与分页一致
    let all = api
        .list_production_plans(&BTreeMap::new(), &[], PageRequest::export_all())
        .unwrap();
    assert_eq!(all.pagination.total, 6);
    assert_eq!(all.pagination.page_size, 6);
    assert_eq!(all.items.len(), 6);
    assert_eq!(all.items[0].material_code, "M001");
    assert_eq!(all.items[5].material_code, "X001");

    // 谓词组合
    let matched = api
        .list_production_plans(
            &EqFilters::new(),
            &[predicates::contains("material_code", "X0")],
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(matched.pagination.total, 1);
    assert_eq!(matched.pagination.page_size, 20);

    // 非法列名
    let mut bad = EqFilters::new();
    bad.insert("plan_date; DROP TABLE x".to_string(), SqlParam::Integer(1));
    let result = api.list_production_plans(&bad, &[], PageRequest::default());
    assert!(matches!(result, Err(ApiError::DataAccessError(_))));
}

#[test]
fn test_reconcile_xlsx_payload() {
    let env = Env::new();
    let target = date(2025, 8, 21);
    env.reconciler
        .reconcile_rows(
            &plan_sheet(vec![plan_row("OLD", "2025-08-21", (5, 5), (0, 0))]),
            target,
        )
        .unwrap();
    env.reconciler
        .reconcile_rows(
            &plan_sheet(vec![plan_row("KEEP", "2025-08-22", (5, 5), (0, 0))]),
            date(2025, 8, 22),
        )
        .unwrap();

    let payload = fixture_bytes("plans/daily_plan_20250821.xlsx");
    let api = PlanApi::new(env.repo.clone());
    let report = api
        .reconcile_production_plan_report(&payload, target)
        .expect("对账失败");

    assert_eq!(report.deleted, 1);
    let codes: Vec<&str> = report.rows.iter().map(|r| r.material_code.as_str()).collect();
    assert_eq!(codes, vec!["M1", "M2", "M4"]);

    // 文本日期 + 数值计数；间隔列（未完成数）忽略，以计划 - 实际重新计算
    let m1 = &report.rows[0];
    assert_eq!(m1.part_number, "P1");
    assert_eq!(m1.plan_type, "直流");
    assert_eq!(m1.production_line, "L1");
    assert_eq!(m1.t, HorizonCounts::new(100, 80));
    assert_eq!(m1.t1, HorizonCounts::new(5, 0));
    assert_eq!(m1.t2, HorizonCounts::default());
    assert_eq!(m1.t3, HorizonCounts::default());
    assert_eq!((m1.total_planned, m1.total_inspected, m1.total_unfinished), (105, 80, 25));
    assert_eq!(m1.special_note, "加急");

    // 日期类型单元格
    let m2 = &report.rows[1];
    assert_eq!(m2.plan_date, target);
    assert_eq!(m2.t, HorizonCounts::new(7, 0));
    assert_eq!(m2.t3, HorizonCounts::new(3, 1));
    assert_eq!((m2.total_planned, m2.total_inspected), (10, 1));
    assert_eq!(m2.special_note, "");

    // 两位年份日期 + 文本计数
    let m4 = &report.rows[2];
    assert_eq!(m4.t, HorizonCounts::new(12, 3));

    let skipped: Vec<(usize, &SkipReason)> =
        report.skipped.iter().map(|s| (s.row_index, &s.reason)).collect();
    assert_eq!(skipped.len(), 2);
    assert!(matches!(skipped[0], (3, SkipReason::DateMismatch { .. })));
    assert!(matches!(skipped[1], (5, SkipReason::InsufficientColumns { found: 2 })));

    // 落库结果与返回一致，其他日期不受影响
    assert_eq!(api.plans_for_date(target).unwrap(), report.rows);
    let kept = api.plans_for_date(date(2025, 8, 22)).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].material_code, "KEEP");
}
