// ==========================================
// 电机来料检验数据服务 - 命令行入口
// ==========================================
// 用法:
//   vmi-analytics [db_path] stats <start YYYY-MM-DD> <end YYYY-MM-DD>
//   vmi-analytics [db_path] import-plan <xlsx_path> [target YYYY-MM-DD]
//   vmi-analytics [db_path] plans <YYYY-MM-DD>
// 省略 db_path 时使用 VMI_ANALYTICS_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use vmi_analytics::app::{get_default_db_path, AppState};
use vmi_analytics::logging;

const USAGE: &str = "用法:
  vmi-analytics [db_path] stats <start> <end>
  vmi-analytics [db_path] import-plan <xlsx_path> [target_date]
  vmi-analytics [db_path] plans <plan_date>";

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("日期格式错误（期望 YYYY-MM-DD）: {}", raw))
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let db_path = match args.first().map(String::as_str) {
        Some("stats") | Some("import-plan") | Some("plans") | None => get_default_db_path(),
        Some(_) => args.remove(0),
    };

    let command = args.first().cloned().ok_or_else(|| anyhow!(USAGE))?;

    tracing::info!("{} 版本: {}", vmi_analytics::APP_NAME, vmi_analytics::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "stats" => {
            let (start, end) = match (args.get(1), args.get(2)) {
                (Some(s), Some(e)) => (parse_date(s)?, parse_date(e)?),
                _ => bail!(USAGE),
            };
            let view = state.quality_api.compute_quality_stats_for_days(start, end)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        "import-plan" => {
            let file = args.get(1).ok_or_else(|| anyhow!(USAGE))?;
            let target = match args.get(2) {
                Some(raw) => parse_date(raw)?,
                None => chrono::Local::now().date_naive(),
            };
            let payload =
                std::fs::read(file).with_context(|| format!("无法读取文件: {}", file))?;

            let report = state
                .plan_api
                .reconcile_production_plan_report(&payload, target)?;
            for skipped in &report.skipped {
                println!("skip row {}: {}", skipped.row_index, skipped.reason);
            }
            println!(
                "run_id={} target_date={} deleted={} inserted={}",
                report.run_id,
                report.target_date,
                report.deleted,
                report.rows.len()
            );
        }
        "plans" => {
            let plan_date = parse_date(args.get(1).ok_or_else(|| anyhow!(USAGE))?)?;
            let plans = state.plan_api.plans_for_date(plan_date)?;
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}
