// ==========================================
// 电机来料检验数据服务 - SQL 耗时统计
// ==========================================
// 开关:
// - Debug 默认开启；Release 默认关闭
// - VMI_ANALYTICS_PERF_SQL=1 强制开启
// - VMI_ANALYTICS_SLOW_SQL_MS=50 慢 SQL 阈值（毫秒）
// ==========================================

use rusqlite::Connection;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub const PERF_SQL_ENV: &str = "VMI_ANALYTICS_PERF_SQL";
pub const SLOW_SQL_MS_ENV: &str = "VMI_ANALYTICS_SLOW_SQL_MS";

static ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_MS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Default, Clone, Copy)]
struct SqlCounters {
    depth: u32,
    statements: u64,
    slow: u64,
}

thread_local! {
    static COUNTERS: RefCell<SqlCounters> = RefCell::new(SqlCounters::default());
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// 为连接安装 trace/profile 回调
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = env_flag(PERF_SQL_ENV).unwrap_or(cfg!(debug_assertions));
    ENABLED.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    let slow_ms = std::env::var(SLOW_SQL_MS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
    SLOW_MS.store(slow_ms, Ordering::Relaxed);

    conn.trace(Some(on_statement));
    conn.profile(Some(on_profile));
}

fn on_statement(_sql: &str) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    COUNTERS.with(|c| {
        let mut c = c.borrow_mut();
        if c.depth > 0 {
            c.statements = c.statements.saturating_add(1);
        }
    });
}

fn on_profile(sql: &str, duration: Duration) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let ms = duration.as_millis() as u64;
    let threshold = SLOW_MS.load(Ordering::Relaxed);
    if threshold == 0 || ms < threshold {
        return;
    }

    let compact: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    let shown: String = compact.chars().take(400).collect();
    tracing::warn!(target: "slow_sql", duration_ms = ms, sql = %shown, "慢 SQL");

    COUNTERS.with(|c| {
        let mut c = c.borrow_mut();
        if c.depth > 0 {
            c.slow = c.slow.saturating_add(1);
        }
    });
}

/// 操作耗时 Guard：drop 时输出 elapsed_ms + SQL 语句数 + 慢 SQL 数
///
/// ```ignore
/// let _perf = vmi_analytics::perf::OpTimer::start("quality_stats");
/// ```
pub struct OpTimer {
    op: &'static str,
    started: Instant,
    baseline: SqlCounters,
}

impl OpTimer {
    pub fn start(op: &'static str) -> Self {
        let baseline = COUNTERS.with(|c| {
            let mut c = c.borrow_mut();
            c.depth = c.depth.saturating_add(1);
            *c
        });
        Self {
            op,
            started: Instant::now(),
            baseline,
        }
    }
}

impl Drop for OpTimer {
    fn drop(&mut self) {
        let now = COUNTERS.with(|c| {
            let mut c = c.borrow_mut();
            c.depth = c.depth.saturating_sub(1);
            *c
        });

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            sql_count = now.statements.saturating_sub(self.baseline.statements),
            slow_sql_count = now.slow.saturating_sub(self.baseline.slow),
            "done"
        );
    }
}
