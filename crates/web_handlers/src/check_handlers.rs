use actix_web::{HttpResponse, Result, web};
use campground_scan::{CheckerConfig, DateWindow, ScanError, ScanExecutor};
use serde::Deserialize;

/// Shared, read-only state of the check endpoint
pub struct CheckState {
    /// Executor running the checks and notifications
    pub executor: ScanExecutor,
    /// Startup configuration (check key)
    pub config: CheckerConfig,
}

/// Query string of `GET /check/{park_id}`
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    /// Shared secret
    pub key: Option<String>,
    /// First night, YYYY-MM-DD
    #[serde(default)]
    pub start_date: String,
    /// Check-out day, YYYY-MM-DD
    #[serde(default)]
    pub end_date: String,
}

/// Checks one campground and returns the result as plain text.
///
/// The key is checked before anything else. When sites are available the
/// configured notifier is called before the response is sent.
pub async fn check_park(
    state: web::Data<CheckState>,
    path: web::Path<String>,
    query: web::Query<CheckQuery>,
) -> Result<HttpResponse, ScanError> {
    let raw_park_id = path.into_inner();

    if let Err(e) = state.config.authorize(query.key.as_deref()) {
        log::warn!("🚫 Rejected check for {}: bad key", raw_park_id);
        return Err(e);
    }

    let park_id = parse_park_id(&raw_park_id)?;

    let window = DateWindow::parse(&query.start_date, &query.end_date)?;
    log::info!(
        "🔍 Checking {} from {} to {}",
        park_id,
        window.start,
        window.end
    );

    let report = state.executor.scan_campgrounds(&[park_id], &window).await?;

    if let Some(delivery_id) = state.executor.notify(&report, None).await? {
        log::info!("📧 Notification sent for {}: {}", park_id, delivery_id);
    }

    let body = format!("{}\n{}", report.lines().join("\n"), report.summary());

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body))
}

fn parse_park_id(raw: &str) -> Result<u64, ScanError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ScanError::InvalidParkId(raw.to_string()))
}

/// Liveness probe
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().body("OK"))
}

/// Registers the check and health routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/check/{park_id}", web::get().to(check_park))
        .route("/health", web::get().to(health));
}
