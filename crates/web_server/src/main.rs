//! Main entry point for the campsite checker HTTP service.
//! This crate serves `GET /check/{park_id}` and a health probe.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use campground_scan::{CheckerConfig, ScanExecutor};
use notification_services::{NotificationConfig, build_notifier};
use rec_gov::RecGovClient;
use web_handlers::{CheckState, configure};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting campsite checker server...");

    let config = CheckerConfig::from_env();
    if let Err(e) = config.require_check_key() {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }

    let notification_config = match NotificationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid notification settings: {}", e);
            std::process::exit(1);
        }
    };

    let notifier = match build_notifier(&notification_config, &notification_config.channels).await
    {
        Ok(notifier) => notifier,
        Err(e) => {
            log::error!("❌ Failed to initialize notifications: {}", e);
            log::warn!("🔧 Check AWS credentials and notification settings");
            std::process::exit(1);
        }
    };
    if notifier.is_none() {
        log::warn!("🔕 No notification channel configured, results are only returned");
    }

    let client = match RecGovClient::new(&config.base_url) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to create recreation.gov client: {}", e);
            std::process::exit(1);
        }
    };

    let bind_address = config.bind_address.clone();
    let state = web::Data::new(CheckState {
        executor: ScanExecutor::new(Arc::new(client), notifier, None),
        config,
    });

    log::info!("🌐 Server will be available at: http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
