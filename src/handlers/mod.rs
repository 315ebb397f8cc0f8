pub mod index;
pub mod logs;
pub mod status;

use actix_web::web;

/// Registers the dashboard routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index::index))
        .route("/api/logs", web::get().to(logs::get_logs))
        .route("/api/status", web::get().to(status::get_status));
}
