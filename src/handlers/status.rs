// src/handlers/status.rs
use actix_web::{web, HttpResponse};

use crate::storage::memory::HeartbeatLog;

pub async fn get_status(log: web::Data<HeartbeatLog>) -> HttpResponse {
    HttpResponse::Ok().json(log.status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::models::heartbeat::HeartbeatLevel;
    use crate::storage::memory::HeartbeatSink;

    #[actix_web::test]
    async fn reports_running_state_and_count() {
        let log = web::Data::new(HeartbeatLog::new(10));
        let app = test::init_service(
            App::new()
                .app_data(log.clone())
                .route("/api/status", web::get().to(get_status)),
        )
        .await;

        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status").to_request()).await;
        assert_eq!(body, json!({"status": "stopped", "last_update": null, "logs_count": 0}));

        log.set_running(true);
        log.record(HeartbeatLevel::Info, "tick".into());
        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status").to_request()).await;
        assert_eq!(body["status"], "running");
        assert_eq!(body["logs_count"], 1);
        assert!(body["last_update"].is_string());
    }
}
