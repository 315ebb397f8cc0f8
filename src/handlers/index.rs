// src/handlers/index.rs
use actix_web::HttpResponse;

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(DASHBOARD_HTML)
}
