// server/src/web/routes.rs

use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(web::scope("/design-requests").route(
        "/{design_request_id}/approve",
        web::post().to(crate::web::handlers::approval_handlers::approve_design_request_handler),
      ))
      .service(web::scope("/payments").route(
        "/split",
        web::post().to(crate::web::handlers::payment_handlers::split_payment_handler),
      ))
      .service(web::scope("/webhooks").route(
        "/payments",
        web::post().to(crate::web::handlers::webhook_handlers::payment_webhook_handler),
      ))
      .service(web::scope("/teams").route(
        "/{team_id}/progress",
        web::get().to(crate::web::handlers::progress_handlers::team_progress_handler),
      )),
  );
}
