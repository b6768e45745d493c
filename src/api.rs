//! HTTP routes

use actix_web::{get, options, web, Error, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::service::{list_projects_service, preflight_response};

#[get("/list_projects")]
pub async fn list_projects(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    list_projects_service(req, app_state).await
}

#[options("/list_projects")]
pub async fn list_projects_preflight() -> HttpResponse {
    preflight_response()
}
