use axum::Json;
use serde::Serialize;

use crate::models::Resource;

#[derive(Serialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = RootResponse)
    ),
    tag = "General"
)]
pub async fn root() -> Json<RootResponse> {
    let resources = [
        Resource::Jobs,
        Resource::Companies,
        Resource::Users,
        Resource::Resumes,
    ];
    let endpoints = resources
        .iter()
        .map(Resource::list_path)
        .chain(
            resources
                .iter()
                .map(|r| format!("{}/{{id}}", r.list_path())),
        )
        .chain(["/swagger-ui".to_string()])
        .collect();

    Json(RootResponse {
        message: "Job board list backend".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}
