mod home;
mod listings;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::middleware::auth::require_bearer;
use crate::services::catalog::Catalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(catalog: Catalog, config: &Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            admin_token: config.admin_token.clone(),
        }
    }
}

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        listings::list_jobs,
        listings::get_job,
        listings::list_companies,
        listings::get_company,
        listings::list_users,
        listings::get_user,
        listings::list_resumes,
        listings::get_resume,
    ),
    components(
        schemas(
            home::RootResponse,
            crate::pagination::PageMeta,
            crate::models::Job,
            crate::models::CompanyRef,
            crate::models::Company,
            crate::models::User,
            crate::models::Resume,
        )
    ),
    tags(
        (name = "General", description = "General API information"),
        (name = "Listings", description = "Public paginated listings"),
        (name = "Back Office", description = "Paginated listings for administrators")
    ),
    info(
        title = "Job Board List API",
        version = "0.1.0",
        description = "Paginated list endpoints: `current`, `pageSize`, `sort` (leading `-` for descending) and free-form filter keys",
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

// Add security scheme for bearer tokens
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(
                utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                ),
            ),
        );
    }
}

pub fn create_routes(state: AppState) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    // Back-office listings behind the admin token
    let admin_routes = Router::new()
        .route("/api/v1/users", get(listings::list_users))
        .route("/api/v1/users/{id}", get(listings::get_user))
        .route("/api/v1/resumes", get(listings::list_resumes))
        .route("/api/v1/resumes/{id}", get(listings::get_resume))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/api/v1/jobs", get(listings::list_jobs))
        .route("/api/v1/jobs/{id}", get(listings::get_job))
        .route("/api/v1/companies", get(listings::list_companies))
        .route("/api/v1/companies/{id}", get(listings::get_company))
        .merge(admin_routes)
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the process is stopped.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("List backend listening on {}", addr);
    }
    axum::serve(listener, create_routes(state)).await
}
