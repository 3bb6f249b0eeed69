use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::error::AppError;
use crate::models::{Company, Job, QueryState, Resource, Resume, User};
use crate::pagination::{BackendResponse, PaginatedResponse, Pagination};
use crate::routes::AppState;
use crate::services::catalog::paginate;

type ListResult<T> = Result<Json<BackendResponse<PaginatedResponse<T>>>, AppError>;

fn respond<T>(resource: Resource, records: &[T], raw_query: Option<String>) -> ListResult<T>
where
    T: Serialize + Clone,
{
    let query = QueryState::parse(raw_query.as_deref().unwrap_or_default());
    let page = paginate(records, &query)?;

    info!(
        "Listings | GET {} | current={} | pageSize={} | total={} | res=200",
        resource.list_path(),
        page.meta.current,
        page.meta.page_size,
        page.meta.total
    );

    Ok(Json(BackendResponse::ok(format!("Fetch {resource}"), page)))
}

type ItemResult<T> = Result<Json<BackendResponse<T>>, AppError>;

fn found<T: Clone>(resource: Resource, label: &str, id: &str, record: Option<&T>) -> ItemResult<T> {
    let record = record
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("{label} {id} not found")))?;

    info!("Listings | GET {}/{} | res=200", resource.list_path(), id);
    Ok(Json(BackendResponse::ok(
        format!("Fetch a {} by id", label.to_lowercase()),
        record,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    tag = "Listings",
    params(Pagination),
    responses(
        (status = 200, description = "One page of jobs", body = BackendResponse<PaginatedResponse<Job>>),
        (status = 400, description = "Invalid pagination parameters")
    )
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ListResult<Job> {
    respond(Resource::Jobs, &state.catalog.jobs, query)
}

#[utoipa::path(
    get,
    path = "/api/v1/companies",
    tag = "Listings",
    params(Pagination),
    responses(
        (status = 200, description = "One page of companies", body = BackendResponse<PaginatedResponse<Company>>),
        (status = 400, description = "Invalid pagination parameters")
    )
)]
pub async fn list_companies(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ListResult<Company> {
    respond(Resource::Companies, &state.catalog.companies, query)
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    tag = "Listings",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job details", body = BackendResponse<Job>),
        (status = 404, description = "Job not found")
    )
)]
pub async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> ItemResult<Job> {
    found(Resource::Jobs, "Job", &id, state.catalog.job(&id))
}

#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}",
    tag = "Listings",
    params(
        ("id" = String, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company details", body = BackendResponse<Company>),
        (status = 404, description = "Company not found")
    )
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ItemResult<Company> {
    found(Resource::Companies, "Company", &id, state.catalog.company(&id))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Back Office",
    params(Pagination),
    responses(
        (status = 200, description = "One page of users", body = BackendResponse<PaginatedResponse<User>>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ListResult<User> {
    respond(Resource::Users, &state.catalog.users, query)
}

#[utoipa::path(
    get,
    path = "/api/v1/resumes",
    tag = "Back Office",
    params(Pagination),
    responses(
        (status = 200, description = "One page of resumes", body = BackendResponse<PaginatedResponse<Resume>>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_resumes(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ListResult<Resume> {
    respond(Resource::Resumes, &state.catalog.resumes, query)
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Back Office",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = BackendResponse<User>),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ItemResult<User> {
    found(Resource::Users, "User", &id, state.catalog.user(&id))
}

#[utoipa::path(
    get,
    path = "/api/v1/resumes/{id}",
    tag = "Back Office",
    params(
        ("id" = String, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Resume details", body = BackendResponse<Resume>),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Resume not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_resume(State(state): State<AppState>, Path(id): Path<String>) -> ItemResult<Resume> {
    found(Resource::Resumes, "Resume", &id, state.catalog.resume(&id))
}
