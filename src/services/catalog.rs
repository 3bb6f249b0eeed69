use std::cmp::Ordering;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::AppError;
use crate::models::query::{Predicate, QueryState, SortKey};
use crate::models::{Company, CompanyRef, Job, Resume, User};
use crate::pagination::PaginatedResponse;

const JOB_TITLES: &[&str] = &[
    "Backend Engineer",
    "Frontend Developer",
    "Fullstack Developer",
    "Data Engineer",
    "DevOps Engineer",
    "Mobile Developer",
    "QA Engineer",
    "Product Designer",
    "Embedded Engineer",
    "Site Reliability Engineer",
];
const SKILLS: &[&str] = &["Rust", "React", "Go", "Java", "PostgreSQL", "Kubernetes", "TypeScript"];
const LEVELS: &[&str] = &["INTERN", "FRESHER", "JUNIOR", "MIDDLE", "SENIOR"];
const LOCATIONS: &[&str] = &["HANOI", "HOCHIMINH", "DANANG", "OTHER"];
const COMPANY_NAMES: &[&str] = &[
    "Ferris Labs",
    "Crab Systems",
    "Oxide Works",
    "Borrow Checker Inc",
    "Lifetime Logistics",
    "Tokio Trading",
    "Serde Studio",
    "Cargo Freight",
    "Clippy Consulting",
    "Rayon Robotics",
    "Axum Analytics",
    "Tower Telecom",
];
const RESUME_STATUSES: &[&str] = &["PENDING", "REVIEWING", "APPROVED", "REJECTED"];

/// In-memory records served by the bundled list backend.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub jobs: Vec<Job>,
    pub companies: Vec<Company>,
    pub users: Vec<User>,
    pub resumes: Vec<Resume>,
}

fn seed_time(offset_minutes: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    base + Duration::minutes(offset_minutes)
}

impl Catalog {
    /// Deterministic sample data: 95 jobs, 12 companies, 30 users and 40
    /// resumes. Later records carry later `updatedAt` values.
    pub fn seeded() -> Self {
        let companies: Vec<Company> = COMPANY_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| Company {
                id: format!("company-{:02}", i + 1),
                name: name.to_string(),
                address: format!("{} {}", 10 + i, LOCATIONS[i % LOCATIONS.len()]),
                logo: format!("{}.png", name.to_lowercase().replace(' ', "-")),
                description: format!("{name} builds dependable software."),
                created_at: Some(seed_time(i as i64)),
                updated_at: Some(seed_time(60 * i as i64)),
            })
            .collect();

        let jobs = (0..95usize)
            .map(|i| {
                let company = &companies[i % companies.len()];
                Job {
                    id: format!("job-{:03}", i + 1),
                    name: format!("{} #{}", JOB_TITLES[i % JOB_TITLES.len()], i + 1),
                    skills: vec![
                        SKILLS[i % SKILLS.len()].to_string(),
                        SKILLS[(i + 3) % SKILLS.len()].to_string(),
                    ],
                    company: Some(CompanyRef {
                        id: company.id.clone(),
                        name: company.name.clone(),
                        logo: Some(company.logo.clone()),
                    }),
                    location: LOCATIONS[i % LOCATIONS.len()].to_string(),
                    salary: 1_000 + (i as u64 * 250) % 4_000,
                    quantity: 1 + (i as u32 % 5),
                    level: LEVELS[i % LEVELS.len()].to_string(),
                    description: format!("Opening number {}", i + 1),
                    is_active: i % 7 != 0,
                    start_date: Some(seed_time(i as i64 * 1_440)),
                    end_date: Some(seed_time(i as i64 * 1_440 + 43_200)),
                    created_at: Some(seed_time(i as i64)),
                    updated_at: Some(seed_time(10 * i as i64)),
                }
            })
            .collect();

        let users = (0..30usize)
            .map(|i| User {
                id: format!("user-{:02}", i + 1),
                name: format!("User {}", i + 1),
                email: format!("user{}@jobboard.dev", i + 1),
                age: Some(20 + (i as u32 % 25)),
                role: if i % 10 == 0 { "ADMIN" } else { "USER" }.to_string(),
                company: None,
                created_at: Some(seed_time(i as i64)),
                updated_at: Some(seed_time(5 * i as i64)),
            })
            .collect();

        let resumes = (0..40usize)
            .map(|i| Resume {
                id: format!("resume-{:02}", i + 1),
                email: format!("user{}@jobboard.dev", i % 30 + 1),
                url: format!("resume-{}.pdf", i + 1),
                status: RESUME_STATUSES[i % RESUME_STATUSES.len()].to_string(),
                company_id: companies[i % companies.len()].id.clone(),
                job_id: format!("job-{:03}", i % 95 + 1),
                created_at: Some(seed_time(i as i64)),
                updated_at: Some(seed_time(3 * i as i64)),
            })
            .collect();

        Self {
            jobs,
            companies,
            users,
            resumes,
        }
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|company| company.id == id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn resume(&self, id: &str) -> Option<&Resume> {
        self.resumes.iter().find(|resume| resume.id == id)
    }
}

/// Render a top-level JSON field the way a filter predicate sees it.
fn field_text(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(map) => map.get("name").and_then(|v| v.as_str()).map(str::to_string),
        Value::Null => None,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Greater,
        (_, Some(Value::Null) | None) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn sort_records<T>(records: &mut [(Value, T)], sort: &SortKey) {
    records.sort_by(|(a, _), (b, _)| {
        let (a, b) = (a.get(&sort.field), b.get(&sort.field));
        let missing = |v: Option<&Value>| v.map_or(true, Value::is_null);
        // Records without the field go last in both directions.
        match (missing(a), missing(b)) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ if sort.descending => compare_values(b, a),
            _ => compare_values(a, b),
        }
    });
}

/// Filter, sort and slice one listing.
pub fn paginate<T>(records: &[T], query: &QueryState) -> Result<PaginatedResponse<T>, AppError>
where
    T: Serialize + Clone,
{
    if query.page_size == 0 {
        return Err(AppError::BadRequest("pageSize must be at least 1".to_string()));
    }

    let predicates: Vec<(&str, Predicate)> = query.predicates().collect();

    let mut matching = Vec::new();
    for record in records {
        let value = serde_json::to_value(record)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        let keep = predicates.iter().all(|(field, predicate)| {
            field_text(&value, field).is_some_and(|text| predicate.matches(&text))
        });
        if keep {
            matching.push((value, record));
        }
    }

    if let Some(sort) = &query.sort {
        sort_records(&mut matching, sort);
    }

    let total = matching.len() as u64;
    let current = query.current.max(1);
    let start = ((current - 1).saturating_mul(query.page_size)).min(total) as usize;
    let page_len = usize::try_from(query.page_size).unwrap_or(usize::MAX);
    let end = start.saturating_add(page_len).min(matching.len());

    let result: Vec<T> = matching[start..end]
        .iter()
        .map(|(_, record)| (*record).clone())
        .collect();

    debug!(total, current, page_size = query.page_size, returned = result.len(), "paginated listing");

    Ok(PaginatedResponse::new(result, total, current, query.page_size))
}
