use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One-line rendering of a record for terminal listings.
pub trait ListingRow {
    fn row(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyRef>,
    pub location: String,
    pub salary: u64,
    #[serde(default)]
    pub quantity: u32,
    pub level: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingRow for Job {
    fn row(&self) -> String {
        let company = self.company.as_ref().map(|c| c.name.as_str()).unwrap_or("-");
        format!(
            "{:<32} {:<18} {:<10} {:<10} {:>12}",
            self.name,
            company,
            self.level,
            self.location,
            format_salary(self.salary)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingRow for Company {
    fn row(&self) -> String {
        format!("{:<28} {}", self.name, self.address)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingRow for User {
    fn row(&self) -> String {
        format!("{:<24} {:<32} {}", self.name, self.email, self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub url: String,
    pub status: String,
    #[serde(default)]
    pub company_id: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingRow for Resume {
    fn row(&self) -> String {
        format!("{:<32} {:<10} {}", self.email, self.status, self.url)
    }
}

/// `1234567` -> `1,234,567`.
pub fn format_salary(salary: u64) -> String {
    let digits = salary.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_grouping() {
        assert_eq!(format_salary(0), "0");
        assert_eq!(format_salary(999), "999");
        assert_eq!(format_salary(1000), "1,000");
        assert_eq!(format_salary(25_000_000), "25,000,000");
    }

    #[test]
    fn job_reads_backend_shape() {
        let raw = serde_json::json!({
            "_id": "6651",
            "name": "Backend Engineer",
            "skills": ["Rust", "PostgreSQL"],
            "company": { "_id": "c1", "name": "Ferris Labs" },
            "location": "HANOI",
            "salary": 3000,
            "quantity": 2,
            "level": "SENIOR",
            "description": "<p>Build things</p>",
            "isActive": true,
            "updatedAt": "2024-05-01T10:00:00Z"
        });

        let job: Job = serde_json::from_value(raw).unwrap();
        assert_eq!(job.id, "6651");
        assert_eq!(job.company.as_ref().unwrap().name, "Ferris Labs");
        assert!(job.is_active);
        assert!(job.updated_at.is_some());
        assert!(job.row().contains("Ferris Labs"));
    }
}
