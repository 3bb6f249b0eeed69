use std::fmt;

use clap::ValueEnum;

/// Listing endpoints exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Resource {
    Jobs,
    Companies,
    Users,
    Resumes,
}

impl Resource {
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Jobs => "jobs",
            Resource::Companies => "companies",
            Resource::Users => "users",
            Resource::Resumes => "resumes",
        }
    }

    pub fn list_path(&self) -> String {
        format!("/api/v1/{}", self.name())
    }

    /// Back-office resources; the backend wants a bearer token for these.
    pub fn is_admin_only(&self) -> bool {
        matches!(self, Resource::Users | Resource::Resumes)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
