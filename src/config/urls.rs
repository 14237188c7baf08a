//! Project and release URLs
//!
//! All locations can be overridden through environment variables so the same
//! binary serves different course editions.

use chrono::Datelike;

/// GitHub organization hosting the course material
pub const DEFAULT_ORG: &str = "courseup";

/// Default repository queried by the `release` subcommand
pub const DEFAULT_RELEASE_REPO: &str = "courseup/assets";

/// GitHub API base URL
pub const GITHUB_API: &str = "https://api.github.com";

/// Current semester identifier (`SEMESTER` env var, else the current year)
pub fn semester() -> String {
    std::env::var("SEMESTER").unwrap_or_else(|_| chrono::Utc::now().year().to_string())
}

/// Course name, which is also the checkout directory name
pub fn course_name() -> String {
    std::env::var("COURSE_NAME").unwrap_or_else(|_| format!("course_{}", semester()))
}

/// Course project URL on GitHub
pub fn project_url() -> String {
    std::env::var("COURSE_PROJECT")
        .unwrap_or_else(|_| format!("https://github.com/{}/{}", DEFAULT_ORG, course_name()))
}

/// Source archive URL for the project's main branch
pub fn archive_url(project: &str) -> String {
    format!("{project}/archive/main.zip")
}

/// Clone URL for the project
pub fn clone_url(project: &str) -> String {
    format!("{project}.git")
}

/// Releases API URL for one page of results
pub fn releases_url(repo: &str, page: u32, per_page: u32) -> String {
    format!("{GITHUB_API}/repos/{repo}/releases?page={page}&per_page={per_page}")
}
