//! Release selection
//!
//! Lists a repository's GitHub releases and picks the newest one whose tag
//! matches the strict `vMAJOR[.MINOR[.PATCH]][-label]` pattern, optionally
//! narrowed by a version prefix and a label regex. Selection is the maximum
//! by parsed semantic version.

use regex::Regex;
use semver::Version;
use serde::Deserialize;

use crate::config::urls;
use crate::error::ReleaseError;

/// Page size for the releases API
const RELEASES_PER_PAGE: u32 = 100;

/// Strict tag shape accepted for selection
const TAG_PATTERN: &str = r"^(v\d+(?:\.\d+){0,2})(?:-(.+))?$";

/// One release as returned by the GitHub API
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Git tag of the release
    pub tag_name: String,
    /// Downloadable assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable asset of a release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset file name
    pub name: String,
    /// Direct download URL
    pub browser_download_url: String,
}

/// A release tag broken into its version and optional label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    /// The `vX[.Y[.Z]]` portion, including the leading `v`
    pub tag_version: String,
    /// Parsed version, missing components padded with zeros
    pub version: Version,
    /// Trailing `-label`, if any
    pub label: Option<String>,
}

/// Parse a tag of the form `vMAJOR[.MINOR[.PATCH]][-label]`
///
/// Returns `None` for tags that do not match the strict pattern; those are
/// simply not eligible for selection.
pub fn parse_tag(tag: &str) -> Option<ParsedTag> {
    // The pattern is a constant; compilation cannot fail
    let re = Regex::new(TAG_PATTERN).ok()?;
    let caps = re.captures(tag)?;
    let tag_version = caps.get(1)?.as_str().to_string();
    let label = caps.get(2).map(|m| m.as_str().to_string());
    let version = lenient_version(&tag_version[1..])?;
    Some(ParsedTag {
        tag_version,
        version,
        label,
    })
}

/// Parse `X`, `X.Y`, or `X.Y.Z` into a full semver version
fn lenient_version(text: &str) -> Option<Version> {
    let mut parts: Vec<&str> = text.split('.').collect();
    while parts.len() < 3 {
        parts.push("0");
    }
    Version::parse(&parts.join(".")).ok()
}

/// Compile a user-supplied label filter, anchored at the start
pub fn compile_label_filter(pattern: &str) -> Result<Regex, ReleaseError> {
    Regex::new(&format!("^(?:{pattern})")).map_err(|e| ReleaseError::InvalidPattern {
        pattern: pattern.to_string(),
        error: e.to_string(),
    })
}

/// Select the latest release passing the filters
///
/// `version_prefix` matches against the `vX[.Y[.Z]]` tag portion; the label
/// filter restricts selection to label-bearing tags whose label matches.
pub fn select_latest<'a>(
    releases: &'a [Release],
    version_prefix: Option<&str>,
    label_filter: Option<&Regex>,
) -> Option<&'a Release> {
    releases
        .iter()
        .filter_map(|release| {
            let parsed = parse_tag(&release.tag_name)?;
            if let Some(prefix) = version_prefix {
                if !parsed.tag_version.starts_with(prefix) {
                    return None;
                }
            }
            if let Some(filter) = label_filter {
                match &parsed.label {
                    Some(label) if filter.is_match(label) => {}
                    _ => return None,
                }
            }
            Some((parsed.version, release))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, release)| release)
}

/// Fetch all releases of a repository, following pagination
pub async fn fetch_releases(
    client: &reqwest::Client,
    repo: &str,
) -> Result<Vec<Release>, ReleaseError> {
    let mut releases = Vec::new();
    let mut page = 1;

    loop {
        let url = urls::releases_url(repo, page, RELEASES_PER_PAGE);
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| ReleaseError::Api {
                url: url.clone(),
                error: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(ReleaseError::Api {
                url,
                error: format!("HTTP {}", response.status()),
            });
        }
        let batch: Vec<Release> = response.json().await.map_err(|e| ReleaseError::Api {
            url,
            error: e.to_string(),
        })?;
        if batch.is_empty() {
            break;
        }
        releases.extend(batch);
        page += 1;
    }

    Ok(releases)
}
