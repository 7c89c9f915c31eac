//! Research profiles and their derived publication metrics.
//!
//! `total_publications` and `total_citations` are a pure function of the
//! publication list. They are recomputed on decode, after every publication
//! mutation and before every save; a stored aggregate is never trusted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EmailAddress;

/// Largest publication PDF accepted for upload.
pub const PUBLICATION_PDF_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// One publication entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Publication title.
    pub title: String,
    /// Author list as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    /// Journal or conference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Publication year, as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    /// Citation count; the backend stores strings, numbers or null.
    #[serde(default)]
    pub citations: Value,
    /// DOI or external link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Uploaded PDF location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    /// Uploaded PDF original file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Publication {
    /// Publication with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Citation count read with `parseInt` semantics; unreadable values count as 0.
    pub fn citation_count(&self) -> i64 {
        citation_count(&self.citations)
    }
}

/// Read a citation value the way `parseInt(value) || 0` would.
///
/// Strings contribute their leading integer (after optional whitespace and
/// sign); numbers are truncated toward zero; anything else is 0.
///
/// # Examples
/// ```
/// use portal::domain::citation_count;
/// use serde_json::json;
///
/// assert_eq!(citation_count(&json!("12")), 12);
/// assert_eq!(citation_count(&json!(" 7 citations")), 7);
/// assert_eq!(citation_count(&json!(4.9)), 4);
/// assert_eq!(citation_count(&json!("n/a")), 0);
/// assert_eq!(citation_count(&json!(null)), 0);
/// ```
pub fn citation_count(value: &Value) -> i64 {
    match value {
        Value::String(text) => leading_integer(text),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate_finite))
            .unwrap_or(0),
        _ => 0,
    }
}

fn truncate_finite(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    // Out-of-range magnitudes saturate.
    let saturated = if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    };
    Some(
        format!("{:.0}", value.trunc())
            .parse::<i64>()
            .unwrap_or(saturated),
    )
}

fn leading_integer(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };
    let mut total: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        total = total
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }
    if negative { -total } else { total }
}

/// An ongoing research project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchProject {
    /// Project title.
    pub title: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Funding body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<String>,
    /// Start date as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

/// An award or other achievement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Achievement title.
    pub title: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Year or date as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Error raised when a list position does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no entry at position {index} (list has {len})")]
pub struct EntryIndexError {
    /// Requested position.
    pub index: usize,
    /// List length at the time.
    pub len: usize,
}

/// A researcher's profile.
///
/// ## Invariants
/// - `total_publications() == publications().len()`.
/// - `total_citations()` is the sum of [`Publication::citation_count`].
///
/// Both hold after construction, decode, and every mutation below.
///
/// # Examples
/// ```
/// use portal::domain::{EmailAddress, Publication, ResearchProfile};
/// use serde_json::json;
///
/// let email = EmailAddress::new("ada@example.edu").unwrap();
/// let mut profile = ResearchProfile::empty(email);
/// profile.add_publication(Publication { citations: json!("3"), ..Publication::titled("A") });
/// profile.add_publication(Publication { citations: json!("5"), ..Publication::titled("B") });
/// profile.add_publication(Publication::titled("C"));
/// assert_eq!(profile.total_publications(), 3);
/// assert_eq!(profile.total_citations(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ResearchProfileDto", into = "ResearchProfileDto")]
pub struct ResearchProfile {
    email: EmailAddress,
    research_areas: Vec<String>,
    publications: Vec<Publication>,
    ongoing_projects: Vec<ResearchProject>,
    achievements: Vec<Achievement>,
    total_publications: usize,
    total_citations: i64,
}

impl ResearchProfile {
    /// A profile with no entries.
    pub fn empty(email: EmailAddress) -> Self {
        Self {
            email,
            research_areas: Vec::new(),
            publications: Vec::new(),
            ongoing_projects: Vec::new(),
            achievements: Vec::new(),
            total_publications: 0,
            total_citations: 0,
        }
    }

    /// Recompute derived metrics from the publication list. Idempotent.
    pub fn sync_metrics(&mut self) {
        self.total_publications = self.publications.len();
        self.total_citations = self
            .publications
            .iter()
            .map(Publication::citation_count)
            .fold(0_i64, i64::saturating_add);
    }

    /// Owner email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Research areas.
    pub fn research_areas(&self) -> &[String] {
        &self.research_areas
    }

    /// Publications in display order.
    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    /// Ongoing projects.
    pub fn ongoing_projects(&self) -> &[ResearchProject] {
        &self.ongoing_projects
    }

    /// Achievements.
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Number of publications.
    pub fn total_publications(&self) -> usize {
        self.total_publications
    }

    /// Sum of citation counts.
    pub fn total_citations(&self) -> i64 {
        self.total_citations
    }

    /// Append a publication.
    pub fn add_publication(&mut self, publication: Publication) {
        self.publications.push(publication);
        self.sync_metrics();
    }

    /// Replace the publication at `index`.
    pub fn update_publication(
        &mut self,
        index: usize,
        publication: Publication,
    ) -> Result<(), EntryIndexError> {
        let len = self.publications.len();
        let slot = self
            .publications
            .get_mut(index)
            .ok_or(EntryIndexError { index, len })?;
        *slot = publication;
        self.sync_metrics();
        Ok(())
    }

    /// Remove and return the publication at `index`.
    pub fn remove_publication(&mut self, index: usize) -> Result<Publication, EntryIndexError> {
        let len = self.publications.len();
        if index >= len {
            return Err(EntryIndexError { index, len });
        }
        let removed = self.publications.remove(index);
        self.sync_metrics();
        Ok(removed)
    }

    /// Record an uploaded PDF against the publication at `index`.
    pub fn attach_pdf(
        &mut self,
        index: usize,
        pdf_url: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Result<(), EntryIndexError> {
        let len = self.publications.len();
        let publication = self
            .publications
            .get_mut(index)
            .ok_or(EntryIndexError { index, len })?;
        publication.pdf_url = Some(pdf_url.into());
        publication.file_name = Some(file_name.into());
        self.sync_metrics();
        Ok(())
    }

    /// Add a research area unless an equal one (ignoring case) exists.
    /// Returns whether the list changed.
    pub fn add_research_area(&mut self, area: &str) -> bool {
        let area = area.trim();
        if area.is_empty()
            || self
                .research_areas
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(area))
        {
            return false;
        }
        self.research_areas.push(area.to_owned());
        true
    }

    /// Remove a research area (ignoring case). Returns whether it existed.
    pub fn remove_research_area(&mut self, area: &str) -> bool {
        let before = self.research_areas.len();
        self.research_areas
            .retain(|existing| !existing.eq_ignore_ascii_case(area.trim()));
        before != self.research_areas.len()
    }

    /// Append an ongoing project.
    pub fn add_project(&mut self, project: ResearchProject) {
        self.ongoing_projects.push(project);
    }

    /// Remove the project at `index`.
    pub fn remove_project(&mut self, index: usize) -> Result<ResearchProject, EntryIndexError> {
        remove_at(&mut self.ongoing_projects, index)
    }

    /// Append an achievement.
    pub fn add_achievement(&mut self, achievement: Achievement) {
        self.achievements.push(achievement);
    }

    /// Remove the achievement at `index`.
    pub fn remove_achievement(&mut self, index: usize) -> Result<Achievement, EntryIndexError> {
        remove_at(&mut self.achievements, index)
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<T, EntryIndexError> {
    if index >= items.len() {
        return Err(EntryIndexError {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResearchProfileDto {
    email: EmailAddress,
    #[serde(default)]
    research_areas: Vec<String>,
    #[serde(default)]
    publications: Vec<Publication>,
    #[serde(default)]
    ongoing_projects: Vec<ResearchProject>,
    #[serde(default)]
    achievements: Vec<Achievement>,
    // Read and discarded; recomputed on conversion.
    #[serde(default)]
    total_publications: Value,
    #[serde(default)]
    total_citations: Value,
}

impl From<ResearchProfile> for ResearchProfileDto {
    fn from(value: ResearchProfile) -> Self {
        let mut value = value;
        value.sync_metrics();
        Self {
            email: value.email,
            research_areas: value.research_areas,
            publications: value.publications,
            ongoing_projects: value.ongoing_projects,
            achievements: value.achievements,
            total_publications: Value::from(value.total_publications),
            total_citations: Value::from(value.total_citations),
        }
    }
}

impl From<ResearchProfileDto> for ResearchProfile {
    fn from(value: ResearchProfileDto) -> Self {
        let mut profile = Self {
            email: value.email,
            research_areas: value.research_areas,
            publications: value.publications,
            ongoing_projects: value.ongoing_projects,
            achievements: value.achievements,
            total_publications: 0,
            total_citations: 0,
        };
        profile.sync_metrics();
        profile
    }
}
