//! Plain-text rendering of command results.

use std::io::{self, Write};

use crate::domain::{
    AlumniStatus, ContentEntry, ContentKind, RawRegistration, ResearchProfile, RouteAccess,
    StatusSnapshot, UserProfile,
};

pub(super) fn status_label(status: Option<AlumniStatus>) -> &'static str {
    status.map_or("not registered", AlumniStatus::as_str)
}

pub(super) fn snapshot<W: Write>(out: &mut W, snapshot: &StatusSnapshot) -> io::Result<()> {
    match snapshot.checked_at {
        Some(at) => writeln!(
            out,
            "status: {} (checked {})",
            status_label(snapshot.status),
            at.to_rfc3339()
        ),
        None => writeln!(out, "status: checking"),
    }
}

pub(super) fn route_access<W: Write>(out: &mut W, access: &RouteAccess) -> io::Result<()> {
    match access {
        RouteAccess::Loading => writeln!(out, "session: loading"),
        RouteAccess::SignedOut => writeln!(out, "session: signed out"),
        RouteAccess::Unverified(session) => writeln!(
            out,
            "signed in as {} (uid {}); email not verified",
            session.email(),
            session.uid()
        ),
        RouteAccess::Verified(session) => writeln!(
            out,
            "signed in as {} (uid {}); verified",
            session.email(),
            session.uid()
        ),
    }
}

pub(super) fn profile<W: Write>(out: &mut W, profile: &UserProfile) -> io::Result<()> {
    writeln!(out, "email: {}", profile.email)?;
    writeln!(out, "name: {}", profile.name)?;
    writeln!(out, "role: {}", profile.role)?;
    if let Some(year) = profile.graduation_year {
        writeln!(out, "graduation year: {year}")?;
    }
    if let Some(department) = &profile.department {
        writeln!(out, "department: {department}")?;
    }
    Ok(())
}

pub(super) fn research<W: Write>(out: &mut W, profile: &ResearchProfile) -> io::Result<()> {
    writeln!(out, "research profile: {}", profile.email())?;
    writeln!(out, "publications: {}", profile.total_publications())?;
    writeln!(out, "citations: {}", profile.total_citations())?;
    if !profile.research_areas().is_empty() {
        writeln!(out, "areas: {}", profile.research_areas().join(", "))?;
    }
    for (index, publication) in profile.publications().iter().enumerate() {
        write!(
            out,
            "  [{index}] {} ({} citations)",
            publication.title,
            publication.citation_count()
        )?;
        match &publication.pdf_url {
            Some(url) => writeln!(out, " pdf: {url}")?,
            None => writeln!(out)?,
        }
    }
    for (index, project) in profile.ongoing_projects().iter().enumerate() {
        writeln!(out, "  project [{index}] {}", project.title)?;
    }
    for (index, achievement) in profile.achievements().iter().enumerate() {
        writeln!(out, "  achievement [{index}] {}", achievement.title)?;
    }
    Ok(())
}

pub(super) fn registration<W: Write>(out: &mut W, record: &RawRegistration) -> io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}",
        record.id.as_deref().unwrap_or("-"),
        record.name.as_deref().unwrap_or("-"),
        record.email.as_deref().unwrap_or("-"),
        record.normalize()
    )
}

pub(super) fn content_entry<W: Write>(
    out: &mut W,
    kind: ContentKind,
    entry: &ContentEntry,
) -> io::Result<()> {
    writeln!(out, "{}\t{}", entry.id, entry.headline(kind).unwrap_or("-"))
}
