//! Command dispatch.

use std::io::{self, Write};
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use serde_json::{Map, Value};
use tokio::io::BufReader;

use super::args::{
    AuthCommand, Command, ContentCommand, CredentialArgs, ProfileCommand, RegistrationCommand,
    ResearchCommand, SubmitArgs,
};
use super::state::CliState;
use super::{CliError, render, watch};
use crate::domain::ports::{PublicationPdf, RegistrationDecision};
use crate::domain::{
    Achievement, AlumniIdentity, ContentDraft, ContentKind, Credentials, Error, PortalResult,
    Publication, RegistrationForm, ResearchProject, SignUpRequest,
};

/// Execute `command`, writing results to `out`.
///
/// `watch` reads its control lines from stdin.
pub async fn run<W: Write>(command: Command, state: &CliState, out: &mut W) -> Result<(), CliError> {
    match command {
        Command::Status(args) => {
            let identity = AlumniIdentity::new(args.uid, args.email);
            let status = state.resolver().resolve(&identity).await;
            writeln!(out, "{}", render::status_label(status))?;
        }
        Command::Watch(args) => {
            let identity = AlumniIdentity::new(args.uid, args.email);
            watch(state, identity, BufReader::new(tokio::io::stdin()), out).await?;
        }
        Command::Auth(command) => auth(command, state, out).await?,
        Command::Profile(command) => profile(command, state, out).await?,
        Command::Research(command) => research(command, state, out).await?,
        Command::Registrations(command) => registrations(command, state, out).await?,
        Command::Content(command) => content(command, state, out).await?,
    }
    Ok(())
}

fn invalid<E: std::fmt::Display>(error: E) -> Error {
    Error::invalid_request(error.to_string())
}

fn credentials(args: &CredentialArgs) -> PortalResult<Credentials> {
    Credentials::try_from_parts(&args.email, &args.password).map_err(invalid)
}

async fn auth<W: Write>(command: AuthCommand, state: &CliState, out: &mut W) -> Result<(), CliError> {
    let sessions = state.sessions()?;
    match command {
        AuthCommand::SignIn(args) => {
            sessions.sign_in(&credentials(&args)?).await?;
        }
        AuthCommand::SignUp {
            name,
            credentials,
            confirm_password,
        } => {
            let request = SignUpRequest::try_from_parts(
                &name,
                &credentials.email,
                &credentials.password,
                &confirm_password,
            )
            .map_err(invalid)?;
            let session = sessions.sign_up(&request).await?;
            writeln!(out, "verification email sent to {}", session.email())?;
        }
        AuthCommand::ResendVerification(args) => {
            let session = sessions.sign_in(&credentials(&args)?).await?;
            sessions.resend_verification().await?;
            writeln!(out, "verification email sent to {}", session.email())?;
        }
    }
    render::route_access(out, &sessions.state().route_access())?;
    Ok(())
}

async fn profile<W: Write>(
    command: ProfileCommand,
    state: &CliState,
    out: &mut W,
) -> Result<(), CliError> {
    let service = state.profile_service();
    match command {
        ProfileCommand::Show { email } => match service.fetch(&email).await? {
            Some(profile) => render::profile(out, &profile)?,
            None => writeln!(out, "no profile for {email}")?,
        },
        ProfileCommand::SetRole { actor, email, role } => {
            let updated = service.change_role(&actor.actor, &email, role).await?;
            render::profile(out, &updated)?;
        }
    }
    Ok(())
}

async fn research<W: Write>(
    command: ResearchCommand,
    state: &CliState,
    out: &mut W,
) -> Result<(), CliError> {
    let service = state.research_service();
    let profile = match command {
        ResearchCommand::Show { email } => service.load(&email).await?,
        ResearchCommand::AddPublication {
            email,
            title,
            authors,
            venue,
            year,
            citations,
            doi,
        } => {
            let publication = Publication {
                authors,
                venue,
                year: year.map(Value::String),
                citations: citations.map_or(Value::Null, Value::String),
                doi,
                ..Publication::titled(title)
            };
            service.add_publication(&email, publication).await?
        }
        ResearchCommand::RemovePublication { email, index } => {
            service.remove_publication(&email, index).await?
        }
        ResearchCommand::UploadPdf { email, index, file } => {
            let pdf = read_pdf(&file)?;
            service.upload_publication_pdf(&email, index, pdf).await?
        }
        ResearchCommand::AddArea { email, area } => {
            service.add_research_area(&email, &area).await?
        }
        ResearchCommand::RemoveArea { email, area } => {
            service.remove_research_area(&email, &area).await?
        }
        ResearchCommand::AddProject {
            email,
            title,
            description,
            funding,
        } => {
            let project = ResearchProject {
                title,
                description,
                funding,
                start_date: None,
            };
            service.add_project(&email, project).await?
        }
        ResearchCommand::RemoveProject { email, index } => {
            service.remove_project(&email, index).await?
        }
        ResearchCommand::AddAchievement { email, title, date } => {
            let achievement = Achievement {
                title,
                description: None,
                date,
            };
            service.add_achievement(&email, achievement).await?
        }
        ResearchCommand::RemoveAchievement { email, index } => {
            service.remove_achievement(&email, index).await?
        }
    };
    render::research(out, &profile)?;
    Ok(())
}

fn read_pdf(path: &Path) -> Result<PublicationPdf, CliError> {
    let input_error = |source: io::Error| CliError::Input {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        input_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path must name a file",
        ))
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(input_error)?;
    let bytes = directory.read(Path::new(file_name)).map_err(input_error)?;
    Ok(PublicationPdf {
        file_name: file_name.to_string_lossy().into_owned(),
        bytes,
    })
}

fn registration_form(args: SubmitArgs) -> RegistrationForm {
    RegistrationForm {
        name: args.name,
        email: args.email,
        firebase_uid: args.uid,
        graduation_year: args.graduation_year,
        department: args.department,
        student_id: args.student_id,
        phone: args.phone,
        current_position: args.current_position,
        organization: args.organization,
    }
}

async fn registrations<W: Write>(
    command: RegistrationCommand,
    state: &CliState,
    out: &mut W,
) -> Result<(), CliError> {
    let service = state.registration_service();
    match command {
        RegistrationCommand::Submit(args) => {
            let created = service.submit(&registration_form(args)).await?;
            render::registration(out, &created)?;
        }
        RegistrationCommand::List { actor, status } => {
            for record in service.list(&actor.actor, status).await? {
                render::registration(out, &record)?;
            }
        }
        RegistrationCommand::Approve { actor, id } => {
            let updated = service
                .decide(&actor.actor, &id, RegistrationDecision::Approve)
                .await?;
            render::registration(out, &updated)?;
        }
        RegistrationCommand::Reject { actor, id } => {
            let updated = service
                .decide(&actor.actor, &id, RegistrationDecision::Reject)
                .await?;
            render::registration(out, &updated)?;
        }
    }
    Ok(())
}

fn draft(kind: ContentKind, fields: Vec<(String, String)>) -> PortalResult<ContentDraft> {
    let attributes: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    ContentDraft::new(kind, attributes).map_err(invalid)
}

async fn content<W: Write>(
    command: ContentCommand,
    state: &CliState,
    out: &mut W,
) -> Result<(), CliError> {
    let service = state.content_service();
    match command {
        ContentCommand::List { kind } => {
            for entry in service.list(kind).await? {
                render::content_entry(out, kind, &entry)?;
            }
        }
        ContentCommand::Create {
            actor,
            kind,
            fields,
        } => {
            let created = service.create(&actor.actor, &draft(kind, fields)?).await?;
            render::content_entry(out, kind, &created)?;
        }
        ContentCommand::Update {
            actor,
            kind,
            id,
            fields,
        } => {
            let updated = service
                .update(&actor.actor, &id, &draft(kind, fields)?)
                .await?;
            render::content_entry(out, kind, &updated)?;
        }
        ContentCommand::Delete { actor, kind, id } => {
            service.delete(&actor.actor, kind, &id).await?;
            writeln!(out, "deleted {kind} {id}")?;
        }
    }
    Ok(())
}
