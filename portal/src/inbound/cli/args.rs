//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AlumniStatus, ContentKind, EmailAddress, Role};

/// `portal` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "portal",
    about = "Client for the DCE alumni portal backend",
    version
)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a user's alumni registration status once.
    Status(IdentityArgs),
    /// Keep a user's alumni status current.
    ///
    /// Reads `refresh`, `hide`, `show` and `quit` from stdin; end of input
    /// stops the watch.
    Watch(IdentityArgs),
    /// Account operations against the identity provider.
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Member profiles.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Research profiles.
    #[command(subcommand)]
    Research(ResearchCommand),
    /// Alumni registrations.
    #[command(subcommand)]
    Registrations(RegistrationCommand),
    /// Events, news and committee members.
    #[command(subcommand)]
    Content(ContentCommand),
}

/// Who to resolve a status for.
#[derive(Debug, Clone, Args)]
pub struct IdentityArgs {
    /// Identity-provider uid. Leave empty to match on email only.
    #[arg(long, value_name = "uid", default_value = "")]
    pub uid: String,
    /// Account email.
    #[arg(long, value_name = "email", value_parser = parse_email)]
    pub email: EmailAddress,
}

/// Email and password pair.
#[derive(Debug, Clone, Args)]
pub struct CredentialArgs {
    /// Member email.
    #[arg(long, value_name = "email")]
    pub email: String,
    /// Account password.
    #[arg(long, value_name = "password")]
    pub password: String,
}

/// Acting administrator.
#[derive(Debug, Clone, Args)]
pub struct ActorArgs {
    /// Email of the signed-in administrator.
    #[arg(long = "as", value_name = "email", value_parser = parse_email)]
    pub actor: EmailAddress,
}

/// Identity-provider account commands.
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and report route access.
    SignIn(CredentialArgs),
    /// Create an account and send the verification email.
    SignUp {
        /// Full name.
        #[arg(long)]
        name: String,
        /// Account credentials.
        #[command(flatten)]
        credentials: CredentialArgs,
        /// Password confirmation; must equal `--password`.
        #[arg(long = "confirm-password", value_name = "password")]
        confirm_password: String,
    },
    /// Sign in and resend the verification email.
    ResendVerification(CredentialArgs),
}

/// Member profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show a member profile.
    Show {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
    },
    /// Change a member's role.
    SetRole {
        /// Acting administrator.
        #[command(flatten)]
        actor: ActorArgs,
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// New role.
        #[arg(long, value_name = "user|admin")]
        role: Role,
    },
}

/// Research profile commands.
#[derive(Debug, Subcommand)]
pub enum ResearchCommand {
    /// Show a research profile with its derived totals.
    Show {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
    },
    /// Append a publication.
    AddPublication {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Title.
        #[arg(long)]
        title: String,
        /// Author list as written.
        #[arg(long)]
        authors: Option<String>,
        /// Journal or conference.
        #[arg(long)]
        venue: Option<String>,
        /// Publication year.
        #[arg(long)]
        year: Option<String>,
        /// Citation count as entered; unreadable values count as zero.
        #[arg(long)]
        citations: Option<String>,
        /// DOI, if any.
        #[arg(long)]
        doi: Option<String>,
    },
    /// Remove the publication at a zero-based position.
    RemovePublication {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Zero-based position.
        #[arg(long)]
        index: usize,
    },
    /// Upload a PDF for the publication at a zero-based position.
    UploadPdf {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Zero-based position.
        #[arg(long)]
        index: usize,
        /// PDF to upload.
        #[arg(long, value_name = "path")]
        file: PathBuf,
    },
    /// Add a research area.
    AddArea {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Research area.
        #[arg(long)]
        area: String,
    },
    /// Remove a research area.
    RemoveArea {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Research area.
        #[arg(long)]
        area: String,
    },
    /// Append an ongoing project.
    AddProject {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Title.
        #[arg(long)]
        title: String,
        /// Short description.
        #[arg(long)]
        description: Option<String>,
        /// Funding source.
        #[arg(long)]
        funding: Option<String>,
    },
    /// Remove the project at a zero-based position.
    RemoveProject {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Zero-based position.
        #[arg(long)]
        index: usize,
    },
    /// Append an achievement.
    AddAchievement {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Title.
        #[arg(long)]
        title: String,
        /// Date as written.
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove the achievement at a zero-based position.
    RemoveAchievement {
        /// Member email.
        #[arg(long, value_parser = parse_email)]
        email: EmailAddress,
        /// Zero-based position.
        #[arg(long)]
        index: usize,
    },
}

/// Alumni registration commands.
#[derive(Debug, Subcommand)]
pub enum RegistrationCommand {
    /// Submit an alumni registration.
    Submit(SubmitArgs),
    /// List registrations by status (admin).
    List {
        /// Acting administrator.
        #[command(flatten)]
        actor: ActorArgs,
        /// Which listing to show.
        #[arg(long, default_value = "pending", value_name = "pending|approved")]
        status: AlumniStatus,
    },
    /// Approve a registration (admin).
    Approve {
        /// Acting administrator.
        #[command(flatten)]
        actor: ActorArgs,
        /// Backend id.
        #[arg(long)]
        id: String,
    },
    /// Reject a registration (admin).
    Reject {
        /// Acting administrator.
        #[command(flatten)]
        actor: ActorArgs,
        /// Backend id.
        #[arg(long)]
        id: String,
    },
}

/// Alumni registration form fields.
#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,
    /// Member email.
    #[arg(long, value_parser = parse_email)]
    pub email: EmailAddress,
    /// Identity-provider uid.
    #[arg(long)]
    pub uid: String,
    /// Year of graduation.
    #[arg(long = "graduation-year")]
    pub graduation_year: i32,
    /// Department studied in.
    #[arg(long)]
    pub department: String,
    /// Student id, if known.
    #[arg(long = "student-id")]
    pub student_id: Option<String>,
    /// Contact phone.
    #[arg(long)]
    pub phone: Option<String>,
    /// Current job title.
    #[arg(long = "current-position")]
    pub current_position: Option<String>,
    /// Current employer.
    #[arg(long)]
    pub organization: Option<String>,
}

/// Admin content commands.
#[derive(Debug, Subcommand)]
pub enum ContentCommand {
    /// List entries of one kind.
    List {
        /// Entry kind.
        #[arg(long, value_name = "events|news|committee-members")]
        kind: ContentKind,
    },
    /// Create an entry (admin).
    Create {
        /// Acting administrator.
        #[command(flatten)]
        actor: ActorArgs,
        /// Entry kind.
        #[arg(long)]
        kind: ContentKind,
        /// Attribute as `key=value`; repeatable.
        #[arg(long = "field", value_name = "key=value", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Replace an entry's attributes (admin).
    Update {
        /// Acting administrator.
        #[command(flatten)]
        actor: ActorArgs,
        /// Entry kind.
        #[arg(long)]
        kind: ContentKind,
        /// Backend id.
        #[arg(long)]
        id: String,
        /// Attribute as `key=value`; repeatable.
        #[arg(long = "field", value_name = "key=value", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Delete an entry (admin).
    Delete {
        /// Acting administrator.
        #[command(flatten)]
        actor: ActorArgs,
        /// Entry kind.
        #[arg(long)]
        kind: ContentKind,
        /// Backend id.
        #[arg(long)]
        id: String,
    },
}

fn parse_email(raw: &str) -> Result<EmailAddress, String> {
    EmailAddress::new(raw).map_err(|error| error.to_string())
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("field name must not be empty".to_owned());
    }
    Ok((key.to_owned(), value.to_owned()))
}
