// crates/no-dues-cli/src/main.rs
// ============================================================================
// Module: No Dues CLI Entry Point
// Description: Command dispatcher for the No Dues certificate workflow.
// Purpose: Provide a localized CLI over the certificate service.
// Dependencies: clap, no-dues-config, no-dues-core, no-dues-store-sqlite, serde.
// ============================================================================

//! ## Overview
//! The `no-dues` CLI loads `no-dues.toml`, wires the configured certificate
//! store, audit sink and roster-backed collaborators into a
//! [`CertificateService`], and runs one workflow operation per invocation on
//! behalf of the actor described by the command-line flags. All user-facing
//! strings are routed through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use no_dues_cli::i18n::Locale;
use no_dues_cli::i18n::set_locale;
use no_dues_cli::t;
use no_dues_config::AuditSinkType;
use no_dues_config::NoDuesConfig;
use no_dues_config::Roster;
use no_dues_config::StoreType;
use no_dues_core::Actor;
use no_dues_core::ApplyError;
use no_dues_core::AuditSink;
use no_dues_core::Certificate;
use no_dues_core::CertificateError;
use no_dues_core::CertificateFilter;
use no_dues_core::CertificateId;
use no_dues_core::CertificateService;
use no_dues_core::CertificateStatus;
use no_dues_core::CertificateStore;
use no_dues_core::CertificateSummary;
use no_dues_core::CertificateTransition;
use no_dues_core::CertificateView;
use no_dues_core::DepartmentCode;
use no_dues_core::DepartmentRegistry;
use no_dues_core::DueStatus;
use no_dues_core::EligibilityReport;
use no_dues_core::FileAuditSink;
use no_dues_core::IdentityContext;
use no_dues_core::InMemoryCertificateStore;
use no_dues_core::InMemoryDueLedger;
use no_dues_core::InMemoryStudentDirectory;
use no_dues_core::InMemoryUserDirectory;
use no_dues_core::NoopAuditSink;
use no_dues_core::NotifyError;
use no_dues_core::PrincipalSignRequest;
use no_dues_core::RejectDepartmentRequest;
use no_dues_core::RequestCertificate;
use no_dues_core::Role;
use no_dues_core::RollNumber;
use no_dues_core::SignDepartmentRequest;
use no_dues_core::SignatureRequest;
use no_dues_core::SignatureRequestNotifier;
use no_dues_core::SignatureRequestReceipt;
use no_dues_core::SignatureStatus;
use no_dues_core::StderrAuditSink;
use no_dues_core::StoreError;
use no_dues_core::Timestamp;
use no_dues_store_sqlite::SqliteCertificateStore;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the output language.
const LANG_ENV: &str = "NO_DUES_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "no-dues", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `NO_DUES_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Department registry utilities.
    Departments {
        /// Selected departments subcommand.
        #[command(subcommand)]
        command: DepartmentsCommand,
    },
    /// No Dues certificate workflow operations.
    Certificate {
        /// Selected certificate subcommand.
        #[command(subcommand)]
        command: CertificateCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigValidateCommand),
}

/// Departments subcommands.
#[derive(Subcommand, Debug)]
enum DepartmentsCommand {
    /// List the departments every new certificate must clear.
    List(DepartmentsListCommand),
}

/// Certificate subcommands.
#[derive(Subcommand, Debug)]
enum CertificateCommand {
    /// Request a certificate for a student with no outstanding dues.
    Request(CertificateRequestCommand),
    /// Show one certificate with its signature records.
    Show(CertificateShowCommand),
    /// List certificates visible to the actor.
    List(CertificateListCommand),
    /// List certificates whose students have cleared every due.
    Cleared(CertificateClearedCommand),
    /// Sign a department's record on a certificate.
    Sign(CertificateSignCommand),
    /// Reject a department's record on a certificate.
    Reject(CertificateRejectCommand),
    /// Ask a department to sign a certificate.
    RequestSignature(CertificateRequestSignatureCommand),
    /// Record the principal's final sign-off.
    SignPrincipal(CertificateSignPrincipalCommand),
    /// Delete a certificate and its signature records.
    Delete(CertificateDeleteCommand),
    /// Check whether a student may request a certificate.
    Eligibility(CertificateEligibilityCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to no-dues.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `departments list`.
#[derive(Args, Debug)]
struct DepartmentsListCommand {
    /// Optional config file path (defaults to no-dues.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Session inputs shared by every certificate command.
#[derive(Args, Debug, Clone)]
struct SessionArgs {
    /// Optional config file path (defaults to no-dues.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Acting user's identifier.
    #[arg(long = "user-id", value_name = "USER_ID")]
    user_id: String,
    /// Acting user's display name (defaults to the user id).
    #[arg(long = "name", value_name = "NAME")]
    display_name: Option<String>,
    /// Role granted to the acting user (repeatable).
    #[arg(long = "role", value_enum, value_name = "ROLE")]
    roles: Vec<RoleArg>,
    /// Home department of a department administrator.
    #[arg(long = "home-department", value_name = "CODE")]
    home_department: Option<String>,
    /// Roll number of a student actor.
    #[arg(long = "actor-roll-number", value_name = "ROLL")]
    actor_roll_number: Option<String>,
    /// Override the operation timestamp (unix milliseconds).
    #[arg(long = "at-unix-ms", value_name = "UNIX_MS")]
    at_unix_ms: Option<i64>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `certificate request`.
#[derive(Args, Debug)]
struct CertificateRequestCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Roll number of the student the certificate is for.
    #[arg(long = "roll-number", value_name = "ROLL")]
    roll_number: String,
}

/// Arguments for `certificate show`.
#[derive(Args, Debug)]
struct CertificateShowCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Certificate identifier.
    #[arg(long, value_name = "ID")]
    id: u64,
}

/// Arguments for `certificate list`.
#[derive(Args, Debug)]
struct CertificateListCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Restrict to one student.
    #[arg(long = "roll-number", value_name = "ROLL")]
    roll_number: Option<String>,
    /// Restrict to one status.
    #[arg(long, value_enum, value_name = "STATUS")]
    status: Option<StatusArg>,
}

/// Arguments for `certificate cleared`.
#[derive(Args, Debug)]
struct CertificateClearedCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
}

/// Arguments for `certificate sign`.
#[derive(Args, Debug)]
struct CertificateSignCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Certificate identifier.
    #[arg(long, value_name = "ID")]
    id: u64,
    /// Department code to sign for.
    #[arg(long, value_name = "CODE")]
    department: String,
    /// Optional comments stored on the record.
    #[arg(long, value_name = "TEXT")]
    comments: Option<String>,
    /// Embed the signer's stored e-signature image.
    #[arg(long = "e-signature", action = ArgAction::SetTrue)]
    e_signature: bool,
}

/// Arguments for `certificate reject`.
#[derive(Args, Debug)]
struct CertificateRejectCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Certificate identifier.
    #[arg(long, value_name = "ID")]
    id: u64,
    /// Department code to reject for.
    #[arg(long, value_name = "CODE")]
    department: String,
    /// Optional rejection reason stored on the record.
    #[arg(long, value_name = "TEXT")]
    comments: Option<String>,
}

/// Arguments for `certificate request-signature`.
#[derive(Args, Debug)]
struct CertificateRequestSignatureCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Certificate identifier.
    #[arg(long, value_name = "ID")]
    id: u64,
    /// Department asked to sign.
    #[arg(long, value_name = "CODE")]
    department: String,
    /// Optional message for the department.
    #[arg(long, value_name = "TEXT")]
    message: Option<String>,
}

/// Arguments for `certificate sign-principal`.
#[derive(Args, Debug)]
struct CertificateSignPrincipalCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Certificate identifier.
    #[arg(long, value_name = "ID")]
    id: u64,
    /// Embed the principal's stored e-signature image.
    #[arg(long = "e-signature", action = ArgAction::SetTrue)]
    e_signature: bool,
}

/// Arguments for `certificate delete`.
#[derive(Args, Debug)]
struct CertificateDeleteCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Certificate identifier.
    #[arg(long, value_name = "ID")]
    id: u64,
}

/// Arguments for `certificate eligibility`.
#[derive(Args, Debug)]
struct CertificateEligibilityCommand {
    /// Session settings.
    #[command(flatten)]
    session: SessionArgs,
    /// Roll number to check.
    #[arg(long = "roll-number", value_name = "ROLL")]
    roll_number: String,
}

/// Output formats for structured CLI commands.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// JSON output.
    Json,
    /// Human-readable text output.
    Text,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Hindi.
    Hi,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Hi => Self::Hi,
        }
    }
}

/// Role selections for the acting user.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum RoleArg {
    /// Platform administrator.
    Admin,
    /// Department administrator.
    DepartmentAdmin,
    /// Head of Department.
    Hod,
    /// Principal.
    Principal,
    /// Student.
    Student,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => Self::Admin,
            RoleArg::DepartmentAdmin => Self::DepartmentAdmin,
            RoleArg::Hod => Self::Hod,
            RoleArg::Principal => Self::Principal,
            RoleArg::Student => Self::Student,
        }
    }
}

/// Certificate status filter selections.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum StatusArg {
    /// No department resolved yet.
    Pending,
    /// Some departments signed.
    Partial,
    /// Every department signed.
    AllSigned,
    /// A department rejected.
    Rejected,
    /// Principal signed.
    Complete,
}

impl From<StatusArg> for CertificateStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => Self::Pending,
            StatusArg::Partial => Self::Partial,
            StatusArg::AllSigned => Self::AllSigned,
            StatusArg::Rejected => Self::Rejected,
            StatusArg::Complete => Self::Complete,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<CertificateError> for CliError {
    fn from(error: CertificateError) -> Self {
        Self::new(t!("certificate.failed", kind = error.kind().label(), error = error))
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Departments {
            command,
        } => command_departments(command),
        Commands::Certificate {
            command,
        } => command_certificate(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    if let Some(path) = &config.roster.path {
        Roster::load(Path::new(path))
            .map_err(|err| CliError::new(t!("roster.load_failed", error = err)))?;
    }
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates the config file.
fn load_config(path: Option<&Path>) -> CliResult<NoDuesConfig> {
    NoDuesConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Department Commands
// ============================================================================

/// Dispatches departments subcommands.
fn command_departments(command: DepartmentsCommand) -> CliResult<ExitCode> {
    match command {
        DepartmentsCommand::List(command) => command_departments_list(&command),
    }
}

/// Executes `departments list`.
fn command_departments_list(command: &DepartmentsListCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let registry = config.registry.to_registry();
    let output = DepartmentsOutput::from_registry(&registry);
    emit_structured_output(&output, command.format, render_departments_text(&output))?;
    Ok(ExitCode::SUCCESS)
}

/// Output for `departments list`.
#[derive(Debug, Serialize)]
struct DepartmentsOutput {
    /// Departments in registry order.
    departments: Vec<DepartmentEntryOutput>,
}

/// One department entry in CLI output.
#[derive(Debug, Serialize)]
struct DepartmentEntryOutput {
    /// Department code.
    code: DepartmentCode,
    /// Display name.
    name: String,
}

impl DepartmentsOutput {
    /// Builds the listing from a registry.
    fn from_registry(registry: &DepartmentRegistry) -> Self {
        Self {
            departments: registry
                .departments()
                .iter()
                .map(|department| DepartmentEntryOutput {
                    code: department.code.clone(),
                    name: department.display_name.clone(),
                })
                .collect(),
        }
    }
}

/// Renders the department listing in text form.
fn render_departments_text(output: &DepartmentsOutput) -> String {
    let mut buffer = String::new();
    if output.departments.is_empty() {
        buffer.push_str(&t!("departments.list.none"));
        buffer.push('\n');
        return buffer;
    }
    buffer.push_str(&t!("departments.list.header"));
    buffer.push('\n');
    for department in &output.departments {
        let entry = t!("departments.list.entry", code = department.code, name = department.name);
        buffer.push_str(&entry);
        buffer.push('\n');
    }
    buffer
}

// ============================================================================
// SECTION: Certificate Commands
// ============================================================================

/// Dispatches certificate subcommands.
fn command_certificate(command: CertificateCommand) -> CliResult<ExitCode> {
    match command {
        CertificateCommand::Request(command) => command_certificate_request(&command),
        CertificateCommand::Show(command) => command_certificate_show(&command),
        CertificateCommand::List(command) => command_certificate_list(&command),
        CertificateCommand::Cleared(command) => command_certificate_cleared(&command),
        CertificateCommand::Sign(command) => command_certificate_sign(&command),
        CertificateCommand::Reject(command) => command_certificate_reject(&command),
        CertificateCommand::RequestSignature(command) => {
            command_certificate_request_signature(&command)
        }
        CertificateCommand::SignPrincipal(command) => command_certificate_sign_principal(&command),
        CertificateCommand::Delete(command) => command_certificate_delete(&command),
        CertificateCommand::Eligibility(command) => command_certificate_eligibility(&command),
    }
}

/// Executes `certificate request`.
fn command_certificate_request(command: &CertificateRequestCommand) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let view = session.service.request_certificate(
        &session.identity,
        &RequestCertificate {
            roll_number: RollNumber::new(&command.roll_number),
            requested_at: session.at,
        },
    )?;
    emit_structured_output(&view, session.format, render_certificate_text(&view))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `certificate show`.
fn command_certificate_show(command: &CertificateShowCommand) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let view = session.service.certificate(&session.identity, parse_certificate_id(command.id)?)?;
    emit_structured_output(&view, session.format, render_certificate_text(&view))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `certificate list`.
fn command_certificate_list(command: &CertificateListCommand) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let filter = CertificateFilter {
        roll_number: command.roll_number.as_deref().map(RollNumber::new),
        status: command.status.map(CertificateStatus::from),
    };
    let summaries = session.service.list_certificates(&session.identity, &filter)?;
    let text = render_summaries_text(&summaries);
    emit_structured_output(&summaries, session.format, text)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `certificate cleared`.
fn command_certificate_cleared(command: &CertificateClearedCommand) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let summaries = session.service.certificates_with_cleared_dues(&session.identity)?;
    let text = render_summaries_text(&summaries);
    emit_structured_output(&summaries, session.format, text)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `certificate sign`.
fn command_certificate_sign(command: &CertificateSignCommand) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let view = session.service.sign_department(
        &session.identity,
        &SignDepartmentRequest {
            certificate_id: parse_certificate_id(command.id)?,
            department: DepartmentCode::new(&command.department),
            comments: command.comments.clone(),
            use_e_signature: command.e_signature,
            decided_at: session.at,
        },
    )?;
    emit_structured_output(&view, session.format, render_certificate_text(&view))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `certificate reject`.
fn command_certificate_reject(command: &CertificateRejectCommand) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let view = session.service.reject_department(
        &session.identity,
        &RejectDepartmentRequest {
            certificate_id: parse_certificate_id(command.id)?,
            department: DepartmentCode::new(&command.department),
            comments: command.comments.clone(),
            decided_at: session.at,
        },
    )?;
    emit_structured_output(&view, session.format, render_certificate_text(&view))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `certificate request-signature`.
fn command_certificate_request_signature(
    command: &CertificateRequestSignatureCommand,
) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let receipt = session.service.request_signature(
        &session.identity,
        &SignatureRequest {
            certificate_id: parse_certificate_id(command.id)?,
            department: DepartmentCode::new(&command.department),
            message: command.message.clone(),
            requested_at: session.at,
        },
    )?;
    let text = t!(
        "signature_request.sent",
        department = receipt.department,
        number = receipt.certificate_number,
        requested_by = receipt.requested_by
    );
    emit_structured_output(&receipt, session.format, text)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `certificate sign-principal`.
fn command_certificate_sign_principal(
    command: &CertificateSignPrincipalCommand,
) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let view = session.service.sign_principal(
        &session.identity,
        &PrincipalSignRequest {
            certificate_id: parse_certificate_id(command.id)?,
            use_e_signature: command.e_signature,
            signed_at: session.at,
        },
    )?;
    emit_structured_output(&view, session.format, render_certificate_text(&view))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `certificate delete`.
fn command_certificate_delete(command: &CertificateDeleteCommand) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let certificate_id = parse_certificate_id(command.id)?;
    session.service.delete_certificate(&session.identity, certificate_id, session.at)?;
    let output = DeleteOutput {
        id: certificate_id,
        deleted: true,
    };
    let text = t!("certificate.deleted", id = certificate_id);
    emit_structured_output(&output, session.format, text)?;
    Ok(ExitCode::SUCCESS)
}

/// Output for `certificate delete`.
#[derive(Debug, Serialize)]
struct DeleteOutput {
    /// Deleted certificate identifier.
    id: CertificateId,
    /// Always true on success.
    deleted: bool,
}

/// Executes `certificate eligibility`.
fn command_certificate_eligibility(command: &CertificateEligibilityCommand) -> CliResult<ExitCode> {
    let session = Session::open(&command.session)?;
    let report = session
        .service
        .check_eligibility(&session.identity, &RollNumber::new(&command.roll_number))?;
    emit_structured_output(&report, session.format, render_eligibility_text(&report))?;
    Ok(ExitCode::SUCCESS)
}

/// Parses a certificate identifier flag.
fn parse_certificate_id(value: u64) -> CliResult<CertificateId> {
    CertificateId::from_raw(value)
        .ok_or_else(|| CliError::new(t!("certificate.id_invalid", value = value)))
}

// ============================================================================
// SECTION: Session Wiring
// ============================================================================

/// Service type used by the CLI.
type CliService =
    CertificateService<CliStore, InMemoryDueLedger, InMemoryUserDirectory, InMemoryStudentDirectory>;

/// One command invocation's service, identity and timestamp.
struct Session {
    /// Configured certificate service.
    service: CliService,
    /// Acting user.
    identity: IdentityContext,
    /// Operation timestamp.
    at: Timestamp,
    /// Output format.
    format: OutputFormat,
}

impl Session {
    /// Loads config and roster and wires the service for one invocation.
    fn open(args: &SessionArgs) -> CliResult<Self> {
        let identity = IdentityContext::new(build_actor(args)?);
        let at = resolve_timestamp(args.at_unix_ms)?;
        let config = load_config(args.config.as_deref())?;
        let store = open_store(&config)?;
        let (dues, users, students) = load_collaborators(&config)?;
        let service =
            CertificateService::new(config.service_config(), store, dues, users, students)
                .with_audit_sink(open_audit_sink(&config)?)
                .with_notifier(Arc::new(StderrNotifier));
        Ok(Self {
            service,
            identity,
            at,
            format: args.format,
        })
    }
}

/// Builds the acting user from session flags.
fn build_actor(args: &SessionArgs) -> CliResult<Actor> {
    if args.roles.is_empty() {
        return Err(CliError::new(t!("actor.roles_missing")));
    }
    let display_name = args.display_name.clone().unwrap_or_else(|| args.user_id.clone());
    let mut actor = Actor::new(args.user_id.clone(), display_name);
    for role in &args.roles {
        actor = actor.with_role(Role::from(*role));
    }
    if let Some(department) = &args.home_department {
        actor = actor.with_home_department(department);
    }
    if let Some(roll_number) = &args.actor_roll_number {
        actor = actor.with_roll_number(roll_number);
    }
    Ok(actor)
}

/// Determines the operation timestamp.
fn resolve_timestamp(override_unix_ms: Option<i64>) -> CliResult<Timestamp> {
    if let Some(value) = override_unix_ms {
        if value < 0 {
            return Err(CliError::new(t!("time.negative")));
        }
        return Ok(Timestamp::UnixMillis(value));
    }
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| CliError::new(t!("time.system_failed", error = err)))?;
    let millis =
        i64::try_from(duration.as_millis()).map_err(|_| CliError::new(t!("time.overflow")))?;
    Ok(Timestamp::UnixMillis(millis))
}

/// Opens the configured certificate store.
fn open_store(config: &NoDuesConfig) -> CliResult<CliStore> {
    match (config.store.store_type, config.store.sqlite_config()) {
        (StoreType::Sqlite, Some(sqlite)) => SqliteCertificateStore::new(&sqlite)
            .map(CliStore::Sqlite)
            .map_err(|err| CliError::new(t!("store.open_failed", error = err))),
        _ => Ok(CliStore::Memory(InMemoryCertificateStore::new())),
    }
}

/// Opens the configured audit sink.
fn open_audit_sink(config: &NoDuesConfig) -> CliResult<Arc<dyn AuditSink>> {
    match (config.audit.sink, &config.audit.path) {
        (AuditSinkType::File, Some(path)) => FileAuditSink::new(Path::new(path))
            .map(|sink| Arc::new(sink) as Arc<dyn AuditSink>)
            .map_err(|err| CliError::new(t!("audit.open_failed", path = path, error = err))),
        (AuditSinkType::None, _) => Ok(Arc::new(NoopAuditSink)),
        _ => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Seeds the in-memory collaborators from the configured roster.
fn load_collaborators(
    config: &NoDuesConfig,
) -> CliResult<(InMemoryDueLedger, InMemoryUserDirectory, InMemoryStudentDirectory)> {
    let dues = InMemoryDueLedger::new();
    let users = InMemoryUserDirectory::new();
    let students = InMemoryStudentDirectory::new();
    let Some(path) = &config.roster.path else {
        return Ok((dues, users, students));
    };
    let roster = Roster::load(Path::new(path))
        .map_err(|err| CliError::new(t!("roster.load_failed", error = err)))?;
    let seed_error =
        |err: &dyn std::fmt::Display| CliError::new(t!("roster.seed_failed", error = err));
    for student in &roster.students {
        students.enroll(student.clone()).map_err(|err| seed_error(&err))?;
    }
    for due in &roster.dues {
        dues.record_due(due.clone()).map_err(|err| seed_error(&err))?;
    }
    for signature in &roster.signatures {
        let image = roster
            .load_signature_image(signature)
            .map_err(|err| CliError::new(t!("roster.load_failed", error = err)))?;
        users.store_signature(signature.user_id.clone(), image).map_err(|err| seed_error(&err))?;
    }
    Ok((dues, users, students))
}

// ============================================================================
// SECTION: Store Selection
// ============================================================================

/// Certificate store selected by configuration.
enum CliStore {
    /// Process-local store; state ends with the invocation.
    Memory(InMemoryCertificateStore),
    /// Durable `SQLite` store.
    Sqlite(SqliteCertificateStore),
}

impl CertificateStore for CliStore {
    fn allocate_id(&self) -> Result<CertificateId, StoreError> {
        match self {
            Self::Memory(store) => store.allocate_id(),
            Self::Sqlite(store) => store.allocate_id(),
        }
    }

    fn insert(&self, certificate: &Certificate) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.insert(certificate),
            Self::Sqlite(store) => store.insert(certificate),
        }
    }

    fn load(&self, id: CertificateId) -> Result<Option<Certificate>, StoreError> {
        match self {
            Self::Memory(store) => store.load(id),
            Self::Sqlite(store) => store.load(id),
        }
    }

    fn list(&self, filter: &CertificateFilter) -> Result<Vec<Certificate>, StoreError> {
        match self {
            Self::Memory(store) => store.list(filter),
            Self::Sqlite(store) => store.list(filter),
        }
    }

    fn apply(
        &self,
        id: CertificateId,
        transition: &CertificateTransition,
    ) -> Result<Certificate, ApplyError> {
        match self {
            Self::Memory(store) => store.apply(id, transition),
            Self::Sqlite(store) => store.apply(id, transition),
        }
    }

    fn delete(&self, id: CertificateId) -> Result<bool, StoreError> {
        match self {
            Self::Memory(store) => store.delete(id),
            Self::Sqlite(store) => store.delete(id),
        }
    }
}

// ============================================================================
// SECTION: Notifier
// ============================================================================

/// Notifier that announces signature requests on stderr.
struct StderrNotifier;

impl SignatureRequestNotifier for StderrNotifier {
    fn notify(&self, receipt: &SignatureRequestReceipt) -> Result<(), NotifyError> {
        let line = t!(
            "signature_request.notify",
            department_name = receipt.department_name,
            number = receipt.certificate_number
        );
        write_stderr_line(&line).map_err(|err| NotifyError::Delivery(err.to_string()))
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a certificate view in text form.
fn render_certificate_text(view: &CertificateView) -> String {
    let mut lines = vec![
        t!("certificate.view.header", number = view.certificate_number, id = view.id),
        t!(
            "certificate.view.student",
            name = view.student.name,
            roll_number = view.student.roll_number,
            branch = view.student.branch,
            semester = view.student.semester
        ),
        t!("certificate.view.status", status = view.status.label()),
        t!("certificate.view.created", created_at = view.created_at.display()),
    ];
    if let Some(issue_date) = view.issue_date {
        lines.push(t!("certificate.view.issued", issue_date = issue_date.display()));
    }
    match (&view.principal_signed_by, view.principal_signed_at) {
        (Some(name), Some(signed_at)) if view.principal_signed => lines.push(t!(
            "certificate.view.principal_signed",
            name = name,
            signed_at = signed_at.display()
        )),
        _ => lines.push(t!("certificate.view.principal_pending")),
    }
    for signature in &view.signatures {
        let record = &signature.record;
        let line = match (&record.signed_by_name, record.signed_at) {
            (Some(signer), Some(signed_at)) if record.status != SignatureStatus::Pending => t!(
                "certificate.view.signature_resolved",
                department = signature.department_name,
                code = record.department,
                status = record.status.label(),
                signer = signer,
                signed_at = signed_at.display()
            ),
            _ => t!(
                "certificate.view.signature_pending",
                department = signature.department_name,
                code = record.department,
                status = record.status.label()
            ),
        };
        lines.push(line);
        if let Some(comments) = &record.comments {
            lines.push(t!("certificate.view.comments", comments = comments));
        }
    }
    lines.join("\n")
}

/// Renders certificate summaries in text form.
fn render_summaries_text(summaries: &[CertificateSummary]) -> String {
    if summaries.is_empty() {
        return t!("certificate.list.none");
    }
    let mut lines = vec![t!("certificate.list.header")];
    for summary in summaries {
        lines.push(t!(
            "certificate.list.entry",
            id = summary.id,
            number = summary.certificate_number,
            name = summary.student_name,
            roll_number = summary.roll_number,
            status = summary.status.label(),
            signed = summary.signed_departments,
            required = summary.required_departments
        ));
    }
    lines.join("\n")
}

/// Renders an eligibility report in text form.
fn render_eligibility_text(report: &EligibilityReport) -> String {
    if report.eligible {
        return t!("eligibility.eligible", roll_number = report.roll_number);
    }
    let mut lines = vec![t!(
        "eligibility.blocked",
        roll_number = report.roll_number,
        count = report.outstanding_dues.len()
    )];
    for due in &report.outstanding_dues {
        lines.push(t!(
            "eligibility.due",
            due_id = due.due_id,
            department = due.department,
            description = due.description,
            amount = format_minor_units(due.amount_minor),
            status = due_status_label(due.status)
        ));
    }
    lines.join("\n")
}

/// Formats an amount in minor units as `major.minor`.
fn format_minor_units(amount_minor: u64) -> String {
    format!("{}.{:02}", amount_minor / 100, amount_minor % 100)
}

/// Returns the wire label of a due status.
const fn due_status_label(status: DueStatus) -> &'static str {
    match status {
        DueStatus::Pending => "PENDING",
        DueStatus::Paid => "PAID",
        DueStatus::Approved => "APPROVED",
        DueStatus::Rejected => "REJECTED",
    }
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Emits JSON or text output for a command result.
fn emit_structured_output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: String,
) -> CliResult<()> {
    let mut output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?,
        OutputFormat::Text => text,
    };
    if !output.ends_with('\n') {
        output.push('\n');
    }
    write_stdout_bytes(output.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
