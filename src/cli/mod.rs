//! Command-line interface.

pub mod auth;
pub mod completions;
pub mod context;
pub mod init;
pub mod org;
pub mod output;
pub mod project;
pub mod secrets;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::domain::{Environment, Format, Permission, Role};
use crate::error::Result;

/// envv - team secrets sync with client-side encryption.
#[derive(Parser)]
#[command(
    name = "envv",
    about = "Share per-environment secrets with your team, encrypted for every member",
    version,
    after_help = "Secrets are encrypted before they leave your machine."
)]
pub struct Cli {
    /// Enable debug logging (overridden by ENVV_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Manage your account and session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Manage organizations
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },

    /// Manage projects and their members
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Bind the current directory to a project
    Init {
        /// Organization ID
        #[arg(long)]
        org: String,
        /// Project ID
        #[arg(long)]
        project: String,
        /// Default environment
        #[arg(short, long, default_value = "development")]
        env: Environment,
        /// Replace an existing binding
        #[arg(short, long)]
        force: bool,
    },

    /// Show binding, session and key status
    Status,

    /// Push, pull, sync and rotate secrets
    Secrets {
        #[command(subcommand)]
        action: SecretsAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Auth subcommands.
#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and register your age public key
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// Password (prompted if omitted)
        #[arg(long, env = "ENVV_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log in and store a session
    Login {
        #[arg(long)]
        email: String,
        /// Password (prompted if omitted)
        #[arg(long, env = "ENVV_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the session
    Logout,

    /// Show the logged-in user
    Whoami,
}

/// Organization subcommands.
#[derive(Subcommand)]
pub enum OrgAction {
    /// Create an organization
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// List your organizations
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List organization members and their keys
    Members {
        /// Organization ID (defaults to the bound organization)
        #[arg(long)]
        org: Option<String>,
    },

    /// Invite a user to an organization
    Invite {
        email: String,
        #[arg(long, value_enum, default_value = "member")]
        role: InviteRole,
        /// Organization ID (defaults to the bound organization)
        #[arg(long)]
        org: Option<String>,
    },
}

/// Roles that can be granted by invitation.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum InviteRole {
    Admin,
    Member,
}

impl From<InviteRole> for Role {
    fn from(role: InviteRole) -> Self {
        match role {
            InviteRole::Admin => Role::Admin,
            InviteRole::Member => Role::Member,
        }
    }
}

/// Project subcommands.
#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project in an organization
    Create {
        name: String,
        /// Organization ID (defaults to the bound organization)
        #[arg(long)]
        org: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List projects in an organization
    List {
        /// Organization ID (defaults to the bound organization)
        #[arg(long)]
        org: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List project members and whether they have a key
    Members {
        /// Project ID (defaults to the bound project)
        #[arg(long)]
        project: Option<String>,
    },

    /// Grant a user access to the bound project
    Grant {
        email: String,
        #[arg(long, value_enum, default_value = "read")]
        permission: GrantPermission,
    },

    /// Revoke a user's access to the bound project
    Revoke {
        /// User ID
        user_id: String,
    },
}

/// Permissions that can be granted on a project.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum GrantPermission {
    Read,
    Write,
    Admin,
}

impl From<GrantPermission> for Permission {
    fn from(p: GrantPermission) -> Self {
        match p {
            GrantPermission::Read => Permission::Read,
            GrantPermission::Write => Permission::Write,
            GrantPermission::Admin => Permission::Admin,
        }
    }
}

/// Secrets subcommands.
#[derive(Subcommand)]
pub enum SecretsAction {
    /// Encrypt a local file and push it as a new version
    Push {
        /// File to push (defaults to .env.<env>)
        file: Option<PathBuf>,
        #[arg(short, long)]
        env: Option<Environment>,
        /// Plaintext format (inferred from the extension if omitted)
        #[arg(short, long)]
        format: Option<Format>,
    },

    /// Pull and decrypt the latest version
    Pull {
        #[arg(short, long)]
        env: Option<Environment>,
        /// Output file (defaults to .env.<env>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pull the latest version if any, then push the local file
    Sync {
        #[arg(short, long)]
        env: Option<Environment>,
    },

    /// List stored versions, newest first
    List {
        #[arg(short, long)]
        env: Option<Environment>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-encrypt the latest version for the current members
    Rotate {
        #[arg(short, long)]
        env: Option<Environment>,
    },

    /// Publish an earlier version as the new latest
    Rollback {
        /// Version ID to restore
        version_id: String,
    },
}

/// Execute a command.
pub fn execute(command: Command) -> Result<()> {
    use Command::*;

    match command {
        Auth { action } => match action {
            AuthAction::Register {
                email,
                name,
                password,
            } => auth::register(&email, &name, password),
            AuthAction::Login { email, password } => auth::login(&email, password),
            AuthAction::Logout => auth::logout(),
            AuthAction::Whoami => auth::whoami(),
        },
        Org { action } => match action {
            OrgAction::Create { name, description } => org::create(&name, description.as_deref()),
            OrgAction::List { json } => org::list(json),
            OrgAction::Members { org } => org::members(org),
            OrgAction::Invite { email, role, org } => org::invite(&email, role.into(), org),
        },
        Project { action } => match action {
            ProjectAction::Create {
                name,
                org,
                description,
            } => project::create(&name, org, description.as_deref()),
            ProjectAction::List { org, json } => project::list(org, json),
            ProjectAction::Members { project } => project::members(project),
            ProjectAction::Grant { email, permission } => {
                project::grant(&email, permission.into())
            }
            ProjectAction::Revoke { user_id } => project::revoke(&user_id),
        },
        Init {
            org,
            project,
            env,
            force,
        } => init::execute(&org, &project, env, force),
        Status => status::execute(),
        Secrets { action } => match action {
            SecretsAction::Push { file, env, format } => secrets::push(file, env, format),
            SecretsAction::Pull { env, output } => secrets::pull(env, output),
            SecretsAction::Sync { env } => secrets::sync(env),
            SecretsAction::List { env, json } => secrets::list(env, json),
            SecretsAction::Rotate { env } => secrets::rotate(env),
            SecretsAction::Rollback { version_id } => secrets::rollback(&version_id),
        },
        Completions { shell } => completions::execute(shell),
    }
}
