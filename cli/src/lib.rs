//! Command-line front end for the user profile API.
//!
//! Provides one subcommand per form of the profile page:
//! - `whoami` - Restore the session from the stored token and show the user
//! - `login` - Log in and store the issued token
//! - `update` - Change username and email
//! - `avatar <file>` - Upload a new avatar image
//! - `logout` - Forget the stored token

pub mod config;
pub mod render;
pub mod store;
pub mod transport;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use profile_core::{AvatarFile, Credentials, ProfileClient, Renderer, Session, TokenStore, Transport, UpdateUser};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "profile")]
#[command(author, version, about = "Log in and manage your profile", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "profile.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API base URL
    #[arg(long, env = "PROFILE_API_URL")]
    pub api_url: Option<String>,

    /// Base URL avatar file names are resolved against
    #[arg(long, env = "PROFILE_UPLOAD_URL")]
    pub upload_url: Option<String>,

    /// File the session token is stored in
    #[arg(long, env = "PROFILE_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the logged-in user
    Whoami,

    /// Log in with username and password
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "PROFILE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Update username and email
    Update {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,
    },

    /// Upload an avatar image
    Avatar {
        /// Image file to upload
        file: PathBuf,
    },

    /// Forget the stored token
    Logout,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(url) = &self.api_url {
            config.api.url = url.clone();
        }
        if let Some(url) = &self.upload_url {
            config.api.upload_url = Some(url.clone());
        }
        if let Some(path) = &self.token_file {
            config.storage.token_file = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config
    }
}

/// Read an image from disk, guessing its content type from the extension.
pub fn read_avatar(path: &Path) -> Result<AvatarFile> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());
    let content_type = mime_guess::from_path(path).first_or_octet_stream().to_string();
    Ok(AvatarFile {
        file_name,
        content_type,
        bytes,
    })
}

/// Run one command against an assembled session.
pub fn run<T, S, R>(session: &mut Session<T, S, R>, command: &Commands) -> Result<()>
where
    T: Transport,
    S: TokenStore,
    R: Renderer,
{
    match command {
        Commands::Whoami => {
            if session.check_session().context("failed to fetch user data")?.is_none() {
                println!("No token found. Log in with `profile login`.");
            }
        }
        Commands::Login { username, password } => {
            session
                .login(&Credentials::new(username, password))
                .context("login failed")?;
        }
        Commands::Update { username, email } => {
            let fields = UpdateUser {
                username: username.clone(),
                email: email.clone(),
            };
            session
                .update_profile(&fields)
                .context("failed to update user data")?;
        }
        Commands::Avatar { file } => {
            let avatar = read_avatar(file)?;
            session
                .upload_avatar(&avatar)
                .context("failed to upload avatar")?;
        }
        Commands::Logout => session.logout().context("logout failed")?,
    }
    Ok(())
}

/// Build the production session from configuration.
pub fn session(
    config: &Config,
) -> Session<transport::UreqTransport, store::FileTokenStore, render::TerminalRenderer<std::io::Stdout>> {
    Session::new(
        ProfileClient::new(&config.api.url),
        transport::UreqTransport::new(),
        store::FileTokenStore::new(&config.storage.token_file),
        render::TerminalRenderer::stdout(&config.api.upload_url()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn login_parses_credentials() {
        let cli = Cli::try_parse_from(["profile", "login", "-u", "bob", "-p", "pw"]).unwrap();
        match cli.command {
            Commands::Login { username, password } => {
                assert_eq!(username, "bob");
                assert_eq!(password, "pw");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "profile",
            "--api-url",
            "http://api.test",
            "--token-file",
            "/tmp/t.json",
            "-l",
            "debug",
            "whoami",
        ])
        .unwrap();
        let config = cli.apply_overrides(Config::default());
        assert_eq!(config.api.url, "http://api.test");
        assert_eq!(config.api.upload_url(), "http://api.test/uploads");
        assert_eq!(config.storage.token_file, PathBuf::from("/tmp/t.json"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn avatar_content_type_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.png");
        std::fs::write(&path, [137, 80, 78, 71]).unwrap();

        let avatar = read_avatar(&path).unwrap();
        assert_eq!(avatar.file_name, "me.png");
        assert_eq!(avatar.content_type, "image/png");
        assert_eq!(avatar.bytes, vec![137, 80, 78, 71]);
    }

    #[test]
    fn avatar_without_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar");
        std::fs::write(&path, b"").unwrap();

        let avatar = read_avatar(&path).unwrap();
        assert_eq!(avatar.file_name, "avatar");
        assert_eq!(avatar.content_type, "application/octet-stream");
        assert!(avatar.bytes.is_empty());
    }

    #[test]
    fn missing_avatar_file_is_an_error() {
        assert!(read_avatar(Path::new("/nonexistent/me.png")).is_err());
    }
}
