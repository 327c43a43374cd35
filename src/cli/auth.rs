//! Account CLI commands (cloud sign-in)

use clap::Subcommand;

use crate::auth::{SessionStore, SignUpOutcome, SupabaseAuth};
use crate::config::paths::LibroPaths;
use crate::config::settings::Settings;
use crate::error::{LibroError, LibroResult};

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account
    Signup {
        email: String,
        /// Read from the prompt when omitted
        #[arg(long, env = "LIBRO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in and store the session
    Login {
        email: String,
        #[arg(long, env = "LIBRO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Status,
}

fn prompt_password(prompt: &str) -> LibroResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| LibroError::Auth(format!("Failed to read password: {}", e)))
}

fn password_or_prompt(password: Option<String>, confirm: bool) -> LibroResult<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let first = prompt_password("Password: ")?;
    if confirm && prompt_password("Confirm password: ")? != first {
        return Err(LibroError::Auth("Passwords do not match".into()));
    }
    Ok(first)
}

/// Handle an auth command
pub fn handle_auth_command(paths: &LibroPaths, settings: &Settings, cmd: AuthCommands) -> LibroResult<()> {
    let store = SessionStore::new(paths.clone());

    match cmd {
        AuthCommands::Signup { email, password } => {
            let client = SupabaseAuth::from_settings(settings)?;
            let password = password_or_prompt(password, true)?;
            match client.sign_up(&email, &password)? {
                SignUpOutcome::SignedIn(session) => {
                    store.save(&session)?;
                    println!("Account created. Signed in as {}", email);
                }
                SignUpOutcome::ConfirmationRequired { email } => {
                    println!("Account created. Check {} for a confirmation link, then run 'libro auth login'.", email);
                }
            }
        }

        AuthCommands::Login { email, password } => {
            let client = SupabaseAuth::from_settings(settings)?;
            let password = password_or_prompt(password, false)?;
            let session = client.sign_in(&email, &password)?;
            store.save(&session)?;
            println!("Signed in as {}", session.user.email.as_deref().unwrap_or(&email));
        }

        AuthCommands::Logout => {
            let Some(session) = store.load()? else {
                println!("Not signed in.");
                return Ok(());
            };
            if !session.is_expired() {
                // The local session is dropped even when the server call fails
                match SupabaseAuth::from_settings(settings).and_then(|c| c.sign_out(&session)) {
                    Ok(()) => {}
                    Err(e) => tracing::warn!(error = %e, "remote sign-out failed"),
                }
            }
            store.clear()?;
            println!("Signed out.");
        }

        AuthCommands::Status => match store.load()? {
            Some(session) if session.is_expired() => {
                println!("Session expired. Run 'libro auth login' again.");
            }
            Some(session) => {
                let who = session.user.email.as_deref().unwrap_or(&session.user.id);
                println!("Signed in as {}", who);
                println!("Session valid for {} more minutes", session.remaining().num_minutes());
            }
            None => println!("Not signed in."),
        },
    }

    Ok(())
}
