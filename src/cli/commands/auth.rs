use clap::Subcommand;
use serde_json::json;

use crate::cli::config::ClientContext;
use crate::cli::utils::{output_success, resolve_password};
use crate::cli::OutputFormat;
use crate::models::Credentials;
use crate::services::AuthService;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create a new account")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Login and store the session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = crate::config::config();
    let mut ctx = ClientContext::from_config(config)?;
    let service = AuthService::new(&ctx.gateway);

    match cmd {
        AuthCommands::Register { email, password } => {
            let credentials = Credentials::new(email, resolve_password(password)?);
            let message = service.register(&ctx.auth, &credentials).await?;
            output_success(
                &output_format,
                &format!("{} - you can now log in", message),
                Some(json!({ "email": credentials.email })),
            )
        }
        AuthCommands::Login { email, password } => {
            let credentials = Credentials::new(email, resolve_password(password)?);
            service.login(&mut ctx.auth, &credentials).await?;
            output_success(
                &output_format,
                &format!("Logged in as {}", credentials.email),
                Some(json!({ "email": credentials.email })),
            )
        }
        AuthCommands::Logout => {
            service.logout(&mut ctx.auth)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let authenticated = ctx.auth.is_authenticated();
            let server = ctx.gateway.base_url().to_string();
            let message = if authenticated {
                format!("Logged in to {}", server)
            } else {
                format!("Not logged in to {}", server)
            };
            output_success(
                &output_format,
                &message,
                Some(json!({ "authenticated": authenticated, "server": server })),
            )
        }
    }
}
