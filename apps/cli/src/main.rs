use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pineapple_auth::{FileSessionStorage, SessionStore};
use pineapple_client::types::RegisterRequest;
use pineapple_client::PineappleClient;
use pineapple_config::{load as load_config, ApiMode};
use tracing::info;

mod render;
mod telemetry;

#[derive(Parser)]
#[command(name = "pineapple")]
#[command(about = "Command-line client for the Pineapple Wallet API")]
#[command(version)]
struct Cli {
    /// Override `api.mode` from configuration (dev or prod)
    #[arg(long, global = true)]
    mode: Option<ApiMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Finish a Google sign-in with the tokens from the callback URL
    OauthCallback {
        #[arg(long)]
        access_token: Option<String>,
        #[arg(long)]
        refresh_token: Option<String>,
    },
    /// List portfolios
    Portfolios {
        /// Only portfolios other users shared with you
        #[arg(long)]
        shared: bool,
    },
    /// Total value of everything you can see
    NetWorth {
        #[arg(long)]
        currency: Option<String>,
    },
    /// List pending portfolio invitations
    Invitations,
    /// Accept or decline an invitation
    Respond {
        id: String,
        #[arg(value_enum)]
        answer: Answer,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Answer {
    Accept,
    Decline,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;

    let mut config = load_config().context("failed to load configuration")?;
    if let Some(mode) = cli.mode {
        config.api.mode = mode;
    }

    let store = SessionStore::open(FileSessionStorage::new(config.session.storage_path.clone()));
    let client = PineappleClient::from_config(
        &config,
        store,
        Arc::new(|| eprintln!("Your session has expired. Run `pineapple login` to sign in again.")),
    )?;

    run(&client, cli.command).await
}

async fn run(client: &PineappleClient, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let user = client.login(&email, &password).await.context("sign-in failed")?;
            println!("Signed in as {}", render::user(&user));
        }
        Commands::Register {
            email,
            name,
            password,
        } => {
            let user = client
                .register(&RegisterRequest {
                    email,
                    password,
                    name,
                })
                .await
                .context("registration failed")?;
            println!("Welcome, {}", render::user(&user));
        }
        Commands::Logout => {
            client.logout().await;
            println!("Signed out");
        }
        Commands::Whoami => {
            if !client.session().is_authenticated() {
                println!("Not signed in");
                return Ok(());
            }

            let user = client.users().me().await.context("failed to load profile")?;
            client.session().set_user(user.clone());
            println!("{}", render::user(&user));
        }
        Commands::OauthCallback {
            access_token,
            refresh_token,
        } => {
            let user = client
                .complete_oauth_callback(access_token.as_deref(), refresh_token.as_deref())
                .await
                .context("identity provider sign-in failed")?;
            println!("Signed in as {}", render::user(&user));
        }
        Commands::Portfolios { shared } => {
            let portfolios = if shared {
                client.sharing().shared_with_me().await
            } else {
                client.portfolios().list().await
            }
            .context("failed to list portfolios")?;

            if portfolios.is_empty() {
                println!("No portfolios");
            }
            for portfolio in &portfolios {
                println!("{}", render::portfolio(portfolio));
            }
        }
        Commands::NetWorth { currency } => {
            let net_worth = client
                .currency()
                .net_worth(currency.as_deref())
                .await
                .context("failed to load net worth")?;
            for line in render::net_worth(&net_worth) {
                println!("{line}");
            }
        }
        Commands::Invitations => {
            let invitations = client
                .sharing()
                .invitations()
                .await
                .context("failed to list invitations")?;

            if invitations.is_empty() {
                println!("No pending invitations");
            }
            for invitation in &invitations {
                println!("{}", render::invitation(invitation));
            }
        }
        Commands::Respond { id, answer } => {
            let accept = answer == Answer::Accept;
            client
                .sharing()
                .respond_to_invitation(&id, accept)
                .await
                .context("failed to answer invitation")?;
            info!(invitation = %id, accept, "invitation answered");
            println!("Invitation {}", if accept { "accepted" } else { "declined" });
        }
    }

    Ok(())
}
