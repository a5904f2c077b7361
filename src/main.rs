use clap::{Parser, Subcommand};

use recipebox::app::{build_app, serve};
use recipebox::state::{run_migrations, AppState};
use recipebox::users::repo::User;

#[derive(Debug, Parser)]
#[command(name = "recipebox", about = "Recipe management API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create a staff user with superuser rights.
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "recipebox=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();
    let state = AppState::init().await?;
    run_migrations(&state.db).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let app = build_app(state);
            serve(app).await?;
        }
        Command::CreateSuperuser { email, password } => {
            let user = User::create_superuser(&state.db, &email, &password).await?;
            tracing::info!(user_id = %user.id, email = %user.email, "superuser created");
            println!("superuser {} created", user.email);
        }
    }

    Ok(())
}
