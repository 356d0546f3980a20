//! Console host for the userboard page: renders the user sections and runs
//! the signup form from the command line.

mod host;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::debug;
use userboard_core::types::ACCESS_TOKEN_KEY;
use userboard_core::view::PAGE_CONTAINERS;
use userboard_core::{
    load_page, ApiClient, AuthToken, Config, FormData, JsonFileStore, KeyValueStore,
    MemoryDocument, SignupFlow, SubmitOutcome, UreqTransport,
};

use host::{print_document, ConsoleHost};

#[derive(Parser)]
#[command(name = "userboard")]
#[command(about = "User directory page client", long_about = None)]
struct Cli {
    /// API base URL (overrides USERBOARD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Token storage file (overrides USERBOARD_STORAGE)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the users, birthdays and single-user sections
    Load {
        /// User shown in the single-user section (overrides USERBOARD_USER_ID)
        #[arg(long)]
        user_id: Option<i64>,
    },
    /// Submit the signup form
    Signup {
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        born_date: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Store the access token used by `load`
    SetToken { token: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userboard=info,userboard_core=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load().context("loading configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }
    debug!(?config, "configuration loaded");

    let mut store = JsonFileStore::open(&config.storage_path)
        .with_context(|| format!("opening {}", config.storage_path.display()))?;

    match cli.command {
        Commands::Load { user_id } => {
            let token = AuthToken::load(&store);
            let client = ApiClient::new(&config.api_url, token, UreqTransport::new());
            let mut document = MemoryDocument::with_containers(&PAGE_CONTAINERS);

            let report = load_page(&client, &mut document, user_id.unwrap_or(config.user_id));
            print_document(&mut io::stdout(), &document)?;

            let failed = [&report.users, &report.birthdays, &report.user]
                .iter()
                .filter(|r| r.is_err())
                .count();
            if failed > 0 {
                bail!("{failed} of 3 sections failed to load");
            }
        }
        Commands::Signup {
            first_name,
            last_name,
            username,
            email,
            password,
            born_date,
            description,
        } => {
            let form = FormData::new()
                .with("first_name", &first_name)
                .with("last_name", &last_name)
                .with("username", &username)
                .with("email", &email)
                .with("password", &password)
                .with("born_date", &born_date)
                .with("description", &description);
            let client = ApiClient::new(&config.api_url, AuthToken::none(), UreqTransport::new());
            let mut host = ConsoleHost::stdio();

            match SignupFlow::new().submit(&form, &client, &mut host) {
                SubmitOutcome::Created(_) => {}
                SubmitOutcome::Failed(e) => bail!("signup failed: {e}"),
                SubmitOutcome::Ignored => bail!("signup already in progress"),
            }
        }
        Commands::SetToken { token } => {
            store
                .set(ACCESS_TOKEN_KEY, &token)
                .with_context(|| format!("writing {}", store.path().display()))?;
            println!("token saved to {}", store.path().display());
        }
    }

    Ok(())
}
