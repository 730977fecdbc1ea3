//! Parse CLI - Call cloud functions and manage sessions against a Parse server

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use parse_lib::request::CallFunctionRequest;
use parse_lib::response::decode_function_result;
use parse_lib::{ParseClient, Params, SessionToken};
use serde_json::Value;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "parse")]
#[command(version)]
#[command(about = "Call cloud functions and manage sessions on a Parse server", long_about = None)]
#[command(after_help = "Connection settings are read from PARSE_APPLICATION_ID, PARSE_REST_API_KEY, \
PARSE_MASTER_KEY, PARSE_SCHEME, PARSE_HOST and PARSE_MOUNT_POINT (a .env file is loaded first).")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a cloud function and print its result
    Call {
        /// The function to call
        #[arg(value_name = "NAME")]
        name: String,

        /// A parameter as key=value; the value is parsed as JSON, falling back to a string
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, Value)>,

        /// Run the call as the user owning this session token
        #[arg(long, env = "PARSE_SESSION_TOKEN", hide_env_values = true)]
        session_token: Option<String>,
    },

    /// Log in with a username and password
    Login {
        #[arg(value_name = "USERNAME")]
        username: String,

        /// The password (prefer the environment variable)
        #[arg(long, env = "PARSE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the user owning a session token
    Me {
        #[arg(long, env = "PARSE_SESSION_TOKEN", hide_env_values = true)]
        session_token: String,
    },
}

/// Parses `key=value`, reading the value as JSON when possible.
fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,parse_lib=info,parse=info".to_string(),
            2 => "info,parse_lib=debug,parse=debug".to_string(),
            _ => "debug,parse_lib=trace,parse=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn call(
    client: &ParseClient,
    name: String,
    params: Vec<(String, Value)>,
    session_token: Option<String>,
) -> Result<()> {
    let params: Params = params.into_iter().collect();
    let session = session_token.map(SessionToken::from);
    let request = CallFunctionRequest::new(name, Some(params), session)?;

    let body = client.dispatch(request).await?;
    let result: Value = decode_function_result(&body)?;
    print_json(&result)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    let client = ParseClient::from_env().wrap_err("could not configure the Parse client")?;
    tracing::debug!(host = client.config().host(), "Parse CLI starting");

    match cli.command {
        Commands::Call {
            name,
            params,
            session_token,
        } => call(&client, name, params, session_token)
            .await
            .wrap_err("cloud function call failed"),
        Commands::Login { username, password } => {
            if password.is_empty() {
                return Err(eyre!("password must not be empty"));
            }
            let session = client
                .login(&username, &password)
                .await
                .wrap_err_with(|| format!("login as '{username}' failed"))?;
            print_json(session.user())?;
            println!("session token: {}", session.session_token().as_str());
            Ok(())
        }
        Commands::Me { session_token } => {
            let session = client
                .become_user(session_token)
                .await
                .wrap_err("session token was not accepted")?;
            print_json(session.user())
        }
    }
}
