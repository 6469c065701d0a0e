use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tistory::{
    api::DEFAULT_BASE_URL,
    oauth::{StoredToken, DEFAULT_TOKEN_FILE},
    Config, ResponseFormat, Tistory,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tistory", version, about = "Talk to the Tistory API")]
struct Cli {
    /// The JSON configuration used to authorize.
    #[arg(long, short, global = true, default_value = "config/config.json")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authorize via the configured session cookie and store an access token.
    Token {
        #[arg(long, short, default_value = DEFAULT_TOKEN_FILE)]
        output: PathBuf,
    },
    /// Call an API endpoint, e.g. `tistory call blog info`.
    Call {
        /// Endpoint names, outermost first.
        #[arg(required = true)]
        segments: Vec<String>,
        /// Parameters as `key=value`.
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        #[arg(long, default_value = "json")]
        format: ResponseFormat,
        /// A file to upload alongside the parameters.
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        access_token: Option<String>,
        /// Read the access token from a file written by `token`.
        #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
        token_file: PathBuf,
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
}

fn parse_param(param: &str) -> Result<(String, String), String> {
    param
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{param}`"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> tistory::Result<()> {
    match cli.command {
        Command::Token { output } => {
            let config = Config::load(&cli.config)?;
            let flow = config.oauth_flow()?;
            flow.write(&output).await?;
            info!(path = %output.display(), "wrote access token");
        }
        Command::Call {
            segments,
            params,
            format,
            file,
            access_token,
            token_file,
            base_url,
        } => {
            let access_token = match access_token {
                Some(token) => token,
                None => StoredToken::load(&token_file).await?.access_token,
            };
            let tistory = Tistory::builder(access_token)
                .format(format)
                .base_url(base_url)
                .build()?;

            let endpoint = segments
                .iter()
                .fold(tistory.root(), |endpoint, name| endpoint.access(name.as_str()));
            let response = endpoint.invoke(params, file.as_deref()).await?;
            response.raise_for_status()?;
            println!("{}", response.text());
        }
    }
    Ok(())
}
