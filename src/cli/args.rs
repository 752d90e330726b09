use clap::Parser;
use std::env;
use url::Url;

use crate::provider::DEFAULT_PROVIDER_URL;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Browse random Simpsons quotes and keep your favorites",
    long_about = "A small web application that fetches random quotes from a public quotes API and stores favorites in SQLite."
)]
pub struct Cli {
    #[arg(
        long,
        env = "QUOTEBOOK_HOST",
        default_value = "127.0.0.1",
        value_name = "ADDR",
        help = "Interface to listen on"
    )]
    pub host: std::net::IpAddr,

    #[arg(
        short = 'p',
        long,
        env = "PORT",
        default_value_t = 3000u16,
        value_name = "PORT",
        help = "TCP port to listen on"
    )]
    pub port: u16,

    #[arg(
        long,
        env = "QUOTEBOOK_DATA_DIR",
        default_value = ".quotebook/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long,
        env = "DATABASE_URL",
        value_name = "PATH",
        help = "SQLite database file (sqlite:// prefix accepted); defaults to DIR/quotebook.sqlite"
    )]
    pub database_url: Option<String>,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long,
        env = "QUOTES_PROVIDER_URL",
        default_value = DEFAULT_PROVIDER_URL,
        value_name = "URL",
        help = "Endpoint of the random quotes API"
    )]
    pub provider_url: Url,

    #[arg(
        long,
        default_value_t = 10usize,
        value_name = "N",
        help = "Number of random quotes shown on the home page"
    )]
    pub quote_count: usize,

    #[arg(
        long,
        default_value_t = 10u64,
        value_name = "SECS",
        help = "Give up on the quotes API after SECS seconds"
    )]
    pub provider_timeout_secs: u64,

    #[arg(
        long = "log-file",
        env = "QUOTEBOOK_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(long, default_value_t = false, help = "Do not send CORS headers")]
    pub no_cors: bool,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
