use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::cli::Cli;

const DB_FILE_NAME: &str = "quotebook.sqlite";

#[derive(Clone, Debug)]
pub struct Configuration {
    pub listen: SocketAddr,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub reset: bool,
    pub provider_url: Url,
    pub quote_count: usize,
    pub provider_timeout: Duration,
    pub log_file: Option<PathBuf>,
    pub cors: bool,
}

impl Configuration {
    pub fn from_cli(cli: &Cli) -> Self {
        let data_dir = PathBuf::from(&cli.data_dir);
        let database_path = match cli.database_url.as_deref() {
            Some(url) => database_path_from_url(url),
            None => data_dir.join(DB_FILE_NAME),
        };

        Self {
            listen: SocketAddr::new(cli.host, cli.port),
            data_dir,
            database_path,
            reset: cli.reset,
            provider_url: cli.provider_url.clone(),
            quote_count: cli.quote_count,
            provider_timeout: Duration::from_secs(cli.provider_timeout_secs),
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            cors: !cli.no_cors,
        }
    }
}

fn database_path_from_url(url: &str) -> PathBuf {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    PathBuf::from(path)
}
