use std::{path::PathBuf, sync::Arc};

use addrsuggest::{client::HttpSearchClient, config, models::Config};

/// Initialize logger.
pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            use std::io::Write;
            let level = if record.level() != log::Level::Info {
                format!("[{}] ", record.level())
            } else {
                String::new()
            };
            writeln!(
                buf,
                "{} {}:{} {}{}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                level,
                record.args()
            )
        })
        .init();
}

/// Load and merge config files, then apply the environment and the
/// --api-base flag, in that order of precedence.
pub fn init_config(paths: &[PathBuf], api_base: Option<&str>) -> Config {
    match config::resolve(paths, api_base, |k| std::env::var(k).ok()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Create the HTTP search client.
pub fn init_client(cfg: &Config) -> Arc<HttpSearchClient> {
    match HttpSearchClient::new(&cfg.api) {
        Ok(c) => {
            log::info!("address API: {}", c.base_url());
            Arc::new(c)
        }
        Err(e) => {
            log::error!(
                "error initializing search client: {}. Set api.base_url, ${} or --api-base.",
                e,
                config::ENV_API_BASE_URL
            );
            std::process::exit(1);
        }
    }
}
