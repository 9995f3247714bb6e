use crate::{Config, Executor, Result};

use rowbridge_core::Error;
use url::Url;

impl Executor {
    /// Opens an executor for a connection URL, picking the driver by scheme.
    pub fn connect(url: &str, config: &Config) -> Result<Executor> {
        let parsed = Url::parse(url)
            .map_err(|err| Error::invalid_config(format!("invalid connection URL `{url}`: {err}")))?;

        match parsed.scheme() {
            "sqlite" => connect_sqlite(url, config),
            scheme => Err(Error::invalid_config(format!(
                "unsupported database; scheme={scheme}; url={url}"
            ))),
        }
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str, config: &Config) -> Result<Executor> {
    let driver = rowbridge_driver_sqlite::Sqlite::new(url)?
        .with_statement_timeout(config.statement_timeout());
    Executor::new(driver)
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str, _config: &Config) -> Result<Executor> {
    Err(Error::invalid_config("`sqlite` feature not enabled"))
}
