#![warn(clippy::unwrap_used, clippy::expect_used)]

mod config;
mod errors;
mod rpc;
mod util;

use std::sync::Arc;

use offchain::{
    storage::{rocksdb::RocksDb, Storage},
    OffchainStore,
};
use tokio::select;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat, ServerCommand};
use crate::errors::{AppError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;
    init_tracing(&config)?;

    if config.command == Some(ServerCommand::GenerateKey) {
        let authority = util::generate_key(&config.root_dir)?;
        println!("{}", authority.public_key().to_hex());
        return Ok(());
    }

    let authority = util::load_authority(&config.root_dir, config.secret_key.as_deref())?;
    let data_dir = util::get_data_dir(&config.root_dir).ok_or(AppError::RootDir)?;

    let storage: Arc<dyn Storage> = Arc::new(RocksDb::open(&data_dir)?);
    let store = Arc::new(OffchainStore::open(storage, authority, config.max_height)?);

    let server = rpc::create_rpc_server(config.rpc_laddr.clone(), Arc::clone(&store))?;
    let handle = server.handle();

    tracing::info!(
        rpc_laddr = %config.rpc_laddr,
        data_dir = %data_dir.display(),
        "storage server started"
    );

    select!(
        res = server => {
            if let Err(err) = &res {
                tracing::error!(error = %err, "HTTP server exited unexpectedly");
            }
            res?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            handle.stop(true).await;
        }
    );

    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(store) => store.flush()?,
    }

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_level.directive())?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.log_format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish())?,
    }

    Ok(())
}
