// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finboard::config::StorageConfig;
use finboard::repository::Repository;
use finboard::store::{FsRecordStore, RecordStore, SqliteKvStore};
use finboard::{cli, commands, db};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finboard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = cli::build_cli().get_matches();
    let config = StorageConfig::from_matches(&matches)?;
    db::ensure_dir(&config.data_dir)?;
    let conn = db::open_or_init(&config.db_path())?;
    let replica = config
        .replica_enabled
        .then(|| Arc::new(FsRecordStore::new(config.replica_root())) as Arc<dyn RecordStore>);

    let mut repo = Repository::new(Box::new(SqliteKvStore::new(conn)), replica);
    repo.start().await;

    let result = commands::run(&mut repo, &matches, &mut std::io::stderr()).await;
    repo.flush().await;
    result
}
