// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use crate::db;

/// Where the two backends live and whether the structured replica is used.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub replica_enabled: bool,
}

impl StorageConfig {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let data_dir = match m.get_one::<String>("data-dir") {
            Some(dir) => PathBuf::from(dir.trim()),
            None => db::default_data_dir()?,
        };
        Ok(Self {
            data_dir,
            replica_enabled: !m.get_flag("no-replica"),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(db::DB_FILE)
    }

    pub fn replica_root(&self) -> PathBuf {
        self.data_dir.join(db::REPLICA_DIR)
    }
}
