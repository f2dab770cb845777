// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budget;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod migrate;
pub mod models;
pub mod replica_sync;
pub mod repository;
pub mod store;
pub mod utils;
