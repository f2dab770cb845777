// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod primary;
pub mod replica;

pub use primary::{KeyValueStore, MemoryKvStore, SqliteKvStore, SyncStore};
pub use replica::{Collection, FsRecordStore, MemoryRecordStore, RecordStore};
