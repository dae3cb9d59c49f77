// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Tokio-based file reading for flowbridge.
//!
//! `TokioFileRead` implements the `FileRead` trait from `flowbridge_core` using
//! Tokio's file system operations. It is what lets a `Config` pointed at a
//! service account key file load that file without blocking the runtime.
//!
//! ## Example
//!
//! ```no_run
//! use flowbridge_core::{Context, OsEnv};
//! use flowbridge_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_env(OsEnv);
//!
//!     match ctx.file_read("/path/to/service-account.json").await {
//!         Ok(content) => println!("Read {} bytes", content.len()),
//!         Err(e) => eprintln!("Failed to read file: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use flowbridge_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to read file {path}")).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowbridge_core::Context;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_existing_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{"type":"service_account"}"#)?;

        let ctx = Context::new().with_file_read(TokioFileRead);
        let path = file.path().to_string_lossy().to_string();
        let content = String::from_utf8(ctx.file_read(&path).await?)?;

        assert_eq!(content, r#"{"type":"service_account"}"#);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let ctx = Context::new().with_file_read(TokioFileRead);
        let err = ctx
            .file_read("/definitely/not/here.json")
            .await
            .expect_err("missing file must fail");

        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
