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

//! Core components for the flowbridge workspace.
//!
//! This crate provides the foundational types and traits shared by the
//! flowbridge service crates.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending, and environment access
//! - **Error**: A single error type carrying an [`ErrorKind`] so callers can tell configuration,
//!   credential and protocol failures apart
//! - **Encoding**: The [`Base64Url`] encoder used to build JWT segments
//!
//! ## Example
//!
//! ```
//! use flowbridge_core::{Base64Url, Context, StaticEnv};
//! use std::collections::HashMap;
//!
//! let ctx = Context::new().with_env(StaticEnv {
//!     envs: HashMap::from([("DIALOGFLOW_PROJECT_ID".to_string(), "demo".to_string())]),
//! });
//! assert_eq!(ctx.env_var("DIALOGFLOW_PROJECT_ID").as_deref(), Some("demo"));
//!
//! assert_eq!(Base64Url::URL_SAFE.encode("hi"), "aGk=");
//! ```
//!
//! ## Traits
//!
//! - [`FileRead`]: For asynchronous file reading
//! - [`HttpSend`]: For sending HTTP requests
//! - [`Env`]: For environment variable access

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod encoding;
pub use encoding::Base64Url;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::NoopEnv;
pub use context::OsEnv;
pub use context::StaticEnv;
mod fs;
pub use fs::FileRead;
pub use fs::NoopFileRead;
mod http;
pub use http::HttpSend;
pub use http::NoopHttpSend;

mod error;
pub use error::{Error, ErrorKind, Result};
