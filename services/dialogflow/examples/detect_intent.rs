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

use std::env;

use anyhow::Result;
use flowbridge_core::{Context, OsEnv};
use flowbridge_dialogflow::{Config, DialogflowClient, MemoryTokenStore};
use flowbridge_file_read_tokio::TokioFileRead;
use flowbridge_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let session_id = args.next().unwrap_or_else(|| "example-session".to_string());
    let text = args.next().unwrap_or_else(|| "hello".to_string());

    // Reads DIALOGFLOW_* and GOOGLE_APPLICATION_CREDENTIALS.
    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::from_env(&ctx);

    let client = DialogflowClient::new(ctx, config, MemoryTokenStore::new());
    let reply = client.send_message(&session_id, &text).await?;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
