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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Env values used to configure the dialogflow client.
pub const DIALOGFLOW_PROJECT_ID: &str = "DIALOGFLOW_PROJECT_ID";
pub const DIALOGFLOW_CLIENT_EMAIL: &str = "DIALOGFLOW_CLIENT_EMAIL";
pub const DIALOGFLOW_PRIVATE_KEY: &str = "DIALOGFLOW_PRIVATE_KEY";
pub const DIALOGFLOW_LANGUAGE_CODE: &str = "DIALOGFLOW_LANGUAGE_CODE";
pub const DIALOGFLOW_SCOPE: &str = "DIALOGFLOW_SCOPE";
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

pub const DEFAULT_ENDPOINT: &str = "https://dialogflow.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime of a signed assertion. Google rejects anything longer than one hour.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// AsciiSet for a single URL path segment.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
