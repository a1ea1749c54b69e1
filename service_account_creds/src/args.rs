// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::bail;
use clap::{Parser, ValueEnum};
use google_cloud_service_account::scopes::{
    ApiScopes, Calendar, CloudPlatform, Drive, ScopeTier, ScopeTiers,
};
use humantime::parse_duration;
use std::path::PathBuf;
use std::time::Duration;

/// Command line options.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = super::DESCRIPTION)]
pub struct Args {
    /// The service account key file.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub key_file: PathBuf,

    /// The scopes to request.
    ///
    /// Use either `--scope` or `--api`.
    #[arg(long = "scope")]
    pub scopes: Vec<String>,

    /// Request the scopes of a well-known API.
    #[arg(long, value_enum)]
    pub api: Option<Api>,

    /// The access level requested with `--api`.
    #[arg(long, value_enum, default_value_t = Tier::ReadOnly)]
    pub tier: Tier,

    /// The requested token lifetime.
    #[arg(long, value_parser = parse_duration, default_value = "1h")]
    pub ttl: Duration,

    /// Impersonate this user, requires domain-wide delegation.
    #[arg(long)]
    pub subject: Option<String>,

    /// Override the token endpoint.
    #[arg(long)]
    pub token_uri: Option<String>,

    /// Revoke the token after it is issued.
    #[arg(long, default_value_t = false)]
    pub revoke: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Api {
    Calendar,
    CloudPlatform,
    Drive,
}

impl Api {
    fn tiers(self) -> ScopeTiers {
        match self {
            Self::Calendar => Calendar::SCOPES,
            Self::CloudPlatform => CloudPlatform::SCOPES,
            Self::Drive => Drive::SCOPES,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Tier {
    Full,
    ReadOnly,
    ReadAndWrite,
}

impl From<Tier> for ScopeTier {
    fn from(value: Tier) -> Self {
        match value {
            Tier::Full => ScopeTier::Full,
            Tier::ReadOnly => ScopeTier::ReadOnly,
            Tier::ReadAndWrite => ScopeTier::ReadAndWrite,
        }
    }
}

impl Args {
    /// Validates the arguments after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.scopes.is_empty(), self.api) {
            (true, None) => bail!("missing scopes, use --scope or --api"),
            (false, Some(api)) => bail!("--scope and --api {api:?} cannot be used together"),
            _ => Ok(()),
        }
    }

    /// The scopes to request.
    pub fn requested_scopes(&self) -> Vec<String> {
        match self.api {
            Some(api) => api
                .tiers()
                .scopes(self.tier.into())
                .iter()
                .map(|s| s.to_string())
                .collect(),
            None => self.scopes.clone(),
        }
    }
}
