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

//! Request, and optionally revoke, an access token for a service account.

mod args;

use anyhow::Result;
use args::Args;
use clap::Parser;
use google_cloud_service_account::credentials::service_account::{Builder, ServiceAccountKey};
use google_cloud_service_account::oauth2::TokenTypeHint;
use google_cloud_service_account::token::GrantRequest;

const DESCRIPTION: &str = concat!(
    "Exchanges a signed JWT-bearer assertion for an access token.",
    " The tool prints the token type, the granted scopes and the expiration time.",
    " It never prints the token itself."
);

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;
    enable_tracing();
    tracing::info!("Configuration: {args:?}");

    let key = ServiceAccountKey::from_file(&args.key_file).await?;
    let mut builder = Builder::from_key(key);
    if let Some(uri) = &args.token_uri {
        builder = builder.with_token_uri(uri);
    }
    let client = builder.build()?;

    let mut request = GrantRequest::new(args.requested_scopes()).with_ttl(args.ttl);
    if let Some(subject) = &args.subject {
        request = request.with_subject(subject);
    }
    let token = client.request_authorization_grant(request).await?;
    println!("token_type: {}", token.token_type);
    println!("scope: {}", token.scope);
    println!("expires_at: {}", token.expires_at);

    if args.revoke {
        let mut slot = Some(token);
        let status = client
            .revoke(&mut slot, Some(TokenTypeHint::AccessToken))
            .await;
        match status.error() {
            None => println!("revoked: confirmed={}", status.is_confirmed()),
            Some(e) => println!("revoked: confirmed=false, error={e}"),
        }
    }
    Ok(())
}

fn enable_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
