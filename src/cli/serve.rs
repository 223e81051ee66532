//! HTTP API command handler

use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::server::{self, AppState};
use anyhow::Result;
use std::sync::Arc;

/// Run the HTTP API until Ctrl-C
pub fn run(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let state = Arc::new(AppState::new(Pipeline::from_config(config), config.scheme));

    eprintln!("   Listening on http://{}:{}/api/score/{{username}}", host, port);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::serve(state, &host, port))
}
