//! HEALTH command - Check that the server is up.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// Arguments for the health command.
#[derive(Args)]
pub struct HealthArgs {}

/// Response from GET /health.
#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HumanReadable for HealthResponse {
    fn print_human(&self) {
        let status = if self.status == "healthy" {
            self.status.green().bold()
        } else {
            self.status.red().bold()
        };
        println!("{} {}", self.service.cyan(), status);
    }
}

/// Execute the health command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    _args: HealthArgs,
) -> Result<()> {
    let url = format!("{}/health", base_url);
    let response: HealthResponse = make_request(client.get(&url)).await?;
    output(&response, human)
}
