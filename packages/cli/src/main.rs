#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the UCR forecast tools.
//!
//! Each subcommand maps onto one tool and goes through the same
//! [`ucr_forecast_tools::execute_tool`] dispatch an agent host would use,
//! so the CLI doubles as a smoke test for the tool layer. Upstream
//! endpoints come from `UCR_API_BASE_URL`, `FBI_API_BASE_URL`, and
//! `FBI_API_KEY`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use ucr_forecast_tools::{Toolbox, execute_tool};
use ucr_forecast_tools_models::{ToolName, tool_definitions};

/// Query FBI UCR crime forecasts and history.
#[derive(Parser)]
#[command(name = "ucr_forecast_cli")]
#[command(about = "Query FBI UCR crime forecasts and history")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Forecast one offense with confidence intervals.
    Forecast {
        /// Crime type (e.g. `homicide`, `violent-crime`, or an alias).
        offense: String,

        /// Months to forecast (1-12).
        #[arg(long, default_value_t = 6)]
        months_ahead: u32,

        /// Include recent historical actuals for context.
        #[arg(long)]
        include_history: bool,

        /// Output format: `summary` or `detailed`.
        #[arg(long, default_value = "summary")]
        format: String,

        /// 2-letter state code (e.g. `CA`); national when omitted.
        #[arg(long)]
        state: Option<String>,
    },

    /// Fetch multi-year history from the FBI Crime Data Explorer.
    History {
        /// Crime type (e.g. `burglary`).
        offense: String,

        /// First year of the range (2015 or later).
        #[arg(long, default_value_t = 2020)]
        from_year: i32,

        /// Last year of the range (default: current year).
        #[arg(long)]
        to_year: Option<i32>,

        /// Output format: `summary` or `detailed`.
        #[arg(long, default_value = "summary")]
        format: String,

        /// 2-letter state code; national when omitted.
        #[arg(long)]
        state: Option<String>,
    },

    /// Compare forecasts across 2-5 offenses.
    Compare {
        /// Crime types to compare.
        #[arg(required = true, num_args = 2..=5)]
        offenses: Vec<String>,

        /// Months to forecast (1-12).
        #[arg(long, default_value_t = 6)]
        months_ahead: u32,

        /// Comparison metric: `percent_change` or `absolute`.
        #[arg(long, default_value = "percent_change")]
        metric: String,

        /// 2-letter state code; national when omitted.
        #[arg(long)]
        state: Option<String>,
    },

    /// Describe the available forecasting models.
    Info {
        /// Specific offense to describe; lists all models when omitted.
        offense: Option<String>,

        /// 2-letter state code; national when omitted.
        #[arg(long)]
        state: Option<String>,
    },

    /// Print the tool definitions as JSON.
    Definitions,
}

impl Commands {
    /// The tool this subcommand dispatches to, with its JSON parameters.
    fn into_invocation(self) -> Option<(ToolName, serde_json::Value)> {
        match self {
            Self::Forecast {
                offense,
                months_ahead,
                include_history,
                format,
                state,
            } => Some((
                ToolName::UcrForecast,
                json!({
                    "offense": offense,
                    "months_ahead": months_ahead,
                    "include_history": include_history,
                    "format": format,
                    "state": state,
                }),
            )),
            Self::History {
                offense,
                from_year,
                to_year,
                format,
                state,
            } => Some((
                ToolName::UcrHistory,
                json!({
                    "offense": offense,
                    "from_year": from_year,
                    "to_year": to_year,
                    "format": format,
                    "state": state,
                }),
            )),
            Self::Compare {
                offenses,
                months_ahead,
                metric,
                state,
            } => Some((
                ToolName::UcrCompare,
                json!({
                    "offenses": offenses,
                    "months_ahead": months_ahead,
                    "metric": metric,
                    "state": state,
                }),
            )),
            Self::Info { offense, state } => Some((
                ToolName::UcrInfo,
                json!({
                    "offense": offense,
                    "state": state,
                }),
            )),
            Self::Definitions => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let Some((tool, params)) = cli.command.into_invocation() else {
        match serde_json::to_string_pretty(&tool_definitions()) {
            Ok(definitions) => {
                println!("{definitions}");
                return ExitCode::SUCCESS;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                return ExitCode::FAILURE;
            }
        }
    };

    let toolbox = Toolbox::from_env();

    match execute_tool(&toolbox, tool.as_ref(), &params).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
