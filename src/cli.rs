//! Command-line arguments and the run options derived from them
//!
//! Options are resolved from three layers, later ones winning: the config
//! file, the `TASKDATA` environment variable (task data only), and the
//! command line itself.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, UiConfig};
use crate::controller::CommitPolicy;

/// Lean and fast taskwarrior terminal frontend
#[derive(Parser, Debug, Default)]
#[command(name = "taskcell", version, about = "Lean and fast taskwarrior terminal frontend")]
pub struct CliArgs {
    /// Report to show (defaults to the configured report)
    #[arg(value_name = "REPORT")]
    pub report: Option<String>,

    /// Report width in character count, 0 means unlimited
    #[arg(short = 'w', long = "width", value_name = "N")]
    pub width: Option<usize>,

    /// Read only mode, no cell can be edited
    #[arg(short, long)]
    pub read_only: bool,

    /// What to do when an edited cell loses focus with a new value
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_change: Option<CommitPolicy>,

    /// Task data dir, if non default
    #[arg(long, value_name = "DIR")]
    pub task_data: Option<PathBuf>,

    /// Config file to use instead of the default one
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Fully resolved options the application runs with
#[derive(Debug, Clone, PartialEq)]
pub struct RunOpts {
    pub report: String,
    pub report_width: usize,
    pub read_only: bool,
    pub on_change: CommitPolicy,
    pub task_data_dir: Option<OsString>,
    pub ui: UiConfig,
}

impl Default for RunOpts {
    fn default() -> Self {
        CliArgs::default().into_run_opts(&Config::default(), None)
    }
}

impl CliArgs {
    /// Merge the arguments over the config and the `TASKDATA` value
    pub fn into_run_opts(self, config: &Config, env_task_data: Option<OsString>) -> RunOpts {
        let task_data_dir = self
            .task_data
            .map(PathBuf::into_os_string)
            .or(env_task_data)
            .or_else(|| {
                config
                    .report
                    .task_data_dir
                    .clone()
                    .map(PathBuf::into_os_string)
            });

        let opts = RunOpts {
            report: self
                .report
                .unwrap_or_else(|| config.report.default_report.clone()),
            report_width: self.width.unwrap_or(config.report.width),
            read_only: self.read_only || config.editing.read_only,
            on_change: self.on_change.unwrap_or(config.editing.on_change),
            task_data_dir,
            ui: config.ui.clone(),
        };
        tracing::debug!(?opts, "resolved run options");
        opts
    }
}
