/// Where reports come from: the `task` binary, or memory for tests and demos
use std::collections::HashMap;
use std::ffi::OsString;
use std::time::Instant;

use futures::future::BoxFuture;
use tokio::process::Command;

use super::parse::{parse_report, UUID_LABEL};
use super::{Report, ReportError};

/// Overrides that keep taskwarrior from mutating data while we read it
const READ_ONLY_OPTS: [&str; 2] = ["rc.recurrence:no", "rc.gc:off"];

/// Anything able to produce a report by name
pub trait ReportSource: Send + Sync {
    fn fetch<'a>(&'a self, report: &'a str) -> BoxFuture<'a, Result<Report, ReportError>>;
}

/// Report source backed by the taskwarrior command line
#[derive(Debug, Clone)]
pub struct TaskwarriorSource {
    program: OsString,
    report_width: usize,
    task_data_dir: Option<OsString>,
}

impl TaskwarriorSource {
    /// Create a source that runs `task`; a width of 0 means unlimited
    pub fn new(report_width: usize, task_data_dir: Option<OsString>) -> Self {
        Self {
            program: OsString::from("task"),
            report_width,
            task_data_dir,
        }
    }

    /// Use another executable instead of `task`
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments prepended to every invocation
    pub fn base_args(&self) -> Vec<String> {
        let width = if self.report_width == 0 {
            String::new()
        } else {
            self.report_width.to_string()
        };

        let mut args: Vec<String> = READ_ONLY_OPTS.iter().map(|s| s.to_string()).collect();
        args.push(format!("rc.defaultwidth:{}", width));
        args.push("limit:".to_string());
        args.push("rc.verbose=label".to_string());
        args
    }

    async fn invoke(&self, args: &[String]) -> Result<String, ReportError> {
        let mut cmd_args = self.base_args();
        cmd_args.extend(args.iter().cloned());
        tracing::debug!("Running command: task {}", cmd_args.join(" "));

        let started = Instant::now();
        let mut command = Command::new(&self.program);
        command.args(&cmd_args).stdin(std::process::Stdio::null());
        if let Some(dir) = &self.task_data_dir {
            command.env("TASKDATA", dir);
        }
        let output = command.output().await?;
        tracing::debug!("Command took {}ms to run", started.elapsed().as_millis());

        if !output.status.success() {
            return Err(ReportError::CommandFailed {
                args: cmd_args,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // taskwarrior may split multi-byte chars when truncating columns
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Read a comma separated DOM value such as `rc.report.next.columns`
    async fn dom_get(&self, what: &str) -> Result<Vec<String>, ReportError> {
        let output = self.invoke(&["_get".to_string(), what.to_string()]).await?;
        let line = output
            .lines()
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| ReportError::UnknownReport(what.to_string()))?;

        Ok(line.split(',').map(str::to_string).collect())
    }

    async fn report(&self, name: &str) -> Result<Report, ReportError> {
        let column_arg = format!("rc.report.{}.columns", name);
        let label_arg = format!("rc.report.{}.labels", name);
        let columns = self.dom_get(&column_arg).await?;
        let labels = self.dom_get(&label_arg).await?;
        tracing::trace!(?columns, ?labels, "report definition");
        if columns.len() != labels.len() {
            return Err(ReportError::LabelMismatch {
                columns: columns.len(),
                labels: labels.len(),
            });
        }

        let args = vec![
            name.to_string(),
            format!("{}:uuid,{}", column_arg, columns.join(",")),
            format!("{}:{},{}", label_arg, UUID_LABEL, labels.join(",")),
        ];
        let output = self.invoke(&args).await?;

        parse_report(name, &output, &columns, &labels)
    }
}

impl ReportSource for TaskwarriorSource {
    fn fetch<'a>(&'a self, report: &'a str) -> BoxFuture<'a, Result<Report, ReportError>> {
        Box::pin(self.report(report))
    }
}

/// In-memory report source
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    reports: HashMap<String, Report>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, name: impl Into<String>, report: Report) -> Self {
        self.reports.insert(name.into(), report);
        self
    }
}

impl ReportSource for StaticSource {
    fn fetch<'a>(&'a self, report: &'a str) -> BoxFuture<'a, Result<Report, ReportError>> {
        let result = self
            .reports
            .get(report)
            .cloned()
            .ok_or_else(|| ReportError::UnknownReport(report.to_string()));
        Box::pin(async move { result })
    }
}
