use std::path::PathBuf;

use clap::Parser;
use electives::{CheckResult, Config, CourseCode, Subject, storage};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::instrument;

use super::{ResolveArgs, parse_course, parse_subject, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check whether courses are technical electives")]
pub struct Check {
    /// Course codes to check, e.g. "CS 4820"
    #[clap(value_parser = parse_course)]
    courses: Vec<CourseCode>,

    /// Read course codes from a file (one per line, or the first column of a
    /// .csv/.tsv file)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Check every course the catalog lists under this subject, e.g. CS
    #[arg(short, long, value_parser = parse_subject)]
    pub(super) subject: Option<Subject>,

    /// Write the results as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write counts of the prerequisites the checked courses mention, and
    /// which of them are not approved, as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub(super) analytics: Option<PathBuf>,

    /// Output format for the summary printed to stdout (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: OutputFormat,

    /// Suppress the progress bar and per-course lines
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    pub(super) resolve: ResolveArgs,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Check {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut courses = self.courses.clone();
        if let Some(path) = &self.file {
            let loaded = storage::load_course_list(path)?;
            tracing::info!("loaded {} course(s) from {}", loaded.len(), path.display());
            courses.extend(loaded);
        }

        let roster = self.resolve.roster(config);
        let max_depth = self.resolve.max_depth(config);
        let mut checker = self.resolve.checker(config)?;

        if let Some(subject) = &self.subject {
            courses.extend(checker.list_subject(subject, &roster)?);
        }
        if courses.is_empty() {
            anyhow::bail!(
                "No courses to check. Pass course codes, --file <PATH> or --subject <SUBJECT>."
            );
        }

        let bar = self.progress_bar(courses.len())?;
        let result = checker.check_many_with_progress(&courses, &roster, max_depth, |progress| {
            bar.set_position(progress.completed as u64);
            bar.set_message(progress.code.to_string());
        });
        bar.finish_and_clear();

        if let Some(path) = &self.output {
            storage::write_json(&result, path)?;
        }
        let analytics = match &self.analytics {
            Some(path) => {
                let analytics = checker.analytics(&result);
                storage::write_json(&analytics, path)?;
                Some((path, analytics))
            }
            None => None,
        };

        print!("{}", self.summary(&result)?);

        let failures = checker.fetch_errors();
        if !failures.is_empty() {
            eprintln!(
                "{}",
                format!(
                    "⚠️  {} course(s) could not be fetched and were treated as having no \
                     prerequisites:",
                    failures.len()
                )
                .warning()
            );
            for failure in failures {
                eprintln!("  {}", failure.to_string().dim());
            }
        }

        if let Some(path) = &self.output {
            eprintln!("Wrote results to {}", path.display());
        }
        if let Some((path, analytics)) = analytics {
            eprintln!("Wrote prerequisite counts to {}", path.display());
            if analytics.has_unapproved() {
                eprintln!(
                    "{}",
                    format!(
                        "{} prerequisite(s) are not approved; review 'not_in_whitelist_counts' \
                         to grow the allow-list",
                        analytics.unapproved_code_counts.len()
                    )
                    .dim()
                );
            }
        }

        Ok(())
    }

    fn progress_bar(&self, total: usize) -> anyhow::Result<ProgressBar> {
        if self.quiet {
            return Ok(ProgressBar::hidden());
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        Ok(bar)
    }

    /// Everything written to stdout: the JSON document or the table.
    /// Status lines go to stderr so that JSON output stays parseable.
    fn summary(&self, result: &CheckResult) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Json => Ok(format!("{}\n", storage::to_json(result)?)),
            OutputFormat::Table => Ok(self.table(result)),
        }
    }

    fn table(&self, result: &CheckResult) -> String {
        let mut out = String::new();
        if !self.quiet {
            for (code, qualifies) in result.results() {
                let line = if *qualifies {
                    format!("✅ {code}").success()
                } else {
                    format!("   {code}").dim()
                };
                out.push_str(&line);
                out.push('\n');
            }
            out.push('\n');
        }

        let metadata = result.metadata();
        out.push_str(&format!(
            "{} of {} course(s) are technical electives in {} ({:.1}s)\n",
            metadata.tech_electives_found,
            metadata.total_courses_checked,
            metadata.roster,
            metadata.elapsed_seconds,
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use electives::{AllowList, Checker, DEFAULT_MAX_DEPTH, InMemoryCatalog, Roster};

    use super::*;

    fn parse(args: &[&str]) -> Check {
        Check::try_parse_from(std::iter::once("check").chain(args.iter().copied())).unwrap()
    }

    fn result() -> CheckResult {
        let code = |s: &str| s.parse::<CourseCode>().unwrap();
        let roster: Roster = "FA25".parse().unwrap();
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(code("CS 4820"), roster.clone(), "CS 2800.");
        catalog.insert(code("CS 1110"), roster.clone(), "");
        let allow_list: AllowList = [code("CS 2800")].into_iter().collect();
        Checker::new(allow_list, catalog).check_many(
            &[code("CS 4820"), code("CS 1110")],
            &roster,
            DEFAULT_MAX_DEPTH,
        )
    }

    #[test]
    fn json_summary_is_only_the_document() {
        let check = parse(&["--format", "json", "-o", "results.json", "--analytics", "a.json"]);
        let summary = check.summary(&result()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(json["tech_electives"], serde_json::json!(["CS 4820"]));
        assert!(!summary.contains("Wrote"));
    }

    #[test]
    fn quiet_table_is_one_line() {
        let check = parse(&["-q"]);
        let summary = check.summary(&result()).unwrap();

        assert_eq!(summary.lines().count(), 1);
        assert!(summary.starts_with("1 of 2 course(s) are technical electives in FA25"));
    }
}
