use clap::Parser;
use electives::{Config, CourseCode};
use tracing::instrument;

use super::{ResolveArgs, parse_course, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Show how a single course is resolved, node by node")]
pub struct Trace {
    /// The course to resolve, e.g. "CS 4820"
    #[clap(value_parser = parse_course)]
    course: CourseCode,

    #[command(flatten)]
    pub(super) resolve: ResolveArgs,
}

impl Trace {
    #[instrument(level = "debug", skip_all, fields(course = %self.course))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let roster = self.resolve.roster(config);
        let max_depth = self.resolve.max_depth(config);
        let mut checker = self.resolve.checker(config)?;

        let trace = checker.trace(&self.course, &roster, max_depth);

        print!("{trace}");
        println!();
        if trace.qualifies {
            println!(
                "{}",
                format!("✅ {} is a technical elective in {roster}", self.course).success()
            );
        } else {
            println!(
                "{}",
                format!(
                    "{} is not a technical elective in {roster} (max depth {max_depth})",
                    self.course
                )
                .warning()
            );
        }

        for failure in checker.fetch_errors() {
            eprintln!("{}", format!("fetch failed: {failure}").dim());
        }

        Ok(())
    }
}
