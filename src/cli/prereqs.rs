use clap::Parser;
use electives::{Config, CourseCode, resolve::CacheEntry};
use tracing::instrument;

use super::{ResolveArgs, parse_course, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Show the direct prerequisites the catalog lists for a course")]
pub struct Prereqs {
    /// The course to look up, e.g. "CS 4820"
    #[clap(value_parser = parse_course)]
    course: CourseCode,

    #[command(flatten)]
    resolve: ResolveArgs,
}

impl Prereqs {
    #[instrument(level = "debug", skip_all, fields(course = %self.course))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let roster = self.resolve.roster(config);
        let mut checker = self.resolve.checker(config)?;

        match checker.prerequisites(&self.course, &roster).clone() {
            CacheEntry::Known(set) if set.is_empty() => {
                println!("{} has no prerequisites in {roster}", self.course);
            }
            CacheEntry::Known(set) => {
                for code in &set {
                    let approved = checker.allow_list().contains(code);
                    let line = if approved {
                        format!("{code} (approved)").success()
                    } else {
                        code.to_string()
                    };
                    println!("{line}");
                }
            }
            CacheEntry::Unavailable => {
                for failure in checker.fetch_errors() {
                    eprintln!("{}", failure.to_string().warning());
                }
                anyhow::bail!("Could not fetch {} from the {roster} catalog", self.course);
            }
        }

        Ok(())
    }
}
