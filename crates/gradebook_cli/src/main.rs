//! Command-line entry point for the gradebook core.
//!
//! # Responsibility
//! - Wire configuration, logging and the database into one `Gradebook`.
//! - Render action results and the analytics report as plain text.

use clap::{Parser, Subcommand};
use gradebook_core::db::open_db;
use gradebook_core::{init_logging, ActionResponse, CoreConfig, Gradebook};
use log::{error, info};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gradebook_cli")]
#[command(about = "Student, course and grade tracking over SQLite", long_about = None)]
struct Cli {
    /// Defaults to `ping` when omitted
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print core health check and version
    Ping,
    /// Add the sample students, courses and grades
    Seed,
    /// Delete every student, course and grade
    Reset,
    /// Print the analytics report
    Report,
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Seed => "seed",
            Self::Reset => "reset",
            Self::Report => "report",
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = CoreConfig::from_env();

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let command = cli.command.unwrap_or(Command::Ping);
    info!(
        "event=cli_command module=cli status=start command={}",
        command.name()
    );

    if command == Command::Ping {
        println!("gradebook_core ping={}", gradebook_core::ping());
        println!("gradebook_core version={}", gradebook_core::core_version());
        return ExitCode::SUCCESS;
    }

    match run_with_store(&config, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(
                "event=cli_command module=cli status=error command={}",
                command.name()
            );
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run_with_store(config: &CoreConfig, command: Command) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| format!("cannot open database: {err}"))?;
    let gradebook =
        Gradebook::try_new(&conn).map_err(|err| format!("cannot use database: {err}"))?;

    match command {
        Command::Seed => report_action(gradebook.seed_sample_data(&mut rand::thread_rng())),
        Command::Reset => report_action(gradebook.reset_data()),
        Command::Report => {
            print_report(&gradebook);
            Ok(())
        }
        Command::Ping => Ok(()),
    }
}

fn report_action(response: ActionResponse) -> Result<(), String> {
    if response.ok {
        println!("{}", response.message);
        Ok(())
    } else {
        Err(response.message)
    }
}

fn print_report(gradebook: &Gradebook<'_>) {
    let snapshot = gradebook.analytics_snapshot();
    if snapshot.is_empty() {
        println!("No data yet. Run `gradebook_cli seed` to add sample data.");
        return;
    }

    let summary = &snapshot.summary;
    println!(
        "Students: {}  Average GPA: {:.2}  Pass rate: {:.2}%  Honor rate: {:.2}%  At risk: {}",
        summary.student_count,
        summary.average_gpa,
        summary.pass_rate,
        summary.honor_rate,
        summary.at_risk_count
    );

    println!();
    println!("{:<10} {:<24} {:>5}  At risk", "ID", "Name", "GPA");
    for standing in snapshot.students_by_gpa_desc() {
        println!(
            "{:<10} {:<24} {:>5.2}  {}",
            standing.student_id,
            standing.name,
            standing.gpa,
            if standing.is_at_risk { "yes" } else { "" }
        );
    }

    for (name, course) in &snapshot.courses {
        println!();
        println!(
            "{name} ({}, {} credits): {} grades, average {:.2}",
            course.code, course.credits, course.grade_count, course.average_grade
        );
        for (rank, entry) in course.top_students.iter().enumerate() {
            println!(
                "  {}. {} {} {:.0} ({})",
                rank + 1,
                entry.student_id,
                entry.name,
                entry.grade,
                entry.letter
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn subcommands_parse_and_default_to_none() {
        let cli = Cli::try_parse_from(["gradebook_cli"]).unwrap();
        assert_eq!(cli.command, None);

        for (arg, expected) in [
            ("ping", Command::Ping),
            ("seed", Command::Seed),
            ("reset", Command::Reset),
            ("report", Command::Report),
        ] {
            let cli = Cli::try_parse_from(["gradebook_cli", arg]).unwrap();
            assert_eq!(cli.command, Some(expected));
        }
    }

    #[test]
    fn help_is_rendered_and_unknown_commands_are_rejected() {
        let help = Cli::try_parse_from(["gradebook_cli", "--help"]).err().unwrap();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);

        let unknown = Cli::try_parse_from(["gradebook_cli", "grade-all"])
            .err()
            .unwrap();
        assert!(matches!(
            unknown.kind(),
            ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument
        ));
    }
}
