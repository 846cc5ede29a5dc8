//! school-admin - read-only console over the school store

use anyhow::Context;
use clap::{Parser, Subcommand};
use school_client::logger::init_logger_with_file;
use school_client::{
    AssignmentRepository, CannedQuery, ClientConfig, DataStore, JobTitleRepository, LogConfig,
    ReportGateway, RestStore, ScheduleRepository, UserRepository,
};
use shared::format;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "school-admin", version, about = "Read-only console over the school store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List job titles with their base salary
    JobTitles,
    /// List users
    Users,
    /// List schedules
    Schedules,
    /// List assignments with user, job title and schedule labels
    Assignments,
    /// Users assigned to a job title, with their schedule
    Report {
        /// Job title label; several words are joined with spaces
        job_title: Vec<String>,
    },
    /// List the canned queries
    Queries,
    /// Run a canned query
    Query {
        /// Id shown by `queries`
        id: u32,
    },
}

/// Render rows as left-aligned columns
fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<w$}", w = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(headers.to_vec()));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
    if rows.is_empty() {
        println!("(no rows)");
    }
}

async fn run(store: Arc<dyn DataStore>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::JobTitles => {
            let items = JobTitleRepository::new(store).list().await?;
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|j| vec![j.id.to_string(), j.name.clone(), format::salary(&j.base_salary)])
                .collect();
            print_table(&["ID", "JOB TITLE", "BASE SALARY"], &rows);
        }
        Command::Users => {
            let items = UserRepository::new(store).list().await?;
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|u| {
                    vec![
                        u.id.to_string(),
                        u.full_name.clone(),
                        u.email.clone(),
                        u.phone.clone().unwrap_or_else(|| format::NOT_AVAILABLE.into()),
                    ]
                })
                .collect();
            print_table(&["ID", "NAME", "EMAIL", "PHONE"], &rows);
        }
        Command::Schedules => {
            let items = ScheduleRepository::new(store).list().await?;
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|s| {
                    vec![
                        s.id.to_string(),
                        format::time_hm(Some(&s.entry_time)),
                        format::time_hm(Some(&s.exit_time)),
                    ]
                })
                .collect();
            print_table(&["ID", "ENTRY", "EXIT"], &rows);
        }
        Command::Assignments => {
            let listing = AssignmentRepository::new(Arc::clone(&store))
                .list_joined(
                    &UserRepository::new(Arc::clone(&store)),
                    &JobTitleRepository::new(Arc::clone(&store)),
                    &ScheduleRepository::new(store),
                )
                .await?;
            for e in &listing.lookup_errors {
                eprintln!("warning: {e}");
            }
            let rows: Vec<Vec<String>> = listing
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.id().to_string(),
                        r.user.to_string(),
                        r.job_title.to_string(),
                        r.schedule.to_string(),
                        r.effective_date(),
                    ]
                })
                .collect();
            print_table(&["ID", "USER", "JOB TITLE", "SCHEDULE", "SINCE"], &rows);
        }
        Command::Report { job_title } => {
            let label = job_title.join(" ");
            let rows = ReportGateway::new(store).users_by_job_title(&label).await?;
            if rows.is_empty() {
                println!("No users found for this job title");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.user_name.clone(),
                        r.email.clone(),
                        r.entry_display(),
                        r.exit_display(),
                    ]
                })
                .collect();
            print_table(&["NAME", "EMAIL", "ENTRY", "EXIT"], &rows);
        }
        Command::Queries => {
            for q in CannedQuery::catalog() {
                println!("{}  {}\n   {}", q.id, q.name, q.description);
            }
        }
        Command::Query { id } => {
            let query = CannedQuery::find(id).with_context(|| format!("no query with id {id}"))?;
            let table = ReportGateway::new(store).run_canned(query).await?;
            println!("{}", query.name);
            let headers: Vec<&str> = table.columns.iter().map(String::as_str).collect();
            print_table(&headers, &table.rows);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log = LogConfig::from_env();
    init_logger_with_file(&log.level, log.json, log.dir.as_deref())?;

    let Cli { command } = Cli::parse();

    let config = ClientConfig::from_env();
    tracing::debug!(url = %config.base_url, ?command, "school-admin starting");
    let store: Arc<dyn DataStore> = Arc::new(RestStore::new(&config)?);

    run(store, command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(raw: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("school-admin").chain(raw.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse(&["users"]).unwrap(), Command::Users);
        assert_eq!(parse(&["job-titles"]).unwrap(), Command::JobTitles);
        assert_eq!(
            parse(&["report", "Math", "Teacher"]).unwrap(),
            Command::Report {
                job_title: vec!["Math".into(), "Teacher".into()]
            }
        );
        assert_eq!(parse(&["query", "2"]).unwrap(), Command::Query { id: 2 });
        assert!(parse(&["query", "two"]).is_err());
        assert!(parse(&["query"]).is_err());
        assert!(parse(&["launch"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[tokio::test]
    async fn test_blank_report_fails() {
        let store: Arc<dyn DataStore> = Arc::new(school_client::MemoryStore::school());
        let command = parse(&["report"]).unwrap();
        let err = run(store, command).await.unwrap_err();
        assert_eq!(err.to_string(), "Select a job title before running the report");
    }
}
