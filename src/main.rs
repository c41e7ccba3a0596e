use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use workforce_dashboard::models::EmployeePatch;
use workforce_dashboard::report;
use workforce_dashboard::tasks::detect_automation;
use workforce_dashboard::workforce::efficiency;
use workforce_dashboard::{Dashboard, DashboardConfig, ThemePreference};

#[derive(Parser)]
#[command(name = "workforce-dashboard")]
#[command(about = "Workforce, task, performance and meeting dashboard", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: DashboardConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks with automation and delegation hints
    Tasks,
    /// Reassign a task to its best-scoring team member
    Delegate {
        #[arg(long)]
        task: String,
    },
    /// Show workload status for each employee
    Workforce {
        /// Replace the roster with a CSV export first
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Change an employee's workload or task count
    #[command(group(
        ArgGroup::new("change")
            .args(["workload", "tasks"])
            .multiple(true)
            .required(true)
    ))]
    UpdateWorkload {
        #[arg(long)]
        id: String,
        #[arg(long)]
        workload: Option<u32>,
        #[arg(long)]
        tasks: Option<u32>,
    },
    /// Import performance samples from a CSV file
    ImportPerformance {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Import a JSON meeting dataset
    ImportMeetings {
        #[arg(long)]
        json: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        performance: Option<PathBuf>,
        #[arg(long)]
        meetings: Option<PathBuf>,
        #[arg(long)]
        workforce: Option<PathBuf>,
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
    /// Show or change the dark-mode preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Toggle,
    Set {
        #[arg(long, action = clap::ArgAction::Set)]
        dark: bool,
    },
}

async fn read_import(path: &Path) -> anyhow::Result<(String, String)> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((name, contents))
}

fn print_notifications(dashboard: &Dashboard) {
    for notification in dashboard.notifications.unread() {
        println!(
            "[{}] {}: {}",
            notification.kind.as_str(),
            notification.title,
            notification.message
        );
    }
}

fn print_performance(dashboard: &Dashboard) {
    let latest = dashboard.performance.latest_metrics();
    println!(
        "Productivity {} ({:+}%), growth {} ({:+}%), capacity {} ({:+}%), response {} ({:+}%)",
        latest.productivity.value,
        latest.productivity.change,
        latest.growth.value,
        latest.growth.change,
        latest.capacity.value,
        latest.capacity.change,
        latest.response.value,
        latest.response.change
    );
    for metric in dashboard.performance.leadership_metrics() {
        println!("- {}: {}/10", metric.category.as_str(), metric.score);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("workforce_dashboard=info,warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let today = Utc::now().date_naive();
    let mut dashboard = Dashboard::seeded(&cli.config, today);

    match cli.command {
        Commands::Tasks => {
            for task in dashboard.tasks.tasks() {
                let best = dashboard
                    .tasks
                    .optimal_assignee(task)
                    .map_or("-", |u| u.name.as_str());
                println!(
                    "- [{}] {} ({}) assigned to {}, best fit {}{}{}",
                    task.id,
                    task.title,
                    task.priority,
                    task.assignee,
                    best,
                    if detect_automation(task) { ", automatable" } else { "" },
                    if dashboard.tasks.is_suboptimal(task) {
                        ", suboptimal"
                    } else {
                        ""
                    }
                );
            }
        }
        Commands::Delegate { task } => {
            match dashboard.delegate_task(&task) {
                Ok(name) => println!("Task {task} assigned to {name}."),
                Err(err) => eprintln!("{err}"),
            }
            print_notifications(&dashboard);
        }
        Commands::Workforce { csv } => {
            if let Some(path) = csv {
                let (name, contents) = read_import(&path).await?;
                if let Err(err) = dashboard.import_workforce(&name, &contents) {
                    eprintln!("Import failed: {err}");
                }
            }
            for employee in dashboard.workforce.employees() {
                let status = employee.status();
                println!(
                    "- {} ({}) {}% {} [{}], trend {}, efficiency {}%",
                    employee.name,
                    employee.role,
                    employee.workload,
                    status.label(),
                    status.color(),
                    employee.trend,
                    efficiency(employee.tasks, employee.workload)
                );
                for recommendation in status.recommendations() {
                    println!("    {recommendation}");
                }
            }
            print_notifications(&dashboard);
        }
        Commands::UpdateWorkload {
            id,
            workload,
            tasks,
        } => {
            let patch = EmployeePatch {
                workload,
                tasks,
                ..EmployeePatch::default()
            };
            match dashboard.update_employee(&id, patch) {
                Ok(()) => {
                    if let Some(employee) = dashboard.workforce.employee(&id) {
                        let status = employee.status();
                        println!(
                            "{} is now {} at {}% ({}).",
                            employee.name,
                            status.label(),
                            employee.workload,
                            status.recommendation()
                        );
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
            print_notifications(&dashboard);
        }
        Commands::ImportPerformance { csv } => {
            let (name, contents) = read_import(&csv).await?;
            match dashboard.import_performance(&name, &contents) {
                Ok(count) => {
                    println!("Imported {count} samples from {}.", csv.display());
                    print_performance(&dashboard);
                }
                Err(err) => eprintln!("Import failed: {err}"),
            }
            print_notifications(&dashboard);
        }
        Commands::ImportMeetings { json } => {
            let (_, contents) = read_import(&json).await?;
            match dashboard.import_meetings(&contents) {
                Ok(count) => {
                    println!("Imported {count} meetings from {}.", json.display());
                    for meeting in dashboard.meetings.meetings() {
                        println!(
                            "- {}: {}",
                            meeting.title,
                            workforce_dashboard::meetings::summarize(meeting)
                        );
                    }
                }
                Err(err) => eprintln!("Import failed: {err}"),
            }
            print_notifications(&dashboard);
        }
        Commands::Report {
            performance,
            meetings,
            workforce,
            out,
        } => {
            if let Some(path) = performance {
                let (name, contents) = read_import(&path).await?;
                if let Err(err) = dashboard.import_performance(&name, &contents) {
                    eprintln!("Performance import failed: {err}");
                }
            }
            if let Some(path) = meetings {
                let (_, contents) = read_import(&path).await?;
                if let Err(err) = dashboard.import_meetings(&contents) {
                    eprintln!("Meeting import failed: {err}");
                }
            }
            if let Some(path) = workforce {
                let (name, contents) = read_import(&path).await?;
                if let Err(err) = dashboard.import_workforce(&name, &contents) {
                    eprintln!("Workforce import failed: {err}");
                }
            }
            let report = report::build_report(&dashboard, today);
            tokio::fs::write(&out, report)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Theme { action } => {
            let path = ThemePreference::path_in(&cli.config.state_dir);
            let mut preference = ThemePreference::load(&path)?;
            match action {
                None => {}
                Some(ThemeAction::Toggle) => {
                    preference.toggle();
                    preference.save(&path)?;
                }
                Some(ThemeAction::Set { dark }) => {
                    preference.set(dark);
                    preference.save(&path)?;
                }
            }
            println!(
                "Dark mode is {}.",
                if preference.is_dark_mode { "on" } else { "off" }
            );
        }
    }

    Ok(())
}
