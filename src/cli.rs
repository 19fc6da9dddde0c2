use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::models::{NewTask, Priority, default_timedue};
use crate::utils::{format_due_distance, now_utc, parse_due_input};

#[derive(Parser)]
#[command(name = "studydesk")]
#[command(about = "Study-task tracker and study-plan viewer for a planner backend")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides config and STUDYDESK_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Use development mode (separate dev config directory)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Add a new task without entering the TUI
    AddTask {
        /// Task name (unique within the collection)
        name: String,
        /// Difficulty, 1-5
        #[arg(long, default_value_t = 3)]
        difficulty: u8,
        /// Initial status: pending, ongoing or completed
        #[arg(long, default_value = "pending")]
        status: String,
        /// Due date, YYYY-MM-DD [HH:MM]; defaults to one week from now
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks, optionally filtered by status
    Tasks {
        /// Only show tasks with this status: pending, ongoing or completed
        #[arg(long)]
        status: Option<String>,
    },
    /// Show aggregate task statistics
    Stats,
    /// List tasks due within the next days
    Upcoming {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// List overdue tasks
    Overdue,
    /// Show server-computed priority scores
    Scores,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    InvalidArgument(String),
}

/// Handle the add-task command
pub fn handle_add_task(
    name: String,
    difficulty: u8,
    status: String,
    due: Option<String>,
    client: &ApiClient,
) -> Result<(), CliError> {
    if !(1..=5).contains(&difficulty) {
        return Err(CliError::InvalidArgument(format!(
            "Difficulty must be between 1 and 5, got {}",
            difficulty
        )));
    }
    let priority = Priority::parse(&status).ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "Unknown status '{}', expected pending, ongoing or completed",
            status
        ))
    })?;
    let timedue = match due {
        Some(raw) => parse_due_input(&raw).map_err(CliError::InvalidArgument)?,
        None => default_timedue(now_utc()),
    };

    let task = NewTask {
        task_name: name,
        scale_difficulty: difficulty,
        priority,
        timedue,
    };
    let ack = client.create_task(&task)?;
    println!("{}", ack.message);

    Ok(())
}

/// Handle the tasks command
pub fn handle_list_tasks(status: Option<String>, client: &ApiClient) -> Result<(), CliError> {
    let tasks = match status {
        Some(raw) => {
            let status = Priority::parse(&raw).ok_or_else(|| {
                CliError::InvalidArgument(format!(
                    "Unknown status '{}', expected pending, ongoing or completed",
                    raw
                ))
            })?;
            client.tasks_by_status(status)?.tasks
        }
        None => client.get_tasks()?,
    };
    if tasks.is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }
    let now = now_utc().naive_utc();
    for task in &tasks {
        println!(
            "{:<30} difficulty {}/5  {:<9} {}",
            task.task_name,
            task.scale_difficulty,
            task.priority,
            format_due_distance(now, &task.timedue)
        );
    }
    Ok(())
}

/// Handle the stats command
pub fn handle_stats(client: &ApiClient) -> Result<(), CliError> {
    let stats = client.stats()?;
    println!("Total tasks:        {}", stats.total_tasks);
    println!("Pending:            {}", stats.pending);
    println!("Ongoing:            {}", stats.ongoing);
    println!("Completed:          {}", stats.completed);
    println!("Overdue:            {}", stats.overdue);
    println!("Completion rate:    {:.0}%", stats.completion_rate);
    println!("Average difficulty: {:.1}", stats.average_difficulty);
    Ok(())
}

/// Handle the upcoming command
pub fn handle_upcoming(days: u32, client: &ApiClient) -> Result<(), CliError> {
    let response = client.upcoming_tasks(days)?;
    println!(
        "{} task(s) due within {} day(s):",
        response.count, response.days_ahead
    );
    let now = now_utc().naive_utc();
    for task in &response.tasks {
        println!(
            "  {:<30} {}",
            task.task_name,
            format_due_distance(now, &task.timedue)
        );
    }
    Ok(())
}

/// Handle the overdue command
pub fn handle_overdue(client: &ApiClient) -> Result<(), CliError> {
    let response = client.overdue_tasks()?;
    println!("{} overdue task(s):", response.count);
    let now = now_utc().naive_utc();
    for task in &response.tasks {
        println!(
            "  {:<30} {}",
            task.task_name,
            format_due_distance(now, &task.timedue)
        );
    }
    Ok(())
}

/// Handle the scores command
pub fn handle_scores(client: &ApiClient) -> Result<(), CliError> {
    let response = client.score_tasks()?;
    if response.scores.is_empty() {
        println!("No tasks to score.");
        return Ok(());
    }
    for score in &response.scores {
        println!(
            "{:<30} score {:>6.2}  difficulty {}/5  {}",
            score.task_name, score.score, score.difficulty, score.priority
        );
    }
    Ok(())
}
