use clap::Parser;
use color_eyre::Result;
use studydesk::{ApiClient, Config, Profile, cli::{self, Cli, Commands}};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;

    // Resolve the backend address (CLI flag > env var > config file)
    let base_url = config.resolve_api_base_url(cli.api_url.as_deref());
    let client = ApiClient::new(&base_url)?;

    // Dispatch to appropriate command handler
    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = studydesk::tui::App::new(config);
            studydesk::tui::run_event_loop(app, client)?;
        }
        Commands::AddTask {
            name,
            difficulty,
            status,
            due,
        } => {
            cli::handle_add_task(name, difficulty, status, due, &client)?;
        }
        Commands::Tasks { status } => {
            cli::handle_list_tasks(status, &client)?;
        }
        Commands::Stats => {
            cli::handle_stats(&client)?;
        }
        Commands::Upcoming { days } => {
            cli::handle_upcoming(days, &client)?;
        }
        Commands::Overdue => {
            cli::handle_overdue(&client)?;
        }
        Commands::Scores => {
            cli::handle_scores(&client)?;
        }
    }

    Ok(())
}
