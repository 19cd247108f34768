mod display;
mod export;
mod parser;
mod web;

use std::path::Path;

use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use junta_roster::invitation::is_valid_format;
use junta_roster::{AppConfig, Currency, GroupInfo, Junta, JuntaError};

use display::{print_roster, write_roster_to_file};
use export::export_roster_csv;
use parser::load_members;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = AppConfig::from_env()?;

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        if let Some(port) = args.get(2).and_then(|p| p.parse::<u16>().ok()) {
            config.port = port;
        }

        println!("Starting web server on port {}...", config.port);
        println!("Access the API at http://localhost:{}/api/roster", config.port);

        web::start_server(config).await?;
        return Ok(());
    }

    // CLI mode: seat members from a CSV file, draw numbers, print the roster
    let csv_path = args.get(1).map(String::as_str).unwrap_or("data/members.csv");

    println!("Loading members from {}...", csv_path);
    let members = load_members(csv_path)?;
    println!("Loaded {} members (duplicate documents merged)", members.len());

    let info = GroupInfo::new(config.group_name.clone(), 10_000, Currency::Soles);
    let junta = Junta::new(info, config.policy)?;
    let code = junta.invitation_code()?;
    println!("Invitation code: {}", code);

    for member in &members {
        match junta.join_with_invitation(is_valid_format(code.as_str()), member) {
            Ok(index) => println!("  {} -> slot #{}", member.name, index.position()),
            Err(JuntaError::Full { capacity }) => {
                warn!(capacity, name = %member.name, "Junta is full, remaining members not seated");
                break;
            }
            Err(e) => warn!(name = %member.name, error = %e, "Member skipped"),
        }
    }

    println!("\n=== Running Lottery ===");
    match junta.run_lottery() {
        Ok(drawn) => println!("Drew numbers for {} members", drawn.len()),
        Err(e) => println!("Lottery not run: {}", e),
    }

    let info = junta.info()?;
    let snapshot = junta.snapshot();
    print_roster(&info, &snapshot);

    println!("\n=== Writing Roster to Files ===");
    write_roster_to_file(&info, &snapshot, "roster.txt")?;
    export_roster_csv(&snapshot, Path::new("roster.csv"))?;
    println!("Roster saved to:");
    println!("  - roster.txt");
    println!("  - roster.csv");

    Ok(())
}
