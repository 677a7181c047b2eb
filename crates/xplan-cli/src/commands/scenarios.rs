use std::io::{self, Write};

use anyhow::{Context, Result};
use tabwriter::TabWriter;

use super::Session;
use xplan_cli::cli::ScenariosCommands;
use xplan_cli::common::{write_json, OutputFormat};

pub fn handle(session: &Session, command: &ScenariosCommands) -> Result<()> {
    match command {
        ScenariosCommands::List { format } => list(session, *format),
        ScenariosCommands::Show { id } => show(session, *id),
    }
}

fn list(session: &Session, format: OutputFormat) -> Result<()> {
    let scenarios = session
        .service()
        .client()
        .list_scenarios()
        .context("fetching scenarios")?;

    match format {
        OutputFormat::Table => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(writer, "ID\tDESCRIPTION")?;
            for scenario in &scenarios {
                writeln!(
                    writer,
                    "{}\t{}",
                    scenario.ep_scenario_id, scenario.ep_scenario_description
                )?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => write_json(&scenarios, &mut io::stdout(), true)?,
        OutputFormat::Tsv => {
            println!("epScenarioId\tepScenarioDescription");
            for scenario in &scenarios {
                println!(
                    "{}\t{}",
                    scenario.ep_scenario_id, scenario.ep_scenario_description
                );
            }
        }
    }
    Ok(())
}

fn show(session: &Session, id: i64) -> Result<()> {
    let details = session
        .service()
        .client()
        .scenario_details(id)
        .with_context(|| format!("fetching details for scenario {id}"))?;

    println!(
        "Scenario {}: {}",
        details.scenario.ep_scenario_id, details.scenario.ep_scenario_description
    );
    println!("  Metrics           : {}", details.metrics.len());
    println!("  Escalating rates  : {}", details.escalating_rates.len());
    println!("  Solver definitions: {}", details.solver_definitions.len());

    if !details.units.is_empty() {
        println!("Units:");
        for unit in &details.units {
            match unit.unit_id {
                Some(unit_id) => println!("  {} ({})", unit.unit_name, unit_id),
                None => println!("  {}", unit.unit_name),
            }
        }
    }
    if !details.studies.is_empty() {
        println!("Studies:");
        for study in &details.studies {
            match study.study_id {
                Some(study_id) => println!("  {} ({})", study.study_name, study_id),
                None => println!("  {}", study.study_name),
            }
        }
    }
    Ok(())
}
