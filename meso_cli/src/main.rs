use clap::{Parser, Subcommand};
use meso_core::*;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mesoplan")]
#[command(about = "Mesocycle periodization and volume planning engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a cycle (or a single week) from a planning snapshot
    Plan {
        /// Planning snapshot JSON (inputs + optional history)
        #[arg(long)]
        input: PathBuf,

        /// Write the full plan as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Replan only this week index against the snapshot's history
        #[arg(long)]
        week: Option<u32>,
    },

    /// Print the legal weight ladder for min/increment/max parameters
    Ladder {
        #[arg(long)]
        min: f64,

        #[arg(long)]
        step: f64,

        #[arg(long)]
        max: f64,
    },

    /// Print the weekly target reps-in-reserve schedule
    Rir {
        /// Number of progressive weeks to print
        #[arg(long, default_value_t = 6)]
        weeks: u32,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    meso_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PlanningConfig::load_from(path)?,
        None => PlanningConfig::load()?,
    };

    match cli.command {
        Commands::Plan {
            input,
            output,
            week,
        } => cmd_plan(&input, output.as_deref(), week, &config),
        Commands::Ladder { min, step, max } => cmd_ladder(min, step, max),
        Commands::Rir { weeks } => cmd_rir(weeks),
    }
}

fn cmd_plan(
    input: &std::path::Path,
    output: Option<&std::path::Path>,
    week: Option<u32>,
    config: &PlanningConfig,
) -> Result<()> {
    let snapshot = load_snapshot(input)?;

    let plan = match week {
        Some(index) => {
            let week_plan = plan_week(&snapshot.inputs, config, &snapshot.history, index)?;
            CyclePlan {
                weeks: vec![week_plan.week],
                sessions: week_plan.sessions,
                exercises: week_plan.exercises,
                sets: week_plan.sets,
            }
        }
        None => plan_cycle(&snapshot.inputs, config)?,
    };

    display_plan(&plan, &snapshot.inputs);

    if let Some(path) = output {
        save_plan(path, &plan)?;
        println!("\n✓ Plan written to {}", path.display());
    }

    Ok(())
}

fn cmd_ladder(min: f64, step: f64, max: f64) -> Result<()> {
    let ladder = weight_ladder(min, step, max);
    if ladder.is_empty() {
        return Err(Error::Config(format!(
            "no ladder for min={}, step={}, max={}",
            min, step, max
        )));
    }

    let formatted: Vec<String> = ladder.iter().map(|w| format_weight(*w)).collect();
    println!("{}", formatted.join(" "));
    Ok(())
}

fn cmd_rir(weeks: u32) -> Result<()> {
    for week_index in 0..weeks {
        println!("week {}: RIR {}", week_index, target_rir(week_index));
    }
    Ok(())
}

fn display_plan(plan: &CyclePlan, inputs: &PlanningInputs) {
    let exercise_names: HashMap<_, _> = inputs
        .exercises
        .values()
        .map(|e| (e.id, e.name.as_str()))
        .collect();
    let exercises_by_id: HashMap<_, _> = plan.exercises.iter().map(|e| (e.id, e)).collect();
    let sets_by_id: HashMap<_, _> = plan.sets.iter().map(|s| (s.id, s)).collect();

    for week in &plan.weeks {
        println!("\n╭─────────────────────────────────────────╮");
        println!(
            "│  WEEK {}  {}{}",
            week.index + 1,
            week.start_date,
            if week.deload { "  (deload)" } else { "" }
        );
        println!("╰─────────────────────────────────────────╯");

        for session_id in &week.session_ids {
            let Some(session) = plan.sessions.iter().find(|s| s.id == *session_id) else {
                continue;
            };
            println!("\n  {} —", session.start_time.format("%a %Y-%m-%d"));

            for exercise_id in &session.exercise_ids {
                let Some(eis) = exercises_by_id.get(exercise_id) else {
                    continue;
                };
                let name = exercise_names
                    .get(&eis.exercise_def_id)
                    .copied()
                    .unwrap_or("unknown exercise");

                let sets: Vec<String> = eis
                    .set_ids
                    .iter()
                    .filter_map(|id| sets_by_id.get(id))
                    .map(|s| format!("{}x{}", s.planned_reps, format_weight(s.planned_weight)))
                    .collect();
                let rir = eis
                    .set_ids
                    .first()
                    .and_then(|id| sets_by_id.get(id))
                    .map(|s| s.planned_rir)
                    .unwrap_or(0);

                println!(
                    "    {} — {} sets @ RIR {}{}  [{}]",
                    name,
                    eis.set_ids.len(),
                    rir,
                    if eis.recovery_flagged { "  (recovery)" } else { "" },
                    sets.join(", ")
                );
            }
        }
    }
    println!();
}

fn format_weight(weight: f64) -> String {
    if (weight - weight.round()).abs() < 1e-9 {
        format!("{}", weight.round() as i64)
    } else {
        format!("{}", weight)
    }
}
