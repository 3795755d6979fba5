use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use fitlog_core::weight::chart_label;
use fitlog_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Personal food, workout and weight log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true, hide = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate BMR and TDEE (Mifflin-St Jeor) and save the profile
    Calc {
        /// Age in years
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        age: String,

        /// male or female
        #[arg(long, default_value = "male")]
        gender: String,

        /// Height in cm
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        height: String,

        /// Weight in kg
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        weight: String,

        /// sedentary, light, moderate, active or extreme
        #[arg(long, default_value = "moderate")]
        activity: String,
    },

    /// Log and review meals
    Meal {
        #[command(subcommand)]
        command: MealCommand,
    },

    /// Edit the recurring weekly workout plan
    Workout {
        #[command(subcommand)]
        command: WorkoutCommand,
    },

    /// Log body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommand,
    },

    /// Set goals
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Show today's intake against the daily goal (default)
    Today,

    /// Show consumed vs burned calories for the last 7 days
    Week,

    /// Show weight progress toward the goal
    Progress,
}

#[derive(Subcommand)]
enum MealCommand {
    /// Log a meal for today
    Add {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "", allow_hyphen_values = true)]
        calories: String,

        /// breakfast, lunch, dinner or snack
        #[arg(long = "type", default_value = "breakfast")]
        meal_type: String,
    },

    /// Remove a meal by id
    Remove {
        id: String,

        /// Day the meal was logged on (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List meals for a day
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum WorkoutCommand {
    /// Add a workout to a weekday
    Add {
        /// Weekday name (Monday … Sunday)
        #[arg(long)]
        day: String,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        sets: String,

        #[arg(long, default_value = "")]
        reps: String,

        /// Duration in minutes
        #[arg(long, default_value = "")]
        duration: String,

        #[arg(long, default_value = "", allow_hyphen_values = true)]
        calories: String,
    },

    /// Remove a workout from a weekday by id
    Remove {
        #[arg(long)]
        day: String,

        id: String,
    },

    /// List the weekly plan
    List {
        /// Only this weekday
        #[arg(long)]
        day: Option<String>,
    },
}

#[derive(Subcommand)]
enum WeightCommand {
    /// Log today's weight in kg (replaces any entry for today)
    Log {
        #[arg(allow_hyphen_values = true)]
        kg: String,
    },
}

#[derive(Subcommand)]
enum GoalCommand {
    /// Daily calorie goal in kcal
    Daily {
        #[arg(allow_hyphen_values = true)]
        kcal: String,
    },

    /// Goal weight in kg
    Weight {
        #[arg(allow_hyphen_values = true)]
        kg: String,
    },
}

fn main() -> Result<()> {
    // Keep normal output clean; RUST_LOG still overrides.
    fitlog_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let store = FileStore::new(config.data.store_path());
    tracing::debug!("Using store {:?}, today is {}", store.path(), today);
    let mut tracker = Tracker::open(store)?;

    match cli.command {
        Some(Commands::Calc {
            age,
            gender,
            height,
            weight,
            activity,
        }) => cmd_calc(
            &mut tracker,
            ProfileSnapshot {
                age,
                gender,
                height,
                weight,
                activity_level: activity,
                ..Default::default()
            },
        ),
        Some(Commands::Meal { command }) => cmd_meal(&mut tracker, command, today),
        Some(Commands::Workout { command }) => cmd_workout(&mut tracker, command),
        Some(Commands::Weight { command }) => cmd_weight(&mut tracker, command, today),
        Some(Commands::Goal { command }) => cmd_goal(&mut tracker, command),
        Some(Commands::Week) => {
            cmd_week(&tracker, today);
            Ok(())
        }
        Some(Commands::Progress) => {
            cmd_progress(&tracker, config.display.chart_points);
            Ok(())
        }
        Some(Commands::Today) | None => {
            cmd_today(&tracker, today);
            Ok(())
        }
    }
}

fn cmd_calc(tracker: &mut Tracker<FileStore>, form: ProfileSnapshot) -> Result<()> {
    let level = ActivityLevel::from_key(&form.activity_level);
    if level.is_none() {
        eprintln!(
            "Unknown activity level: {}. Using moderate.",
            form.activity_level
        );
    }

    match tracker.calculate_energy(form)? {
        Some(needs) => {
            let level = level.unwrap_or_default();
            println!("BMR:  {} kcal/day", needs.bmr);
            println!("TDEE: {} kcal/day ({})", needs.tdee, level.description());
            println!("Weight loss target: {} kcal/day", needs.weight_loss_target());
        }
        None => {
            println!("Energy needs unavailable: age, height and weight must be positive numbers.");
        }
    }
    Ok(())
}

fn cmd_meal(tracker: &mut Tracker<FileStore>, command: MealCommand, today: NaiveDate) -> Result<()> {
    match command {
        MealCommand::Add {
            name,
            calories,
            meal_type,
        } => {
            let meal_type = MealType::from(meal_type);
            if !meal_type.is_known() {
                eprintln!("Unknown meal type: {}. Filed under Other.", meal_type.key());
            }

            match tracker.log_meal(today, &name, &calories, meal_type)? {
                Some(meal) => println!(
                    "✓ Logged {} ({} kcal, {}) [{}]",
                    meal.name,
                    meal.calories(),
                    meal.meal_type,
                    meal.id
                ),
                None => println!("Nothing logged: meal name and calories are required."),
            }
        }

        MealCommand::Remove { id, date } => {
            let date = date.unwrap_or(today);
            if tracker.remove_meal(date, &id)? {
                println!("✓ Removed meal {}", id);
            } else {
                println!("No meal {} on {}", id, date_key(date));
            }
        }

        MealCommand::List { date } => {
            let key = date_key(date.unwrap_or(today));
            let meals = tracker.meals().entries_for(&key);
            if meals.is_empty() {
                println!("No meals logged on {}", key);
            }
            for meal in meals {
                println!(
                    "  {:<10} {:>5} kcal  {}  [{}]",
                    meal.meal_type.label(),
                    meal.calories(),
                    meal.name,
                    meal.id
                );
            }
        }
    }
    Ok(())
}

fn cmd_workout(tracker: &mut Tracker<FileStore>, command: WorkoutCommand) -> Result<()> {
    match command {
        WorkoutCommand::Add {
            day,
            name,
            sets,
            reps,
            duration,
            calories,
        } => {
            let weekday = require_weekday(&day)?;
            let workout = NewWorkout {
                name,
                sets,
                reps,
                duration_minutes: duration,
                calories,
            };

            match tracker.log_workout(weekday, workout)? {
                Some(entry) => println!(
                    "✓ Added {} to {} ({} kcal) [{}]",
                    entry.name,
                    weekday_name(weekday),
                    entry.calories(),
                    entry.id
                ),
                None => println!("Nothing added: workout name is required."),
            }
        }

        WorkoutCommand::Remove { day, id } => {
            let weekday = require_weekday(&day)?;
            if tracker.remove_workout(weekday, &id)? {
                println!("✓ Removed workout {}", id);
            } else {
                println!("No workout {} on {}", id, weekday_name(weekday));
            }
        }

        WorkoutCommand::List { day } => {
            let plan = tracker.workouts();
            let days = match day {
                Some(day) => vec![require_weekday(&day)?],
                None => fitlog_core::workouts::WEEK.to_vec(),
            };

            for weekday in days {
                println!(
                    "{} ({} kcal)",
                    weekday_name(weekday),
                    plan.total_for_weekday(weekday)
                );
                for entry in plan.entries_for(weekday) {
                    println!(
                        "  {}  {}x{}  {} min  {} kcal  [{}]",
                        entry.name,
                        count_or_dash(entry.sets()),
                        count_or_dash(entry.reps()),
                        count_or_dash(entry.duration_minutes()),
                        entry.calories(),
                        entry.id
                    );
                }
            }

            println!();
            println!(
                "Weekly: {} workouts, {} kcal",
                plan.weekly_workout_count(),
                plan.weekly_calories()
            );
        }
    }
    Ok(())
}

fn count_or_dash(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn cmd_weight(tracker: &mut Tracker<FileStore>, command: WeightCommand, today: NaiveDate) -> Result<()> {
    match command {
        WeightCommand::Log { kg } => {
            if tracker.log_weight(today, &kg)? {
                println!(
                    "✓ Logged {} kg for {}",
                    tracker.weights().current_weight(),
                    date_key(today)
                );
            } else {
                println!("Nothing logged: weight must be a positive number.");
            }
        }
    }
    Ok(())
}

fn cmd_goal(tracker: &mut Tracker<FileStore>, command: GoalCommand) -> Result<()> {
    match command {
        GoalCommand::Daily { kcal } => {
            let goal = tracker.set_daily_calorie_goal(&kcal)?;
            println!("✓ Daily calorie goal: {} kcal", goal);
        }
        GoalCommand::Weight { kg } => {
            let goal = tracker.set_goal_weight(&kg)?;
            println!("✓ Goal weight: {} kg", goal);
        }
    }
    Ok(())
}

fn cmd_today(tracker: &Tracker<FileStore>, today: NaiveDate) {
    let summary = tracker.daily_summary(today);

    println!("{}", today.format("%A, %B %-d"));
    println!(
        "  Consumed:  {} / {} kcal ({:.0}%)",
        summary.consumed, summary.goal, summary.progress_percent
    );
    println!("  Remaining: {} kcal", summary.remaining);
    println!();
    for bucket in &summary.by_type {
        println!("  {:<10} {:>5} kcal", bucket.meal_type.label(), bucket.calories);
    }
    if summary.other > 0 {
        println!("  {:<10} {:>5} kcal", "Other", summary.other);
    }

    if let Some(needs) = tracker.energy_needs() {
        println!();
        println!("  TDEE: {} kcal  BMR: {} kcal", needs.tdee, needs.bmr);
    }
}

fn cmd_week(tracker: &Tracker<FileStore>, today: NaiveDate) {
    let balance = tracker.weekly_balance(today);

    println!("{:<4} {:<10} {:>9} {:>9} {:>7}", "Day", "Date", "Consumed", "Burned", "Net");
    for day in &balance.days {
        println!(
            "{:<4} {:<10} {:>9} {:>9} {:>7}",
            day.label,
            date_key(day.date),
            day.consumed,
            day.burned,
            day.net()
        );
    }
    println!();
    println!("Total consumed: {} kcal", balance.total_consumed());
    println!("Total burned:   {} kcal", balance.total_burned());
    println!("Net:            {} kcal", balance.net());
}

fn cmd_progress(tracker: &Tracker<FileStore>, chart_points: usize) {
    let progress = tracker.weight_progress();

    println!("Current weight: {:.1} kg", progress.current);
    println!("Start weight:   {:.1} kg", progress.start);
    println!("Change:         {:+.1} kg", progress.change);
    println!("Goal weight:    {:.1} kg", progress.goal);
    println!("Progress:       {:.0}%", progress.progress_percent);

    let series = tracker.weights().chart_series(chart_points);
    if series.len() < 2 {
        println!();
        println!("Log at least two weights to see a trend.");
        return;
    }

    println!();
    for entry in series {
        println!(
            "  {:<7} {:<3} {:.1} kg",
            chart_label(entry.date),
            entry.date.weekday(),
            entry.weight
        );
    }
}

fn require_weekday(text: &str) -> Result<chrono::Weekday> {
    parse_weekday(text).ok_or_else(|| {
        eprintln!("Unknown day: {}. Use Monday … Sunday.", text);
        Error::InvalidInput(format!("unknown weekday {:?}", text))
    })
}
