use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use color_eyre::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use taskflow::adapters::{
    config::FileConfigStore,
    storage::FileKeyValueStore,
    tui::{run_tui, App},
};
use taskflow::application::{BoardManager, Persistence};
use taskflow::domain::{
    ColumnId, ColumnUpdate, DomainError, NewTask, Priority, Tag, TaskId, TaskUpdate, TAG_COLORS,
};
use taskflow::ports::{AppConfig, ConfigStore};

fn build_cli() -> Command {
    Command::new("taskflow")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A personal Kanban board for the terminal")
        .long_about("A keyboard-driven Kanban board.\n\nRun without a subcommand to open the board. Data is stored as JSON under the data directory.")
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .value_name("DIR")
                .env("TASKFLOW_DATA_DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory holding the board data and log file")
                .global(true)
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level: error, warn, info, debug or trace")
                .global(true)
        )
        .subcommand(
            Command::new("tasks")
                .about("Task operations")
                .subcommand(
                    Command::new("list")
                        .about("List tasks as JSON")
                        .arg(
                            Arg::new("column")
                                .long("column")
                                .short('c')
                                .value_name("COLUMN_ID")
                                .help("Only list tasks of this column")
                        )
                )
                .subcommand(
                    Command::new("add")
                        .about("Add a task at the end of a column")
                        .arg(Arg::new("title").help("Task title").required(true).index(1))
                        .arg(
                            Arg::new("column")
                                .long("column")
                                .short('c')
                                .value_name("COLUMN_ID")
                                .help("Column to add the task to")
                                .required(true)
                        )
                        .arg(Arg::new("description").long("description").value_name("TEXT"))
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .short('p')
                                .value_name("PRIORITY")
                                .help("low, medium or high (defaults to the configured priority)")
                        )
                        .arg(
                            Arg::new("due")
                                .long("due")
                                .value_name("YYYY-MM-DD")
                                .help("Due date")
                        )
                        .arg(Arg::new("blocked").long("blocked").action(ArgAction::SetTrue))
                        .arg(
                            Arg::new("tag")
                                .long("tag")
                                .value_name("NAME[:COLOR]")
                                .help("Tag to attach; may be repeated")
                                .action(ArgAction::Append)
                        )
                )
                .subcommand(
                    Command::new("move")
                        .about("Move a task to a column and position")
                        .arg(Arg::new("task_id").help("Task ID to move").required(true).index(1))
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .value_name("COLUMN_ID")
                                .help("Destination column")
                                .required(true)
                        )
                        .arg(
                            Arg::new("position")
                                .long("position")
                                .value_name("N")
                                .value_parser(clap::value_parser!(usize))
                                .help("Zero-based position in the destination column (default: end)")
                        )
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit a task's fields")
                        .arg(Arg::new("task_id").help("Task ID to edit").required(true).index(1))
                        .arg(Arg::new("title").long("title").value_name("TITLE"))
                        .arg(Arg::new("description").long("description").value_name("TEXT"))
                        .arg(
                            Arg::new("clear_description")
                                .long("clear-description")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("description")
                        )
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .short('p')
                                .value_name("PRIORITY")
                                .help("low, medium or high")
                        )
                        .arg(Arg::new("due").long("due").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("clear_due")
                                .long("clear-due")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("due")
                        )
                        .arg(
                            Arg::new("blocked")
                                .long("blocked")
                                .value_name("BOOL")
                                .value_parser(clap::value_parser!(bool))
                                .help("true or false")
                        )
                )
                .subcommand(
                    Command::new("tag")
                        .about("Tag operations on a task")
                        .subcommand(
                            Command::new("add")
                                .about("Attach a tag to a task")
                                .arg(Arg::new("task_id").required(true).index(1))
                                .arg(
                                    Arg::new("tag")
                                        .value_name("NAME[:COLOR]")
                                        .required(true)
                                        .index(2)
                                )
                        )
                        .subcommand(
                            Command::new("remove")
                                .about("Remove a tag by name or ID")
                                .arg(Arg::new("task_id").required(true).index(1))
                                .arg(Arg::new("tag").value_name("TAG").required(true).index(2))
                        )
                )
                .subcommand(
                    Command::new("toggle")
                        .about("Toggle a task's completion")
                        .arg(Arg::new("task_id").required(true).index(1))
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a task")
                        .arg(Arg::new("task_id").required(true).index(1))
                )
        )
        .subcommand(
            Command::new("columns")
                .about("Column operations")
                .subcommand(Command::new("list").about("List columns as JSON"))
                .subcommand(
                    Command::new("add")
                        .about("Append a column to the board")
                        .arg(Arg::new("title").required(true).index(1))
                        .arg(Arg::new("color").long("color").value_name("HEX"))
                )
                .subcommand(
                    Command::new("rename")
                        .about("Rename a column")
                        .arg(Arg::new("column_id").required(true).index(1))
                        .arg(Arg::new("title").required(true).index(2))
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a column; its tasks are kept")
                        .arg(Arg::new("column_id").required(true).index(1))
                )
                .subcommand(
                    Command::new("reorder")
                        .about("Lay out columns in the given order; unlisted columns are removed")
                        .arg(
                            Arg::new("column_ids")
                                .required(true)
                                .num_args(1..)
                                .index(1)
                        )
                )
        )
        .subcommand(
            Command::new("export")
                .about("Export board, tasks and settings as JSON")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("PATH")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("File to write, or a directory for a dated backup file")
                )
        )
        .subcommand(
            Command::new("import")
                .about("Replace all data with an exported JSON file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(PathBuf))
                )
        )
        .subcommand(Command::new("reset").about("Clear all stored data"))
        .subcommand(
            Command::new("config")
                .about("Configuration")
                .subcommand(Command::new("show").about("Show the effective configuration"))
                .subcommand(
                    Command::new("set-data-dir")
                        .about("Persist the data directory in the config file")
                        .arg(
                            Arg::new("dir")
                                .required(true)
                                .index(1)
                                .value_parser(clap::value_parser!(PathBuf))
                        )
                )
        )
}

fn main() -> Result<()> {
    // Initialize color-eyre for better error reporting
    color_eyre::install()?;

    let matches = build_cli().get_matches();

    // Load configuration, then apply command line and environment overrides
    let config_store = FileConfigStore::new()?;
    let mut config = config_store.load_config()?;
    if let Some(dir) = matches.get_one::<PathBuf>("data_dir") {
        config.data_dir = Some(dir.clone());
    }
    if let Some(level) = matches.get_one::<String>("log_level") {
        config.log_level = level.clone();
    }

    let data_dir = config.resolved_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    init_logging(&data_dir, &config)?;
    tracing::info!("Using data directory {}", data_dir.display());

    if let Some(("config", config_matches)) = matches.subcommand() {
        return handle_config(config_matches, &config_store, &config, &data_dir);
    }

    let persistence = Arc::new(Persistence::new(Box::new(FileKeyValueStore::new(&data_dir))));
    let mut manager = BoardManager::new(persistence);
    manager.initialize();

    match matches.subcommand() {
        Some(("tasks", tasks_matches)) => handle_tasks(tasks_matches, &mut manager)?,
        Some(("columns", columns_matches)) => handle_columns(columns_matches, &mut manager)?,
        Some(("export", export_matches)) => {
            let json = manager.export_json()?;
            match export_matches.get_one::<PathBuf>("output") {
                Some(output) => {
                    let path = backup_path(output);
                    std::fs::write(&path, json)?;
                    println!("✅ Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Some(("import", import_matches)) => {
            if let Some(file) = import_matches.get_one::<PathBuf>("file") {
                let json = std::fs::read_to_string(file)?;
                if let Err(e) = manager.import_json(&json) {
                    tracing::error!("Import of {} failed: {}", file.display(), e);
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
                println!("✅ Imported {}", file.display());
            }
        }
        Some(("reset", _)) => {
            manager.reset();
            println!("✅ All data cleared");
        }
        None => {
            // Default behavior - run TUI
            let app = App::new(manager);

            if let Err(e) = run_tui(app) {
                eprintln!("❌ Application error: {e}");
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("❌ Unknown command");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn init_logging(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("taskflow.log"))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_max_level(config.tracing_level())
        .init();
    Ok(())
}

/// A directory gets a dated backup file inside it; anything else is used as is.
fn backup_path(output: &Path) -> PathBuf {
    if output.is_dir() {
        let date = chrono::Local::now().format("%Y-%m-%d");
        output.join(format!("taskflow-backup-{date}.json"))
    } else {
        output.to_path_buf()
    }
}

/// Parse `NAME[:COLOR]`, picking a palette color when none is given.
fn parse_tag(value: &str, index: usize) -> Tag {
    match value.split_once(':') {
        Some((name, color)) => Tag::new(name, color),
        None => Tag::new(value, TAG_COLORS[index % TAG_COLORS.len()]),
    }
}

fn parse_priority(matches: &ArgMatches) -> std::result::Result<Option<Priority>, DomainError> {
    matches
        .get_one::<String>("priority")
        .map(|p| p.parse::<Priority>())
        .transpose()
}

fn parse_due(matches: &ArgMatches) -> std::result::Result<Option<NaiveDate>, DomainError> {
    matches
        .get_one::<String>("due")
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| DomainError::InvalidDate(d.clone()))
        })
        .transpose()
}

fn build_new_task(
    title: &str,
    column: &str,
    matches: &ArgMatches,
) -> std::result::Result<NewTask, DomainError> {
    let mut input = NewTask::new(title, column);

    input.description = matches.get_one::<String>("description").cloned();
    input.priority = parse_priority(matches)?;
    input.due_date = parse_due(matches)?;
    input.blocked = Some(matches.get_flag("blocked"));
    input.tags = matches
        .get_many::<String>("tag")
        .map(|tags| tags.enumerate().map(|(i, t)| parse_tag(t, i)).collect())
        .unwrap_or_default();
    Ok(input)
}

/// Patch built from `tasks edit` flags; absent flags leave fields untouched.
fn build_task_update(matches: &ArgMatches) -> std::result::Result<TaskUpdate, DomainError> {
    let description = if matches.get_flag("clear_description") {
        Some(None)
    } else {
        matches.get_one::<String>("description").map(|d| Some(d.clone()))
    };
    let due_date = if matches.get_flag("clear_due") {
        Some(None)
    } else {
        parse_due(matches)?.map(Some)
    };

    let update = TaskUpdate {
        title: matches.get_one::<String>("title").cloned(),
        description,
        priority: parse_priority(matches)?,
        due_date,
        blocked: matches.get_one::<bool>("blocked").copied(),
        ..Default::default()
    };
    update.validate()?;
    Ok(update)
}

fn not_found(what: &str, id: &str) -> ! {
    eprintln!("❌ {what} not found: {id}");
    std::process::exit(1);
}

fn handle_tasks(matches: &ArgMatches, manager: &mut BoardManager) -> Result<()> {
    match matches.subcommand() {
        Some(("list", list_matches)) => {
            let tasks = match list_matches.get_one::<String>("column") {
                Some(column) => manager.tasks().tasks_by_column(&column.as_str().into()),
                None => {
                    let mut all: Vec<_> = manager.tasks().tasks().iter().collect();
                    all.sort_by(|a, b| {
                        a.column_id.0.cmp(&b.column_id.0).then(a.position.cmp(&b.position))
                    });
                    all
                }
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        Some(("add", add_matches)) => {
            let (Some(title), Some(column)) = (
                add_matches.get_one::<String>("title"),
                add_matches.get_one::<String>("column"),
            ) else {
                return Ok(());
            };
            let input = build_new_task(title, column, add_matches)?;
            if !manager.columns().board().has_column(&input.column_id) {
                not_found("Column", &input.column_id.0);
            }
            match manager.add_task(input) {
                Ok(id) => println!("{id}"),
                Err(e) => {
                    eprintln!("❌ Failed to add task: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(("move", move_matches)) => {
            if let (Some(id), Some(to)) = (
                move_matches.get_one::<String>("task_id"),
                move_matches.get_one::<String>("to"),
            ) {
                let column_id = ColumnId::from(to.as_str());
                if !manager.columns().board().has_column(&column_id) {
                    not_found("Column", to);
                }
                let position = move_matches.get_one::<usize>("position").copied();
                match manager.move_task_to(&id.as_str().into(), &column_id, position) {
                    Ok(true) => println!("✅ Moved {id} to {to}"),
                    Ok(false) => not_found("Task", id),
                    Err(e) => {
                        eprintln!("❌ Failed to move task: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Some(("edit", edit_matches)) => {
            if let Some(id) = edit_matches.get_one::<String>("task_id") {
                let update = build_task_update(edit_matches)?;
                if !manager.tasks_mut().update_task(&id.as_str().into(), update)? {
                    not_found("Task", id);
                }
                println!("✅ Updated {id}");
            }
        }
        Some(("tag", tag_matches)) => handle_tags(tag_matches, manager)?,
        Some(("toggle", toggle_matches)) => {
            if let Some(id) = toggle_matches.get_one::<String>("task_id") {
                if !manager.tasks_mut().toggle_completion(&id.as_str().into()) {
                    not_found("Task", id);
                }
                println!("✅ Toggled {id}");
            }
        }
        Some(("delete", delete_matches)) => {
            if let Some(id) = delete_matches.get_one::<String>("task_id") {
                if !manager.tasks_mut().delete_task(&id.as_str().into()) {
                    not_found("Task", id);
                }
                println!("✅ Deleted {id}");
            }
        }
        _ => {
            eprintln!("❌ Unknown tasks subcommand");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn handle_tags(matches: &ArgMatches, manager: &mut BoardManager) -> Result<()> {
    match matches.subcommand() {
        Some(("add", add_matches)) => {
            if let (Some(id), Some(value)) = (
                add_matches.get_one::<String>("task_id"),
                add_matches.get_one::<String>("tag"),
            ) {
                let task_id = TaskId::from(id.as_str());
                let Some(existing) = manager.tasks().get_task(&task_id).map(|t| t.tags.len()) else {
                    not_found("Task", id);
                };
                let tag = parse_tag(value, existing);
                match manager.tasks_mut().add_tag(&task_id, tag) {
                    Ok(_) => println!("✅ Tagged {id}"),
                    Err(e) => {
                        eprintln!("❌ Failed to add tag: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
        Some(("remove", remove_matches)) => {
            if let (Some(id), Some(value)) = (
                remove_matches.get_one::<String>("task_id"),
                remove_matches.get_one::<String>("tag"),
            ) {
                let task_id = TaskId::from(id.as_str());
                let Some(task) = manager.tasks().get_task(&task_id) else {
                    not_found("Task", id);
                };
                let Some(tag_id) = task
                    .tags
                    .iter()
                    .find(|t| t.id.0 == *value || t.name.eq_ignore_ascii_case(value))
                    .map(|t| t.id.clone())
                else {
                    not_found("Tag", value);
                };
                manager.tasks_mut().remove_tag(&task_id, &tag_id);
                println!("✅ Removed tag {value} from {id}");
            }
        }
        _ => {
            eprintln!("❌ Unknown tag subcommand");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn handle_columns(matches: &ArgMatches, manager: &mut BoardManager) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => {
            println!("{}", serde_json::to_string_pretty(&manager.columns().columns())?);
        }
        Some(("add", add_matches)) => {
            if let Some(title) = add_matches.get_one::<String>("title") {
                let color = add_matches.get_one::<String>("color").map(String::as_str);
                let id = manager.columns_mut().add_column(title, color);
                println!("{id}");
            }
        }
        Some(("rename", rename_matches)) => {
            if let (Some(id), Some(title)) = (
                rename_matches.get_one::<String>("column_id"),
                rename_matches.get_one::<String>("title"),
            ) {
                let update = ColumnUpdate {
                    title: Some(title.clone()),
                    color: None,
                };
                if !manager.columns_mut().update_column(&id.as_str().into(), update) {
                    not_found("Column", id);
                }
                println!("✅ Renamed {id}");
            }
        }
        Some(("delete", delete_matches)) => {
            if let Some(id) = delete_matches.get_one::<String>("column_id") {
                if !manager.columns_mut().delete_column(&id.as_str().into()) {
                    not_found("Column", id);
                }
                let orphaned = manager.orphaned_tasks().len();
                if orphaned > 0 {
                    println!("⚠️  {orphaned} task(s) still reference the deleted column");
                }
                println!("✅ Deleted {id}");
            }
        }
        Some(("reorder", reorder_matches)) => {
            if let Some(ids) = reorder_matches.get_many::<String>("column_ids") {
                let ids: Vec<ColumnId> = ids.map(|id| id.as_str().into()).collect();
                let dropped = manager.columns_mut().reorder_columns(&ids);
                for id in &dropped {
                    println!("⚠️  Column {id} was not listed and has been removed");
                }
                println!("{}", serde_json::to_string_pretty(&manager.columns().columns())?);
            }
        }
        _ => {
            eprintln!("❌ Unknown columns subcommand");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn handle_config(
    matches: &ArgMatches,
    config_store: &FileConfigStore,
    config: &AppConfig,
    data_dir: &Path,
) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => {
            println!("Config file: {}", config_store.config_path().display());
            println!("Data directory: {}", data_dir.display());
            println!("Log level: {}", config.log_level);
        }
        Some(("set-data-dir", set_matches)) => {
            if let Some(dir) = set_matches.get_one::<PathBuf>("dir") {
                // Store the file's own values, not the command line overrides
                let mut stored = config_store.load_config()?;
                stored.data_dir = Some(dir.clone());
                config_store.save_config(&stored)?;
                println!("✅ Data directory set to {}", dir.display());
            }
        }
        _ => {
            eprintln!("❌ Unknown config subcommand");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow::adapters::storage::MemoryKeyValueStore;

    fn task_matches(args: &[&str], sub: &str) -> ArgMatches {
        let mut argv = vec!["taskflow", "tasks"];
        argv.extend_from_slice(args);
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        matches
            .subcommand_matches("tasks")
            .and_then(|m| m.subcommand_matches(sub))
            .cloned()
            .unwrap()
    }

    fn manager() -> BoardManager {
        let persistence = Arc::new(Persistence::new(Box::new(MemoryKeyValueStore::new())));
        let mut manager = BoardManager::new(persistence);
        manager.initialize();
        manager
    }

    #[test]
    fn test_cli_parses_task_add() {
        let add = task_matches(
            &[
                "add", "Write docs", "--column", "todo", "--priority", "high", "--due",
                "2024-03-01", "--tag", "Docs", "--tag", "Urgent:#ef4444",
            ],
            "add",
        );

        let input = build_new_task("Write docs", "todo", &add).unwrap();
        assert_eq!(input.title, "Write docs");
        assert_eq!(input.column_id.0, "todo");
        assert_eq!(input.priority, Some(Priority::High));
        assert_eq!(input.due_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(input.blocked, Some(false));
        assert_eq!(input.tags.len(), 2);
        assert_eq!(input.tags[0].color, TAG_COLORS[0]);
        assert_eq!(input.tags[1].name, "Urgent");
        assert_eq!(input.tags[1].color, "#ef4444");
    }

    #[test]
    fn test_invalid_priority_and_date() {
        let add = task_matches(&["add", "X", "-c", "todo", "-p", "urgent"], "add");
        assert!(matches!(
            build_new_task("X", "todo", &add),
            Err(DomainError::InvalidPriority(_))
        ));

        let add = task_matches(&["add", "X", "-c", "todo", "--due", "soon"], "add");
        assert!(matches!(
            build_new_task("X", "todo", &add),
            Err(DomainError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_edit_builds_partial_update() {
        let edit = task_matches(
            &["edit", "sample-task-1", "--title", "Renamed", "--clear-due", "--blocked", "true"],
            "edit",
        );
        let update = build_task_update(&edit).unwrap();
        assert_eq!(update.title.as_deref(), Some("Renamed"));
        assert_eq!(update.due_date, Some(None));
        assert_eq!(update.blocked, Some(true));
        assert_eq!(update.description, None);
        assert_eq!(update.priority, None);

        let mut manager = manager();
        let id: TaskId = "sample-task-1".into();
        assert!(manager.tasks_mut().update_task(&id, update).unwrap());
        let task = manager.tasks().get_task(&id).unwrap();
        assert_eq!(task.title, "Renamed");
        assert!(task.blocked);
        // Untouched fields survive
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.tags.len(), 1);
    }

    #[test]
    fn test_edit_rejects_blank_title_and_conflicting_flags() {
        let edit = task_matches(&["edit", "t1", "--title", "   "], "edit");
        assert!(matches!(
            build_task_update(&edit),
            Err(DomainError::EmptyTitle)
        ));

        let result = build_cli().try_get_matches_from([
            "taskflow", "tasks", "edit", "t1", "--due", "2024-01-01", "--clear-due",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tag_commands_parse() {
        let matches = build_cli()
            .try_get_matches_from(["taskflow", "tasks", "tag", "add", "t1", "infra:#06b6d4"])
            .unwrap();
        let add = matches
            .subcommand_matches("tasks")
            .and_then(|m| m.subcommand_matches("tag"))
            .and_then(|m| m.subcommand_matches("add"))
            .unwrap();
        let tag = parse_tag(add.get_one::<String>("tag").unwrap(), 0);
        assert_eq!(tag.name, "infra");
        assert_eq!(tag.color, "#06b6d4");

        let matches =
            build_cli().try_get_matches_from(["taskflow", "tasks", "tag", "remove", "t1", "infra"]);
        assert!(matches.is_ok());
    }

    #[test]
    fn test_move_requires_task_and_column() {
        let mv = task_matches(&["move", "sample-task-1", "--to", "done", "--position", "0"], "move");
        assert_eq!(mv.get_one::<String>("task_id").map(String::as_str), Some("sample-task-1"));
        assert_eq!(mv.get_one::<String>("to").map(String::as_str), Some("done"));
        assert_eq!(mv.get_one::<usize>("position"), Some(&0));

        assert!(build_cli()
            .try_get_matches_from(["taskflow", "tasks", "move", "sample-task-1"])
            .is_err());
        assert!(build_cli()
            .try_get_matches_from(["taskflow", "tasks", "move", "--to", "done"])
            .is_err());
    }

    #[test]
    fn test_backup_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = backup_path(dir.path());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("taskflow-backup-"));
        assert!(name.ends_with(".json"));

        let file = dir.path().join("board.json");
        assert_eq!(backup_path(&file), file);
    }

    #[test]
    fn test_cli_structure_is_valid() {
        build_cli().debug_assert();
    }
}
