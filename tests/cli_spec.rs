use speculate2::speculate;

speculate! {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use clap::Parser;
    use planner_core::derivation::{Limits, WeekStart};
    use planner_core::models::{GoalStatus, Mood, Priority};
    use planner_core::{Database, EntityStore, Error, JsonFile, Persistence};
    use study_planner::cli::{Cli, Commands, TaskCommand};
    use study_planner::commands::{self, Context};
    use study_planner::config::{Config, Storage};
    use tempfile::TempDir;

    fn setup_store() -> EntityStore<Database> {
        let db = Database::open_memory().expect("Failed to create test database");
        db.migrate().expect("Failed to migrate test database");
        EntityStore::open(db).expect("Failed to open store")
    }

    fn now() -> NaiveDateTime {
        // A Wednesday
        NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 8, 0, 0).unwrap()
    }

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("studyplan").chain(args.iter().copied()))
    }

    fn run<P: Persistence>(store: &mut EntityStore<P>, args: &[&str]) -> anyhow::Result<String> {
        let cli = parse(args)?;
        let ctx = Context {
            config: Config {
                storage: Storage::Sqlite(":memory:".into()),
                week_start: cli.week_start.unwrap_or_default(),
                limits: Limits::default(),
                json: cli.json,
            },
            now: now(),
            utc: stamp(),
        };
        let mut out = Vec::new();
        commands::run(store, cli.command.unwrap_or(Commands::Dashboard), &ctx, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    describe "argument parsing" {
        it "reads task list filter and sort" {
            let cli = parse(&["tasks", "list", "--filter", "overdue", "--sort", "due"]).unwrap();
            match cli.command {
                Some(Commands::Tasks { action: TaskCommand::List { filter, sort } }) => {
                    assert_eq!(filter.as_str(), "overdue");
                    assert_eq!(sort.as_str(), "due");
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }

        it "defaults to no command" {
            let cli = parse(&[]).unwrap();
            assert!(cli.command.is_none());
        }

        it "accepts global flags after the subcommand" {
            let cli = parse(&["progress", "--week-start", "monday", "--json"]).unwrap();
            assert_eq!(cli.week_start, Some(WeekStart::Monday));
            assert!(cli.json);
        }

        it "rejects an unknown filter" {
            assert!(parse(&["tasks", "list", "--filter", "someday"]).is_err());
        }

        it "rejects a due date together with --no-due" {
            assert!(parse(&["tasks", "edit", "abc", "--due", "2024-05-20", "--no-due"]).is_err());
        }

        it "accepts only the known categories and session types" {
            assert!(parse(&["goals", "add", "Thesis", "--category", "research"]).is_ok());
            assert!(parse(&["goals", "add", "Thesis", "--category", "hobby"]).is_err());
            assert!(parse(&["tasks", "add", "Read", "--category", "reading"]).is_ok());
            assert!(parse(&["tasks", "add", "Read", "--category", "skill"]).is_err());
            assert!(parse(&["schedule", "edit", "abc", "--type", "lecture"]).is_ok());
            assert!(parse(&["schedule", "edit", "abc", "--type", "party"]).is_err());
        }

        it "rejects a malformed session time" {
            assert!(parse(&["schedule", "add", "Review", "--date", "2024-05-16", "--time", "noon"]).is_err());
        }
    }

    describe "configuration" {
        it "uses SQLite for database paths" {
            let cli = parse(&["--db", "/tmp/plans/study.db", "dashboard"]).unwrap();
            let config = Config::from_cli(&cli).unwrap();
            assert_eq!(config.storage, Storage::Sqlite("/tmp/plans/study.db".into()));
            assert_eq!(config.week_start, WeekStart::Sunday);
            assert_eq!(config.limits, Limits::default());
        }

        it "uses a JSON file for .json paths" {
            let cli = parse(&["--db", "backup.JSON", "--week-start", "mon"]).unwrap();
            let config = Config::from_cli(&cli).unwrap();
            assert_eq!(config.storage, Storage::Json("backup.JSON".into()));
            assert_eq!(config.week_start, WeekStart::Monday);
        }
    }

    describe "goals" {
        it "adds and lists goals" {
            let mut store = setup_store();
            let out = run(&mut store, &["goals", "add", "Pass calculus", "--deadline", "2024-05-20", "--priority", "high"]).unwrap();
            assert!(out.starts_with("Added goal "));

            let goal = &store.snapshot().goals[0];
            assert_eq!(goal.priority, Priority::High);
            assert_eq!(goal.category, "academic");

            let out = run(&mut store, &["goals", "list"]).unwrap();
            assert!(out.contains("Pass calculus"));
            assert!(out.contains("(5 days left)"));
        }

        it "requires a deadline" {
            let mut store = setup_store();
            let err = run(&mut store, &["goals", "add", "Pass calculus"]).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<Error>(),
                Some(Error::MissingRequiredField("deadline"))
            ));
            assert!(store.snapshot().goals.is_empty());
        }

        it "changes status and filters by it" {
            let mut store = setup_store();
            run(&mut store, &["goals", "add", "Thesis", "--deadline", "2024-09-01"]).unwrap();
            run(&mut store, &["goals", "add", "Statistics", "--deadline", "2024-06-01"]).unwrap();
            let id = store.snapshot().goals[1].id.clone();

            run(&mut store, &["goals", "status", &id, "completed"]).unwrap();
            assert_eq!(store.snapshot().goals[1].status, GoalStatus::Completed);

            let out = run(&mut store, &["goals", "list", "--status", "completed"]).unwrap();
            assert!(out.contains("Statistics"));
            assert!(!out.contains("Thesis"));
        }

        it "reports unknown ids" {
            let mut store = setup_store();
            let err = run(&mut store, &["goals", "delete", "missing"]).unwrap_err();
            assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound { .. })));
        }
    }

    describe "tasks" {
        it "lists tasks in priority order" {
            let mut store = setup_store();
            run(&mut store, &["tasks", "add", "Low one", "--priority", "low"]).unwrap();
            run(&mut store, &["tasks", "add", "High one", "--priority", "high"]).unwrap();
            run(&mut store, &["tasks", "add", "Medium one"]).unwrap();

            let out = run(&mut store, &["tasks", "list", "--sort", "priority"]).unwrap();
            let high = out.find("High one").unwrap();
            let medium = out.find("Medium one").unwrap();
            let low = out.find("Low one").unwrap();
            assert!(high < medium && medium < low);
        }

        it "toggles completion and shows overdue tasks" {
            let mut store = setup_store();
            run(&mut store, &["tasks", "add", "Lab report", "--due", "2024-05-14"]).unwrap();
            run(&mut store, &["tasks", "add", "Essay", "--due", "2024-05-15"]).unwrap();

            let out = run(&mut store, &["tasks", "list", "--filter", "overdue"]).unwrap();
            assert!(out.contains("Lab report"));
            assert!(out.contains("(overdue)"));
            assert!(!out.contains("Essay"));

            let id = store.snapshot().tasks[0].id.clone();
            let out = run(&mut store, &["tasks", "toggle", &id]).unwrap();
            assert!(out.starts_with("Completed task"));
            assert!(store.snapshot().tasks[0].completed);

            let out = run(&mut store, &["tasks", "list", "--filter", "overdue"]).unwrap();
            assert_eq!(out, "No tasks found.\n");
        }

        it "clears a due date" {
            let mut store = setup_store();
            run(&mut store, &["tasks", "add", "Essay", "--due", "2024-05-20"]).unwrap();
            let id = store.snapshot().tasks[0].id.clone();

            run(&mut store, &["tasks", "edit", &id, "--no-due"]).unwrap();
            assert_eq!(store.snapshot().tasks[0].due_date, None);
        }
    }

    describe "schedule" {
        it "shows the current week starting on the configured day" {
            let mut store = setup_store();
            run(&mut store, &["schedule", "add", "Group study", "--date", "2024-05-16", "--time", "18:30"]).unwrap();
            run(&mut store, &["schedule", "add", "Last week", "--date", "2024-05-08", "--time", "09:00"]).unwrap();

            let out = run(&mut store, &["schedule", "week"]).unwrap();
            assert!(out.starts_with("Sun 2024-05-12"));
            assert!(out.contains("Wed 2024-05-15  (today)"));
            assert!(out.contains("18:30  Group study"));
            assert!(!out.contains("Last week"));

            let out = run(&mut store, &["schedule", "week", "--week-start", "monday"]).unwrap();
            assert!(out.starts_with("Mon 2024-05-13"));
        }

        it "lists only upcoming sessions" {
            let mut store = setup_store();
            run(&mut store, &["schedule", "add", "Past", "--date", "2024-05-01", "--time", "09:00"]).unwrap();
            run(&mut store, &["schedule", "add", "Today", "--date", "2024-05-15", "--time", "08:00"]).unwrap();

            let out = run(&mut store, &["schedule", "list"]).unwrap();
            assert!(out.contains("Today"));
            assert!(!out.contains("Past"));
        }
    }

    describe "progress log" {
        it "reads hours and counts leniently" {
            let mut store = setup_store();
            run(&mut store, &["log", "add", "--hours", "1.5h", "--tasks=-2", "--mood", "excellent"]).unwrap();

            let entry = &store.snapshot().progress[0];
            assert_eq!(entry.date, now().date());
            assert_eq!(entry.hours_studied, Some(1.5));
            assert_eq!(entry.tasks_completed, None);
            assert_eq!(entry.mood, Mood::Excellent);
        }

        it "ignores negative hours" {
            let mut store = setup_store();
            run(&mut store, &["log", "add", "--hours=-2"]).unwrap();
            run(&mut store, &["log", "add", "--hours", "1"]).unwrap();

            assert_eq!(store.snapshot().progress[0].hours_studied, None);
            let out = run(&mut store, &["progress"]).unwrap();
            assert!(out.contains("Study hours:     1.0h"));
        }

        it "summarises the week" {
            let mut store = setup_store();
            run(&mut store, &["log", "add", "--date", "2024-05-12", "--hours", "2", "--mood", "good"]).unwrap();
            run(&mut store, &["log", "add", "--date", "2024-05-14", "--hours", "abc", "--mood", "excellent"]).unwrap();
            run(&mut store, &["log", "add", "--date", "2024-05-11", "--hours", "4"]).unwrap();

            let out = run(&mut store, &["progress"]).unwrap();
            assert!(out.contains("Study hours:     2.0h"));
            assert!(out.contains("Entries:         2"));
            assert!(out.contains("Average mood:    excellent"));
        }

        it "shows N/A when nothing was logged this week" {
            let mut store = setup_store();
            let out = run(&mut store, &["progress"]).unwrap();
            assert!(out.contains("Average mood:    N/A"));
            assert!(out.contains("Study hours: 0.0 total, 0.0 per entry"));
        }
    }

    describe "dashboard" {
        it "is the default command" {
            let mut store = setup_store();
            let out = run(&mut store, &[]).unwrap();
            assert!(out.starts_with("Good morning!"));
            assert!(out.contains("No tasks yet."));
        }

        it "prints JSON on request" {
            let mut store = setup_store();
            run(&mut store, &["tasks", "add", "Lab report", "--due", "2024-05-14"]).unwrap();
            run(&mut store, &["tasks", "add", "Essay"]).unwrap();
            let id = store.snapshot().tasks[1].id.clone();
            run(&mut store, &["tasks", "toggle", &id]).unwrap();

            let out = run(&mut store, &["dashboard", "--json"]).unwrap();
            let value: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(value["tasks"]["total"], 2);
            assert_eq!(value["tasks"]["completed"], 1);
            assert_eq!(value["tasks"]["overdue"], 1);
            assert_eq!(value["tasks"]["completion_rate"], 50);
            assert_eq!(value["recent_tasks"].as_array().unwrap().len(), 2);
        }
    }

    describe "export and import" {
        it "moves data between stores" {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("export.json");
            let path_arg = path.to_str().unwrap();

            let mut source = setup_store();
            run(&mut source, &["goals", "add", "Thesis", "--deadline", "2024-09-01"]).unwrap();
            run(&mut source, &["tasks", "add", "Outline"]).unwrap();
            run(&mut source, &["export", path_arg]).unwrap();

            let mut target = setup_store();
            let out = run(&mut target, &["import", path_arg]).unwrap();
            assert_eq!(out, "Imported 1 goals, 1 tasks, 0 sessions and 0 progress entries\n");
            assert_eq!(target.snapshot(), source.snapshot());
        }

        it "prints the export when no path is given" {
            let mut store = setup_store();
            run(&mut store, &["tasks", "add", "Outline"]).unwrap();
            let out = run(&mut store, &["export"]).unwrap();
            let value: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(value["tasks"][0]["title"], "Outline");
            assert_eq!(value["tasks"][0]["category"], "study");
        }

        it "refuses an export with repeated ids" {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("broken.json");
            let task = r#"{"id":"1","title":"Outline","createdAt":"2024-05-15T08:00:00Z","updatedAt":"2024-05-15T08:00:00Z"}"#;
            JsonFile::new(&path).save(&format!(r#"{{"tasks":[{task},{task}]}}"#)).unwrap();

            let mut store = setup_store();
            let err = run(&mut store, &["import", path.to_str().unwrap()]).unwrap_err();
            assert!(matches!(err.downcast_ref::<Error>(), Some(Error::DuplicateId { .. })));
            assert!(store.snapshot().is_empty());
        }

        it "refuses a missing import file" {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("nope.json");
            let mut store = setup_store();
            assert!(run(&mut store, &["import", path.to_str().unwrap()]).is_err());
        }

        it "works with a JSON file as the primary store" {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("plan.json");

            let mut store = EntityStore::open(JsonFile::new(&path)).unwrap();
            run(&mut store, &["tasks", "add", "Outline"]).unwrap();

            let reopened = EntityStore::open(JsonFile::new(&path)).unwrap();
            assert_eq!(reopened.snapshot().tasks[0].title, "Outline");
        }
    }
}
