use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["blogfeed"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn collect_feeds_defaults() {
    let cli = Cli::try_parse_from(["blogfeed", "collect-feeds"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::CollectFeeds {
            seed: false,
            max_per_source: 25
        })
    ));
}

#[test]
fn collect_feeds_with_seed_and_limit() {
    let cli = Cli::try_parse_from([
        "blogfeed",
        "collect-feeds",
        "--seed",
        "--max-per-source",
        "10",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::CollectFeeds {
            seed: true,
            max_per_source: 10
        })
    ));
}

#[test]
fn collect_community_defaults() {
    let cli = Cli::try_parse_from(["blogfeed", "collect-community"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::CollectCommunity {
            seed: false,
            max_per_source: 20,
            max_age_hours: 96
        })
    ));
}

#[test]
fn collect_community_with_age_window() {
    let cli = Cli::try_parse_from(["blogfeed", "collect-community", "--max-age-hours", "24"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::CollectCommunity {
            max_age_hours: 24,
            ..
        })
    ));
}

#[test]
fn select_defaults() {
    let cli = Cli::try_parse_from(["blogfeed", "select"]).unwrap();
    match cli.command {
        Some(Commands::Select {
            count,
            max_age_hours,
            min_score,
            include_seed,
        }) => {
            assert_eq!(count, 3);
            assert_eq!(max_age_hours, 72);
            assert!((min_score - 18.0).abs() < f64::EPSILON);
            assert!(!include_seed);
        }
        other => panic!("expected select command, got {other:?}"),
    }
}

#[test]
fn select_with_all_flags() {
    let cli = Cli::try_parse_from([
        "blogfeed",
        "select",
        "--count",
        "2",
        "--max-age-hours",
        "48",
        "--min-score",
        "25.5",
        "--include-seed",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Select {
            count,
            max_age_hours,
            min_score,
            include_seed,
        }) => {
            assert_eq!(count, 2);
            assert_eq!(max_age_hours, 48);
            assert!((min_score - 25.5).abs() < f64::EPSILON);
            assert!(include_seed);
        }
        other => panic!("expected select command, got {other:?}"),
    }
}

#[test]
fn non_numeric_count_is_rejected() {
    assert!(Cli::try_parse_from(["blogfeed", "select", "--count", "many"]).is_err());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["blogfeed", "draft"]).is_err());
}
