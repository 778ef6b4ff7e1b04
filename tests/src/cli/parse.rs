use armor_cli::commands::Cmd;
use armor_cli::Cli;
use armor_core::Seed;
use armor_generator::ReusePolicy;
use armor_verification::SolverBackend;
use clap::error::ErrorKind;
use clap::Parser;

#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["armor", "generate", "--template", "crackme.c"]).unwrap();
    assert!(!cli.verbose);
    let Cmd::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    assert!(args.secret.is_none());
    assert!(args.seed.is_none());
    assert_eq!(args.templates, vec!["crackme.c".to_string()]);
    assert_eq!(args.reuse, ReusePolicy::Balanced);
    assert_eq!(args.solver.backend, SolverBackend::Search);
    assert!(!args.no_reduce);
}

#[test]
fn test_generate_full_flags() {
    let cli = Cli::try_parse_from([
        "armor",
        "-v",
        "generate",
        "-p",
        "CTF{flag}",
        "--seed",
        "-3",
        "--template",
        "crackme.c",
        "--template-path",
        "custom.py",
        "-o",
        "chall.c",
        "--reuse",
        "fresh",
        "--solver",
        "z3",
        "--solver-timeout",
        "500",
        "--timeout",
        "10",
        "--no-reduce",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.log_level(), tracing::Level::DEBUG);

    let Cmd::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.seed, Some(Seed::from_integer(-3)));
    assert_eq!(args.secret.unwrap().as_bytes(), b"CTF{flag}");
    assert_eq!(args.template_paths.len(), 1);
    assert_eq!(args.reuse, ReusePolicy::Fresh);
    assert_eq!(args.solver.backend, SolverBackend::Z3);
    assert_eq!(args.solver.timeout_ms, Some(500));
    assert_eq!(args.timeout, Some(10));
    assert!(args.no_reduce);
}

#[test]
fn test_rejects_bad_arguments() {
    let missing_template = Cli::try_parse_from(["armor", "generate", "--secret", "x"]);
    assert_eq!(
        missing_template.unwrap_err().kind(),
        ErrorKind::MissingRequiredArgument
    );

    for bad in [
        vec!["armor", "generate", "--template", "crackme.c", "--seed", "nope"],
        vec!["armor", "generate", "--template", "crackme.c", "--reuse", "random"],
        vec!["armor", "generate", "--template", "crackme.c", "--solver", "cvc5"],
        vec!["armor", "generate", "--template", "crackme.c", "--secret", ""],
    ] {
        assert_eq!(
            Cli::try_parse_from(&bad).unwrap_err().kind(),
            ErrorKind::ValueValidation,
            "{bad:?}"
        );
    }
}

#[test]
fn test_version_flag() {
    let err = Cli::try_parse_from(["armor", "--version"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[test]
fn test_solve_and_templates_parse() {
    let cli = Cli::try_parse_from(["armor", "solve", "system.json", "--limit", "5"]).unwrap();
    let Cmd::Solve(args) = cli.command else {
        panic!("expected solve");
    };
    assert_eq!(args.limit, 5);
    assert_eq!(args.system.to_str(), Some("system.json"));

    let cli = Cli::try_parse_from(["armor", "templates"]).unwrap();
    assert!(matches!(cli.command, Cmd::Templates(_)));
}
