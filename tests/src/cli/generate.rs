use armor_cli::commands::{Cmd, Command};
use armor_cli::Cli;
use armor_core::ConstraintSystem;
use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs;

async fn run(args: &[&str]) -> Result<()> {
    let cli = Cli::try_parse_from(args)?;
    cli.command.execute().await.map_err(|err| eyre!("{err}"))
}

#[tokio::test]
async fn test_generate_writes_every_output() -> Result<()> {
    crate::init_tracing();
    let dir = crate::scratch_dir("cli-generate");
    let validator = dir.join("chall.c");
    let solver = dir.join("solve.py");
    let report = dir.join("report.json");
    let system = dir.join("system.json");

    run(&[
        "armor",
        "generate",
        "--secret",
        "CTF{flag}",
        "--seed",
        "0",
        "--template",
        "crackme.c",
        "--template",
        "solver.py",
        "--output",
        validator.to_str().unwrap(),
        "--output",
        solver.to_str().unwrap(),
        "--emit",
        report.to_str().unwrap(),
        "--save-system",
        system.to_str().unwrap(),
    ])
    .await?;

    let program = fs::read_to_string(&validator)?;
    assert!(crate::render::eval::validator_accepts(&program, b"CTF{flag}"));
    assert!(fs::read_to_string(&solver)?.contains("BitVec(\"p8\", 8)"));

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report)?)?;
    assert_eq!(report["metadata"]["secret_length"], 9);

    let saved: ConstraintSystem = serde_json::from_str(&fs::read_to_string(&system)?)?;
    assert!(saved.holds(b"CTF{flag}"));

    run(&["armor", "solve", system.to_str().unwrap()]).await?;

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_size_mismatch_leaves_no_output() -> Result<()> {
    let dir = crate::scratch_dir("cli-mismatch");
    let template = dir.join("three.c");
    fs::write(&template, "{{% size 3 %}}\n{{ predicate }}\n")?;
    let output = dir.join("out.c");

    let result = run(&[
        "armor",
        "generate",
        "--secret",
        "CTF{flag}",
        "--template-path",
        template.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ])
    .await;
    assert!(result.is_err());
    assert!(!output.exists());

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_too_many_outputs_is_an_error() {
    let cli = Cli::try_parse_from([
        "armor",
        "generate",
        "--secret",
        "ab",
        "--template",
        "crackme.c",
        "-o",
        "a.c",
        "-o",
        "b.c",
    ])
    .unwrap();
    let Cmd::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    let err = args.execute().await.unwrap_err();
    assert!(err.to_string().contains("2 output paths given for 1 templates"));
}

#[tokio::test]
async fn test_failed_write_leaves_no_earlier_outputs() -> Result<()> {
    let dir = crate::scratch_dir("cli-partial");
    let validator = dir.join("ok.c");
    let solver = dir.join("missing").join("dir").join("solve.py");

    let result = run(&[
        "armor",
        "generate",
        "--secret",
        "CTF{flag}",
        "--seed",
        "0",
        "--template",
        "crackme.c",
        "--template",
        "solver.py",
        "-o",
        validator.to_str().unwrap(),
        "-o",
        solver.to_str().unwrap(),
    ])
    .await;

    assert!(result.is_err());
    assert!(!validator.exists());
    assert_eq!(fs::read_dir(&dir)?.count(), 0);

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_timeout_stops_the_worker() -> Result<()> {
    let dir = crate::scratch_dir("cli-timeout");
    let output = dir.join("chall.c");
    let secret: String = (0..200u32)
        .map(|i| char::from(b'!' + (i * 37 % 90) as u8))
        .collect();

    let started = std::time::Instant::now();
    let result = run(&[
        "armor",
        "generate",
        "--secret",
        &secret,
        "--seed",
        "1",
        "--template",
        "crackme.c",
        "--timeout",
        "0",
        "-o",
        output.to_str().unwrap(),
    ])
    .await;

    let err = result.expect_err("a zero timeout cannot finish a 200-byte secret");
    assert!(err.to_string().contains("timed out"), "{err}");
    assert!(started.elapsed() < std::time::Duration::from_secs(30));
    assert!(!output.exists());

    fs::remove_dir_all(dir)?;
    Ok(())
}
