// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, bail};
use config::Config;
use runtime::MemoryRuntime;
use std::env;
use std::path::PathBuf;
use waitlist_app::AppState;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `waitlist --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let seed_path = options.seed_path.clone().or_else(|| config.seed_path());
    if options.print_seed_path {
        match &seed_path {
            Some(path) => println!("{}", path.display()),
            None => println!("(built-in demo data)"),
        }
        return Ok(());
    }

    let providers = if options.demo {
        waitlist_app::seed::demo_providers()
    } else if let Some(path) = &seed_path {
        runtime::load_seed_file(path).with_context(|| {
            format!(
                "load seed {} -- if this path is wrong, set [data].seed_path or WAITLIST_SEED_PATH",
                path.display()
            )
        })?
    } else {
        bail!(
            "no seed file configured; set [data].seed_path, WAITLIST_SEED_PATH, pass --seed <path>, or run with --demo"
        );
    };

    let mut runtime = MemoryRuntime::new(providers)?;
    let search_debounce = config.search_debounce()?;
    if options.check_only {
        return Ok(());
    }

    let mut state = AppState::default();
    waitlist_tui::run_app(&mut state, &mut runtime, search_debounce)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    seed_path: Option<PathBuf>,
    print_config_path: bool,
    print_seed_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        seed_path: None,
        print_config_path: false,
        print_seed_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a file path"))?;
                options.seed_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-seed-path" => {
                options.print_seed_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("waitlist");
    println!("  --config <path>          Use a specific config path");
    println!("  --seed <path>            Load providers from a JSON seed file");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-seed-path        Print resolved seed file path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with built-in demo data");
    println!("  --check                  Validate config and seed data, then exit");
    println!("  --help                   Show this help");
}
