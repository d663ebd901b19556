/**
 * QWeb Template Compiler CLI - qwebc
 *
 * Rewrites template expressions to explicit rendering-context access
 */
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

use qweb_compiler_cli::compiler::{compile_expr, BoundVariables};
use qweb_compiler_cli::config::RewriteConfig;
use qweb_compiler_cli::perform_upgrade::{
    perform_aggregate, perform_upgrade, perform_xpath_only, UpgradeOptions, UpgradeReport,
};
use qweb_compiler_cli::version::{version_string, VERSION};

fn paths_arg() -> Arg {
    Arg::new("paths")
        .value_name("PATHS")
        .num_args(0..)
        .value_parser(value_parser!(PathBuf))
        .help("Template files or directories (defaults to the current directory)")
}

fn vars_arg() -> Arg {
    Arg::new("vars")
        .long("vars")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Variables file written by `qwebc aggregate`")
}

fn dry_run_arg() -> Arg {
    Arg::new("dry-run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("List the files that would change without writing them")
}

fn cli() -> Command {
    Command::new("qwebc")
        .version(VERSION)
        .about(version_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .global(true)
                .help("Path to qwebc.json"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .global(true)
                .help("Number of worker threads"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log more (-v debug, -vv trace)"),
        )
        .subcommand(
            Command::new("upgrade")
                .about("Rewrite every template expression of the given files")
                .arg(paths_arg())
                .arg(vars_arg())
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("aggregate")
                .about("Collect the variables passed between templates")
                .arg(paths_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the variables here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("xpath")
                .about("Rewrite only the xpath selectors of patches to external templates")
                .arg(paths_arg())
                .arg(vars_arg())
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("expr")
                .about("Rewrite a single expression")
                .arg(Arg::new("expression").value_name("EXPRESSION").required(true))
                .arg(
                    Arg::new("bound")
                        .short('b')
                        .long("bound")
                        .value_name("NAME")
                        .action(ArgAction::Append)
                        .help("Variable bound by the template"),
                ),
        )
}

fn init_logger(verbosity: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match verbosity {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.format_timestamp(None).init();
}

fn paths(matches: &ArgMatches) -> Vec<PathBuf> {
    matches
        .get_many::<PathBuf>("paths")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_else(|| vec![PathBuf::from(".")])
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<RewriteConfig> {
    let explicit = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let mut config = RewriteConfig::resolve(explicit, Path::new("."))?;
    if let Some(jobs) = matches.get_one::<usize>("jobs") {
        config.jobs = Some(*jobs);
    }
    Ok(config)
}

fn upgrade_options(matches: &ArgMatches) -> UpgradeOptions {
    UpgradeOptions {
        roots: paths(matches),
        vars_file: matches.get_one::<PathBuf>("vars").cloned(),
        dry_run: matches.get_flag("dry-run"),
    }
}

fn finish(report: &UpgradeReport, dry_run: bool) -> i32 {
    if dry_run {
        for path in &report.changed {
            println!("{}", path.display());
        }
    }
    println!("{}", report.summary());
    if report.is_success() {
        0
    } else {
        1
    }
}

fn run(name: &str, matches: &ArgMatches) -> anyhow::Result<i32> {
    match name {
        "upgrade" => {
            let options = upgrade_options(matches);
            let report = perform_upgrade(&options, &load_config(matches)?)?;
            Ok(finish(&report, options.dry_run))
        }
        "xpath" => {
            let options = upgrade_options(matches);
            let report = perform_xpath_only(&options, &load_config(matches)?)?;
            Ok(finish(&report, options.dry_run))
        }
        "aggregate" => {
            let corpus = perform_aggregate(&paths(matches), &load_config(matches)?)?;
            let json = corpus.to_json()?;
            match matches.get_one::<PathBuf>("output") {
                Some(output) => {
                    fs::write(output, json + "\n")
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    log::info!("wrote {}", output.display());
                }
                None => println!("{}", json),
            }
            Ok(0)
        }
        "expr" => {
            let expression = matches
                .get_one::<String>("expression")
                .map(String::as_str)
                .unwrap_or_default();
            let bound: BoundVariables = matches
                .get_many::<String>("bound")
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            println!("{}", compile_expr(expression, &bound)?);
            Ok(0)
        }
        other => anyhow::bail!("Unknown command: {}", other),
    }
}

fn main() {
    let matches = cli().get_matches();
    let Some((name, sub_matches)) = matches.subcommand() else {
        process::exit(2);
    };
    init_logger(sub_matches.get_count("verbose"));

    match run(name, sub_matches) {
        Ok(code) => process::exit(code),
        Err(error) => {
            log::error!("{:#}", error);
            process::exit(2);
        }
    }
}
