//! Foodshare Android build configuration CLI
//!
//! Inspects and applies the one-time Gradle configuration pass: properties
//! loading, downloads-token resolution, repository sources, build output
//! redirection, and the clean action.

use anyhow::Result;
use clap::{Parser, Subcommand};
use foodshare_buildconf::clean;
use foodshare_buildconf::config::Config;
use foodshare_buildconf::credential::{self, CredentialSource};
use foodshare_buildconf::error::{exit_codes, Error};
use foodshare_buildconf::layout::BuildLayout;
use foodshare_buildconf::project::BuildConfiguration;
use foodshare_buildconf::properties::{LocalProperties, LOCAL_PROPERTIES};
use foodshare_cli::output::{format_count, format_size, Status};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "foodshare-buildconf")]
#[command(about = "Android build configuration for Foodshare")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configuration pass and report the result
    Configure {
        /// Android project root
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the downloads token and report where it came from
    Token {
        /// Android project root
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
        /// Credential key to resolve (defaults to the configured key)
        #[arg(long)]
        key: Option<String>,
    },

    /// Remove the redirected build directory
    Clean {
        /// Android project root
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
    },

    /// Diagnose the build configuration environment
    Doctor {
        /// Android project root
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref().map(|p| p.to_str().unwrap()))?;

    let exit_code = match cli.command {
        Commands::Configure { project_root, json } => {
            run_configure(&project_root, json, cli.quiet, &config)
        }
        Commands::Token { project_root, key } => {
            run_token(&project_root, key.as_deref(), &config)
        }
        Commands::Clean { project_root } => {
            run_clean(&project_root, cli.quiet, &config)
        }
        Commands::Doctor { project_root, json } => {
            run_doctor(&project_root, json, &config)
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    if verbose == 0 {
        return;
    }

    let default_filter = match verbose {
        1 => "foodshare_buildconf=debug",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code_for(err: &Error) -> i32 {
    match err.code.category() {
        "Configuration" => exit_codes::CONFIG_ERROR,
        "Clean" => exit_codes::CLEAN_ERROR,
        _ => exit_codes::FAILURE,
    }
}

fn fail(err: &Error, json: bool) -> i32 {
    if json {
        match serde_json::to_string_pretty(&err.to_report()) {
            Ok(out) => eprintln!("{out}"),
            Err(_) => Status::error(&err.to_string()),
        }
    } else {
        Status::error(&err.to_string());
    }
    exit_code_for(err)
}

fn run_configure(project_root: &Path, json: bool, quiet: bool, config: &Config) -> i32 {
    let pass = match BuildConfiguration::configure(project_root, &config.schema) {
        Ok(pass) => pass,
        Err(e) => return fail(&e, json),
    };

    let report = pass.report();

    if json {
        return match serde_json::to_string_pretty(&report) {
            Ok(out) => {
                println!("{out}");
                exit_codes::SUCCESS
            }
            Err(e) => {
                Status::error(&format!("Failed to encode report: {}", e));
                exit_codes::FAILURE
            }
        };
    }

    if !quiet {
        Status::header("Build configuration");
        Status::detail("project root", &report.project_root.display().to_string());
        Status::detail("build dir", &report.root_build_dir.display().to_string());
        for repo in &report.repositories {
            Status::detail(repo.id, repo.url);
        }
        for subproject in &report.subprojects {
            Status::detail(&subproject.name, &subproject.build_dir.display().to_string());
        }
        println!();
    }

    match &report.credential {
        Some(c) => Status::success(&format!(
            "{} resolved from {} ({})",
            c.key, c.source, c.masked_value
        )),
        None => Status::warning(&format!(
            "{} not set in local.properties or environment",
            pass.credential_key
        )),
    }

    if !quiet {
        Status::success(&format!(
            "Configured {}",
            format_count(pass.subprojects.len() as u64, "subproject", "subprojects")
        ));
    }

    exit_codes::SUCCESS
}

fn run_token(project_root: &Path, key: Option<&str>, config: &Config) -> i32 {
    let key = key.unwrap_or(&config.schema.credentials.key);

    let props = match LocalProperties::load(&project_root.join(LOCAL_PROPERTIES)) {
        Ok(props) => props,
        Err(e) => return fail(&e, false),
    };

    // Unset is tolerated downstream, so it is a warning, not a failure.
    match credential::resolve(key, &props) {
        Some(c) => {
            Status::success(&format!("{} resolved from {} ({})", key, c.source, c.masked()));
        }
        None => {
            Status::warning(&format!("{} not set in local.properties or environment", key));
        }
    }

    exit_codes::SUCCESS
}

fn run_clean(project_root: &Path, quiet: bool, config: &Config) -> i32 {
    let layout = BuildLayout::redirect(project_root, &config.schema.project.build_dir);

    match clean::clean(&layout) {
        Ok(report) if report.existed => {
            if !quiet {
                Status::success(&format!(
                    "Removed {} ({})",
                    format_count(report.entries_removed, "file", "files"),
                    format_size(report.bytes_freed)
                ));
            }
            exit_codes::SUCCESS
        }
        Ok(_) => {
            if !quiet {
                Status::info("Build directory already clean");
            }
            exit_codes::SUCCESS
        }
        Err(e) => fail(&e, false),
    }
}

#[derive(Serialize)]
struct DoctorReport {
    local_properties: bool,
    credential_key: String,
    credential_source: Option<CredentialSource>,
    build_dir: PathBuf,
    build_dir_exists: bool,
}

fn run_doctor(project_root: &Path, json: bool, config: &Config) -> i32 {
    let properties_path = project_root.join(LOCAL_PROPERTIES);

    let props = match LocalProperties::load(&properties_path) {
        Ok(props) => props,
        Err(e) => return fail(&e, json),
    };

    let resolved = credential::resolve(&config.schema.credentials.key, &props);
    let layout = BuildLayout::redirect(project_root, &config.schema.project.build_dir);

    let report = DoctorReport {
        local_properties: properties_path.exists(),
        credential_key: config.schema.credentials.key.clone(),
        credential_source: resolved.as_ref().map(|c| c.source),
        build_dir: layout.root_build_dir().to_path_buf(),
        build_dir_exists: layout.root_build_dir().exists(),
    };

    if json {
        return match serde_json::to_string_pretty(&report) {
            Ok(out) => {
                println!("{out}");
                exit_codes::SUCCESS
            }
            Err(e) => {
                Status::error(&format!("Failed to encode report: {}", e));
                exit_codes::FAILURE
            }
        };
    }

    Status::header("Build configuration check");

    if report.local_properties {
        Status::success("local.properties: present");
    } else {
        Status::warning("local.properties: missing (treated as empty)");
    }

    match &resolved {
        Some(c) => Status::success(&format!(
            "{}: {} ({})",
            report.credential_key,
            c.source,
            c.masked()
        )),
        None => Status::warning(&format!("{}: not set", report.credential_key)),
    }

    if report.build_dir_exists {
        Status::info(&format!("build dir: {} (exists)", report.build_dir.display()));
    } else {
        Status::info(&format!("build dir: {} (absent)", report.build_dir.display()));
    }

    exit_codes::SUCCESS
}
