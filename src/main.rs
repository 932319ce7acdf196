//! CLI entry point for `attachbox`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};

use attachbox::config::{self, Config};
use attachbox::i18n;
use attachbox::replay::{self, ReplayReport, StepResult};

#[derive(Parser)]
#[command(name = "attachbox", version, about = "Attachment box manager for in-game mail")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, ja). Defaults to config, then system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,

    /// Config file to use instead of the standard location
    #[arg(long, value_name = "FILE", env = "ATTACHBOX_CONFIG", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted box session and print the resulting mails
    Replay {
        script: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    ShowConfig,
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => config::load_config_from(path),
        None => config::load_config(),
    };

    // --lang beats config, config beats the environment
    let lang = cli
        .lang
        .as_deref()
        .or(config.general.lang.as_deref())
        .and_then(i18n::Lang::from_code)
        .unwrap_or_else(i18n::detect_system_lang);
    i18n::set_lang(lang);

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Replay { script, json } => cmd_replay(&script, json, &config),
        Commands::ShowConfig => cmd_show_config(&config),
        Commands::InitConfig { force } => cmd_init_config(cli.config.as_deref(), force),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}

/// Configure logging: stderr + a log file in the cache directory.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "attachbox.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

fn cmd_replay(path: &Path, json: bool, config: &Config) -> anyhow::Result<()> {
    let script = replay::load_script(path)?;
    tracing::info!(path = %path.display(), steps = script.steps.len(), "Replaying script");
    let report = replay::run_script(&script, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for (n, step) in report.steps.iter().enumerate() {
        if let StepResult::Failed { error } = step {
            eprintln!("step {}: {error}", n + 1);
        }
    }

    for mail in &report.mails {
        print_mail(&format!("{} #{}", i18n::msg_mail(), mail.index), mail);
    }
    for draft in &report.drafts {
        print_mail(&format!("{} ({})", i18n::msg_mail(), draft.sender), draft);
    }

    let open: Vec<String> = report.open_boxes.iter().map(u32::to_string).collect();
    println!("{}: [{}]", i18n::msg_open_boxes(), open.join(", "));
}

fn print_mail(label: &str, mail: &attachbox::model::MailRecord) {
    println!(
        "{label}: {} {}",
        mail.attachments.len(),
        i18n::msg_attachments()
    );
    for item in &mail.attachments {
        println!("  {item}");
    }
}

fn cmd_show_config(config: &Config) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn cmd_init_config(explicit: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?,
    };
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config::save_config_to(&Config::default(), &path)?;
    println!("{} {}", i18n::msg_config_saved(), path.display());
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "attachbox", &mut std::io::stdout());
    Ok(())
}
