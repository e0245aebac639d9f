use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::Serialize;

use crate::config::EffectiveConfig;
use crate::engine::{Scanner, ScannerOptions};
use crate::provider::{QuillCheckOptions, QuillCheckProvider};
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "trustscan",
    version,
    about = "EVM コントラクトアドレスの信頼スコアを算出し、リスク要因と推奨を表示する"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// スコアリングAPIのタイムアウト（秒、0 で無制限）
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Scan(ScanArgs),
    Validate(ValidateArgs),
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    pub address: String,
    #[arg(long)]
    pub markdown: bool,
    /// スコアリングAPIを呼ばずにフォールバックのみで判定する
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    pub address: String,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    address: &'a str,
    valid: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    crate::telemetry::init(cli.verbose, cli.quiet);

    let stdout_is_tty = io::stdout().is_terminal();
    let stderr_is_tty = io::stderr().is_terminal();

    let home_dir = crate::platform::effective_home_dir()?;

    let env_config_path = std::env::var_os("TRUSTSCAN_CONFIG").map(PathBuf::from);
    let mut cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;
    if let Some(timeout) = cli.timeout {
        cfg.provider.timeout_secs = timeout;
    }

    let ui_cfg = UiConfig {
        color: stdout_is_tty && cfg.ui.color && !cli.no_color,
        stdout_is_tty,
        stderr_is_tty,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Scan(args) => {
            if cli.json && args.markdown {
                return Err(crate::exit::invalid_args(
                    "--json と --markdown は同時に指定できません",
                ));
            }
            let address = args.address.as_str();
            crate::core::check_address(address)?;

            let scanner = build_scanner(
                &cfg,
                args.offline,
                ui_cfg.stderr_is_tty && !cli.quiet && !cli.json,
            )?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("非同期ランタイムの初期化に失敗しました")?;
            let report = runtime.block_on(scanner.report(address));

            if cli.json {
                write_json(&report)?;
            } else if args.markdown {
                write_markdown(&report)?;
            } else {
                crate::ui::print_scan_report(&report, &ui_cfg)?;
            }
        }
        Commands::Validate(args) => {
            let address = args.address.as_str();
            let valid = crate::core::validate_address(address);
            if cli.json {
                write_json(&ValidationOutput { address, valid })?;
            } else {
                crate::ui::print_validation(address, valid, &ui_cfg);
            }
            if !valid {
                return Err(crate::exit::invalid_args(format!(
                    "EVM コントラクトアドレスではありません: {address}"
                )));
            }
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "trustscan", &mut io::stdout());
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    write_json(&cfg.redacted())?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg.redacted())?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: `trustscan config --show` を使用してください");
            }
        }
    }

    Ok(())
}

fn build_scanner(cfg: &EffectiveConfig, offline: bool, show_progress: bool) -> Result<Scanner> {
    let opts = ScannerOptions {
        chain_id: cfg.provider.chain_id,
        fallback_delay: Duration::from_millis(cfg.fallback.delay_ms),
        show_progress,
    };

    if offline {
        return Ok(Scanner::offline(opts, "--offline が指定されました"));
    }
    if !cfg.provider.enabled {
        return Ok(Scanner::offline(opts, "スコアリングAPIは設定で無効です"));
    }
    let Some(api_key) = cfg.provider.api_key.clone() else {
        return Ok(Scanner::offline(
            opts,
            "APIキーが未設定です（TRUSTSCAN_PROVIDER_API_KEY）",
        ));
    };

    let provider = QuillCheckProvider::new(QuillCheckOptions {
        base_url: cfg.provider.base_url.clone(),
        chain_id: cfg.provider.chain_id,
        api_key,
        timeout: Duration::from_secs(cfg.provider.timeout_secs),
    })
    .context("HTTP クライアントの初期化に失敗しました")?;
    Ok(Scanner::new(opts, Arc::new(provider)))
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    use std::io::Write;

    let buf = serde_json::to_vec_pretty(value)?;

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn write_markdown(report: &crate::core::Report) -> Result<()> {
    use std::io::Write;

    let markdown = format_markdown(report);
    let mut stdout = std::io::stdout().lock();
    crate::ui::ignore_broken_pipe(stdout.write_all(markdown.as_bytes()))?;
    Ok(())
}

fn format_markdown(report: &crate::core::Report) -> String {
    use std::fmt::Write as _;

    let r = &report.result;
    let mut out = String::new();

    let _ = writeln!(out, "# trustscan レポート");
    let _ = writeln!(out);
    let _ = writeln!(out, "- アドレス: `{}`", r.address);
    let _ = writeln!(out, "- チェーンID: {}", report.chain_id);
    let _ = writeln!(out, "- スコア: {} / 100（{}）", r.score, report.tier);
    let _ = writeln!(out, "- 概要: {}", report.summary);
    let _ = writeln!(
        out,
        "- ソースコード: {}",
        if r.verified_source {
            "検証済み"
        } else {
            "未検証"
        }
    );
    let _ = writeln!(out, "- 監査ステータス: {}", r.audit_status);
    let _ = writeln!(out, "- 判定元: {}", r.source.as_str());
    let _ = writeln!(out, "- ツールバージョン: {}", report.tool_version);
    let _ = writeln!(out, "- 生成日時: {}", report.generated_at);
    for note in &report.notes {
        let _ = writeln!(out, "- 注記: {note}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## リスク要因 ({})", r.risk_factors.len());
    let _ = writeln!(out);
    if r.risk_factors.is_empty() {
        let _ = writeln!(out, "- No significant risks detected");
    }
    for factor in &r.risk_factors {
        let _ = writeln!(out, "- {factor}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## ポジティブ要因 ({})", r.positive_factors.len());
    let _ = writeln!(out);
    if r.positive_factors.is_empty() {
        let _ = writeln!(out, "- No positive indicators found");
    }
    for factor in &r.positive_factors {
        let _ = writeln!(out, "- {factor}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## 推奨");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", r.recommendation);

    out
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "未対応のシェルです: {other}（bash|zsh|fish を指定してください）"
        ))),
    }
}
