use anyhow::Error;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::core::{AuditStatus, Report, ScanSource};

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub stdout_is_tty: bool,
    pub stderr_is_tty: bool,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "エラー:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "原因:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "次に:");
    let _ = writeln!(
        stderr,
        "  - 詳細を見るには `--verbose` を付けて再実行してください"
    );
    let _ = writeln!(
        stderr,
        "  - 利用可能なコマンド/オプションは `trustscan --help` を参照してください"
    );
}

pub fn print_scan_report(report: &Report, cfg: &UiConfig) -> io::Result<()> {
    if cfg.quiet {
        return Ok(());
    }

    let mut out = io::stdout().lock();
    ignore_broken_pipe(write_scan_report(&mut out, report, cfg.color, cfg.verbose))
}

/// A closed stdout (`| head`) is not a failure.
pub fn ignore_broken_pipe(res: io::Result<()>) -> io::Result<()> {
    match res {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

pub fn write_scan_report(
    out: &mut dyn Write,
    report: &Report,
    color: bool,
    verbose: bool,
) -> io::Result<()> {
    let r = &report.result;

    writeln!(out, "信頼性分析: {}", r.address)?;
    writeln!(
        out,
        "スコア: {} / 100  [{}]",
        format_score(r.score, color),
        report.tier
    )?;
    writeln!(out, "{}", report.summary)?;
    writeln!(out)?;

    let source_label = if r.verified_source {
        "検証済み"
    } else {
        "未検証"
    };
    let rows = [
        ("ソースコード", source_label.to_string()),
        ("監査ステータス", format_audit(r.audit_status, color)),
        ("リスク要因", format!("{} 件検出", r.risk_factors.len())),
        ("判定元", source_name(r.source).to_string()),
        ("チェーンID", report.chain_id.to_string()),
    ];
    let label_w = rows
        .iter()
        .map(|(label, _)| visible_width_ansi(label))
        .max()
        .unwrap_or(0);
    for (label, value) in &rows {
        writeln!(out, "{}  {value}", pad_end_display(label, label_w))?;
    }

    writeln!(out)?;
    writeln!(out, "リスク要因:")?;
    if r.risk_factors.is_empty() {
        writeln!(out, "- No significant risks detected")?;
    }
    for factor in &r.risk_factors {
        writeln!(out, "- {factor}")?;
    }

    writeln!(out)?;
    writeln!(out, "ポジティブ要因:")?;
    if r.positive_factors.is_empty() {
        writeln!(out, "- No positive indicators found")?;
    }
    for factor in &r.positive_factors {
        writeln!(out, "- {factor}")?;
    }

    writeln!(out)?;
    writeln!(out, "推奨:")?;
    writeln!(out, "  {}", r.recommendation)?;

    if !report.notes.is_empty() {
        writeln!(out)?;
        for note in &report.notes {
            writeln!(out, "- {note}")?;
        }
    }
    if verbose {
        writeln!(out)?;
        writeln!(
            out,
            "生成日時: {}  バージョン: {}",
            report.generated_at, report.tool_version
        )?;
    }
    Ok(())
}

pub fn print_validation(address: &str, valid: bool, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    let mark = match (valid, cfg.color) {
        (true, true) => "\x1b[32m有効\x1b[0m",
        (true, false) => "有効",
        (false, true) => "\x1b[31m無効\x1b[0m",
        (false, false) => "無効",
    };
    let _ = writeln!(out, "{mark}: {address}");
}

fn source_name(source: ScanSource) -> &'static str {
    match source {
        ScanSource::Provider => "スコアリングAPI",
        ScanSource::Fallback => "フォールバック（決定的推定）",
    }
}

fn audit_label(status: AuditStatus) -> &'static str {
    match status {
        AuditStatus::Verified => "Verified",
        AuditStatus::Unverified => "Unverified",
        AuditStatus::Issues => "Issues",
    }
}

fn format_audit(status: AuditStatus, color: bool) -> String {
    let s = audit_label(status);
    if !color {
        return s.to_string();
    }

    let code = match status {
        AuditStatus::Verified => "32",
        AuditStatus::Unverified => "33",
        AuditStatus::Issues => "31",
    };
    format!("\x1b[{code}m{s}\x1b[0m")
}

pub fn format_score(score: u8, color: bool) -> String {
    if !color {
        return score.to_string();
    }

    let code = match score {
        70.. => "32",
        40.. => "33",
        _ => "31",
    };
    format!("\x1b[{code}m{score}\x1b[0m")
}

fn pad_end_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn visible_width_ansi(s: &str) -> usize {
    let mut width: usize = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for ch2 in chars.by_ref() {
                if ch2 == 'm' {
                    break;
                }
            }
            continue;
        }
        width = width.saturating_add(UnicodeWidthChar::width(ch).unwrap_or(0));
    }
    width
}
