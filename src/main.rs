//! Command line entry point for the Attendance Audit Engine.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendance_audit::api::{AppState, create_router};
use attendance_audit::audit::{CancellationToken, run_audit};
use attendance_audit::config::ConfigLoader;
use attendance_audit::error::AuditError;
use attendance_audit::models::{AuditPeriod, AuditReport};
use attendance_audit::report::{
    RANKING_HEADERS, render_report_pdf, write_detail_csv, write_ranking_csv,
};
use attendance_audit::workbook::Workbook;

#[derive(Parser, Debug)]
#[command(name = "attendance-audit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Audit a workbook and print the findings.
    Analyze(AnalyzeArgs),
    /// Serve the HTTP API.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// An .xlsx file, a .json workbook, or a directory of per-sheet CSV files.
    workbook: PathBuf,

    /// First audited date (YYYY-MM-DD).
    #[arg(long = "from")]
    start_date: NaiveDate,

    /// Last audited date (YYYY-MM-DD).
    #[arg(long = "to")]
    end_date: NaiveDate,

    /// YAML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the PDF report here.
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Write the detail table as CSV here.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full offender ranking as CSV here.
    #[arg(long)]
    ranking_csv: Option<PathBuf>,

    /// Print the full report as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// YAML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on; overrides the configuration.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Analyze(args) => analyze(args).await,
        Command::Serve(args) => serve(args).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let loader = ConfigLoader::load_or_default(args.config.as_ref())?;
    let period = AuditPeriod::new(args.start_date, args.end_date)?;
    let workbook = Workbook::open(&args.workbook)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling audit");
            on_interrupt.cancel();
        }
    });

    let config = loader.config().clone();
    let (report, config) = tokio::task::spawn_blocking(move || {
        let report = run_audit(&workbook, &period, &config, &cancel)?;
        cancel.check()?;
        Ok::<_, AuditError>((report, config))
    })
    .await??;

    if let Some(path) = &args.csv {
        write_detail_csv(create_export(path)?, &report.violations)?;
        info!(path = %path.display(), "Wrote CSV export");
    }

    if let Some(path) = &args.ranking_csv {
        write_ranking_csv(create_export(path)?, &report.ranking)?;
        info!(path = %path.display(), "Wrote ranking CSV export");
    }

    if let Some(path) = &args.pdf {
        let bytes = render_report_pdf(&report, &config.report)?;
        fs::write(path, bytes).map_err(|e| AuditError::ReportRender {
            message: format!("{}: {}", path.display(), e),
        })?;
        info!(path = %path.display(), "Wrote PDF report");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, config.report.top_offenders);
    }

    Ok(())
}

fn create_export(path: &Path) -> Result<fs::File, AuditError> {
    fs::File::create(path).map_err(|e| AuditError::ReportRender {
        message: format!("{}: {}", path.display(), e),
    })
}

fn print_summary(report: &AuditReport, top: usize) {
    for line in summary_lines(report, top) {
        println!("{}", line);
    }
}

fn summary_lines(report: &AuditReport, top: usize) -> Vec<String> {
    let mut lines = vec![format!("Audit period: {}", report.period.label())];

    if report.is_clean() {
        lines.push("Clean: no activity outside shift hours was found.".to_string());
        return lines;
    }

    lines.push(format!(
        "Violations: {} across {} people",
        report.summary.total_violations, report.summary.distinct_persons
    ));
    if let Some(source) = report.summary.top_source {
        lines.push(format!("Most frequent source: {}", source));
    }

    lines.push(String::new());
    let [name_header, total_header] = RANKING_HEADERS;
    lines.push(format!("{:>4}  {:<40}  {:>17}", "Rank", name_header, total_header));
    for offender in report.top_offenders(top) {
        lines.push(format!(
            "{:>4}  {:<40}  {:>17}",
            offender.rank, offender.person_id, offender.total_violations
        ));
    }
    lines
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let loader = ConfigLoader::load_or_default(args.config.as_ref())?;
    let bind = args
        .bind
        .unwrap_or_else(|| loader.config().server.bind.clone());

    let app = create_router(AppState::new(loader));

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(address = %bind, "Audit API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_audit::config::AuditConfig;
    use attendance_audit::workbook::{CellValue, Sheet};

    fn audit(activity_time: &str) -> AuditReport {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let workbook = Workbook::new(vec![
            Sheet::new("DATA ABSEN", &["Nama", "Tanggal", "IN", "OUT"]).with_row(vec![
                CellValue::text("Jane Doe"),
                CellValue::text("2024-01-10"),
                CellValue::text("08:00:00"),
                CellValue::text("17:00:00"),
            ]),
            Sheet::new("Report Return", &["AuthName", "TRXDATE", "CreateTim"]).with_row(vec![
                CellValue::text("jane doe"),
                CellValue::text("2024-01-10"),
                CellValue::text(activity_time),
            ]),
        ]);
        let period = AuditPeriod::new(day, day).unwrap();
        run_audit(&workbook, &period, &AuditConfig::default(), &CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_summary_ranking_uses_report_column_names() {
        let lines = summary_lines(&audit("18:00:00"), 5);

        let header = lines.iter().find(|l| l.contains("AuthName")).unwrap();
        assert!(header.trim_end().ends_with("Total Pelanggaran"));
        assert!(lines.last().unwrap().contains("JANE DOE"));
        assert!(lines.last().unwrap().trim_end().ends_with('1'));
    }

    #[test]
    fn test_clean_summary_has_status_line() {
        let lines = summary_lines(&audit("12:00:00"), 5);

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Clean"));
    }
}
