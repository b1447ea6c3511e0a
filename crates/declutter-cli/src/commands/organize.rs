use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::anyhow;
use declutter_fsops::{FileDescriptor, OrganizationOutcome, OrganizeEvent, Organizer};
use tokio::sync::mpsc;
use tokio::task;
use tracing::info;

use crate::cli::{OrganizeArgs, OutputFormat};
use crate::context::{AppContext, CliError, CliResult, organize_failure};
use crate::output::{print_progress, render_outcome};

pub(crate) async fn handle_organize(ctx: &AppContext, args: &OrganizeArgs) -> CliResult<()> {
    let policy = ctx.policy_for(&args.dir, args.time_basis.as_deref())?;
    let format = ctx.output;
    let mut organizer = Organizer::new(policy)
        .with_sink(move |line: &str| print_progress(format, line))
        .with_metrics(ctx.metrics.clone());

    let files = organizer
        .scan()
        .map_err(|err| organize_failure(&args.dir, err))?;
    print_progress(
        format,
        &OrganizeEvent::ScanSummary { files: files.len() }.to_string(),
    );

    let outcome = if files.is_empty() {
        print_progress(format, "No files found to organize");
        OrganizationOutcome::default()
    } else if args.yes || confirm_interactive(&args.dir, files.len())? {
        run_on_worker(organizer, files, format).await?
    } else {
        print_progress(format, "Cancelled");
        return Ok(());
    };

    info!(
        source = %args.dir.display(),
        moved = outcome.moved,
        skipped = outcome.skipped,
        "organize command finished"
    );
    let metrics = args.metrics.then_some(&ctx.metrics);
    println!("{}", render_outcome(&args.dir, outcome, metrics, format)?);
    Ok(())
}

/// Run the organizer on a blocking worker while this task prints its messages
/// in the order they were produced.
async fn run_on_worker(
    organizer: Organizer,
    files: Vec<FileDescriptor>,
    format: OutputFormat,
) -> CliResult<OrganizationOutcome> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut organizer = organizer.with_sink(move |line: &str| {
        let _ = tx.send(line.to_string());
    });

    let worker = task::spawn_blocking(move || organizer.organize(files));
    while let Some(line) = rx.recv().await {
        print_progress(format, &line);
    }

    worker
        .await
        .map_err(|err| CliError::failure(anyhow!("organizer worker failed: {err}")))
}

fn confirm_interactive(dir: &Path, files: usize) -> CliResult<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(CliError::validation(
            "confirmation requires a terminal; pass --yes to organize without prompting",
        ));
    }
    confirm(&mut stdin.lock(), &mut io::stderr(), dir, files)
        .map_err(|err| CliError::failure(anyhow!("failed to read confirmation: {err}")))
}

fn confirm(
    input: &mut impl BufRead,
    prompt: &mut impl Write,
    dir: &Path,
    files: usize,
) -> io::Result<bool> {
    write!(
        prompt,
        "Move {files} files in {} into year/month folders? [y/N] ",
        dir.display()
    )?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
