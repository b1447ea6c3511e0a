use declutter_fsops::Organizer;

use crate::cli::PreviewArgs;
use crate::context::{AppContext, CliResult, organize_failure};
use crate::output::{print_progress, render_plan};

pub(crate) fn handle_preview(ctx: &AppContext, args: &PreviewArgs) -> CliResult<()> {
    let policy = ctx.policy_for(&args.dir, args.time_basis.as_deref())?;
    let format = ctx.output;
    let basis = policy.time_basis;
    let organizer =
        Organizer::new(policy).with_sink(move |line: &str| print_progress(format, line));

    let planned = organizer
        .plan()
        .map_err(|err| organize_failure(&args.dir, err))?;
    println!("{}", render_plan(&planned, basis, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::context::CliError;
    use declutter_config::AppSettings;
    use declutter_test_support::fixtures::{temp_source_dir, utc_date, write_dated_file};

    #[test]
    fn preview_leaves_files_in_place() -> Result<(), Box<dyn std::error::Error>> {
        let dir = temp_source_dir()?;
        let source = write_dated_file(dir.path(), "a.txt", b"a", utc_date(2024, 1, 15)?)?;
        let ctx = AppContext::new(AppSettings::default(), OutputFormat::Json)?;
        let args = PreviewArgs {
            dir: dir.path().to_path_buf(),
            time_basis: Some("utc".to_string()),
        };

        handle_preview(&ctx, &args)?;
        assert!(source.exists());
        assert!(!dir.path().join("2024").exists());
        Ok(())
    }

    #[test]
    fn preview_rejects_unknown_time_basis() -> Result<(), Box<dyn std::error::Error>> {
        let dir = temp_source_dir()?;
        let ctx = AppContext::new(AppSettings::default(), OutputFormat::Text)?;
        let args = PreviewArgs {
            dir: dir.path().to_path_buf(),
            time_basis: Some("lunar".to_string()),
        };

        let err = handle_preview(&ctx, &args).err();
        assert_eq!(err.as_ref().map(CliError::exit_code), Some(2));
        Ok(())
    }
}
