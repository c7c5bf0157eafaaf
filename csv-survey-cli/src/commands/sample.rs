use anyhow::Context;

use crate::cli::SampleArgs;

/// Handle `csv-survey sample`.
pub fn handle(args: &SampleArgs) -> anyhow::Result<()> {
    csv_survey::write_sample(&args.path)
        .with_context(|| format!("failed to write sample survey '{}'", args.path.display()))?;

    println!("Sample survey created: {}", args.path.display());
    println!("Take it with: csv-survey run {}", args.path.display());
    Ok(())
}
