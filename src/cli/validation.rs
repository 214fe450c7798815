use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.concurrency == Some(0) {
        return Err("invalid concurrency, expected positive integer".to_string());
    }
    if args.timeout == Some(0) {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    if args.workers == Some(0) {
        return Err("invalid workers, expected positive integer".to_string());
    }
    if let Some(raw) = args.format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --format '{raw}', expected html, json or text"));
        }
    }
    if let Some(raw) = args.url.as_deref() {
        crate::filter::url::parse_location(raw)?;
    }
    if args.quiet && args.verbose > 0 {
        return Err("use either --quiet or --verbose, not both".to_string());
    }
    Ok(())
}
