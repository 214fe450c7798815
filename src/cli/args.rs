use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "staffdir",
    version,
    about = "searchable, filterable employee directory renderer",
    long_about = "staffdir renders an employee directory page from a JSON dataset, probing for each employee's documents.\n\nThe filter state comes from a page URL or query string (role, q, view, cust, contrib).\n\nExamples:\n  staffdir -d Data.json -D ./ -o directory.html\n  staffdir -d Data.json -u 'role=OFFICER&cust=Acme' --expanded\n  staffdir -d https://intranet/Data.json -D https://intranet/ -f json\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help_heading = "Output",
        help = "Only log warnings and errors; hide the progress bar."
    )]
    pub quiet: bool,

    #[arg(
        short = 'n',
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'd',
        long = "data",
        value_name = "PATH|URL",
        help_heading = "Input",
        help = "Employee data JSON (file path or http(s) URL)."
    )]
    pub data: Option<String>,

    #[arg(
        short = 'D',
        long = "docs",
        value_name = "DIR|URL",
        help_heading = "Input",
        help = "Document location: a directory or an http(s) base URL."
    )]
    pub docs: Option<String>,

    #[arg(
        long = "docs-href",
        value_name = "PREFIX",
        help_heading = "Input",
        help = "Prefix for document links when probing a directory."
    )]
    pub docs_href: Option<String>,

    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL|QUERY",
        help_heading = "Filters",
        help = "Page URL or query string holding the filter state."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'e',
        long = "expanded",
        help_heading = "Filters",
        help = "Render the expanded view (authorities and responsibilities)."
    )]
    pub expanded: bool,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.staffdir/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the result to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (html, json, text)."
    )]
    pub format: Option<String>,

    #[arg(
        long = "title",
        value_name = "TEXT",
        help_heading = "Output",
        help = "Page title."
    )]
    pub title: Option<String>,

    #[arg(
        short = 't',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance",
        help = "Max employees probed at once."
    )]
    pub concurrency: Option<u32>,

    #[arg(
        short = 'r',
        long = "rate",
        value_name = "RPS",
        help_heading = "Performance",
        help = "Limit probing to N employees per second."
    )]
    pub rate: Option<u32>,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'w',
        long = "workers",
        value_name = "N",
        help_heading = "Performance",
        help = "Number of runtime worker threads."
    )]
    pub workers: Option<usize>,
}
