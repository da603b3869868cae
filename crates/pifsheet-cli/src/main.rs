mod commands;
mod output;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pifsheet",
    version,
    about = "Assessments PDF parser and XLSX generator"
)]
struct Cli {
    /// PDF input file(s)
    #[arg(value_name = "file", required = true)]
    files: Vec<PathBuf>,

    /// XLSX output file name
    #[arg(short, long, default_value = "output.xlsx")]
    output: PathBuf,

    /// Use the layout cache (for debug only, may serve stale data)
    #[arg(short = 'c', long)]
    use_caching: bool,

    /// Cache directory used with --use-caching
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// JSON file overriding the built-in layout and workbook settings
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Also write the extracted assessments to a JSON file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Fail without writing the workbook if any document has warnings
    #[arg(long)]
    strict: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = commands::collect::run(commands::collect::Options {
        files: cli.files,
        output: cli.output,
        use_caching: cli.use_caching,
        cache_dir: cli.cache_dir,
        layout: cli.layout,
        json: cli.json,
        strict: cli.strict,
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
