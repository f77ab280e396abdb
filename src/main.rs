//! swiftviz - Swift type inheritance graph visualizer

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use syntax::{SourceScanner, SwiftParser};
use tracing_subscriber::EnvFilter;
use typegraph::{Dispatch, Graph, HtmlGenerator, MergeCoordinator, Normalizer, Strategy};

#[derive(Parser)]
#[command(name = "swiftviz")]
#[command(about = "Render the class inheritance graph of a Swift project as HTML", version)]
struct Cli {
    /// Path of the directory to recursively scan
    path: PathBuf,
    /// Output format to use
    #[arg(long, value_enum, default_value_t = Format::D3)]
    format: Format,
    /// Use multithread
    #[arg(short, long)]
    threaded: bool,
    /// Worker count for --threaded (default: available cores)
    #[arg(long)]
    workers: Option<usize>,
    /// How inheritance entries become graph edges
    #[arg(long, value_enum, default_value_t = StrategyArg::Decompose)]
    strategy: StrategyArg,
    /// Abort the whole run on a malformed inheritance entry
    #[arg(long)]
    strict: bool,
    /// Also scan build and dependency directories (.build, Build, DerivedData, Pods),
    /// which are skipped by default
    #[arg(long)]
    no_skip: bool,
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// D3 data literal
    D3,
    /// Standalone vis-network page
    Vizjs,
    /// Graph as JSON
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Split generic specializations into base and argument edges
    Decompose,
    /// Use the inherited type text as written
    Verbatim,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Decompose => Strategy::Decompose,
            StrategyArg::Verbatim => Strategy::Verbatim,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout 只输出文档, 日志走 stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut scanner = SourceScanner::new(&cli.path);
    if cli.no_skip {
        scanner = scanner.with_skip_dirs(&[]);
    }

    tracing::info!("Scanning: {}", scanner.root().display());
    let files = scanner.scan()?;
    tracing::info!("Found {} Swift files", files.len());

    let dispatch = match (cli.threaded, cli.workers) {
        (false, _) => Dispatch::Sequential,
        (true, Some(workers)) => Dispatch::Concurrent { workers },
        (true, None) => Dispatch::concurrent(),
    };

    let coordinator = MergeCoordinator::new(SwiftParser::new())
        .with_dispatch(dispatch)
        .with_normalizer(Normalizer::new(cli.strategy.into()))
        .with_strict(cli.strict);

    let format = cli.format;
    let document = coordinator
        .run(files, |graph| render(format, &graph))
        .await??;

    match cli.output {
        Some(file) => {
            std::fs::write(&file, &document)?;
            tracing::info!("Saved to: {}", file.display());
        }
        None => {
            println!("{}", document);
        }
    }

    Ok(())
}

fn render(format: Format, graph: &Graph) -> anyhow::Result<String> {
    let generator = HtmlGenerator::new();
    Ok(match format {
        Format::D3 => generator.generate_d3(graph),
        Format::Vizjs => generator.generate_vizjs(graph),
        Format::Json => generator.generate_json(graph)?,
    })
}
