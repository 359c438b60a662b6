use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    dataset: PathBuf,

    #[arg(long)]
    backend_url: Option<String>,

    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    provision::run(&args.dataset, args.backend_url, args.dry_run).await
}
