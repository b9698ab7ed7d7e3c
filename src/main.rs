use clap::Parser;
use surebet::cli::{self, output, Cli, Commands};
use surebet::config::Config;
use surebet::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    if let Commands::CheckConfig = cli.command {
        return cli::check::execute(&cli.config);
    }

    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_logging(&mut config);
    config.init_logging();

    match &cli.command {
        Commands::Scan(args) => cli::scan::execute(&config, args).await,
        Commands::Watch(args) => cli::scan::execute_watch(&config, args).await,
        Commands::Serve(args) => cli::serve::execute(&config, args).await,
        Commands::Detect(args) => cli::detect::execute(&config, args),
        Commands::CheckConfig => Ok(()),
    }
}
