use clap::Parser;
use phineas::cli::{
    bookings, handle_completions, handle_config_init, load_engine, recommend, scan, Cli,
    Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result: Result<String, Box<dyn std::error::Error>> = match cli.command {
        Commands::Serve(args) => phineas::cli::serve::run_serve(args)
            .await
            .map(|_| String::new()),
        Commands::Scan(args) => match load_engine(&args.config) {
            Ok(engine) => scan::handle_scan(&args, &engine).await,
            Err(e) => Err(e),
        },
        Commands::Recommend(args) => match load_engine(&args.config) {
            Ok(engine) => recommend::handle_recommend(&args, &engine).await,
            Err(e) => Err(e),
        },
        Commands::Bookings(args) => match load_engine(&args.config) {
            Ok(engine) => bookings::handle_bookings(&args, &engine),
            Err(e) => Err(e),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(String::new())
        }
    };

    match result {
        Ok(output) if !output.is_empty() => println!("{}", output),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
