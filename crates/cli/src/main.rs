use crate::{env::EnvManager, error::CliError};
use clap::Parser;
use commands::{Commands, PredicateArgs};
use expression_engine::Captures;
use model::{core::type_handle::TypeHandle, schema::SchemaRegistry};
use search::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "seek",
    version = "0.1.0",
    about = "Compile predicates into search filters"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_env("SEEK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = Client::default();

    match cli.command {
        Commands::Compile { predicate, format } => {
            let input = load_input(&predicate).await?;
            info!(type_name = %input.handle, "Compiling predicate");

            let expr = predicate_syntax::parse(
                &predicate.predicate,
                &input.registry,
                input.handle.full_name(),
            )?;
            let filter = client.where_filter(&expr, &input.captures)?;
            output::print_filter(filter.as_ref(), format)?;
        }
        Commands::Request {
            predicate,
            query,
            skip,
            take,
        } => {
            let input = load_input(&predicate).await?;
            info!(type_name = %input.handle, "Building search request");

            let mut search = client.search(input.handle.clone()).filter_text(
                &predicate.predicate,
                &input.registry,
                &input.captures,
            )?;
            if let Some(query) = query {
                search = search.query(query);
            }
            if let Some(skip) = skip {
                search = search.skip(skip);
            }
            if let Some(take) = take {
                search = search.take(take);
            }
            output::print_request(search.request())?;
        }
    }

    Ok(())
}

struct Input {
    registry: SchemaRegistry,
    handle: TypeHandle,
    captures: Captures,
}

async fn load_input(args: &PredicateArgs) -> Result<Input, CliError> {
    let source = tokio::fs::read_to_string(&args.schema).await?;
    let registry = SchemaRegistry::from_json(&source)?;

    let handle = registry
        .entity(&args.type_name)
        .map(|schema| schema.handle())
        .ok_or_else(|| CliError::UnknownType(args.type_name.clone()))?;

    let mut env = EnvManager::new();
    if let Some(path) = &args.vars {
        env.load_from_file(path)?;
    }

    Ok(Input {
        registry,
        handle,
        captures: env.into_captures(),
    })
}
