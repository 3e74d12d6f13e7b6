use clap::{Args, Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a predicate into a search filter
    Compile {
        #[command(flatten)]
        predicate: PredicateArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Build the full search request body for a predicate
    Request {
        #[command(flatten)]
        predicate: PredicateArgs,

        #[arg(long, help = "Free-text query to combine with the filter")]
        query: Option<String>,

        #[arg(long, help = "Number of hits to skip")]
        skip: Option<usize>,

        #[arg(long, help = "Maximum number of hits to return")]
        take: Option<usize>,
    },
}

#[derive(Args)]
pub struct PredicateArgs {
    #[arg(long, help = "Schema file path (JSON)")]
    pub schema: String,

    #[arg(long = "type", help = "Entity type the predicate ranges over")]
    pub type_name: String,

    #[arg(long, help = "KEY=VALUE file with the predicate's captured variables")]
    pub vars: Option<String>,

    /// Predicate text, e.g. `x => x.Id == 42`
    pub predicate: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Tree,
}
