use model::schema::SchemaError;
use predicate_syntax::BuildError;
use search::SearchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to load the schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to parse the predicate: {0}")]
    Syntax(#[from] BuildError),

    #[error("{0}")]
    Search(#[from] SearchError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Unknown entity type '{0}'")]
    UnknownType(String),

    #[error("Invalid variables file: {0}")]
    Config(String),
}
