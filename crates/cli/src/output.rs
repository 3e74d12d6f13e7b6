use crate::{commands::OutputFormat, error::CliError};
use model::filter::Filter;
use search::{SearchRequest, render_filter, render_request};

pub fn print_filter(filter: Option<&Filter>, format: OutputFormat) -> Result<(), CliError> {
    let text = match (format, filter) {
        (OutputFormat::Json, Some(filter)) => serde_json::to_string_pretty(&render_filter(filter))?,
        (OutputFormat::Json, None) => "null".to_string(),
        (OutputFormat::Tree, Some(filter)) => filter_tree(filter),
        (OutputFormat::Tree, None) => "(no filter)".to_string(),
    };
    println!("{text}");
    Ok(())
}

pub fn print_request(request: &SearchRequest) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&render_request(request))?;
    println!("{json}");
    Ok(())
}

/// One node per line, children indented under their parent.
fn filter_tree(filter: &Filter) -> String {
    let mut out = String::new();
    write_node(filter, 0, &mut out);
    out
}

fn write_node(filter: &Filter, depth: usize, out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&"  ".repeat(depth));
    match filter {
        leaf if leaf.is_leaf() => out.push_str(&leaf.to_string()),
        Filter::Not(_) => out.push_str("not"),
        Filter::And(_) => out.push_str("and"),
        _ => out.push_str("or"),
    }
    for child in filter.children() {
        write_node(child, depth + 1, out);
    }
}
