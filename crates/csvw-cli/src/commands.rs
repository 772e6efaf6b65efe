use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{info, info_span};

use csvw_cli::check::{ValidationOptions, ValidationReport, validate_file};
use csvw_cli::schema::load_schema;
use csvw_model::Datatype;
use csvw_validate::TableValidator;

use crate::cli::CheckArgs;
use crate::summary::apply_table_style;

pub fn run_datatypes() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Datatype", "URI"]);
    apply_table_style(&mut table);
    for datatype in Datatype::ALL {
        table.add_row(vec![datatype.name(), datatype.uri()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<ValidationReport> {
    let span = info_span!("schema", path = %args.schema.display());
    let table = {
        let _guard = span.enter();
        let columns = load_schema(&args.schema)?;
        let table = TableValidator::new(columns).context("compile schema")?;
        info!(columns = table.len(), "schema compiled");
        table
    };

    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got {:?}", args.delimiter);
    }
    let options = ValidationOptions {
        header: !args.no_header,
        delimiter: args.delimiter as u8,
        max_rows: args.max_rows,
    };
    validate_file(&args.csv, &table, &options)
}
