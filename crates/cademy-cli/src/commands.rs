use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::Table;
use tracing::info_span;

use cademy_model::schema::{
    ADDRESS_COMPONENTS, AGE, AGE_GROUP, CONTACT_INFO, ERROR_MESSAGE, ERROR_STAGE,
    FILLED_COLUMNS, MAILING_ADDRESS, NUMERIC_COLUMNS, REQUIRED_INPUT_COLUMNS,
};
use cademy_model::{AddressPolicy, CleanseOptions, ErrorPolicy, Stage};

use crate::cli::CleanseArgs;
use crate::pipeline::{OutputConfig, cleanse, ingest, output};
use crate::summary::apply_table_style;
use crate::types::CleanseRun;

/// Builds run options from the `cleanse` flags.
pub fn cleanse_options(args: &CleanseArgs) -> CleanseOptions {
    let mut options = CleanseOptions::new()
        .with_error_policy(if args.fail_fast {
            ErrorPolicy::FailFast
        } else {
            ErrorPolicy::Quarantine
        })
        .with_address_policy(if args.strict_address {
            AddressPolicy::Strict
        } else {
            AddressPolicy::Lenient
        });
    if let Some(date) = args.reference_date {
        options = options.with_reference_date(date);
    }
    options
}

pub fn run_cleanse(args: &CleanseArgs) -> Result<CleanseRun> {
    let input = &args.input;
    let run_span = info_span!("cleanse", input = %input.display());
    let _run_guard = run_span.enter();
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(input));
    let options = cleanse_options(args);

    let raw = ingest(input)?;
    let mut result = cleanse(raw, &options)?;
    let outputs = output(
        &mut result,
        &OutputConfig {
            output_dir: &output_dir,
            report_path: args.report.as_deref(),
            dry_run: args.dry_run,
        },
    )?;

    Ok(CleanseRun {
        input: input.clone(),
        output_dir,
        outputs,
        report: result.report,
        dry_run: args.dry_run,
    })
}

/// `<input dir>/output`, or `./output` for a bare file name.
pub fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("output")
}

/// Rows of the `schema` listing: column, where it comes from, type.
pub fn schema_rows() -> Vec<[String; 3]> {
    let mut rows = Vec::new();
    for column in REQUIRED_INPUT_COLUMNS {
        let kind = if NUMERIC_COLUMNS.contains(&column) {
            "number"
        } else {
            "text"
        };
        rows.push([column.to_string(), "input (required)".to_string(), kind.to_string()]);
    }
    rows.push([
        MAILING_ADDRESS.to_string(),
        format!("input or {CONTACT_INFO} key"),
        "text".to_string(),
    ]);
    for column in [AGE, AGE_GROUP] {
        rows.push([column.to_string(), Stage::AgeDeriver.label().to_string(), "integer".to_string()]);
    }
    rows.push([
        "<contact key>".to_string(),
        Stage::ContactFlattener.label().to_string(),
        "text, float or boolean".to_string(),
    ]);
    for column in ADDRESS_COMPONENTS {
        rows.push([column.to_string(), Stage::AddressSplitter.label().to_string(), "text".to_string()]);
    }
    for column in NUMERIC_COLUMNS {
        let producer = if FILLED_COLUMNS.contains(&column) {
            format!("{} (null -> 0.0)", Stage::TypeNormalizer.label())
        } else {
            Stage::TypeNormalizer.label().to_string()
        };
        rows.push([column.to_string(), producer, "float".to_string()]);
    }
    for column in [ERROR_STAGE, ERROR_MESSAGE] {
        rows.push([column.to_string(), "errors table".to_string(), "text".to_string()]);
    }
    rows
}

pub fn run_schema() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Column", "Source", "Type"]);
    apply_table_style(&mut table);
    for row in schema_rows() {
        table.add_row(row.to_vec());
    }
    println!("{table}");
    Ok(())
}
