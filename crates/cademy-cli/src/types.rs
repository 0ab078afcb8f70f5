use std::path::PathBuf;

use cademy_model::CleanseReport;

use crate::pipeline::OutputPaths;

#[derive(Debug)]
pub struct CleanseRun {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub outputs: OutputPaths,
    pub report: CleanseReport,
    pub dry_run: bool,
}
