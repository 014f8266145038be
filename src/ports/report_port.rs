//! Report output port trait.

use crate::domain::benchmark::BenchmarkPoint;
use crate::domain::error::BasketrackError;
use crate::domain::rollover::ValuePoint;
use std::path::Path;

/// Port for exporting computed series.
pub trait ReportPort {
    fn write(
        &self,
        portfolio: &[ValuePoint],
        benchmark: &[BenchmarkPoint],
        output_path: &Path,
    ) -> Result<(), BasketrackError>;
}
