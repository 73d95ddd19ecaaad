use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::GenerationError;
use crate::forecast::Estimate;
use crate::model::{GenerateOptions, GenerationReport, SelectionBundle};
use crate::synth::Synthesizer;

/// Decides whether generation may proceed once the forecast is known.
pub trait Approver {
    fn approve(&mut self, estimate: &Estimate) -> std::io::Result<bool>;
}

impl<F> Approver for F
where
    F: FnMut(&Estimate) -> std::io::Result<bool>,
{
    fn approve(&mut self, estimate: &Estimate) -> std::io::Result<bool> {
        self(estimate)
    }
}

/// How a gated generation ended.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    Generated {
        estimate: Estimate,
        report: GenerationReport,
    },
    /// The approver refused; nothing was written.
    Declined { estimate: Estimate },
}

/// Forecasts, asks for approval, then streams the corpus to `output`.
///
/// The forecast degrades to "cannot estimate" when selections are missing and
/// approval is still requested; generation itself then fails with
/// [`GenerationError::MissingPrerequisite`]. The output file is only created
/// after approval.
pub fn run_gated<A: Approver + ?Sized>(
    bundle: &SelectionBundle,
    output: &Path,
    approver: &mut A,
    options: &GenerateOptions,
) -> Result<GateOutcome, GenerationError> {
    let estimate = Estimate::of_bundle(bundle, options.bytes_per_record);
    match &estimate {
        Estimate::Known { forecast, approx_bytes } => info!(
            event = "forecast_computed",
            records = %forecast.records,
            saturated = forecast.saturated,
            approx_bytes = %approx_bytes
        ),
        Estimate::Unknown { reason } => warn!(event = "forecast_unavailable", reason = %reason),
    }

    if !approver.approve(&estimate)? {
        info!(event = "confirmation_declined");
        return Ok(GateOutcome::Declined { estimate });
    }

    let input = bundle.to_input()?;
    let file = File::create(output)?;
    let report = Synthesizer::new(&input).write_to(BufWriter::new(file))?;
    Ok(GateOutcome::Generated { estimate, report })
}
