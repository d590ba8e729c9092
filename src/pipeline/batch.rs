//! Batch execution over many files.

use crate::detect::SpeechDetector;
use crate::error::Result;
use crate::export::SegmentExporter;
use crate::pipeline::coordinator::InputFile;
use crate::pipeline::outcome::FileOutcome;
use crate::pipeline::processor::process_file;
use crate::segment::SegmentBuilder;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info};

/// Shared, read-only state for a batch run.
#[derive(Clone, Copy)]
pub struct BatchContext<'a> {
    /// Source of activity timelines.
    pub detector: &'a dyn SpeechDetector,
    /// Segmentation settings.
    pub builder: &'a SegmentBuilder,
    /// Per-segment audio export, when enabled.
    pub exporter: Option<&'a dyn SegmentExporter>,
    /// Worker thread count (1 = run on the calling thread).
    pub jobs: usize,
    /// Set from outside to stop taking new files.
    pub cancel: &'a AtomicBool,
}

/// How far a batch got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRun {
    /// Outcomes delivered to the callback.
    pub completed: usize,
    /// Files in the batch.
    pub total: usize,
    /// Whether the run stopped early because of cancellation.
    pub cancelled: bool,
}

/// Process `files` and hand each outcome to `on_outcome` on the calling
/// thread.
///
/// Outcomes arrive one at a time, so the callback can fold and write
/// without locking. With `jobs > 1` workers pull file indices from a shared
/// counter and arrival order follows completion order. Once the cancel flag
/// is set no new file is started; files already in flight still complete.
///
/// # Errors
///
/// Returns the first error raised by `on_outcome`; remaining workers stop
/// after their current file.
pub fn run_batch<F>(files: &[InputFile], ctx: BatchContext<'_>, mut on_outcome: F) -> Result<BatchRun>
where
    F: FnMut(FileOutcome) -> Result<()>,
{
    let workers = ctx.jobs.clamp(1, files.len().max(1));
    info!("Processing {} file(s) with {} worker(s)", files.len(), workers);

    let completed = if workers == 1 {
        run_sequential(files, ctx, &mut on_outcome)?
    } else {
        run_parallel(files, ctx, workers, &mut on_outcome)?
    };

    let cancelled = completed < files.len() && ctx.cancel.load(Ordering::SeqCst);
    Ok(BatchRun {
        completed,
        total: files.len(),
        cancelled,
    })
}

fn run_sequential<F>(files: &[InputFile], ctx: BatchContext<'_>, on_outcome: &mut F) -> Result<usize>
where
    F: FnMut(FileOutcome) -> Result<()>,
{
    let mut completed = 0;
    for input in files {
        if ctx.cancel.load(Ordering::SeqCst) {
            debug!("Cancellation requested, not starting {}", input.name);
            break;
        }
        on_outcome(process_file(input, ctx.detector, ctx.builder, ctx.exporter))?;
        completed += 1;
    }
    Ok(completed)
}

fn run_parallel<F>(
    files: &[InputFile],
    ctx: BatchContext<'_>,
    workers: usize,
    on_outcome: &mut F,
) -> Result<usize>
where
    F: FnMut(FileOutcome) -> Result<()>,
{
    let next = AtomicUsize::new(0);
    let abort = AtomicBool::new(false);

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<FileOutcome>();

        for worker in 0..workers {
            let tx = tx.clone();
            let next = &next;
            let abort = &abort;
            scope.spawn(move || {
                loop {
                    if ctx.cancel.load(Ordering::SeqCst) || abort.load(Ordering::SeqCst) {
                        break;
                    }
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    let Some(input) = files.get(index) else {
                        break;
                    };
                    let outcome = process_file(input, ctx.detector, ctx.builder, ctx.exporter);
                    if tx.send(outcome).is_err() {
                        break;
                    }
                }
                debug!("Worker {worker} finished");
            });
        }
        drop(tx);

        let mut completed = 0;
        for outcome in rx {
            if let Err(e) = on_outcome(outcome) {
                abort.store(true, Ordering::SeqCst);
                return Err(e);
            }
            completed += 1;
        }
        Ok(completed)
    })
}
