use image::{GrayImage, imageops};
use tracing::{debug, trace};

use super::registry::{BarcodeRegistry, Registration};
use super::symbol::{DecodedSymbol, ScanParams, SymbolDecoder};
use crate::models::{DecodeOptions, PixelRect, Point, WellRectangle};

/// Shortest scaled crop side worth another attempt
pub const MIN_SCALED_EDGE: u32 = 8;

/// State of a single well decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Not yet executed
    Pending,
    /// A symbol was decoded
    Decoded,
    /// Every attempt failed or the decoder faulted
    Failed,
}

/// Everything a worker needs that is shared across wells
pub struct DecodeContext<'a, D: SymbolDecoder + ?Sized> {
    /// Grayscale working image for the whole scan
    pub gray: &'a GrayImage,
    /// Options shared by every attempt
    pub options: &'a DecodeOptions,
    /// Decoding backend
    pub symbols: &'a D,
    /// Run-scoped registry
    pub registry: &'a BarcodeRegistry,
    /// Maximum attempts per well
    pub scale_attempts: usize,
    /// Trace every attempt
    pub log_attempts: bool,
}

/// Decode task for one well
///
/// Borrows its rectangle for the duration of the run and is mutated only by
/// the worker that executes it.
#[derive(Debug)]
pub struct WellDecoder<'a> {
    index: usize,
    well: &'a WellRectangle,
    outcome: DecodeOutcome,
    symbol: Option<DecodedSymbol>,
    attempts: u32,
    registration: Option<Registration>,
    fault: Option<String>,
}

impl<'a> WellDecoder<'a> {
    /// Pending task for the well at `index`
    pub fn new(index: usize, well: &'a WellRectangle) -> Self {
        Self {
            index,
            well,
            outcome: DecodeOutcome::Pending,
            symbol: None,
            attempts: 0,
            registration: None,
            fault: None,
        }
    }

    /// Position of this well in the run
    pub fn index(&self) -> usize {
        self.index
    }

    /// Well being decoded
    pub fn well(&self) -> &'a WellRectangle {
        self.well
    }

    /// Current outcome
    pub fn outcome(&self) -> DecodeOutcome {
        self.outcome
    }

    /// Decoded symbol in full-image coordinates
    pub fn symbol(&self) -> Option<&DecodedSymbol> {
        self.symbol.as_ref()
    }

    /// Decode calls made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Registry verdict for the decoded message
    pub fn registration(&self) -> Option<Registration> {
        self.registration
    }

    /// Crop the well and try to decode it at increasing scale divisors.
    ///
    /// Stops at the first success, after `scale_attempts` tries, or once the
    /// scaled crop would be shorter than [`MIN_SCALED_EDGE`] on a side.
    pub fn execute<D: SymbolDecoder + ?Sized>(&mut self, ctx: &DecodeContext<'_, D>) {
        let rect = self.well.rect();
        let region =
            imageops::crop_imm(ctx.gray, rect.x, rect.y, rect.width, rect.height).to_image();
        let short_side = region.width().min(region.height());

        // the initial scale is always tried
        for attempt in 0..ctx.scale_attempts.max(1) {
            let scale = ctx.options.shrink.saturating_add(attempt as u32);
            if attempt > 0 && short_side / scale < MIN_SCALED_EDGE {
                break;
            }

            let params = ScanParams::from_options(ctx.options, region.width(), region.height(), scale);
            self.attempts += 1;
            let found = ctx.symbols.decode(&region, &params);
            if ctx.log_attempts {
                trace!(
                    label = self.well.label(),
                    scale,
                    decoded = found.is_some(),
                    "decode attempt"
                );
            }

            if let Some(symbol) = found {
                self.accept(symbol.translated(rect.x as f32, rect.y as f32), ctx.registry);
                return;
            }
        }

        self.outcome = DecodeOutcome::Failed;
    }

    fn accept(&mut self, symbol: DecodedSymbol, registry: &BarcodeRegistry) {
        let registration = registry.register(&symbol.message, self.well.label(), self.index);
        if let Registration::Duplicate { owner } = registration {
            debug!(
                label = self.well.label(),
                message = %symbol.message,
                owner,
                "message already decoded by another well"
            );
        }
        self.registration = Some(registration);
        self.symbol = Some(symbol);
        self.outcome = DecodeOutcome::Decoded;
    }

    /// Record a decoder fault; the well counts as failed
    pub fn mark_failed(&mut self, fault: impl Into<String>) {
        self.outcome = DecodeOutcome::Failed;
        self.fault = Some(fault.into());
    }

    /// Freeze the task into its read-only result
    pub fn into_result(self) -> WellResult {
        let (message, corners) = match self.symbol {
            Some(symbol) => (Some(symbol.message), Some(symbol.corners)),
            None => (None, None),
        };
        WellResult {
            index: self.index,
            label: self.well.label().to_string(),
            rect: self.well.rect(),
            outcome: self.outcome,
            message,
            corners,
            attempts: self.attempts,
            registration: self.registration,
            fault: self.fault,
        }
    }
}

/// Final state of one well after a run
#[derive(Debug, Clone, PartialEq)]
pub struct WellResult {
    /// Position of the well in the run
    pub index: usize,
    /// Well label
    pub label: String,
    /// Region that was decoded
    pub rect: PixelRect,
    /// Final outcome
    pub outcome: DecodeOutcome,
    /// Decoded message
    pub message: Option<String>,
    /// Symbol corners in full-image coordinates
    pub corners: Option<[Point; 4]>,
    /// Decode calls made
    pub attempts: u32,
    /// Registry verdict for the message
    pub registration: Option<Registration>,
    /// Panic text if the decoder faulted
    pub fault: Option<String>,
}

impl WellResult {
    /// True when a symbol was decoded
    pub fn is_decoded(&self) -> bool {
        self.outcome == DecodeOutcome::Decoded
    }
}
