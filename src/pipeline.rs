use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use image::GrayImage;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::decoder::{
    BarcodeRegistry, DecodeContext, DecodeOutcome, DecoderConfig, Registration, RegistryEntries,
    SymbolDecoder, WellDecoder, WellResult, WorkerPool,
};
use crate::detector::{BlobSegmenter, SegmentationReducer, Segmenter};
use crate::error::{ConfigError, PositionError};
use crate::grid::{CellGaps, DecodedRegion, GridCell, GridPartitioner, PalletAssignment, PositionMapper};
use crate::models::{
    BarcodePosition, DecodeOptions, Orientation, PalletSize, PixelRect, ScanImage, WellProfile,
    WellRectangle,
};

/// Smallest barcode side accepted in full-pallet mode, in inches
pub const MIN_BARCODE_INCHES: f64 = 0.13;

/// Overall result of a decode run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStatus {
    /// At least one well decoded
    Success,
    /// No valid wells to decode
    NothingToDecode,
    /// Wells were attempted but none decoded
    NothingDecoded,
    /// A decoded symbol could not be attributed to a grid cell
    PositionError,
    /// The image could not be loaded or interpreted
    InvalidImage,
}

impl DecodeStatus {
    /// True for [`DecodeStatus::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, DecodeStatus::Success)
    }
}

impl fmt::Display for DecodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecodeStatus::Success => "success",
            DecodeStatus::NothingToDecode => "nothing to decode",
            DecodeStatus::NothingDecoded => "nothing decoded",
            DecodeStatus::PositionError => "position error",
            DecodeStatus::InvalidImage => "invalid image",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Initialized,
    Partitioning,
    Decoding,
    Reconciling,
}

/// Rack geometry for full-pallet decoding
#[derive(Debug, Clone)]
pub struct PalletLayout {
    /// Region holding the rack; `None` uses the whole image
    pub bounding_box: Option<PixelRect>,
    /// Rack rows
    pub rows: u32,
    /// Rack columns
    pub cols: u32,
    /// Scan orientation
    pub orientation: Orientation,
    /// Which tube end carries the barcode
    pub barcode_position: BarcodePosition,
    /// Spacing trimmed from each cell
    pub gaps: CellGaps,
    /// Positions to decode; `None` decodes every position
    pub profile: Option<WellProfile>,
}

impl PalletLayout {
    /// Layout for a standard rack filling the whole image
    pub fn new(size: PalletSize, orientation: Orientation, barcode_position: BarcodePosition) -> Self {
        Self {
            bounding_box: None,
            rows: size.rows(),
            cols: size.cols(),
            orientation,
            barcode_position,
            gaps: CellGaps::default(),
            profile: None,
        }
    }

    /// Restrict the rack to a region of the image
    pub fn with_bounding_box(mut self, bounding_box: PixelRect) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Trim every cell by the given gaps
    pub fn with_gaps(mut self, gaps: CellGaps) -> Self {
        self.gaps = gaps;
        self
    }

    /// Decode only the positions enabled in `profile`
    pub fn with_profile(mut self, profile: WellProfile) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// Everything a decode run produced
#[derive(Debug, Clone)]
pub struct DecodeReport {
    status: DecodeStatus,
    wells: Vec<WellResult>,
    registry: RegistryEntries,
    pallet: Vec<PalletAssignment>,
    position_error: Option<PositionError>,
}

impl DecodeReport {
    fn empty(status: DecodeStatus) -> Self {
        Self {
            status,
            wells: Vec::new(),
            registry: RegistryEntries::default(),
            pallet: Vec::new(),
            position_error: None,
        }
    }

    fn decoded_status(wells: Vec<WellResult>, registry: RegistryEntries) -> Self {
        let status = if wells.iter().any(WellResult::is_decoded) {
            DecodeStatus::Success
        } else {
            DecodeStatus::NothingDecoded
        };
        Self {
            status,
            wells,
            registry,
            pallet: Vec::new(),
            position_error: None,
        }
    }

    /// Overall status
    pub fn status(&self) -> DecodeStatus {
        self.status
    }

    /// Number of wells dispatched for decoding
    pub fn attempted(&self) -> usize {
        self.wells.len()
    }

    /// Number of wells that decoded a symbol, duplicates included
    pub fn decoded(&self) -> usize {
        self.wells.iter().filter(|w| w.is_decoded()).count()
    }

    /// Message and label registrations
    pub fn registry(&self) -> &RegistryEntries {
        &self.registry
    }

    /// Decoded message of every decoded well, keyed by label
    pub fn decoded_labels(&self) -> BTreeMap<String, String> {
        self.wells
            .iter()
            .filter_map(|w| Some((w.label.clone(), w.message.clone()?)))
            .collect()
    }

    /// Per-well results in dispatch order
    pub fn wells(&self) -> &[WellResult] {
        &self.wells
    }

    /// Rack positions of the unique decoded messages (full-pallet mode)
    pub fn pallet(&self) -> &[PalletAssignment] {
        &self.pallet
    }

    /// Attribution failure behind a [`DecodeStatus::PositionError`]
    pub fn position_error(&self) -> Option<&PositionError> {
        self.position_error.as_ref()
    }

    /// One-line summary for logs
    pub fn summary_line(&self) -> String {
        let faults = self.wells.iter().filter(|w| w.fault.is_some()).count();
        format!(
            "{}: {} attempted, {} decoded, {} unique, {} faulted",
            self.status,
            self.attempted(),
            self.decoded(),
            self.registry.len(),
            faults
        )
    }
}

/// Decodes tube barcodes from rack scans
///
/// Holds the decoding backend, the segmentation primitives used by
/// full-pallet mode, and a dedicated worker pool. One decoder can serve any
/// number of runs; each run gets its own registry.
pub struct Decoder<D: SymbolDecoder, S: Segmenter = BlobSegmenter> {
    symbols: D,
    segmenter: S,
    options: DecodeOptions,
    config: DecoderConfig,
    pool: WorkerPool,
}

impl<D: SymbolDecoder> Decoder<D> {
    /// Decoder with the default blob segmenter
    pub fn new(symbols: D, options: DecodeOptions, config: DecoderConfig) -> Result<Self, ConfigError> {
        options.validate()?;
        let pool = WorkerPool::new(config.resolved_threads())?;
        Ok(Self {
            symbols,
            segmenter: BlobSegmenter,
            options,
            config: config.with_scale_attempts(config.scale_attempts),
            pool,
        })
    }
}

impl<D: SymbolDecoder, S: Segmenter> Decoder<D, S> {
    /// Replace the segmentation primitives used by full-pallet mode
    pub fn with_segmenter<T: Segmenter>(self, segmenter: T) -> Decoder<D, T> {
        Decoder {
            symbols: self.symbols,
            segmenter,
            options: self.options,
            config: self.config,
            pool: self.pool,
        }
    }

    /// Options applied to every well
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Runtime settings
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Load `path` and decode the given wells
    pub fn decode_file<P: AsRef<Path>>(&self, path: P, wells: &[WellRectangle]) -> DecodeReport {
        match ScanImage::open(path.as_ref()) {
            Ok(image) => self.decode_wells(&image, wells),
            Err(err) => {
                warn!(path = %path.as_ref().display(), error = %err, "could not load scan");
                DecodeReport::empty(DecodeStatus::InvalidImage)
            }
        }
    }

    /// Decode each declared well of `image`
    ///
    /// Every well must lie inside the image; otherwise nothing is decoded.
    pub fn decode_wells(&self, image: &ScanImage, wells: &[WellRectangle]) -> DecodeReport {
        log_stage(Stage::Initialized, wells.len());
        if wells.is_empty() {
            return self.finish(DecodeReport::empty(DecodeStatus::NothingToDecode));
        }
        if let Some(well) = wells
            .iter()
            .find(|w| !w.rect().fits_within(image.width(), image.height()))
        {
            warn!(
                %well,
                width = image.width(),
                height = image.height(),
                "well rectangle outside image"
            );
            return self.finish(DecodeReport::empty(DecodeStatus::NothingToDecode));
        }
        // caller-supplied wells stand in for the partition
        log_stage(Stage::Partitioning, wells.len());

        let gray = match self.working_image(image) {
            Some(gray) => gray,
            None => return self.finish(DecodeReport::empty(DecodeStatus::InvalidImage)),
        };

        log_stage(Stage::Decoding, wells.len());
        let (results, registry) = self.run_tasks(&gray, wells);
        self.finish(DecodeReport::decoded_status(results, registry))
    }

    /// Decode a whole rack: partition it, locate each tube, decode, then
    /// attribute every unique message to its rack position.
    pub fn decode_pallet(&self, image: &ScanImage, layout: &PalletLayout) -> DecodeReport {
        log_stage(Stage::Initialized, 0);
        let (width, height) = (image.width(), image.height());
        let bounding_box = layout
            .bounding_box
            .unwrap_or(PixelRect::new(0, 0, width, height));
        if !bounding_box.fits_within(width, height) {
            warn!(%bounding_box, width, height, "pallet bounding box outside image");
            return self.finish(DecodeReport::empty(DecodeStatus::NothingToDecode));
        }
        if let Some(profile) = &layout.profile {
            if (profile.rows(), profile.cols()) != (layout.rows, layout.cols) {
                warn!(
                    profile_rows = profile.rows(),
                    profile_cols = profile.cols(),
                    rows = layout.rows,
                    cols = layout.cols,
                    "well profile does not match pallet size"
                );
                return self.finish(DecodeReport::empty(DecodeStatus::NothingToDecode));
            }
        }

        let gray = match self.working_image(image) {
            Some(gray) => gray,
            None => return self.finish(DecodeReport::empty(DecodeStatus::InvalidImage)),
        };

        log_stage(Stage::Partitioning, layout.rows as usize * layout.cols as usize);
        let cells: Vec<GridCell> = GridPartitioner::new(
            bounding_box,
            layout.rows,
            layout.cols,
            layout.orientation,
            layout.barcode_position,
        )
        .with_gaps(layout.gaps)
        .cells()
        .into_iter()
        .filter(|c| {
            layout
                .profile
                .as_ref()
                .is_none_or(|p| p.is_enabled(c.row, c.logical_col))
        })
        .collect();

        let (candidates, wells) = self.reduce_cells(&gray, cells, image.dpi());
        if wells.is_empty() {
            debug!("no tubes found in pallet");
            return self.finish(DecodeReport::empty(DecodeStatus::NothingToDecode));
        }

        log_stage(Stage::Decoding, wells.len());
        let (results, registry) = self.run_tasks(&gray, &wells);
        let mut report = DecodeReport::decoded_status(results, registry);

        log_stage(Stage::Reconciling, report.registry.len());
        let winners = report
            .wells
            .iter()
            .filter(|w| w.registration == Some(Registration::Winner))
            .filter_map(|w| {
                Some(DecodedRegion {
                    message: w.message.as_deref()?,
                    corners: w.corners.as_ref()?,
                })
            });
        match PositionMapper::new(&candidates).map_decoded_regions(winners) {
            Ok(assignments) => report.pallet = assignments,
            Err(err) => {
                warn!(error = %err, "decoded symbol outside every well");
                report.status = DecodeStatus::PositionError;
                report.position_error = Some(err);
            }
        }
        self.finish(report)
    }

    fn working_image(&self, image: &ScanImage) -> Option<GrayImage> {
        match image.grayscale() {
            Ok(gray) => Some(gray),
            Err(err) => {
                warn!(error = %err, "could not convert scan to grayscale");
                None
            }
        }
    }

    /// Tighten every cell to its tube, dropping cells without one.
    fn reduce_cells(
        &self,
        gray: &GrayImage,
        cells: Vec<GridCell>,
        dpi: Option<u32>,
    ) -> (Vec<GridCell>, Vec<WellRectangle>) {
        let reducer = SegmentationReducer::new(&self.segmenter, dpi);
        let min_side = min_barcode_side(dpi);
        self.pool.install(|| {
            cells
                .into_par_iter()
                .filter_map(|mut cell| {
                    let reduced = reducer.reduce(gray, cell.rect);
                    if reduced.is_empty() || reduced.width < min_side || reduced.height < min_side {
                        return None;
                    }
                    cell.rect = reduced;
                    let well = cell.to_well().ok()?;
                    Some((cell, well))
                })
                .unzip()
        })
    }

    fn run_tasks(&self, gray: &GrayImage, wells: &[WellRectangle]) -> (Vec<WellResult>, RegistryEntries) {
        let registry = BarcodeRegistry::new();
        let mut tasks: Vec<WellDecoder> = wells
            .iter()
            .enumerate()
            .map(|(index, well)| WellDecoder::new(index, well))
            .collect();

        let ctx = DecodeContext {
            gray,
            options: &self.options,
            symbols: &self.symbols,
            registry: &registry,
            scale_attempts: self.config.scale_attempts,
            log_attempts: self.config.log_attempts,
        };
        self.pool.decode_all(&mut tasks, &ctx);

        let results = tasks.into_iter().map(WellDecoder::into_result).collect();
        (results, registry.into_entries())
    }

    fn finish(&self, report: DecodeReport) -> DecodeReport {
        debug_assert!(report.wells.iter().all(|w| w.outcome != DecodeOutcome::Pending));
        debug!(status = ?report.status, "pipeline finished");
        info!(summary = %report.summary_line(), "decode finished");
        report
    }
}

fn log_stage(stage: Stage, items: usize) {
    debug!(?stage, items, "pipeline stage");
}

/// Shortest accepted barcode side in pixels at `dpi`
pub fn min_barcode_side(dpi: Option<u32>) -> u32 {
    dpi.map_or(0, |d| (MIN_BARCODE_INCHES * d as f64) as u32)
}
