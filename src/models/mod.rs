pub mod options;
pub mod pallet;
pub mod point;
pub mod scan;
pub mod well;

pub use options::DecodeOptions;
pub use pallet::{BarcodePosition, Orientation, PalletSize, WellProfile};
pub use point::Point;
pub use scan::{PixelFormat, ScanImage};
pub use well::{PixelRect, WellRectangle};
