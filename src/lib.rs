//! Typed parser for JASCO CD and absorbance spectrophotometer CSV exports.
//!
//! A J-series instrument exports one `key;value` header block, one data
//! section, and one trailing metadata block per file; temperature-interval
//! runs export two channel matrices instead. [`parse`] turns that text into
//! an immutable, typed [`Dataset`] under a declared [`AcquisitionMode`];
//! [`to_vendor_csv`] and [`to_json`] go the other way.
//!
//! ```no_run
//! use jasco_csv::{parse_named, FormatConfig};
//!
//! # fn main() -> Result<(), jasco_csv::ParseError> {
//! let text = std::fs::read_to_string("spectrum.csv").unwrap();
//! let dataset = parse_named(&text, "single_spectrum", &FormatConfig::default())?;
//! println!("{} from {:?}", dataset.mode(), dataset.info().title());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;

pub use config::FormatConfig;
pub use data::export::{to_json, to_vendor_csv};
pub use data::filter::{ht_cutoff_index, DEFAULT_HT_MAX};
pub use data::model::{
    AbsorbanceSpectrumDataset, AcquisitionMode, Dataset, HeaderBlock, HeaderValue, InstrumentInfo,
    MeltingCurveDataset, SpectrumDataset, TemperatureSeriesDataset,
};
pub use data::parser::{
    parse, parse_absorbance, parse_melting_curve, parse_named, parse_spectrum,
    parse_temperature_ramp,
};
pub use error::{AnalysisError, ParseError};
