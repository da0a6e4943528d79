use log::warn;

use super::model::{SpectrumDataset, TemperatureSeriesDataset};

// ---------------------------------------------------------------------------
// HT reliability filtering
// ---------------------------------------------------------------------------

/// Default photomultiplier voltage threshold. Points recorded with HT above
/// this are considered unreliable.
pub const DEFAULT_HT_MAX: f64 = 600.0;

/// Number of leading points recorded before the first HT excursion above
/// `ht_max`. Exports run from high to low wavelength, so everything from the
/// excursion onward is discarded.
pub fn ht_cutoff_index(ht: &[f64], ht_max: f64) -> usize {
    ht.iter().position(|&v| v > ht_max).unwrap_or(ht.len())
}

impl SpectrumDataset {
    /// Copy of this spectrum truncated at the first HT excursion above
    /// `ht_max`. Exports without an HT channel are returned unchanged.
    pub fn ht_filtered(&self, ht_max: f64) -> SpectrumDataset {
        let Some(ht) = self.ht.as_deref() else {
            warn!(
                "spectrum {:?} has no HT channel; HT filter is a no-op",
                self.info.title()
            );
            return self.clone();
        };
        let cutoff = ht_cutoff_index(ht, ht_max);

        let mut filtered = self.clone();
        filtered.wavelength.truncate(cutoff);
        filtered.signal.truncate(cutoff);
        if let Some(ht) = filtered.ht.as_mut() {
            ht.truncate(cutoff);
        }
        if let Some(abs) = filtered.absorbance.as_mut() {
            abs.truncate(cutoff);
        }
        filtered
    }

    /// Last reliable wavelength under `ht_max`, i.e. where the HT voltage
    /// first becomes too high. `None` when there is no HT channel or no
    /// point is reliable.
    pub fn wv_cutoff(&self, ht_max: f64) -> Option<f64> {
        let ht = self.ht.as_deref()?;
        let cutoff = ht_cutoff_index(ht, ht_max);
        if cutoff == 0 {
            return None;
        }
        self.wavelength.get(cutoff - 1).copied()
    }
}

impl TemperatureSeriesDataset {
    /// Copy with unreliable points replaced by NaN: wherever the HT voltage
    /// exceeds `ht_max`, the corresponding signal value is masked. The axes
    /// keep their full length so entries stay comparable across
    /// temperatures.
    pub fn ht_masked(&self, ht_max: f64) -> TemperatureSeriesDataset {
        let mut masked = self.clone();
        for (signal_row, ht_row) in masked.signal.iter_mut().zip(self.ht.iter()) {
            for (value, &ht) in signal_row.iter_mut().zip(ht_row.iter()) {
                if ht > ht_max {
                    *value = f64::NAN;
                }
            }
        }
        masked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatConfig;
    use crate::data::parser::{parse_spectrum, parse_temperature_ramp};

    const SPECTRUM_WITH_EXCURSION: &str = "\
TITLE;noisy low end
XUNITS;NANOMETERS
XYDATA
260,0;-1,0;400,0
250,0;-2,0;500,0
240,0;-3,0;650,0
230,0;-4,0;700,0
";

    #[test]
    fn cutoff_index_is_first_excursion() {
        assert_eq!(ht_cutoff_index(&[400.0, 500.0, 650.0, 700.0], 600.0), 2);
        assert_eq!(ht_cutoff_index(&[400.0, 500.0], 600.0), 2);
        assert_eq!(ht_cutoff_index(&[650.0], 600.0), 0);
        assert_eq!(ht_cutoff_index(&[], 600.0), 0);
    }

    #[test]
    fn spectrum_truncated_at_excursion() {
        let ds = parse_spectrum(SPECTRUM_WITH_EXCURSION, &FormatConfig::default()).unwrap();
        let filtered = ds.ht_filtered(DEFAULT_HT_MAX);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.wavelength(), &[260.0, 250.0]);
        assert_eq!(filtered.signal(), &[-1.0, -2.0]);
        assert_eq!(ds.wv_cutoff(DEFAULT_HT_MAX), Some(250.0));
        // Original is untouched.
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn filter_without_ht_channel_is_noop() {
        let text = "TITLE;bare\nXYDATA\n260,0;-1,0\n250,0;-2,0\n";
        let ds = parse_spectrum(text, &FormatConfig::default()).unwrap();
        assert_eq!(ds.ht_filtered(DEFAULT_HT_MAX), ds);
        assert_eq!(ds.wv_cutoff(DEFAULT_HT_MAX), None);
    }

    #[test]
    fn ramp_masking_replaces_unreliable_points() {
        let text = "\
TITLE;ramp
DELTAX;-1,0
Channel 1
;25,0;45,0
222,0;-10,0;-7,5
221,0;-10,2;-7,6
Channel 2
;25,0;45,0
222,0;300,0;650,0
221,0;301,0;311,0
";
        let ds = parse_temperature_ramp(text, &FormatConfig::default()).unwrap();
        let masked = ds.ht_masked(DEFAULT_HT_MAX);
        assert_eq!(masked.signal()[0], vec![-10.0, -10.2]);
        assert!(masked.signal()[1][0].is_nan());
        assert_eq!(masked.signal()[1][1], -7.6);
        assert_eq!(masked.len(), ds.len());
    }
}
