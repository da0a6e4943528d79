//! Dataset transformations carried over from routine CD workflows: blank
//! subtraction, mean residue ellipticity, Riemann integration, and
//! Beer-Lambert concentration. Datasets are immutable, so every operation
//! returns a new value.

use crate::data::model::{AbsorbanceSpectrumDataset, SpectrumDataset};
use crate::error::AnalysisError;

/// Two axis points closer than this are the same wavelength.
const AXIS_TOLERANCE: f64 = 1e-9;

fn check_axes(a: &[f64], b: &[f64]) -> Result<(), AnalysisError> {
    if a.len() != b.len() {
        return Err(AnalysisError::AxisMismatch(format!(
            "{} vs {} points",
            a.len(),
            b.len()
        )));
    }
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if (x - y).abs() > AXIS_TOLERANCE {
            return Err(AnalysisError::AxisMismatch(format!(
                "point {i}: {x} vs {y}"
            )));
        }
    }
    Ok(())
}

/// Riemann sum over the window `[lo, hi]`: step x sum of the signal at every
/// axis point inside the window. The step is the recorded data pitch, or the
/// spacing of the first two axis points when no pitch was recorded.
fn riemann(
    x: &[f64],
    y: &[f64],
    pitch: Option<f64>,
    lo: f64,
    hi: f64,
) -> Result<f64, AnalysisError> {
    let step = pitch.or_else(|| x.get(..2).map(|w| (w[1] - w[0]).abs()));
    let Some(step) = step else {
        return Err(AnalysisError::EmptyWindow(lo, hi));
    };

    let mut sum = 0.0;
    let mut hits = 0usize;
    for (&xv, &yv) in x.iter().zip(y.iter()) {
        if xv >= lo && xv <= hi {
            sum += yv;
            hits += 1;
        }
    }
    if hits == 0 {
        return Err(AnalysisError::EmptyWindow(lo, hi));
    }
    Ok(step * sum)
}

impl SpectrumDataset {
    /// Subtract a blank (buffer) spectrum. The two spectra must share the
    /// wavelength axis.
    pub fn baseline_corrected(
        &self,
        blank: &SpectrumDataset,
    ) -> Result<SpectrumDataset, AnalysisError> {
        check_axes(&self.wavelength, &blank.wavelength)?;
        let mut corrected = self.clone();
        for (value, blank_value) in corrected.signal.iter_mut().zip(blank.signal.iter()) {
            *value -= blank_value;
        }
        Ok(corrected)
    }

    /// Rescale ellipticity to mean residue ellipticity,
    /// theta / (10 c n l), with molar concentration `c`, residue count `n`,
    /// and optical pathlength `l` in cm.
    pub fn mre(&self, concentration: f64, aa_number: u32, pathlength: f64) -> SpectrumDataset {
        let scale = 10.0 * concentration * f64::from(aa_number) * pathlength;
        let mut scaled = self.clone();
        for value in scaled.signal.iter_mut() {
            *value /= scale;
        }
        scaled
    }

    /// Approximate the integral of the signal over `[lo, hi]` nm by a
    /// Riemann sum at the data pitch.
    pub fn integrate(&self, lo: f64, hi: f64) -> Result<f64, AnalysisError> {
        riemann(&self.wavelength, &self.signal, self.data_pitch, lo, hi)
    }
}

impl AbsorbanceSpectrumDataset {
    /// Subtract a blank (buffer) spectrum recorded over the same axis.
    pub fn baseline_corrected(
        &self,
        blank: &AbsorbanceSpectrumDataset,
    ) -> Result<AbsorbanceSpectrumDataset, AnalysisError> {
        check_axes(&self.wavelength, &blank.wavelength)?;
        let mut corrected = self.clone();
        for (value, blank_value) in corrected.absorbance.iter_mut().zip(blank.absorbance.iter()) {
            *value -= blank_value;
        }
        Ok(corrected)
    }

    /// Molar concentration from the absorbance at `wv` nm, Beer-Lambert:
    /// A / (epsilon l), with the molar extinction coefficient in 1/(M cm)
    /// and the pathlength in cm.
    pub fn concentration(
        &self,
        wv: f64,
        molar_extinction: f64,
        pathlength: f64,
    ) -> Result<f64, AnalysisError> {
        let idx = self
            .wavelength
            .iter()
            .position(|&w| (w - wv).abs() <= AXIS_TOLERANCE)
            .ok_or(AnalysisError::WavelengthNotFound(wv))?;
        Ok(self.absorbance[idx] / (molar_extinction * pathlength))
    }

    /// Approximate the integral of the absorbance over `[lo, hi]` nm by a
    /// Riemann sum at the data pitch.
    pub fn integrate(&self, lo: f64, hi: f64) -> Result<f64, AnalysisError> {
        riemann(&self.wavelength, &self.absorbance, self.data_pitch, lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatConfig;
    use crate::data::parser::{parse_absorbance, parse_spectrum};

    fn spectrum(rows: &str, pitch: &str) -> SpectrumDataset {
        let text = format!(
            "TITLE;t\nXYDATA\n{rows}##### Extended Information\nData pitch;{pitch} nm\n"
        );
        parse_spectrum(&text, &FormatConfig::default()).unwrap()
    }

    #[test]
    fn baseline_subtraction() {
        let sample = spectrum("260,0;-5,0\n259,0;-6,0\n", "1");
        let blank = spectrum("260,0;-1,0\n259,0;-2,0\n", "1");
        let corrected = sample.baseline_corrected(&blank).unwrap();
        assert_eq!(corrected.signal(), &[-4.0, -4.0]);
        // Input unchanged.
        assert_eq!(sample.signal(), &[-5.0, -6.0]);
    }

    #[test]
    fn baseline_requires_matching_axes() {
        let sample = spectrum("260,0;-5,0\n259,0;-6,0\n", "1");
        let blank = spectrum("260,0;-1,0\n", "1");
        let err = sample.baseline_corrected(&blank).unwrap_err();
        assert!(matches!(err, AnalysisError::AxisMismatch(_)));
    }

    #[test]
    fn mre_scaling() {
        let sample = spectrum("222,0;-10,0\n", "1");
        let scaled = sample.mre(0.001, 1, 1.0);
        assert!((scaled.signal()[0] + 1000.0).abs() < 1e-9);
        let per_residue = sample.mre(0.001, 100, 1.0);
        assert!((per_residue.signal()[0] + 10.0).abs() < 1e-9);
    }

    #[test]
    fn riemann_integral_on_flat_signal() {
        let sample = spectrum("222,0;2,0\n221,5;2,0\n221,0;2,0\n220,5;2,0\n", "0,5");
        // Three points inside [221, 222] at pitch 0.5.
        let integral = sample.integrate(221.0, 222.0).unwrap();
        assert!((integral - 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_window_is_an_error() {
        let sample = spectrum("222,0;2,0\n221,0;2,0\n", "1");
        let err = sample.integrate(100.0, 110.0).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyWindow(_, _)));
    }

    #[test]
    fn beer_lambert_concentration() {
        let text = "TITLE;a\nXYDATA\n280,0;0,58\n260,0;0,33\n";
        let ds = parse_absorbance(text, &FormatConfig::default()).unwrap();
        let c = ds.concentration(280.0, 0.29, 2.0).unwrap();
        assert!((c - 1.0).abs() < 1e-9);
        let err = ds.concentration(275.0, 0.29, 2.0).unwrap_err();
        assert!(matches!(err, AnalysisError::WavelengthNotFound(w) if w == 275.0));
    }
}
