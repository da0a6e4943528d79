//! Writes deterministic synthetic JASCO exports for the four acquisition
//! modes and re-parses each one as a self-check.

use std::fmt::Write as _;

use anyhow::{Context, Result};

use jasco_csv::{parse, AcquisitionMode, Dataset, FormatConfig};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Instrument number formatting: four decimals, decimal comma.
fn num(v: f64) -> String {
    format!("{v:.4}").replace('.', ",")
}

/// Alpha-helical CD signal: negative bands at 208 and 222 nm.
fn helix_cd(wv: f64, fraction_folded: f64, rng: &mut SimpleRng) -> f64 {
    let signal = gaussian(wv, 208.0, 7.0, -9.0) + gaussian(wv, 222.0, 9.0, -8.0);
    fraction_folded * signal + rng.gauss(0.0, 0.05)
}

/// Photomultiplier voltage: rises toward the far UV, past 600 V at the
/// low-wavelength end.
fn ht_voltage(wv: f64, rng: &mut SimpleRng) -> f64 {
    250.0 + 5.5 * (260.0 - wv) + rng.gauss(0.0, 1.0)
}

fn preamble(title: &str, x_units: &str, y_units: &str) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "TITLE;{title}");
    let _ = writeln!(text, "DATA TYPE;");
    let _ = writeln!(text, "ORIGIN;JASCO");
    let _ = writeln!(text, "OWNER;");
    let _ = writeln!(text, "DATE;24/03/15");
    let _ = writeln!(text, "TIME;14:05:22");
    let _ = writeln!(text, "SPECTROMETER/DATA SYSTEM;J-810");
    let _ = writeln!(text, "XUNITS;{x_units}");
    let _ = writeln!(text, "YUNITS;{y_units}");
    text
}

fn spectrum_file(rng: &mut SimpleRng) -> String {
    let mut text = preamble("Synthetic helix far-UV", "NANOMETERS", "CD [mdeg]");
    let _ = writeln!(text, "Y2UNITS;HT [V]");
    let _ = writeln!(text, "FIRSTX;260,0000");
    let _ = writeln!(text, "LASTX;190,0000");
    let _ = writeln!(text, "NPOINTS;141");
    let _ = writeln!(text, "XYDATA");
    for i in 0..141 {
        let wv = 260.0 - 0.5 * i as f64;
        let cd = helix_cd(wv, 1.0, rng);
        let ht = ht_voltage(wv, rng);
        let _ = writeln!(text, "{};{};{}", num(wv), num(cd), num(ht));
    }
    let _ = writeln!(text, "##### Extended Information");
    let _ = writeln!(text, "[Detailed Information]");
    let _ = writeln!(text, "Data pitch;0,5 nm");
    let _ = writeln!(text, "Scanning speed;100 nm/min");
    let _ = writeln!(text, "Band width;1 nm");
    text
}

fn melting_file(rng: &mut SimpleRng) -> String {
    let mut text = preamble("Synthetic unfolding at 222 nm", "Temperature [C]", "CD [mdeg]");
    let _ = writeln!(text, "Y2UNITS;HT [V]");
    let _ = writeln!(text, "XYDATA");
    for i in 0..=70 {
        let temp = 20.0 + i as f64;
        // Two-state sigmoid around a 65 C midpoint.
        let folded = 1.0 / (1.0 + ((temp - 65.0) / 4.0).exp());
        let cd = -8.0 * folded + rng.gauss(0.0, 0.05);
        let ht = 300.0 + 0.2 * temp + rng.gauss(0.0, 0.5);
        let _ = writeln!(text, "{};{};{}", num(temp), num(cd), num(ht));
    }
    let _ = writeln!(text, "##### Extended Information");
    let _ = writeln!(text, "Monitor wavelength;222 nm");
    let _ = writeln!(text, "Temperature gradient;1 C/min");
    text
}

fn ramp_file(rng: &mut SimpleRng) -> String {
    let temps: Vec<f64> = (0..7).map(|i| 20.0 + 10.0 * i as f64).collect();
    let wavelengths: Vec<f64> = (0..=50).map(|i| 250.0 - i as f64).collect();

    let mut text = preamble("Synthetic thermal interval scan", "NANOMETERS", "CD [mdeg]");
    let _ = writeln!(text, "DELTAX;-1,0");

    for (marker, is_ht) in [("Channel 1", false), ("Channel 2", true)] {
        let _ = writeln!(text, "{marker}");
        let header: Vec<String> = temps.iter().map(|&t| num(t)).collect();
        let _ = writeln!(text, ";{}", header.join(";"));
        for &wv in &wavelengths {
            let mut cells = vec![num(wv)];
            for &temp in &temps {
                let folded = 1.0 / (1.0 + ((temp - 65.0) / 4.0).exp());
                let value = if is_ht {
                    ht_voltage(wv, rng)
                } else {
                    helix_cd(wv, folded, rng)
                };
                cells.push(num(value));
            }
            let _ = writeln!(text, "{}", cells.join(";"));
        }
    }
    text
}

fn absorbance_file(rng: &mut SimpleRng) -> String {
    let mut text = preamble("Synthetic protein scan", "NANOMETERS", "ABSORBANCE");
    let _ = writeln!(text, "XYDATA");
    for i in 0..=100 {
        let wv = 340.0 - i as f64;
        let abs = 0.02 + gaussian(wv, 280.0, 15.0, 0.6) + rng.gauss(0.0, 0.002);
        let _ = writeln!(text, "{};{}", num(wv), num(abs));
    }
    let _ = writeln!(text, "##### Extended Information");
    let _ = writeln!(text, "Data pitch;1 nm");
    text
}

fn describe(dataset: &Dataset) -> String {
    match dataset {
        Dataset::SingleSpectrum(ds) => format!("{} points", ds.len()),
        Dataset::TemperatureRamp(ds) => {
            format!("{} temperatures x {} wavelengths", ds.len(), ds.wavelength().len())
        }
        Dataset::MeltingCurve(ds) => format!("{} points", ds.len()),
        Dataset::Absorbance(ds) => format!("{} points", ds.len()),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let config = FormatConfig::default();

    let files: Vec<(&str, AcquisitionMode, String)> = vec![
        (
            "sample_spectrum.csv",
            AcquisitionMode::SingleSpectrum,
            spectrum_file(&mut rng),
        ),
        (
            "sample_melting_curve.csv",
            AcquisitionMode::MeltingCurve,
            melting_file(&mut rng),
        ),
        (
            "sample_temperature_ramp.csv",
            AcquisitionMode::TemperatureRamp,
            ramp_file(&mut rng),
        ),
        (
            "sample_absorbance.csv",
            AcquisitionMode::Absorbance,
            absorbance_file(&mut rng),
        ),
    ];

    for (path, mode, text) in files {
        let dataset = parse(&text, mode, &config)
            .with_context(|| format!("generated {path} does not parse as {mode}"))?;
        std::fs::write(path, &text).with_context(|| format!("writing {path}"))?;
        println!("Wrote {path} ({mode}): {}", describe(&dataset));
    }
    Ok(())
}
