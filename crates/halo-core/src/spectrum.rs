//! Analyser-equivalent magnitude spectrum for raw PCM capture.
//!
//! Produces the same normalized bins the browser `AnalyserNode` hands to
//! `getByteFrequencyData` (divided by 255): Blackman window, `|X| / N`,
//! temporal smoothing, then [min_db, max_db] mapped linearly onto [0, 1].

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::constants::{ANALYSER_MAX_DB, ANALYSER_MIN_DB, ANALYSER_SMOOTHING};

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    unit: Vec<f32>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl SpectrumAnalyzer {
    /// `fft_size` is rounded up to a power of two (at least 32).
    pub fn new(fft_size: usize) -> Self {
        let size = fft_size.max(32).next_power_of_two();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let bins = size / 2;
        Self {
            fft,
            window: (0..size).map(|i| blackman_window(i, size)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; bins],
            unit: vec![0.0; bins],
            smoothing: ANALYSER_SMOOTHING,
            min_db: ANALYSER_MIN_DB,
            max_db: ANALYSER_MAX_DB,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn bin_count(&self) -> usize {
        self.unit.len()
    }

    /// Analyse the most recent `fft_size` samples (zero-padded at the front
    /// when fewer are available) and return the normalized bins.
    pub fn process(&mut self, samples: &[f32]) -> &[f32] {
        let n = self.buffer.len();
        let recent = &samples[samples.len().saturating_sub(n)..];
        let pad = n - recent.len();
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let scale = 1.0 / n as f32;
        let range = (self.max_db - self.min_db).max(1e-3);
        for k in 0..self.unit.len() {
            let mag = self.buffer[k].norm() * scale;
            self.smoothed[k] = self.smoothing * self.smoothed[k] + (1.0 - self.smoothing) * mag;
            let db = 20.0 * self.smoothed[k].max(1e-12).log10();
            self.unit[k] = ((db - self.min_db) / range).clamp(0.0, 1.0);
        }
        &self.unit
    }

    pub fn bins(&self) -> &[f32] {
        &self.unit
    }
}

/// Blackman window as used by the Web Audio analyser (alpha = 0.16).
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f32 / size as f32;
    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_maps_to_zero() {
        let mut a = SpectrumAnalyzer::new(1024);
        let bins = a.process(&[0.0; 1024]);
        assert_eq!(bins.len(), 512);
        assert!(bins.iter().all(|b| *b == 0.0));
    }

    #[test]
    fn pure_tone_peaks_at_its_bin() {
        let mut a = SpectrumAnalyzer::new(1024);
        let tone: Vec<f32> = (0..1024)
            .map(|i| (2.0 * PI * 20.0 * i as f32 / 1024.0).sin())
            .collect();
        for _ in 0..8 {
            a.process(&tone);
        }
        let bins = a.bins();
        let peak = bins
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, v)| if *v > best.1 { (i, *v) } else { best });
        assert!((18..=22).contains(&peak.0), "peak at {}", peak.0);
        assert!(bins[200] < 0.3);
    }

    #[test]
    fn size_rounds_to_power_of_two() {
        let a = SpectrumAnalyzer::new(1000);
        assert_eq!(a.fft_size(), 1024);
        assert_eq!(a.bin_count(), 512);
    }

    #[test]
    fn window_is_zero_at_edge_and_one_at_center() {
        assert!(blackman_window(0, 1024).abs() < 1e-6);
        assert!((blackman_window(512, 1024) - 1.0).abs() < 1e-4);
    }
}
