//! Shared signal utilities
//!
//! Small helpers used by several stages: fractional-position reads for the
//! resampling-based effects, peak normalization for the stages whose output
//! can exceed full scale, and FFT-based linear convolution for the reverb.

use num_complex::Complex32;
use rustfft::FftPlanner;

/// Read a sample at a fractional position using linear interpolation
///
/// Positions are clamped to the valid range, so reads just past either end
/// return the edge sample. Returns 0.0 for an empty slice.
#[inline]
pub fn read_interpolated(samples: &[f32], position: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let max_index = (samples.len() - 1) as f32;
    let position = position.clamp(0.0, max_index);

    let base = position.floor() as usize;
    let frac = position - base as f32;

    if base + 1 < samples.len() {
        samples[base] * (1.0 - frac) + samples[base + 1] * frac
    } else {
        samples[base]
    }
}

/// Peak absolute value of a sample slice
#[inline]
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Scale samples so their peak equals `target_peak`
///
/// Silent input is left untouched.
pub fn normalize_to_peak(samples: &mut [f32], target_peak: f32) {
    let current = peak(samples);
    if current > 0.0 {
        let scale = target_peak / current;
        for sample in samples.iter_mut() {
            *sample *= scale;
        }
    }
}

/// Full linear convolution of a signal with a kernel
///
/// Output length is `signal.len() + kernel.len() - 1`. Computed in the
/// frequency domain, so long impulse responses stay cheap.
pub fn convolve(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let out_len = signal.len() + kernel.len() - 1;
    let fft_len = out_len.next_power_of_two();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut a: Vec<Complex32> = signal
        .iter()
        .map(|&x| Complex32::new(x, 0.0))
        .chain(std::iter::repeat(Complex32::new(0.0, 0.0)))
        .take(fft_len)
        .collect();
    let mut b: Vec<Complex32> = kernel
        .iter()
        .map(|&x| Complex32::new(x, 0.0))
        .chain(std::iter::repeat(Complex32::new(0.0, 0.0)))
        .take(fft_len)
        .collect();

    fft.process(&mut a);
    fft.process(&mut b);

    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x *= *y;
    }

    ifft.process(&mut a);

    // rustfft does not normalize the inverse transform
    let scale = 1.0 / fft_len as f32;
    a[..out_len].iter().map(|c| c.re * scale).collect()
}
