//! Signal source capability consumed by the frequency analyzer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Result;

/// A provider of magnitude spectra (one byte per frequency bin)
///
/// Sources are owned by the host and shared with the analyzer. Reads are
/// snapshots: a source fed from another thread may hand out a spectrum that
/// is one update old.
pub trait SignalSource: Send + Sync {
    /// Start delivering spectra
    fn attach(&self) -> Result<()>;

    /// Stop delivering spectra; subsequent reads return `false`
    fn detach(&self);

    fn is_attached(&self) -> bool;

    /// Copy the latest spectrum into `out`. Returns `false` when no spectrum
    /// is available (detached, or nothing analysed yet).
    fn read_spectrum(&self, out: &mut Vec<u8>) -> bool;
}

/// Shared spectrum buffer written by an analysis thread and read per frame
#[derive(Clone, Default)]
pub struct SpectrumTap {
    bins: Arc<Mutex<Vec<u8>>>,
    attached: Arc<AtomicBool>,
}

impl SpectrumTap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published spectrum
    pub fn publish(&self, spectrum: &[u8]) {
        if let Ok(mut bins) = self.bins.lock() {
            bins.clear();
            bins.extend_from_slice(spectrum);
        }
    }
}

impl SignalSource for SpectrumTap {
    fn attach(&self) -> Result<()> {
        self.attached.store(true, Ordering::Release);
        Ok(())
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::Release);
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    fn read_spectrum(&self, out: &mut Vec<u8>) -> bool {
        if !self.is_attached() {
            return false;
        }
        // A poisoned lock means the writer thread died; report no signal
        let Ok(bins) = self.bins.lock() else {
            return false;
        };
        if bins.is_empty() {
            return false;
        }
        out.clear();
        out.extend_from_slice(&bins);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_requires_attach() {
        let tap = SpectrumTap::new();
        tap.publish(&[1, 2, 3]);

        let mut out = Vec::new();
        assert!(!tap.read_spectrum(&mut out));

        tap.attach().unwrap();
        assert!(tap.read_spectrum(&mut out));
        assert_eq!(out, vec![1, 2, 3]);

        tap.detach();
        assert!(!tap.read_spectrum(&mut out));
    }

    #[test]
    fn test_tap_clones_share_buffer() {
        let tap = SpectrumTap::new();
        let writer = tap.clone();
        tap.attach().unwrap();

        let mut out = Vec::new();
        assert!(!tap.read_spectrum(&mut out), "nothing published yet");

        writer.publish(&[255; 8]);
        assert!(tap.read_spectrum(&mut out));
        assert_eq!(out.len(), 8);
    }
}
