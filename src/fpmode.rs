use anyhow::{Context, Result};

/// Flushes denormal results to zero and treats denormal inputs as zero on the calling thread.
/// No-op on targets other than x86_64.
#[cfg(target_arch = "x86_64")]
#[allow(deprecated)]
pub fn enable_flush_to_zero() {
    use std::arch::x86_64::{_mm_getcsr, _mm_setcsr};
    const FLUSH_ZERO_ON: u32 = 0x8000;
    const DENORMALS_ZERO_ON: u32 = 0x0040;
    // Only the calling thread's MXCSR register is modified.
    unsafe { _mm_setcsr(_mm_getcsr() | FLUSH_ZERO_ON | DENORMALS_ZERO_ON) }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn enable_flush_to_zero() {}

/// One-time process setup: sets the floating-point mode on the main thread, and builds the global
/// rayon pool so that every worker sets it when starting.
pub fn init_process_fp_mode() -> Result<()> {
    enable_flush_to_zero();
    rayon::ThreadPoolBuilder::new()
        .start_handler(|_| enable_flush_to_zero())
        .build_global()
        .context("cannot build the worker thread pool")?;
    log::debug!(
        "Flush-to-zero enabled on the main thread and {} workers",
        rayon::current_num_threads()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn denormals_flush_to_zero() {
        // Runs on a thread of its own: the mode would otherwise leak into other tests.
        std::thread::spawn(|| {
            let tiny = std::hint::black_box(f32::MIN_POSITIVE);
            assert!((tiny * 0.5) > 0.0);
            enable_flush_to_zero();
            let tiny = std::hint::black_box(f32::MIN_POSITIVE);
            assert_eq!(tiny * 0.5, 0.0);
        })
        .join()
        .unwrap();
    }
}
