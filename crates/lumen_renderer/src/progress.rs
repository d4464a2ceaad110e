//! Render progress shared between the render loop and an observer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Completed-pixel counter plus the instant the render started.
///
/// The renderer records every finished pixel; callers holding an `Arc` can
/// poll it from another thread to compute their own progress display.
#[derive(Debug)]
pub struct RenderProgress {
    width: u32,
    height: u32,
    start: Mutex<Instant>,
    completed: AtomicUsize,
}

impl RenderProgress {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            start: Mutex::new(Instant::now()),
            completed: AtomicUsize::new(0),
        }
    }

    /// Reset the counter and the start time for a new render.
    pub fn restart(&self) {
        *self.start.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
        self.completed.store(0, Ordering::Relaxed);
    }

    /// Count one finished pixel and return the new total.
    pub fn record_pixel(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn pixels_completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Number of full rows' worth of pixels finished.
    pub fn rows_completed(&self) -> u32 {
        if self.width == 0 {
            return 0;
        }
        (self.pixels_completed() / self.width as usize) as u32
    }

    pub fn rows_remaining(&self) -> u32 {
        self.height.saturating_sub(self.rows_completed())
    }

    pub fn is_done(&self) -> bool {
        self.pixels_completed() >= self.total_pixels()
    }

    pub fn start_time(&self) -> Instant {
        *self.start.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time().elapsed()
    }

    /// Projected wall time for the whole render, if any pixel has finished.
    pub fn estimated_total(&self) -> Option<Duration> {
        let completed = self.pixels_completed();
        if completed == 0 {
            return None;
        }
        let per_pixel = self.elapsed().as_secs_f64() / completed as f64;
        Some(Duration::from_secs_f64(per_pixel * self.total_pixels() as f64))
    }

    /// Projected time until the render finishes.
    pub fn estimated_remaining(&self) -> Option<Duration> {
        self.estimated_total()
            .map(|total| total.saturating_sub(self.elapsed()))
    }

    /// Log a scanline progress line with elapsed, remaining and total time.
    pub fn log_scanline(&self) {
        let rows_completed = self.rows_completed();
        match self.estimated_total() {
            Some(total) if rows_completed > 0 => {
                let elapsed = self.elapsed();
                log::info!(
                    "Scanlines remaining: {}, {} < {} < {}, {:.2}s/line",
                    self.rows_remaining(),
                    format_mm_ss(elapsed),
                    format_mm_ss(total.saturating_sub(elapsed)),
                    format_mm_ss(total),
                    elapsed.as_secs_f64() / rows_completed as f64,
                );
            }
            _ => log::info!("Scanlines remaining: {}", self.rows_remaining()),
        }
    }

    /// Log the total render time.
    pub fn log_done(&self) {
        log::info!("Done. {}", format_mm_ss(self.elapsed()));
    }
}

/// Format a duration as `mm:ss`.
pub fn format_mm_ss(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
