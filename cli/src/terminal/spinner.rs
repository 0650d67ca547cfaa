use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Spinner shown on stderr while a long call is awaited. Cleared on drop.
pub struct SpinnerHandle {
    spinner: Option<ProgressBar>,
}

pub fn start(message: String, enabled: bool) -> SpinnerHandle {
    if !enabled {
        return SpinnerHandle { spinner: None };
    }

    let style = ProgressStyle::with_template("{spinner:.blue} {msg} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    if let Ok(mut active) = ACTIVE.lock() {
        *active = Some(pb.clone());
    }
    SpinnerHandle { spinner: Some(pb) }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        if let Some(pb) = self.spinner.take() {
            if let Ok(mut active) = ACTIVE.lock() {
                *active = None;
            }
            pb.finish_and_clear();
        }
    }
}

/// Runs `f` with the active spinner (if any) hidden.
pub fn suspend<R>(f: impl FnOnce() -> R) -> R {
    let active = ACTIVE.lock().ok().and_then(|guard| guard.clone());
    match active {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}
