use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar for `len` items, drawn to stderr and hidden when stderr is not
/// a terminal.
pub fn get_progressbar(job_name: &str, len: u64) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
    bar.set_message(job_name.to_string());
    if let Ok(style) =
        ProgressStyle::with_template(" {msg} {wide_bar} {pos}/{len} estimated remaining: {eta_precise}")
    {
        bar.set_style(style);
    }
    bar
}
