use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use molpick::engine::progress::{Progress, ProgressCallback};

const BAR_TEMPLATE: &str = "{prefix:>14.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg} ({eta})";

/// Draws fingerprinting and selection progress as one stderr bar.
///
/// The phase name becomes the bar prefix and each task restarts the bar. Selection milestones
/// show up as the bar message. `ProgressBar` is shared state already, so clones of the handler
/// and its callbacks all drive the same bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(bar_style());
        // Nothing is drawn until the first task announces its length.
        bar.finish_and_clear();
        Self { bar }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { name } => {
                bar.set_prefix(name);
                bar.set_message("");
            }
            Progress::TaskStart { total_steps } => {
                bar.reset();
                bar.set_length(total_steps);
            }
            Progress::TaskIncrement => bar.inc(1),
            Progress::Milestone { selected } => {
                bar.set_message(format!("{} added", selected));
            }
            Progress::TaskFinish | Progress::PhaseFinish => bar.finish(),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
