#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// Emitted every `progress_interval` selections with the running library size.
    Milestone { selected: usize },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Reports a `Milestone` when `selected` is a positive multiple of `interval`.
    /// Returns whether a milestone was due.
    pub fn milestone(&self, selected: usize, interval: usize) -> bool {
        let due = interval > 0 && selected > 0 && selected % interval == 0;
        if due {
            self.report(Progress::Milestone { selected });
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Milestone { selected: 500 });
    }

    #[test]
    fn milestone_fires_only_on_positive_multiples_of_interval() {
        let reporter = ProgressReporter::new();
        assert!(!reporter.milestone(0, 500));
        assert!(!reporter.milestone(499, 500));
        assert!(reporter.milestone(500, 500));
        assert!(reporter.milestone(1000, 500));
        assert!(!reporter.milestone(3, 0));
    }

    #[test]
    fn reporter_forwards_events_to_callback() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Milestone { selected } = event {
                seen.lock().unwrap().push(selected);
            }
        }));
        for selected in 1..=1200 {
            reporter.report(Progress::TaskIncrement);
            reporter.milestone(selected, 500);
        }
        drop(reporter);
        assert_eq!(seen.into_inner().unwrap(), vec![500, 1000]);
    }
}
