/// Progress events emitted by workflows and engine tasks.
///
/// A workflow is a sequence of phases; a phase may run one task, which reports one
/// increment per processed record.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
///
/// Reporting is a no-op without a callback, so engine code reports unconditionally.
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

    /// Runs `f` as a named phase, bracketing it with start and finish events.
    ///
    /// The finish event is only sent when `f` succeeds, so a failed phase stays visible
    /// as the last one started.
    pub fn phase<T, E>(
        &self,
        name: &'static str,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        let result = f()?;
        self.report(Progress::PhaseFinish);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
        let value: Result<u8, ()> = reporter.phase("noop", || Ok(3));
        assert_eq!(value, Ok(3));
    }

    #[test]
    fn phase_brackets_successful_work() {
        let events: Mutex<Vec<Progress>> = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e: Progress| {
            events.lock().unwrap().push(e);
        }));

        let _: Result<(), ()> = reporter.phase("Loading", || {
            reporter.report(Progress::Message("inside".to_string()));
            Ok(())
        });
        let _: Result<(), &str> = reporter.phase("Failing", || Err("boom"));
        drop(reporter);

        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart { name: "Loading" },
                Progress::Message("inside".to_string()),
                Progress::PhaseFinish,
                Progress::PhaseStart { name: "Failing" },
            ]
        );
    }
}
