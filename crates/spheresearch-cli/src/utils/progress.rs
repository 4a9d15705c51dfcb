use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use spheresearch::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// Best measurement seen so far, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BestSoFar {
    evaluation: u64,
    score: f64,
}

struct SearchDisplay {
    bar: ProgressBar,
    best: Option<BestSoFar>,
}

impl SearchDisplay {
    fn refresh_message(&self) {
        self.bar.set_message(best_message(self.best.as_ref()));
    }
}

/// Renders engine progress on stderr and improvement lines on stdout.
///
/// The bar message always carries the best score found so far, so a long
/// enumeration shows where it stands without scrolling back through output.
#[derive(Clone)]
pub struct CliProgressHandler {
    display: Arc<Mutex<SearchDisplay>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target).with_style(spinner_style());
        Self {
            display: Arc::new(Mutex::new(SearchDisplay { bar, best: None })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let display = self.display.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut display) = display.lock() else {
                warn!("Progress display mutex was poisoned; dropping update.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    display.bar.set_style(spinner_style());
                    display.bar.set_message(name);
                    display
                        .bar
                        .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::PhaseFinish => {
                    display.bar.disable_steady_tick();
                }
                Progress::TaskStart { total_steps } => {
                    display.bar.disable_steady_tick();
                    display.bar.set_style(search_style());
                    display.bar.set_length(total_steps);
                    display.bar.set_position(0);
                    display.refresh_message();
                }
                Progress::TaskIncrement { amount } => {
                    display.bar.inc(amount);
                }
                Progress::TaskFinish => {
                    let evaluated = display.bar.position();
                    display.bar.set_length(evaluated);
                    display.refresh_message();
                    display.bar.finish();
                }
                Progress::Improvement { evaluation, score } => {
                    display.best = Some(BestSoFar { evaluation, score });
                    display.refresh_message();
                    let line = improvement_line(score);
                    display.bar.suspend(|| println!("{}", line));
                }
                Progress::Message(msg) => {
                    display.bar.println(msg);
                }
            }
        })
    }

    #[cfg(test)]
    fn best(&self) -> Option<BestSoFar> {
        self.display.lock().unwrap().best
    }

    #[cfg(test)]
    fn bar(&self) -> ProgressBar {
        self.display.lock().unwrap().bar.clone()
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn improvement_line(score: f64) -> String {
    format!("Current optimal measurement: {}", score)
}

fn best_message(best: Option<&BestSoFar>) -> String {
    match best {
        Some(best) => format!("best {} (#{})", best.score, best.evaluation),
        None => "no finite score yet".to_string(),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn search_style() -> ProgressStyle {
    ProgressStyle::with_template("{elapsed_precise} [{wide_bar}] {pos}/{len} placements, {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn improvement_line_matches_search_output() {
        assert_eq!(improvement_line(2.0), "Current optimal measurement: 2");
        assert_eq!(
            improvement_line(1.4142135623730951),
            "Current optimal measurement: 1.4142135623730951"
        );
    }

    #[test]
    fn improvements_update_the_best_score_in_the_bar_message() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 15 });
        assert_eq!(handler.bar().message(), "no finite score yet");

        callback(Progress::TaskIncrement { amount: 1 });
        callback(Progress::Improvement {
            evaluation: 1,
            score: 1.4142135623730951,
        });
        callback(Progress::TaskIncrement { amount: 4 });
        callback(Progress::Improvement {
            evaluation: 5,
            score: 2.0,
        });

        assert_eq!(
            handler.best(),
            Some(BestSoFar {
                evaluation: 5,
                score: 2.0
            })
        );
        assert_eq!(handler.bar().message(), "best 2 (#5)");
        assert_eq!(handler.bar().position(), 5);
    }

    #[test]
    fn finishing_early_shrinks_the_bar_to_the_evaluated_count() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 15 });
        callback(Progress::TaskIncrement { amount: 3 });
        callback(Progress::Improvement {
            evaluation: 2,
            score: 1.5,
        });
        callback(Progress::TaskFinish);

        let bar = handler.bar();
        assert!(bar.is_finished());
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.message(), "best 1.5 (#2)");
    }

    #[test]
    fn phase_messages_label_the_spinner_until_the_search_starts() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Generating lattice",
        });
        assert_eq!(handler.bar().message(), "Generating lattice");
        callback(Progress::PhaseFinish);

        callback(Progress::TaskStart { total_steps: 4 });
        assert_eq!(handler.bar().length(), Some(4));
        assert_eq!(handler.bar().message(), "no finite score yet");
    }
}
