//! Input Debounce
//!
//! Every input gets a ticket; after the quiet period only the newest ticket
//! is allowed through, so a burst of keystrokes yields one update carrying
//! the last value.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Clone, Default)]
pub struct Debouncer {
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    /// Wait for `quiet`, then yield `value` unless a newer input arrived
    pub async fn settle<T>(&self, value: T, quiet: impl Future<Output = ()>) -> Option<T> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        quiet.await;
        (self.latest.load(Ordering::SeqCst) == ticket).then_some(value)
    }
}

/// Signal that follows `source` once it has been still for `delay`
pub fn use_debounced<T>(source: Signal<T>, delay: Duration) -> ReadSignal<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let (output, set_output) = signal(source.get_untracked());
    let debouncer = Debouncer::default();
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);

    Effect::new(move |_| {
        let value = source.get();
        let debouncer = debouncer.clone();
        spawn_local(async move {
            if let Some(value) = debouncer.settle(value, TimeoutFuture::new(millis)).await {
                if output.get_untracked() != value {
                    log::debug!("debounced input settled");
                    set_output.set(value);
                }
            }
        });
    });

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::future::join4;

    async fn timer(rx: oneshot::Receiver<()>) {
        let _ = rx.await;
    }

    #[tokio::test]
    async fn test_burst_yields_only_last_value() {
        let debouncer = Debouncer::default();
        let (t1, r1) = oneshot::channel();
        let (t2, r2) = oneshot::channel();
        let (t3, r3) = oneshot::channel();

        // All three keystrokes land inside one quiet period
        let (a, b, c, _) = join4(
            debouncer.settle("r", timer(r1)),
            debouncer.settle("re", timer(r2)),
            debouncer.settle("rep", timer(r3)),
            async move {
                let _ = t1.send(());
                let _ = t2.send(());
                let _ = t3.send(());
            },
        )
        .await;

        let emitted: Vec<&str> = [a, b, c].into_iter().flatten().collect();
        assert_eq!(emitted, vec!["rep"]);
    }

    #[tokio::test]
    async fn test_spaced_inputs_all_settle() {
        let debouncer = Debouncer::default();
        assert_eq!(debouncer.settle("a", async {}).await, Some("a"));
        assert_eq!(debouncer.settle("ab", async {}).await, Some("ab"));
    }
}
