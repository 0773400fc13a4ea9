use anyhow::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::info;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Runs one async task per job with at most `concurrency` of them in flight.
/// A finished task frees its slot for the next queued job right away.
///
/// Outputs are handed to the merge callback in job order, one at a time, so the
/// callback can own all shared state without locking. Early finishers wait in a
/// reorder buffer until the jobs before them are merged. The first failing task
/// or merge aborts the run; tasks still in flight are dropped.
#[derive(Debug, Clone, Copy)]
pub struct FetchScheduler {
    concurrency: usize,
}

impl Default for FetchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl FetchScheduler {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn run<J, T, F, Fut, M>(&self, jobs: Vec<J>, mut task: F, mut merge: M) -> Result<usize>
    where
        F: FnMut(J) -> Fut,
        Fut: Future<Output = Result<T>>,
        M: FnMut(T) -> Result<()>,
    {
        info!(jobs = jobs.len(), concurrency = self.concurrency, "scheduling tasks");

        let results = stream::iter(jobs.into_iter().enumerate())
            .map(|(index, job)| {
                let running = task(job);
                async move { running.await.map(|output| (index, output)) }
            })
            .buffer_unordered(self.concurrency);
        futures::pin_mut!(results);

        let mut waiting: BTreeMap<usize, T> = BTreeMap::new();
        let mut next = 0;
        while let Some((index, output)) = results.try_next().await? {
            waiting.insert(index, output);
            while let Some(ready) = waiting.remove(&next) {
                merge(ready)?;
                next += 1;
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn never_exceeds_concurrency() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let scheduler = FetchScheduler::new(2);
        let completed = scheduler
            .run(
                (0..8).collect(),
                |job: u64| {
                    let active = active.clone();
                    let peak = peak.clone();
                    async move {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10 + job % 3)).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, anyhow::Error>(job)
                    }
                },
                |_| Ok(()),
            )
            .await
            .unwrap();

        assert_eq!(completed, 8);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn freed_slot_starts_next_job_behind_slow_head() {
        let origin = tokio::time::Instant::now();
        let starts = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut merged = Vec::new();

        let completed = FetchScheduler::new(2)
            .run(
                vec![(0usize, 300u64), (1, 10), (2, 10), (3, 10)],
                |(index, delay)| {
                    let starts = starts.clone();
                    async move {
                        starts.lock().unwrap().push((index, origin.elapsed()));
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        Ok::<_, anyhow::Error>(index)
                    }
                },
                |index| {
                    merged.push(index);
                    Ok(())
                },
            )
            .await
            .unwrap();

        assert_eq!(completed, 4);
        assert_eq!(merged, vec![0, 1, 2, 3]);
        let starts = starts.lock().unwrap();
        assert_eq!(starts.len(), 4);
        for (index, started) in starts.iter().filter(|(index, _)| *index >= 2) {
            assert!(
                *started < Duration::from_millis(150),
                "job {} waited {:?} for the slow head",
                index,
                started
            );
        }
    }

    #[tokio::test]
    async fn merges_in_job_order() {
        let mut merged = Vec::new();
        FetchScheduler::new(4)
            .run(
                vec![30u64, 5, 20, 1],
                |delay| async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Ok::<_, anyhow::Error>(delay)
                },
                |value| {
                    merged.push(value);
                    Ok(())
                },
            )
            .await
            .unwrap();

        assert_eq!(merged, vec![30, 5, 20, 1]);
    }

    #[tokio::test]
    async fn task_failure_fails_the_run() {
        let mut merged = Vec::new();
        let result = FetchScheduler::new(1)
            .run(
                vec![1, 2, 3],
                |job: i32| async move {
                    if job == 2 {
                        anyhow::bail!("chair {} unavailable", job);
                    }
                    Ok::<_, anyhow::Error>(job)
                },
                |value| {
                    merged.push(value);
                    Ok(())
                },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(merged, vec![1]);
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        assert_eq!(FetchScheduler::new(0).concurrency(), 1);
        assert_eq!(FetchScheduler::default().concurrency(), DEFAULT_CONCURRENCY);
    }
}
