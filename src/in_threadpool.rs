use std::panic;
use std::sync::mpsc::channel;

use anyhow::Result;
use scoped_thread_pool::Pool;

/// Execute function inside the thread pool and return its result. A
/// panic in `f` is resumed in the calling thread.
pub fn in_threadpool<F, R>(threadpool: &Pool, f: F) -> Result<R>
where F: FnOnce() -> R + Send,
      R: Send
{
    let (tx, rx) = channel();
    threadpool.scoped(move |scope| {
        scope.execute(move || {
            let result = panic::catch_unwind(panic::AssertUnwindSafe(f));
            // The receiver only goes away if the caller panicked
            let _ = tx.send(result);
        });
    });
    match rx.recv()? {
        Ok(r) => Ok(r),
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Run `f(i)` for every `i` in `0..n` on the pool, results in order.
pub fn map_in_threadpool<F, R>(threadpool: &Pool, n: usize, f: F) -> Vec<R>
where F: Fn(usize) -> R + Sync,
      R: Send
{
    let mut results: Vec<Option<R>> = (0..n).map(|_| None).collect();
    threadpool.scoped(|scope| {
        for (i, slot) in results.iter_mut().enumerate() {
            let f = &f;
            scope.execute(move || {
                *slot = Some(f(i));
            });
        }
    });
    results.into_iter().flatten().collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_in_threadpool() -> Result<()> {
        let pool = Pool::new(2);
        let v = vec![1, 2, 3];
        let sum = in_threadpool(&pool, || v.iter().sum::<i32>())?;
        assert_eq!(sum, 6);
        assert_eq!(map_in_threadpool(&pool, 4, |i| i * 10), vec![0, 10, 20, 30]);
        pool.shutdown();
        Ok(())
    }
}
