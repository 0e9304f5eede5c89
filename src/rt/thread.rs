//! Thread spawn/join and sleep (spec §2 "RtThread" table entry, §5:
//! sleep is one of the OS-blocking operations the API exposes with no
//! cancellation token).

use std::thread::JoinHandle;
use std::time::Duration;

pub struct RtThread<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> RtThread<T> {
    pub fn spawn<F: FnOnce() -> T + Send + 'static>(f: F) -> Self {
        RtThread { handle: std::thread::spawn(f) }
    }

    pub fn join(self) -> std::thread::Result<T> {
        self.handle.join()
    }
}

pub fn sleep_millis(millis: u64) {
    std::thread::sleep(Duration::from_millis(millis));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_join_returns_the_closures_value() {
        let t = RtThread::spawn(|| 1 + 1);
        assert_eq!(t.join().unwrap(), 2);
    }

    #[test]
    fn sleep_millis_blocks_for_at_least_the_requested_duration() {
        let start = std::time::Instant::now();
        sleep_millis(5);
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
