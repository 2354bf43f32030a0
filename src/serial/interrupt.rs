//! Ctrl+C handling for the tail loop
//!
//! The handler only raises a static flag (SIGINT on Unix, console control
//! events on Windows). The loop sees it once the current bounded read
//! returns.

use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the Ctrl+C handler and return the flag it raises.
///
/// The handler is registered once per process; later calls return the same
/// flag.
pub fn install() -> Result<&'static AtomicBool> {
    INSTALLED
        .get_or_try_init(|| {
            ctrlc::set_handler(|| {
                INTERRUPTED.store(true, Ordering::SeqCst);
            })
        })
        .map_err(Error::SignalHandler)?;

    Ok(&INTERRUPTED)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_sigint_raises_flag() {
        let flag = install().unwrap();
        assert!(std::ptr::eq(flag, install().unwrap()));
        assert!(!flag.load(Ordering::SeqCst));

        // SAFETY: raising a signal whose handler was installed above
        let rc = unsafe { libc::raise(libc::SIGINT) };
        assert_eq!(rc, 0);

        // The handler runs on its own thread
        let deadline = Instant::now() + Duration::from_secs(5);
        while !flag.load(Ordering::SeqCst) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(flag.load(Ordering::SeqCst));
    }
}
