//! Printing diagnostics to stderr

use std::sync::atomic::AtomicBool;

/// Global switch for `warn!`; engines additionally consult their own
/// `ViewConfig::warnings`. Change via
/// `aview::warn::DO_WARN.store(false, Ordering::SeqCst)`.
pub static DO_WARN: AtomicBool = AtomicBool::new(true);

#[macro_export]
macro_rules! warn {
    ($formatstr:expr $(,$arg:expr)*) => { {
        if $crate::warn::DO_WARN.load(std::sync::atomic::Ordering::SeqCst) {
            use std::io::Write;
            let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
            let _ = write!(&mut outp, "W: ");
            let _ = write!(&mut outp, $formatstr $(,$arg)*);
            let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
            let _ = outp.flush();
        }
    } }
}
