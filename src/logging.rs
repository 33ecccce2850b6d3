//! Console logging. In the browser every tracing event is formatted by
//! `tracing-subscriber` and handed to `console.error/warn/log/debug` by level.
//! On other targets (and without the `console_tracing` feature) `init` does
//! nothing, so host tests stay quiet.

use tracing::Level;

#[cfg(all(target_arch = "wasm32", feature = "console_tracing"))]
mod console {
    use std::io;

    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    /// Buffers one formatted event, emits it on drop.
    pub struct ConsoleWriter {
        level: Level,
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            if self.buf.is_empty() {
                return;
            }
            let text = String::from_utf8_lossy(&self.buf);
            let msg = JsValue::from_str(text.trim_end());
            match self.level {
                Level::ERROR => web_sys::console::error_1(&msg),
                Level::WARN => web_sys::console::warn_1(&msg),
                Level::INFO => web_sys::console::log_1(&msg),
                _ => web_sys::console::debug_1(&msg),
            }
        }
    }

    pub struct ConsoleMakeWriter;

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter { level: Level::INFO, buf: Vec::new() }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter { level: *meta.level(), buf: Vec::new() }
        }
    }
}

/// Install the console subscriber. Safe to call more than once; only the first call wins.
#[cfg(all(target_arch = "wasm32", feature = "console_tracing"))]
pub fn init(level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_writer(console::ConsoleMakeWriter)
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(%level, "console logging ready");
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "console_tracing")))]
pub fn init(_level: Level) {}
