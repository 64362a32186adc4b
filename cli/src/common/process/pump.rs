//! # Output Pumps (`common::process::pump`)
//!
//! File: cli/src/common/process/pump.rs
//!
//! ## Overview
//!
//! An output pump moves bytes from one child pipe onto a channel, one byte at
//! a time, until the pipe reaches end-of-file or a read fails. Either case is
//! normal shutdown and is only traced.
//!
//! A streamed command runs two pumps (stdout and stderr) concurrently so that a
//! quiet stream never holds up a busy one. `PumpSet` owns the pump tasks and
//! aborts any that are still running when it is dropped, so no task outlives
//! the command that started it.
//!
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::trace;

/// Forwards every byte of `reader` to `sink` in order.
///
/// Stops when the reader is exhausted, a read errors, or the receiving side
/// has gone away.
pub async fn pump<R>(reader: R, sink: UnboundedSender<u8>, label: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut forwarded = 0usize;
    loop {
        match reader.read_u8().await {
            Ok(byte) => {
                if sink.send(byte).is_err() {
                    trace!("{} pump: receiver closed after {} bytes", label, forwarded);
                    break;
                }
                forwarded += 1;
            }
            Err(e) => {
                trace!("{} pump: stopping after {} bytes ({})", label, forwarded, e);
                break;
            }
        }
    }
}

/// The pump tasks belonging to one command.
#[derive(Default)]
pub struct PumpSet {
    handles: Vec<JoinHandle<()>>,
}

impl PumpSet {
    /// Starts a pump for `reader` and returns the receiving end of its channel.
    pub fn spawn<R>(&mut self, reader: R, label: &'static str) -> UnboundedReceiver<u8>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        self.handles.push(tokio::spawn(pump(reader, tx, label)));
        rx
    }

    /// Waits until every pump has hit end-of-file.
    pub async fn finish(&mut self) {
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                trace!("Output pump ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PumpSet {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
