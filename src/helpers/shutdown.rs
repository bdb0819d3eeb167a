use anyhow::Result;
use flume::Receiver;
use nix::sys::signal::{SigSet, Signal};

/// Route SIGINT and SIGTERM to a channel.
///
/// The signals are blocked on the calling thread and awaited on a dedicated
/// watcher thread. Call this before spawning any other thread so the mask is
/// inherited everywhere.
pub fn shutdown_channel() -> Result<Receiver<()>> {
    let mut signals = SigSet::empty();
    signals.add(Signal::SIGINT);
    signals.add(Signal::SIGTERM);
    signals.thread_block()?;

    let (tx, rx) = flume::bounded(1);
    std::thread::Builder::new()
        .name("signal-watch".into())
        .spawn(move || match signals.wait() {
            Ok(signal) => {
                log::info!("Received {:?}, stopping after the current tick", signal);
                let _ = tx.send(());
            }
            Err(e) => log::error!("Waiting for shutdown signal failed: {}", e),
        })?;

    Ok(rx)
}
