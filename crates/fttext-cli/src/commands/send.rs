use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use fttext_core::{open_connection, RenderOutcome, RenderPlan, ScrollRenderer, UdpDisplay};

pub async fn run(plan: RenderPlan) -> Result<()> {
    let socket = open_connection(plan.host()).await?;
    let display = UdpDisplay::new(socket, plan.width(), plan.height());

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    install_signal_listener(shutdown_tx).await;

    let report = ScrollRenderer::new(&plan, shutdown_rx).run(display).await?;
    info!(
        frames = report.frames_sent,
        sweeps = report.sweeps,
        text_width = report.text_width,
        "Render finished"
    );

    if report.outcome == RenderOutcome::Interrupted {
        eprintln!("Interrupted. Exit.");
    }

    Ok(())
}

/// Flip the shutdown channel on SIGINT or SIGTERM.
///
/// The handlers are registered before this returns, so a signal arriving
/// before the listener task first runs is not lost to the default handler.
#[cfg(unix)]
async fn install_signal_listener(shutdown_tx: watch::Sender<bool>) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut interrupt, mut terminate) =
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(interrupt), Ok(terminate)) => (interrupt, terminate),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install signal handlers: {}", e);
                return;
            }
        };

    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
        }
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });
}

#[cfg(not(unix))]
async fn install_signal_listener(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });
    // Let the task register its handler before the first frame goes out
    tokio::task::yield_now().await;
}
