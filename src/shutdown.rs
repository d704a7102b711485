use tracing::{info, warn};

/// Resolves when the operator interrupts the controller (Ctrl-C, or SIGTERM
/// from systemd). The supervisor races every cycle against this.
pub async fn interrupt_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = terminate.recv() => info!("Received SIGTERM"),
                }
                return;
            }
            Err(e) => warn!("Could not install SIGTERM handler: {}", e),
        }
    }

    ctrl_c().await
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received interrupt"),
        Err(e) => {
            // Without a handler the only way out is killing the process
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}
