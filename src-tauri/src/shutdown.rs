use crate::app::SharedState;

pub fn graceful_shutdown(state: &SharedState) {
    if state.shutdown_token().is_cancelled() {
        return;
    }
    tracing::info!("Shutdown sequence started");

    state.shutdown_token().cancel();
    let watchers = state.cancel_all_watchers();
    tracing::info!(watchers, "Shutdown: poll loops cancelled");

    let pending = state.bridge().fail_all();
    if pending > 0 {
        tracing::info!(pending, "Shutdown: pending page scripts abandoned");
    }

    tracing::info!("Shutdown sequence completed");
}
