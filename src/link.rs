use log::{info, warn};

use crate::config::LINK_RETRY_PACING_MS;
use crate::hal::{LinkRadio, Pacer};
use crate::stats;
use crate::types::LinkState;

fn emit_link_event(from: LinkState, to: LinkState, trigger: &str, attempt: u32) {
    info!(
        "LINK_EVENT {{\"from\":\"{}\",\"to\":\"{}\",\"trigger\":\"{}\",\"attempt\":{}}}",
        from.as_str(),
        to.as_str(),
        trigger,
        attempt
    );
}

/// Owns the link state machine; the reporting loop only reads it.
pub struct LinkSupervisor<R, P> {
    radio: R,
    pacer: P,
    state: LinkState,
}

impl<R: LinkRadio, P: Pacer> LinkSupervisor<R, P> {
    pub fn new(radio: R, pacer: P) -> Self {
        Self {
            radio,
            pacer,
            state: LinkState::Down,
        }
    }

    pub fn current_state(&mut self) -> LinkState {
        // The AP can vanish without a disconnect event; the cached state is
        // never trusted across a cycle boundary.
        let observed = self.radio.link_status();
        if observed != self.state {
            emit_link_event(self.state, observed, "status_poll", 0);
        }
        self.state = observed;
        observed
    }

    /// Returns once the link is associated. There is no retry ceiling: the
    /// call cannot fail, it can only take long. Callers must treat it as a
    /// coarse blocking operation.
    pub async fn ensure_link_up(&mut self) {
        if self.current_state() == LinkState::Up {
            return;
        }

        emit_link_event(self.state, LinkState::Connecting, "associate_begin", 0);
        self.state = LinkState::Connecting;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            stats::record_link_attempt();
            match self.radio.associate().await {
                Ok(()) => {
                    stats::record_link_up();
                    emit_link_event(LinkState::Connecting, LinkState::Up, "associate_ok", attempt);
                    self.state = LinkState::Up;
                    return;
                }
                Err(err) => {
                    stats::record_link_failure();
                    warn!(
                        "link: associate err={} attempt={} retry_in_ms={}",
                        err.as_str(),
                        attempt,
                        LINK_RETRY_PACING_MS
                    );
                    self.pacer.pause_ms(LINK_RETRY_PACING_MS).await;
                }
            }
        }
    }
}
