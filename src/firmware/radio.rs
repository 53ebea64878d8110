use embassy_time::{with_timeout, Duration};
use esp_radio::wifi::WifiController;
use log::warn;

use crate::config::LINK_CONNECT_TIMEOUT_MS;
use crate::hal::LinkRadio;
use crate::types::{LinkError, LinkState};

pub struct EspRadioLink {
    controller: WifiController<'static>,
}

impl EspRadioLink {
    pub(super) fn new(controller: WifiController<'static>) -> Self {
        Self { controller }
    }
}

impl LinkRadio for EspRadioLink {
    fn link_status(&mut self) -> LinkState {
        if self.controller.is_connected().unwrap_or(false) {
            LinkState::Up
        } else {
            LinkState::Down
        }
    }

    async fn associate(&mut self) -> Result<(), LinkError> {
        if !matches!(self.controller.is_started(), Ok(true)) {
            self.controller.start_async().await.map_err(|err| {
                warn!("wifi: start err={:?}", err);
                LinkError::AssociateFailed
            })?;
        }

        let budget = Duration::from_millis(LINK_CONNECT_TIMEOUT_MS as u64);
        match with_timeout(budget, self.controller.connect_async()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                warn!("wifi: connect err={:?}", err);
                let _ = self.controller.disconnect_async().await;
                Err(LinkError::AssociateFailed)
            }
            Err(_) => {
                // Leave the radio in a known state before the next attempt.
                let _ = self.controller.disconnect_async().await;
                Err(LinkError::AttemptTimeout)
            }
        }
    }
}
