//! Capability seams between the control loop and its collaborators.
//! Hardware adapters live under `firmware/`; host tests substitute
//! scripted implementations.

use crate::encode::RequestSpec;
use crate::types::{LinkError, LinkState, PadSnapshot, TransportError};

#[allow(async_fn_in_trait)]
pub trait LinkRadio {
    /// Non-blocking read of the radio's current association status.
    fn link_status(&mut self) -> LinkState;

    /// One authenticate-and-associate attempt, bounded by
    /// [`crate::config::LINK_CONNECT_TIMEOUT_MS`].
    async fn associate(&mut self) -> Result<(), LinkError>;
}

/// Must complete in bounded, microseconds-scale time; never touches the
/// network.
pub trait InputPad {
    fn sample(&mut self) -> PadSnapshot;
}

#[allow(async_fn_in_trait)]
pub trait Collector {
    async fn send(&mut self, request: &RequestSpec) -> Result<(), TransportError>;
}

#[allow(async_fn_in_trait)]
pub trait Pacer {
    async fn pause_ms(&mut self, ms: u32);
}
