/// One sample of the input pad. Created fresh each cycle, discarded after
/// encoding; nothing outlives the loop iteration that read it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadSnapshot {
    pub button_a_pressed: bool,
    pub button_b_pressed: bool,
    pub joystick_pressed: bool,
    pub joystick_x: u16,
    pub joystick_y: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Down,
    Connecting,
    Up,
}

impl LinkState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "Down",
            Self::Connecting => "Connecting",
            Self::Up => "Up",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportOutcome {
    Delivered,
    TransportFailure,
}

impl ReportOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::TransportFailure => "transport_failure",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkError {
    AssociateFailed,
    AttemptTimeout,
}

impl LinkError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssociateFailed => "associate_failed",
            Self::AttemptTimeout => "attempt_timeout",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportError {
    Resolve,
    Connect,
    Write,
    Read,
    BadStatus,
}

impl TransportError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Connect => "connect",
            Self::Write => "write",
            Self::Read => "read",
            Self::BadStatus => "bad_status",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    PathOverflow,
}

impl EncodeError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PathOverflow => "path_overflow",
        }
    }
}
