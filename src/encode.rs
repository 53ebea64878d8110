use core::fmt::Write;

use heapless::String;

use crate::config::{ReporterConfig, URL_PATH_MAX};
use crate::types::{EncodeError, PadSnapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSpec {
    pub host: &'static str,
    pub port: u16,
    pub path: String<URL_PATH_MAX>,
}

/// Query keys are emitted in a fixed order the collector relies on;
/// booleans render as `true`/`false`, axes as plain decimal. None of the
/// values need URL escaping.
pub fn encode_report(
    config: &ReporterConfig,
    snapshot: &PadSnapshot,
) -> Result<RequestSpec, EncodeError> {
    let mut path = String::new();
    write_query_path(&mut path, snapshot)?;
    Ok(RequestSpec {
        host: config.collector_host,
        port: config.collector_port,
        path,
    })
}

// Overflow fails closed: the partially written buffer only ever reaches the
// caller through the error path and is discarded, never sent.
fn write_query_path<const N: usize>(
    path: &mut String<N>,
    snapshot: &PadSnapshot,
) -> Result<(), EncodeError> {
    write!(
        path,
        "/log-get?button1={}&button2={}&joystick_pressed={}&joystick_x={}&joystick_y={}",
        snapshot.button_a_pressed,
        snapshot.button_b_pressed,
        snapshot.joystick_pressed,
        snapshot.joystick_x,
        snapshot.joystick_y,
    )
    .map_err(|_| EncodeError::PathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG: ReporterConfig = ReporterConfig {
        collector_host: "192.168.0.130",
        collector_port: 3000,
        wifi_ssid: "lab",
        wifi_password: "hunter2",
    };

    fn snapshot(a: bool, b: bool, sw: bool, x: u16, y: u16) -> PadSnapshot {
        PadSnapshot {
            button_a_pressed: a,
            button_b_pressed: b,
            joystick_pressed: sw,
            joystick_x: x,
            joystick_y: y,
        }
    }

    #[test]
    fn encodes_reference_snapshot() {
        let request = encode_report(&TEST_CONFIG, &snapshot(true, false, false, 2048, 10))
            .expect("encode reference snapshot");
        assert_eq!(request.host, "192.168.0.130");
        assert_eq!(request.port, 3000);
        assert_eq!(
            request.path.as_str(),
            "/log-get?button1=true&button2=false&joystick_pressed=false&joystick_x=2048&joystick_y=10"
        );
    }

    #[test]
    fn query_keys_keep_fixed_order() {
        let request =
            encode_report(&TEST_CONFIG, &snapshot(false, true, true, 0, 4095)).expect("encode");
        let path = request.path.as_str();

        let positions: Vec<usize> = [
            "button1=",
            "button2=",
            "joystick_pressed=",
            "joystick_x=",
            "joystick_y=",
        ]
        .iter()
        .map(|key| path.find(key).expect("key present"))
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn decimal_axes_have_no_leading_zeros() {
        let request = encode_report(&TEST_CONFIG, &snapshot(false, false, false, 7, 0)).expect("encode");
        assert!(request.path.as_str().ends_with("joystick_x=7&joystick_y=0"));
    }

    #[test]
    fn boundary_inputs_stay_within_path_bound() {
        for bits in 0u8..8 {
            for &x in &[0u16, 4095] {
                for &y in &[0u16, 4095] {
                    let sample = snapshot(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, x, y);
                    let request = encode_report(&TEST_CONFIG, &sample).expect("encode boundary");
                    assert!(request.path.len() <= URL_PATH_MAX);
                }
            }
        }
    }

    #[test]
    fn overflow_fails_closed() {
        let mut tiny: String<16> = String::new();
        let result = write_query_path(&mut tiny, &snapshot(true, true, true, 4095, 4095));
        assert_eq!(result, Err(EncodeError::PathOverflow));
    }
}
