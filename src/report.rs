use log::{debug, info, warn};

use crate::config::{
    ReporterConfig, REPORT_COOLDOWN_EXTENDED_MS, REPORT_COOLDOWN_NORMAL_MS, STATS_LOG_EVERY_CYCLES,
};
use crate::encode::encode_report;
use crate::hal::{Collector, InputPad, LinkRadio, Pacer};
use crate::link::LinkSupervisor;
use crate::stats;
use crate::types::ReportOutcome;

/// Two-tier inter-cycle delay; never grows beyond the extended tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    Normal,
    Extended,
}

impl Cadence {
    pub const fn for_outcome(outcome: ReportOutcome) -> Self {
        match outcome {
            ReportOutcome::Delivered => Self::Normal,
            ReportOutcome::TransportFailure => Self::Extended,
        }
    }

    pub const fn delay_ms(self) -> u32 {
        match self {
            Self::Normal => REPORT_COOLDOWN_NORMAL_MS,
            Self::Extended => REPORT_COOLDOWN_EXTENDED_MS,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Extended => "extended",
        }
    }
}

/// One instance, one task, cycles strictly sequential: a cycle's report is
/// fully resolved before the next sample is taken.
pub struct Reporter<I, C, R, P> {
    config: ReporterConfig,
    pad: I,
    collector: C,
    link: LinkSupervisor<R, P>,
    pacer: P,
    cadence: Cadence,
    cycles: u32,
}

impl<I, C, R, P> Reporter<I, C, R, P>
where
    I: InputPad,
    C: Collector,
    R: LinkRadio,
    P: Pacer,
{
    pub fn new(
        config: ReporterConfig,
        pad: I,
        collector: C,
        link: LinkSupervisor<R, P>,
        pacer: P,
    ) -> Self {
        Self {
            config,
            pad,
            collector,
            link,
            pacer,
            cadence: Cadence::Normal,
            cycles: 0,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// One full cycle: check link, sample, encode, dispatch, cool down.
    /// Re-entrant; `run` just calls this forever.
    pub async fn run_one_cycle(&mut self) -> ReportOutcome {
        self.link.ensure_link_up().await;

        let snapshot = self.pad.sample();

        let outcome = match encode_report(&self.config, &snapshot) {
            Ok(request) => {
                debug!(
                    "report: GET {}:{}{}",
                    request.host, request.port, request.path
                );
                match self.collector.send(&request).await {
                    Ok(()) => {
                        stats::record_report_delivered();
                        ReportOutcome::Delivered
                    }
                    Err(err) => {
                        stats::record_report_failed();
                        warn!("report: send err={}", err.as_str());
                        ReportOutcome::TransportFailure
                    }
                }
            }
            Err(err) => {
                // Nothing went out; the cycle still backs off like a failed one.
                stats::record_encode_failure();
                warn!("report: encode err={}", err.as_str());
                ReportOutcome::TransportFailure
            }
        };

        self.cadence = Cadence::for_outcome(outcome);
        self.pacer.pause_ms(self.cadence.delay_ms()).await;

        self.cycles = self.cycles.wrapping_add(1);
        if self.cycles % STATS_LOG_EVERY_CYCLES == 0 {
            stats::log_summary();
        }
        outcome
    }

    // Runs until the device resets; there is no graceful-stop path.
    pub async fn run(&mut self) -> ! {
        info!(
            "report: loop start collector={}:{}",
            self.config.collector_host, self.config.collector_port
        );
        loop {
            self.run_one_cycle().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embassy_futures::block_on;

    use super::*;
    use crate::encode::RequestSpec;
    use crate::types::{LinkError, LinkState, PadSnapshot, TransportError};

    const TEST_CONFIG: ReporterConfig = ReporterConfig {
        collector_host: "192.168.0.130",
        collector_port: 3000,
        wifi_ssid: "lab",
        wifi_password: "hunter2",
    };

    const TEST_SNAPSHOT: PadSnapshot = PadSnapshot {
        button_a_pressed: true,
        button_b_pressed: false,
        joystick_pressed: false,
        joystick_x: 2048,
        joystick_y: 10,
    };

    #[derive(Clone, Default)]
    struct RecordingPacer {
        pauses: Rc<RefCell<Vec<u32>>>,
    }

    impl Pacer for RecordingPacer {
        async fn pause_ms(&mut self, ms: u32) {
            self.pauses.borrow_mut().push(ms);
        }
    }

    struct FixedPad;

    impl InputPad for FixedPad {
        fn sample(&mut self) -> PadSnapshot {
            TEST_SNAPSHOT
        }
    }

    struct ScriptRadio {
        status: Rc<RefCell<LinkState>>,
        script: Rc<RefCell<Vec<Result<(), LinkError>>>>,
        attempts: Rc<RefCell<u32>>,
    }

    impl LinkRadio for ScriptRadio {
        fn link_status(&mut self) -> LinkState {
            *self.status.borrow()
        }

        async fn associate(&mut self) -> Result<(), LinkError> {
            *self.attempts.borrow_mut() += 1;
            let result = self.script.borrow_mut().remove(0);
            if result.is_ok() {
                *self.status.borrow_mut() = LinkState::Up;
            }
            result
        }
    }

    struct ScriptCollector {
        script: Rc<RefCell<Vec<Result<(), TransportError>>>>,
        sent_paths: Rc<RefCell<Vec<String>>>,
    }

    impl Collector for ScriptCollector {
        async fn send(&mut self, request: &RequestSpec) -> Result<(), TransportError> {
            self.sent_paths.borrow_mut().push(request.path.to_string());
            self.script.borrow_mut().remove(0)
        }
    }

    struct Harness {
        status: Rc<RefCell<LinkState>>,
        attempts: Rc<RefCell<u32>>,
        sent_paths: Rc<RefCell<Vec<String>>>,
        cooldowns: Rc<RefCell<Vec<u32>>>,
        reporter: Reporter<FixedPad, ScriptCollector, ScriptRadio, RecordingPacer>,
    }

    fn harness(
        initial_link: LinkState,
        radio_script: Vec<Result<(), LinkError>>,
        collector_script: Vec<Result<(), TransportError>>,
    ) -> Harness {
        let status = Rc::new(RefCell::new(initial_link));
        let attempts = Rc::new(RefCell::new(0));
        let sent_paths = Rc::new(RefCell::new(Vec::new()));

        let radio = ScriptRadio {
            status: status.clone(),
            script: Rc::new(RefCell::new(radio_script)),
            attempts: attempts.clone(),
        };
        let collector = ScriptCollector {
            script: Rc::new(RefCell::new(collector_script)),
            sent_paths: sent_paths.clone(),
        };
        let loop_pacer = RecordingPacer::default();
        let cooldowns = loop_pacer.pauses.clone();

        let reporter = Reporter::new(
            TEST_CONFIG,
            FixedPad,
            collector,
            LinkSupervisor::new(radio, RecordingPacer::default()),
            loop_pacer,
        );
        Harness {
            status,
            attempts,
            sent_paths,
            cooldowns,
            reporter,
        }
    }

    #[test]
    fn outcome_sequence_drives_cooldown_tiers() {
        let mut h = harness(
            LinkState::Up,
            vec![],
            vec![Ok(()), Err(TransportError::Connect), Ok(())],
        );

        let outcomes = block_on(async {
            [
                h.reporter.run_one_cycle().await,
                h.reporter.run_one_cycle().await,
                h.reporter.run_one_cycle().await,
            ]
        });

        assert_eq!(
            outcomes,
            [
                ReportOutcome::Delivered,
                ReportOutcome::TransportFailure,
                ReportOutcome::Delivered,
            ]
        );
        assert_eq!(
            h.cooldowns.borrow().as_slice(),
            &[
                REPORT_COOLDOWN_NORMAL_MS,
                REPORT_COOLDOWN_EXTENDED_MS,
                REPORT_COOLDOWN_NORMAL_MS,
            ]
        );
        assert_eq!(h.reporter.cadence(), Cadence::Normal);
    }

    #[test]
    fn sends_encoded_snapshot_each_cycle() {
        let mut h = harness(LinkState::Up, vec![], vec![Ok(())]);

        block_on(h.reporter.run_one_cycle());

        assert_eq!(
            h.sent_paths.borrow().as_slice(),
            &["/log-get?button1=true&button2=false&joystick_pressed=false&joystick_x=2048&joystick_y=10"]
        );
    }

    #[test]
    fn up_link_is_not_reassociated() {
        let mut h = harness(LinkState::Up, vec![], vec![Ok(())]);

        block_on(h.reporter.run_one_cycle());

        assert_eq!(*h.attempts.borrow(), 0);
    }

    #[test]
    fn silent_link_drop_forces_reassociation_next_cycle() {
        let mut h = harness(LinkState::Up, vec![Ok(())], vec![Ok(()), Ok(())]);

        block_on(h.reporter.run_one_cycle());
        assert_eq!(*h.attempts.borrow(), 0);

        // Signal lost between cycles; no disconnect event was delivered.
        *h.status.borrow_mut() = LinkState::Down;
        block_on(h.reporter.run_one_cycle());

        assert_eq!(*h.attempts.borrow(), 1);
        assert_eq!(h.sent_paths.borrow().len(), 2);
    }

    #[test]
    fn down_link_blocks_sending_until_associated() {
        let mut h = harness(
            LinkState::Down,
            vec![Err(LinkError::AttemptTimeout), Ok(())],
            vec![Ok(())],
        );

        let outcome = block_on(h.reporter.run_one_cycle());

        assert_eq!(outcome, ReportOutcome::Delivered);
        assert_eq!(*h.attempts.borrow(), 2);
        assert_eq!(h.sent_paths.borrow().len(), 1);
    }
}
