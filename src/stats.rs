use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use log::info;

static LINK_ATTEMPTS: AtomicU32 = AtomicU32::new(0);
static LINK_SUCCESSES: AtomicU32 = AtomicU32::new(0);
static LINK_FAILURES: AtomicU32 = AtomicU32::new(0);
static REPORTS_DELIVERED: AtomicU32 = AtomicU32::new(0);
static REPORTS_FAILED: AtomicU32 = AtomicU32::new(0);
static ENCODE_FAILURES: AtomicU32 = AtomicU32::new(0);
static LINK_CONNECTED: AtomicBool = AtomicBool::new(false);

pub(crate) fn record_link_attempt() {
    LINK_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_link_up() {
    LINK_SUCCESSES.fetch_add(1, Ordering::Relaxed);
    LINK_CONNECTED.store(true, Ordering::Relaxed);
}

pub(crate) fn record_link_failure() {
    LINK_FAILURES.fetch_add(1, Ordering::Relaxed);
    LINK_CONNECTED.store(false, Ordering::Relaxed);
}

pub(crate) fn record_report_delivered() {
    REPORTS_DELIVERED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_report_failed() {
    REPORTS_FAILED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_encode_failure() {
    ENCODE_FAILURES.fetch_add(1, Ordering::Relaxed);
}

#[derive(Clone, Copy, Debug)]
pub struct Snapshot {
    pub link_attempts: u32,
    pub link_successes: u32,
    pub link_failures: u32,
    pub reports_delivered: u32,
    pub reports_failed: u32,
    pub encode_failures: u32,
    pub link_connected: bool,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        link_attempts: LINK_ATTEMPTS.load(Ordering::Relaxed),
        link_successes: LINK_SUCCESSES.load(Ordering::Relaxed),
        link_failures: LINK_FAILURES.load(Ordering::Relaxed),
        reports_delivered: REPORTS_DELIVERED.load(Ordering::Relaxed),
        reports_failed: REPORTS_FAILED.load(Ordering::Relaxed),
        encode_failures: ENCODE_FAILURES.load(Ordering::Relaxed),
        link_connected: LINK_CONNECTED.load(Ordering::Relaxed),
    }
}

pub(crate) fn log_summary() {
    let stats = snapshot();
    info!(
        "stats: delivered={} failed={} encode_failures={} link_attempts={} link_failures={} link_up={}",
        stats.reports_delivered,
        stats.reports_failed,
        stats.encode_failures,
        stats.link_attempts,
        stats.link_failures,
        stats.link_connected,
    );
}
