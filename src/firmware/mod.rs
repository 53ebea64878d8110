mod net;
mod pad;
mod radio;

use embassy_net::{Runner, Stack, StackResources};
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, Config as WifiRuntimeConfig, ModeConfig, WifiController, WifiDevice,
};
use log::{error, info};
use static_cell::StaticCell;

use crate::config::ReporterConfig;
use crate::link::LinkSupervisor;
use crate::report::Reporter;

use net::{EmbassyPacer, HttpCollector, HTTP_RW_BUF};
use pad::EspPad;
use radio::EspRadioLink;

const WIFI_RX_QUEUE_SIZE: usize = 3;
const WIFI_TX_QUEUE_SIZE: usize = 2;

type EspReporter = Reporter<EspPad, HttpCollector, EspRadioLink, EmbassyPacer>;

struct NetRuntime {
    controller: WifiController<'static>,
    stack: Stack<'static>,
    net_runner: Runner<'static, WifiDevice<'static>>,
}

// Radio, station config and TCP/IP stack. Any error here is fatal to boot.
fn setup_network(
    config: &ReporterConfig,
    wifi: esp_hal::peripherals::WIFI<'static>,
) -> Result<NetRuntime, &'static str> {
    static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

    let radio_ctrl = esp_radio::init().map_err(|err| {
        error!("radio: init err={:?}", err);
        "radio: init failed"
    })?;
    let radio_ctrl = RADIO_CTRL.init(radio_ctrl);

    let wifi_cfg = WifiRuntimeConfig::default()
        .with_rx_queue_size(WIFI_RX_QUEUE_SIZE)
        .with_tx_queue_size(WIFI_TX_QUEUE_SIZE);
    let (mut controller, ifaces) =
        esp_radio::wifi::new(radio_ctrl, wifi, wifi_cfg).map_err(|err| {
            error!("radio: wifi init err={:?}", err);
            "radio: wifi init failed"
        })?;

    let auth_method = if config.wifi_password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::Wpa2Personal
    };
    let client = ClientConfig::default()
        .with_ssid(config.wifi_ssid.into())
        .with_password(config.wifi_password.into())
        .with_auth_method(auth_method);
    controller
        .set_config(&ModeConfig::Client(client))
        .map_err(|err| {
            error!("radio: station config err={:?}", err);
            "radio: station config failed"
        })?;
    info!("radio: station mode ssid={}", config.wifi_ssid);

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    let (stack, net_runner) = embassy_net::new(
        ifaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::<3>::new()),
        seed,
    );

    Ok(NetRuntime {
        controller,
        stack,
        net_runner,
    })
}

pub fn run() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    esp_alloc::heap_allocator!(size: 72 * 1024);
    esp_println::logger::init_logger_from_env();

    let config = ReporterConfig::compiled();
    info!(
        "boot: padlog collector={}:{}",
        config.collector_host, config.collector_port
    );

    let pad = EspPad::new(
        peripherals.GPIO25,
        peripherals.GPIO26,
        peripherals.GPIO27,
        peripherals.ADC1,
        peripherals.GPIO34,
        peripherals.GPIO35,
    );
    info!("boot: input pad configured");

    let NetRuntime {
        controller,
        stack,
        net_runner,
    } = match setup_network(&config, peripherals.WIFI) {
        Ok(runtime) => runtime,
        Err(err) => {
            // Bare metal has no exit code; a halted, logged device is the
            // startup-failure contract.
            error!("boot: {}", err);
            halt_forever();
        }
    };

    static RX_BUFFER: StaticCell<[u8; HTTP_RW_BUF]> = StaticCell::new();
    static TX_BUFFER: StaticCell<[u8; HTTP_RW_BUF]> = StaticCell::new();
    let collector = HttpCollector::new(
        stack,
        RX_BUFFER.init([0u8; HTTP_RW_BUF]),
        TX_BUFFER.init([0u8; HTTP_RW_BUF]),
    );

    let reporter = Reporter::new(
        config,
        pad,
        collector,
        LinkSupervisor::new(EspRadioLink::new(controller), EmbassyPacer),
        EmbassyPacer,
    );

    let mut executor = esp_rtos::embassy::Executor::new();
    let executor = unsafe { make_static(&mut executor) };
    executor.run(move |spawner| {
        spawner.must_spawn(net_task(net_runner));
        spawner.must_spawn(report_task(reporter));
    });
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

#[embassy_executor::task]
async fn report_task(mut reporter: EspReporter) {
    reporter.run().await
}

unsafe fn make_static<T>(value: &mut T) -> &'static mut T {
    unsafe { core::mem::transmute(value) }
}

fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
