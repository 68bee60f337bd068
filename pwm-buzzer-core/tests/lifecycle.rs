use pwm_buzzer_common::{
    BoardContext, BoardTrait, BuzzerConfig, BuzzerError, BuzzerResult, Errno, FileOperations,
    MiscRegistry, PlatformDevice,
};
use pwm_buzzer_core::{BuzzerModule, PwmBuzzerDriver, main_task};
use simulated_pwm::{PwmEvent, SimulatedMiscBus, SimulatedPwm, SimulatedPwmChip};
use static_cell::StaticCell;

type Driver = PwmBuzzerDriver<SimulatedPwmChip, SimulatedMiscBus>;

fn leak_module(config: BuzzerConfig) -> &'static BuzzerModule<SimulatedPwm> {
    Box::leak(Box::new(BuzzerModule::new(config)))
}

fn leak_cell() -> &'static StaticCell<BuzzerModule<SimulatedPwm>> {
    Box::leak(Box::new(StaticCell::new()))
}

fn setup(config: BuzzerConfig) -> (SimulatedPwmChip, SimulatedMiscBus, Driver) {
    let chip = SimulatedPwmChip::new(4);
    let bus = SimulatedMiscBus::new();
    let driver = PwmBuzzerDriver::new(leak_module(config), chip.clone(), bus.clone());
    (chip, bus, driver)
}

fn dt_device() -> PlatformDevice {
    PlatformDevice::new("buzzer@0")
        .unwrap()
        .with_compatible("pwm-buzzer")
        .unwrap()
        .with_pwms(1)
}

#[test]
fn probe_through_device_tree_binds_and_registers() {
    let (chip, bus, mut driver) = setup(BuzzerConfig::default());

    driver.probe(&dt_device()).unwrap();

    assert!(driver.module().is_bound());
    assert!(bus.is_registered("pwm-buzzer"));
    assert_eq!(bus.minor_of("pwm-buzzer"), driver.minor());
    assert_eq!(
        chip.events(),
        [PwmEvent::Requested {
            channel: 1,
            label: "buzzer@0".into(),
        }]
    );
}

#[test]
fn legacy_request_is_used_when_lookup_fails() {
    let (chip, bus, mut driver) = setup(BuzzerConfig::default());
    let pdev = PlatformDevice::new("pwm-buzzer")
        .unwrap()
        .with_platform_data(2);

    driver.probe(&pdev).unwrap();

    assert_eq!(
        chip.channel(2).unwrap().label.as_deref(),
        Some("pwm buzzer")
    );

    let fops = bus.find("pwm-buzzer").expect("node registered");
    assert_eq!(fops.unlocked_ioctl(183, 1000), 0);
    assert_eq!(fops.unlocked_ioctl(182, 0), 0);
    let state = chip.channel(2).unwrap();
    assert_eq!((state.duty_ns, state.period_ns), (500_000, 1_000_000));
    assert!(state.enabled);
}

#[test]
fn failed_acquisition_leaves_nothing_behind() {
    let (chip, bus, mut driver) = setup(BuzzerConfig::default());
    chip.fail_lookup(Errno::ENODEV);
    chip.fail_request(Errno::EPROBE_DEFER);

    let err = driver.probe(&dt_device()).unwrap_err();

    assert_eq!(err, BuzzerError::AcquisitionFailure(Errno::EPROBE_DEFER));
    assert_eq!(err.to_status(), -517);
    assert!(!driver.module().is_bound());
    assert!(bus.node_names().is_empty());
    assert_eq!(chip.requested_count(), 0);
    assert!(chip.events().is_empty());
}

#[test]
fn failed_registration_rolls_back_the_pwm() {
    let (chip, bus, mut driver) = setup(BuzzerConfig::default());
    bus.fail_register(Errno::EBUSY);

    let err = driver.probe(&dt_device()).unwrap_err();

    assert_eq!(err, BuzzerError::RegistrationFailure(Errno::EBUSY));
    assert!(!driver.module().is_bound());
    assert_eq!(driver.minor(), None);
    assert_eq!(chip.requested_count(), 0);
    assert_eq!(
        chip.events(),
        [
            PwmEvent::Requested {
                channel: 1,
                label: "buzzer@0".into(),
            },
            PwmEvent::Freed { channel: 1 },
        ]
    );
    assert_eq!(driver.module().unlocked_ioctl(182, 0), -22);
}

#[test]
fn second_probe_is_rejected_while_bound() {
    let (chip, _bus, mut driver) = setup(BuzzerConfig::default());
    driver.probe(&dt_device()).unwrap();

    let other = PlatformDevice::new("pwm-buzzer")
        .unwrap()
        .with_platform_data(3);
    assert_eq!(
        driver.probe(&other),
        Err(BuzzerError::RegistrationFailure(Errno::EBUSY))
    );
    assert!(!chip.channel(3).unwrap().is_requested());
    assert!(chip.channel(1).unwrap().is_requested());
}

#[test]
fn remove_quiesces_before_release() {
    let (chip, bus, mut driver) = setup(BuzzerConfig::default());
    driver.probe(&dt_device()).unwrap();
    driver.module().ioctl(183, 4000).unwrap();
    driver.module().ioctl(182, 0).unwrap();
    chip.clear_events();

    driver.remove().unwrap();

    assert_eq!(
        chip.events(),
        [
            PwmEvent::Disabled { channel: 1 },
            PwmEvent::Freed { channel: 1 },
        ]
    );
    assert!(!driver.module().is_bound());
    assert!(!bus.is_registered("pwm-buzzer"));
    assert_eq!(driver.module().unlocked_ioctl(184, 0), -22);
    assert_eq!(driver.remove(), Err(BuzzerError::ResourceUnavailable));
}

#[test]
fn device_can_be_probed_again_after_remove() {
    let (chip, bus, mut driver) = setup(BuzzerConfig::default());
    driver.probe(&dt_device()).unwrap();
    driver.remove().unwrap();

    driver.probe(&dt_device()).unwrap();
    assert!(bus.is_registered("pwm-buzzer"));
    assert_eq!(chip.requested_count(), 1);
}

#[test]
fn suspend_resume_through_the_driver() {
    let (chip, _bus, mut driver) = setup(BuzzerConfig::default().with_restore_on_resume(true));
    driver.probe(&dt_device()).unwrap();
    driver.module().ioctl(183, 1000).unwrap();
    driver.module().ioctl(182, 0).unwrap();
    chip.clear_events();

    driver.suspend().unwrap();
    assert!(!chip.channel(1).unwrap().enabled);
    driver.resume().unwrap();
    let state = chip.channel(1).unwrap();
    assert!(state.enabled);
    assert_eq!((state.duty_ns, state.period_ns), (500_000, 1_000_000));
}

struct TestBoard;

impl BoardTrait for TestBoard {
    type PwmProvider = SimulatedPwmChip;

    type MiscRegistry = SimulatedMiscBus;

    fn init() -> BuzzerResult<BoardContext<Self>> {
        Ok(BoardContext {
            pwm: SimulatedPwmChip::new(1),
            misc: SimulatedMiscBus::new(),
            device: PlatformDevice::new("pwm-buzzer")?.with_pwms(0),
            config: BuzzerConfig::default(),
        })
    }
}

#[test]
fn main_task_replays_console_requests() {
    let ctx = TestBoard::init().unwrap();
    let chip = ctx.pwm.clone();
    let bus = ctx.misc.clone();
    let cell = leak_cell();

    let script = [
        "open",
        "# a440 for a moment",
        "freq 440",
        "182",
        "bogus",
        "183 9000",
        "release",
        "quit",
        "184",
    ];
    main_task::<TestBoard, _>(cell, ctx, script).unwrap();

    assert_eq!(
        chip.events(),
        [
            PwmEvent::Requested {
                channel: 0,
                label: "pwm-buzzer".into(),
            },
            PwmEvent::Configured {
                channel: 0,
                duty_ns: 1_136_363,
                period_ns: 2_272_727,
            },
            PwmEvent::Enabled { channel: 0 },
            PwmEvent::Disabled { channel: 0 },
            PwmEvent::Freed { channel: 0 },
        ]
    );
    assert!(bus.node_names().is_empty());
    assert_eq!(chip.requested_count(), 0);
}

#[test]
fn main_task_builds_the_module_from_board_config() {
    let mut ctx = TestBoard::init().unwrap();
    ctx.config = BuzzerConfig::default()
        .with_node_name("beeper")
        .unwrap()
        .with_restore_on_resume(true);
    let chip = ctx.pwm.clone();
    let cell = leak_cell();

    // 只有按配置里的节点名注册才能收到这些请求
    let script = ["freq 1000", "enable", "suspend"];
    main_task::<TestBoard, _>(cell, ctx, script).unwrap();

    assert_eq!(
        chip.events()[1..],
        [
            PwmEvent::Configured {
                channel: 0,
                duty_ns: 500_000,
                period_ns: 1_000_000,
            },
            PwmEvent::Enabled { channel: 0 },
            PwmEvent::Disabled { channel: 0 },
            PwmEvent::Disabled { channel: 0 },
            PwmEvent::Freed { channel: 0 },
        ]
    );
}

#[test]
fn main_task_runs_once_per_module_cell() {
    let cell = leak_cell();
    main_task::<TestBoard, _>(cell, TestBoard::init().unwrap(), ["quit"]).unwrap();

    let ctx = TestBoard::init().unwrap();
    let chip = ctx.pwm.clone();
    assert_eq!(
        main_task::<TestBoard, _>(cell, ctx, ["enable"]),
        Err(BuzzerError::RegistrationFailure(Errno::EBUSY))
    );
    assert!(chip.events().is_empty());
}

#[test]
fn main_task_refuses_foreign_devices() {
    let mut ctx = TestBoard::init().unwrap();
    ctx.device = PlatformDevice::new("pwm-beeper").unwrap().with_pwms(0);
    let chip = ctx.pwm.clone();

    let result = main_task::<TestBoard, _>(leak_cell(), ctx, ["enable"]);

    assert_eq!(result, Err(BuzzerError::NotMatched));
    assert!(chip.events().is_empty());
}
