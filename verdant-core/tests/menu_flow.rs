//! End-to-end menu flows: encoder levels in, screens and settings out

use std::cell::{Cell, RefCell};

use verdant_core::config::{Date, SensorCalibration, Settings};
use verdant_core::input::{
    DecodedEvent, EventDispatcher, EventListener, QuadratureLine, RotaryDecoder,
};
use verdant_core::menu::{IdleMonitor, MenuError, MenuMode, MenuStateMachine};
use verdant_core::traits::{
    Calibrator, CharacterDisplay, Clock, DisplayError, Frame, MoistureSensor, SensorError,
    SettingValue, SettingsStore, StorageError,
};

const IDLE_MS: u64 = 5_000;
const BASE_THRESHOLD: i32 = 40;

#[derive(Default)]
struct ScreenLog {
    frames: Vec<Frame>,
}

impl ScreenLog {
    fn last(&self) -> (&str, &str) {
        let frame = self.frames.last().expect("nothing rendered");
        (frame.line1.as_str(), frame.line2.as_str())
    }
}

impl CharacterDisplay for ScreenLog {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.frames.push(Frame::new(line1, line2));
        Ok(())
    }
}

struct MemoryStore {
    settings: Settings,
    writes: Vec<SettingValue>,
}

impl SettingsStore for MemoryStore {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn set(&mut self, value: SettingValue) -> Result<(), StorageError> {
        self.settings.apply(value.clone());
        self.writes.push(value);
        Ok(())
    }
}

struct SharedClock<'a> {
    now: &'a Cell<u64>,
}

impl Clock for SharedClock<'_> {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn today(&self) -> Date {
        Date::new(2024, 5, 10)
    }
}

#[derive(Default)]
struct CountingCalibrator {
    runs: u32,
}

impl Calibrator for CountingCalibrator {
    fn begin(&mut self) -> Result<(), SensorError> {
        self.runs += 1;
        Ok(())
    }
}

struct FixedSensor(i32);

impl MoistureSensor for FixedSensor {
    fn read_percent(&mut self) -> Result<i32, SensorError> {
        Ok(self.0)
    }
}

type Menu<'a> = MenuStateMachine<ScreenLog, MemoryStore, SharedClock<'a>, CountingCalibrator>;

fn new_menu(now: &Cell<u64>) -> Menu<'_> {
    let store = MemoryStore {
        settings: Settings::new("Fern", Date::new(2024, 5, 1), BASE_THRESHOLD),
        writes: Vec::new(),
    };
    MenuStateMachine::new(
        ScreenLog::default(),
        store,
        SharedClock { now },
        CountingCalibrator::default(),
    )
    .unwrap()
}

/// Walk one detent clockwise: 11 -> 10 -> 00 -> 01 -> 11
fn clockwise_detent(decoder: &mut RotaryDecoder) -> Vec<DecodedEvent> {
    [(true, false), (false, false), (false, true), (true, true)]
        .into_iter()
        .filter_map(|(dt, clk)| decoder.on_pin_change(QuadratureLine::Clock, dt, clk))
        .collect()
}

/// Walk one detent counter-clockwise: 11 -> 01 -> 00 -> 10 -> 11
fn counter_clockwise_detent(decoder: &mut RotaryDecoder) -> Vec<DecodedEvent> {
    [(false, true), (false, false), (true, false), (true, true)]
        .into_iter()
        .filter_map(|(dt, clk)| decoder.on_pin_change(QuadratureLine::Data, dt, clk))
        .collect()
}

fn click(decoder: &mut RotaryDecoder) -> Vec<DecodedEvent> {
    [false, true]
        .into_iter()
        .filter_map(|level| decoder.on_button_change(level))
        .collect()
}

#[test]
fn detents_decode_to_single_rotations() {
    let mut decoder = RotaryDecoder::new();
    assert_eq!(clockwise_detent(&mut decoder), vec![DecodedEvent::RotateClockwise]);
    assert_eq!(
        counter_clockwise_detent(&mut decoder),
        vec![DecodedEvent::RotateCounterClockwise]
    );
    assert_eq!(
        click(&mut decoder),
        vec![DecodedEvent::ButtonPress, DecodedEvent::ButtonRelease]
    );
}

#[test]
fn bounce_inside_detent_is_ignored() {
    let mut decoder = RotaryDecoder::new();
    let bouncy = [
        (true, false),
        (false, false),
        (true, false),
        (false, false),
        (false, true),
        (true, true),
    ];
    let events: Vec<_> = bouncy
        .into_iter()
        .filter_map(|(dt, clk)| decoder.on_pin_change(QuadratureLine::Clock, dt, clk))
        .collect();
    assert_eq!(events, vec![DecodedEvent::RotateClockwise]);
}

#[test]
fn set_threshold_from_encoder_levels() {
    let now = Cell::new(0);
    let menu = RefCell::new(new_menu(&now));

    let mut dispatcher: EventDispatcher<'_, MenuError, 2> = EventDispatcher::new();
    dispatcher.subscribe(&menu).unwrap();

    let mut decoder = RotaryDecoder::new();
    let deliver = |events: Vec<DecodedEvent>| {
        for event in events {
            dispatcher.publish(event).unwrap();
        }
    };

    deliver(clockwise_detent(&mut decoder));
    deliver(clockwise_detent(&mut decoder));
    assert_eq!(menu.borrow().cursor(), 2);
    assert_eq!(menu.borrow().display().last(), (">Set Moisture", " Calib Moisture"));

    deliver(click(&mut decoder));
    assert_eq!(menu.borrow().mode(), MenuMode::SetMoistureThreshold);
    assert_eq!(menu.borrow().pending_threshold(), BASE_THRESHOLD);

    for _ in 0..3 {
        deliver(clockwise_detent(&mut decoder));
    }
    assert_eq!(menu.borrow().pending_threshold(), BASE_THRESHOLD + 3);
    assert_eq!(menu.borrow().display().last(), ("Set Moisture", "   New: 43%"));
    assert!(menu.borrow().settings().writes.is_empty());

    deliver(click(&mut decoder));
    let menu = menu.borrow();
    assert_eq!(menu.mode(), MenuMode::Menu);
    assert_eq!(menu.cursor(), 0);
    assert_eq!(
        menu.settings().writes,
        vec![SettingValue::MoistureThreshold(BASE_THRESHOLD + 3)]
    );
    assert_eq!(menu.settings().settings().moisture_threshold, 43);
}

#[test]
fn leaving_other_modes_commits_nothing() {
    let now = Cell::new(0);
    let mut menu = new_menu(&now);

    menu.handle(DecodedEvent::ButtonPress).unwrap();
    assert_eq!(menu.mode(), MenuMode::ViewStartDate);
    menu.handle(DecodedEvent::RotateClockwise).unwrap();
    menu.handle(DecodedEvent::ButtonPress).unwrap();

    assert_eq!(menu.mode(), MenuMode::Menu);
    assert!(menu.settings().writes.is_empty());
}

#[test]
fn every_listener_sees_every_event() {
    struct Tally(Cell<u32>);

    impl EventListener for Tally {
        type Error = MenuError;

        fn on_event(&self, _event: DecodedEvent) -> Result<(), MenuError> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    let now = Cell::new(0);
    let tally = Tally(Cell::new(0));
    let menu = RefCell::new(new_menu(&now));

    let mut dispatcher: EventDispatcher<'_, MenuError, 2> = EventDispatcher::new();
    dispatcher.subscribe(&tally).unwrap();
    dispatcher.subscribe(&menu).unwrap();

    dispatcher.publish(DecodedEvent::RotateClockwise).unwrap();
    dispatcher.publish(DecodedEvent::RotateClockwise).unwrap();

    assert_eq!(tally.0.get(), 2);
    assert_eq!(menu.borrow().cursor(), 2);
}

#[test]
fn idle_check_keeps_refreshing_status() {
    let now = Cell::new(0);
    let mut menu = new_menu(&now);
    let idle = IdleMonitor::new(IDLE_MS);
    let mut sensor = FixedSensor(55);

    menu.handle(DecodedEvent::ButtonPress).unwrap();
    assert_eq!(menu.mode(), MenuMode::ViewStartDate);

    now.set(2_500);
    assert!(!idle.check(now.get(), &mut menu, &mut sensor).unwrap());

    now.set(5_000);
    assert!(idle.check(now.get(), &mut menu, &mut sensor).unwrap());
    assert_eq!(menu.display().last(), ("Fern: Day 9", "Moisture: 55%"));
    assert_eq!(menu.mode(), MenuMode::Menu);
    assert_eq!(menu.cursor(), 0);
    let rendered = menu.display().frames.len();

    now.set(7_500);
    assert!(idle.check(now.get(), &mut menu, &mut sensor).unwrap());
    assert_eq!(menu.display().frames.len(), rendered + 1);
    assert_eq!(menu.last_event_ms(), 0);
    assert!(menu.settings().writes.is_empty());
}

#[test]
fn status_counts_days_from_newly_set_start_date() {
    let now = Cell::new(0);
    let mut menu = new_menu(&now);
    let idle = IdleMonitor::new(IDLE_MS);
    let mut sensor = FixedSensor(55);

    menu.handle(DecodedEvent::RotateClockwise).unwrap();
    menu.handle(DecodedEvent::ButtonPress).unwrap();
    assert_eq!(menu.mode(), MenuMode::SetStartDate);

    now.set(IDLE_MS);
    assert!(idle.check(now.get(), &mut menu, &mut sensor).unwrap());
    assert_eq!(menu.display().last(), ("Fern: Day 0", "Moisture: 55%"));
}

#[test]
fn event_within_threshold_suppresses_idle() {
    let now = Cell::new(0);
    let mut menu = new_menu(&now);
    let idle = IdleMonitor::new(IDLE_MS);
    let mut sensor = FixedSensor(10);

    now.set(6_000);
    assert!(idle.check(now.get(), &mut menu, &mut sensor).unwrap());

    now.set(7_000);
    menu.handle(DecodedEvent::RotateClockwise).unwrap();

    now.set(8_500);
    assert!(!idle.check(now.get(), &mut menu, &mut sensor).unwrap());
    assert_eq!(menu.display().last(), (">Set Start Date", " Set Moisture"));

    now.set(12_000);
    assert!(idle.check(now.get(), &mut menu, &mut sensor).unwrap());
}

#[test]
fn calibration_owns_screen_until_done() {
    let now = Cell::new(0);
    let mut menu = new_menu(&now);
    let idle = IdleMonitor::new(IDLE_MS);
    let mut sensor = FixedSensor(0);

    for _ in 0..3 {
        menu.handle(DecodedEvent::RotateClockwise).unwrap();
    }
    menu.handle(DecodedEvent::ButtonPress).unwrap();
    assert!(menu.is_calibrating());
    assert_eq!(menu.calibrator().runs, 1);
    let rendered = menu.display().frames.len();

    now.set(60_000);
    assert!(!idle.check(now.get(), &mut menu, &mut sensor).unwrap());
    menu.handle(DecodedEvent::RotateClockwise).unwrap();
    assert_eq!(menu.display().frames.len(), rendered);

    now.set(61_000);
    menu.calibration_complete(SensorCalibration::new(20_000, 44_000))
        .unwrap();
    assert_eq!(
        menu.settings().settings().calibration,
        Some(SensorCalibration::new(20_000, 44_000))
    );

    now.set(63_000);
    assert!(!idle.check(now.get(), &mut menu, &mut sensor).unwrap());
    now.set(66_000);
    assert!(idle.check(now.get(), &mut menu, &mut sensor).unwrap());
}
