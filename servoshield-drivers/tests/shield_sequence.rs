//! End-to-end bus traffic of a gated shield at the factory addresses

use std::cell::RefCell;
use std::rc::Rc;

use servoshield_core::{BusAddresses, ChannelId, ShieldConfig};
use servoshield_drivers::{GatingPins, ServoShield};
use servoshield_hal::{DelayMs, I2cBus, OutputPin};

/// Everything observable on the board, in order
#[derive(Debug, Clone, PartialEq, Eq)]
enum Trace {
    Write(u8, Vec<u8>),
    Pin(&'static str, bool),
    Delay(u32),
}

type Shared = Rc<RefCell<Vec<Trace>>>;

struct Bus(Shared);

impl I2cBus for Bus {
    type Error = ();

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
        self.0.borrow_mut().push(Trace::Write(address, data.to_vec()));
        Ok(())
    }

    fn write_read(&mut self, _: u8, _: &[u8], read_buf: &mut [u8]) -> Result<(), ()> {
        read_buf.fill(0);
        Ok(())
    }
}

struct Pin(&'static str, Shared);

impl OutputPin for Pin {
    fn set_high(&mut self) {
        self.1.borrow_mut().push(Trace::Pin(self.0, true));
    }

    fn set_low(&mut self) {
        self.1.borrow_mut().push(Trace::Pin(self.0, false));
    }
}

struct Delay(Shared);

impl DelayMs for Delay {
    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Trace::Delay(ms));
    }
}

fn board() -> (ServoShield<Bus, Pin, Delay>, Shared) {
    let trace: Shared = Rc::new(RefCell::new(Vec::new()));
    let shield = ServoShield::new(
        Bus(trace.clone()),
        Delay(trace.clone()),
        ShieldConfig::new(BusAddresses::NO_JUMPERS_SET, true),
        GatingPins::new(Pin("sc1", trace.clone()), Pin("sc2", trace.clone())),
    );
    (shield, trace)
}

#[test]
fn initialize_then_center_first_servo() {
    let (mut shield, trace) = board();

    shield.initialize().unwrap();
    shield.enable_pwm_outputs().unwrap();
    shield
        .set_servo_pulse_duration(ChannelId::Servo1, 1500)
        .unwrap();

    let expected = vec![
        // Outputs muted before any register write
        Trace::Pin("sc1", true),
        Trace::Pin("sc2", true),
        // Sleep, prescale, wake - chip A before chip B at every step
        Trace::Write(0x40, vec![0x00, 0x11]),
        Trace::Write(0x60, vec![0x00, 0x11]),
        Trace::Write(0x40, vec![0xFE, 121]),
        Trace::Write(0x60, vec![0xFE, 121]),
        Trace::Write(0x40, vec![0x00, 0x21]),
        Trace::Write(0x60, vec![0x00, 0x21]),
        Trace::Delay(100),
        Trace::Pin("sc1", false),
        Trace::Pin("sc2", false),
        // 1500 us = 307 ticks = 0x133 into OFF_L/OFF_H of channel 0
        Trace::Write(0x40, vec![0x0A, 0x33, 0x01]),
    ];
    assert_eq!(*trace.borrow(), expected);
}

#[test]
fn sweep_touches_every_channel_once() {
    let (mut shield, trace) = board();
    shield.initialize().unwrap();
    trace.borrow_mut().clear();

    for channel in ChannelId::ALL {
        shield.set_servo_pulse_duration(channel, 1000).unwrap();
    }

    let trace = trace.borrow();
    assert_eq!(trace.len(), 32);
    for (i, entry) in trace.iter().enumerate() {
        let (address, slot) = if i < 16 { (0x40, i) } else { (0x60, i - 16) };
        let off_l = 0x08 + 4 * slot as u8 + 2;
        // 1000 us = 204 ticks = 0x0CC
        assert_eq!(*entry, Trace::Write(address, vec![off_l, 0xCC, 0x00]));
    }
}

#[test]
fn disable_mutes_without_bus_traffic() {
    let (mut shield, trace) = board();
    shield.initialize().unwrap();
    trace.borrow_mut().clear();

    shield.disable_pwm_outputs().unwrap();

    assert_eq!(
        *trace.borrow(),
        vec![Trace::Pin("sc1", true), Trace::Pin("sc2", true)]
    );
}
