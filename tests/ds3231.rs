//! Host-level tests for the DS3231 driver against a simulated register file.

use std::{cell::RefCell, rc::Rc};

use clock_kit::{
    Error,
    broken_down_time::BrokenDownTime,
    ds3231::{DS3231_ADDRESS, Ds3231},
    rtc::HardwareClock,
};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use time::Weekday;

#[derive(Debug, Default)]
struct ChipState {
    registers: [u8; 0x13],
    pointer: usize,
    transactions: usize,
    broken: bool,
}

/// A DS3231 register file behind an I²C bus. Writes set the register pointer with their
/// first byte; reads continue from it. Clones share the same chip.
#[derive(Clone, Debug, Default)]
struct SimulatedChip(Rc<RefCell<ChipState>>);

impl SimulatedChip {
    fn with_registers(values: &[(usize, u8)]) -> Self {
        let chip = Self::default();
        for (register, value) in values {
            chip.set(*register, *value);
        }
        chip
    }

    fn set(&self, register: usize, value: u8) {
        self.0.borrow_mut().registers[register] = value;
    }

    fn registers(&self) -> [u8; 0x13] {
        self.0.borrow().registers
    }

    fn transactions(&self) -> usize {
        self.0.borrow().transactions
    }

    fn break_bus(&self) {
        self.0.borrow_mut().broken = true;
    }
}

impl ErrorType for SimulatedChip {
    type Error = ErrorKind;
}

impl I2c for SimulatedChip {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        if chip.broken || address != DS3231_ADDRESS {
            return Err(ErrorKind::Other);
        }
        chip.transactions += 1;
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((pointer, data)) = bytes.split_first() else {
                        continue;
                    };
                    chip.pointer = usize::from(*pointer);
                    for byte in data {
                        let pointer = chip.pointer;
                        chip.registers[pointer] = *byte;
                        chip.pointer += 1;
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = chip.registers[chip.pointer];
                        chip.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

fn date_time(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> BrokenDownTime {
    BrokenDownTime::new(year, month, day, hour, minute, second).expect("valid calendar time")
}

#[test]
fn reads_bcd_registers_and_derives_the_weekday() {
    let chip = SimulatedChip::with_registers(&[
        (0x00, 0x45),
        (0x01, 0x30),
        (0x02, 0x13),
        (0x03, 0x01), // stale weekday, ignored
        (0x04, 0x06),
        (0x05, 0x03),
        (0x06, 0x24),
    ]);
    let mut rtc = Ds3231::new(chip);
    let time = rtc.read().expect("read must succeed");
    assert_eq!(time, date_time(2024, 3, 6, 13, 30, 45));
    assert_eq!(time.weekday, Weekday::Wednesday);
}

#[test]
fn writes_bcd_registers_with_weekday_and_century() {
    let chip = SimulatedChip::default();
    let mut rtc = Ds3231::new(chip.clone());
    rtc.write(&date_time(2105, 12, 31, 23, 59, 58))
        .expect("write must succeed");
    // 2105-12-31 is a Thursday, day 5 counting from Sunday.
    assert_eq!(
        chip.registers()[..7],
        [0x58, 0x59, 0x23, 0x05, 0x31, 0x92, 0x05]
    );
    assert_eq!(rtc.read(), Ok(date_time(2105, 12, 31, 23, 59, 58)));
}

#[test]
fn out_of_range_registers_are_clamped() {
    let chip = SimulatedChip::with_registers(&[(0x00, 0x59), (0x04, 0x00), (0x05, 0x01)]);
    let mut rtc = Ds3231::new(chip);
    assert_eq!(rtc.read(), Ok(date_time(2000, 1, 1, 0, 0, 59)));
}

#[test]
fn temperature_combines_whole_and_quarter_degrees() {
    let chip = SimulatedChip::with_registers(&[(0x11, 25), (0x12, 0x40)]);
    let mut rtc = Ds3231::new(chip);
    assert_eq!(rtc.temperature(), Some(25.25));
}

#[test]
fn temperature_below_zero_is_twos_complement() {
    let chip = SimulatedChip::with_registers(&[(0x11, 0xF6), (0x12, 0x80)]);
    let mut rtc = Ds3231::new(chip);
    assert_eq!(rtc.temperature(), Some(-9.5));
}

#[test]
fn temperature_is_only_sampled_after_being_asked_for() {
    let chip = SimulatedChip::with_registers(&[(0x11, 20)]);
    let mut rtc = Ds3231::new(chip.clone());
    assert_eq!(chip.transactions(), 1);

    rtc.sample_temperature();
    assert_eq!(chip.transactions(), 1);

    let _ = rtc.temperature();
    rtc.sample_temperature();
    rtc.sample_temperature();
    assert_eq!(chip.transactions(), 2);
}

#[test]
fn temperature_samples_are_smoothed() {
    let chip = SimulatedChip::with_registers(&[(0x11, 20)]);
    let mut rtc = Ds3231::new(chip.clone());

    chip.set(0x11, 52);
    let _ = rtc.temperature();
    rtc.sample_temperature();
    // One sample out of a window of 32 moves the average by a 32nd of the jump.
    assert_eq!(rtc.temperature(), Some(21.0));
}

#[test]
fn bus_failures_surface_as_errors() {
    let chip = SimulatedChip::default();
    chip.break_bus();
    let mut rtc = Ds3231::new(chip);
    assert_eq!(rtc.read(), Err(Error::HardwareClockBus));
    assert_eq!(
        rtc.write(&date_time(2024, 1, 1, 0, 0, 0)),
        Err(Error::HardwareClockBus)
    );
    assert_eq!(rtc.temperature(), Some(0.0));
}
