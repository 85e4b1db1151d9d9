//! Bounded numeric fields adjusted with the Up/Down buttons.
//!
//! A single press moves by one. Holding the button auto-repeats with a coarser "big step"
//! that snaps to multiples of the step, so long ranges (years, brightness) are quick to
//! cross and still land on round values.

/// How a value is being changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
    /// Up button held down (auto-repeat).
    RepeatedUp,
    /// Down button held down (auto-repeat).
    RepeatedDown,
}

impl Direction {
    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up | Self::RepeatedUp)
    }
}

/// Range and step of one editable field: values are `floor..floor + modulus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSpec {
    pub floor: i32,
    pub modulus: i32,
    pub big_step: i32,
}

impl FieldSpec {
    /// Full year, 2000..=2199.
    pub const YEAR: Self = Self::new(2000, 200, 10);
    /// 1-based month; big steps land on quarter starts.
    pub const MONTH: Self = Self::new(1, 12, 3);
    pub const HOUR: Self = Self::new(0, 24, 6);
    pub const MINUTE: Self = Self::new(0, 60, 10);
    pub const SECOND: Self = Self::new(0, 60, 10);
    /// Manual brightness in percent, 0..=100.
    pub const MANUAL_BRIGHTNESS: Self = Self::new(0, 101, 10);
    /// Automatic brightness calibration points, -100..=100.
    pub const BRIGHTNESS_POINT: Self = Self::new(-100, 201, 10);

    #[must_use]
    pub const fn new(floor: i32, modulus: i32, big_step: i32) -> Self {
        Self {
            floor,
            modulus,
            big_step,
        }
    }

    /// Day of month, 1-based, for a month of `days_in_month` days.
    #[must_use]
    pub const fn day(days_in_month: u8) -> Self {
        Self::new(1, days_in_month as i32, 7)
    }
}

/// Adjust `value` within `spec`, wrapping at both ends.
///
/// Repeated moves snap: up goes to the next multiple of the big step, down to the previous
/// one (multiples are counted from the floor).
#[must_use]
pub const fn adjust_field(direction: Direction, spec: FieldSpec, value: i32) -> i32 {
    let modulus = if spec.modulus > 0 { spec.modulus } else { 1 };
    let big_step = if spec.big_step > 0 { spec.big_step } else { 1 };
    let offset = (value - spec.floor).rem_euclid(modulus);
    let adjusted = match direction {
        Direction::Up => (offset + 1) % modulus,
        Direction::Down => (offset + modulus - 1) % modulus,
        Direction::RepeatedUp => (offset + big_step) % modulus / big_step * big_step,
        Direction::RepeatedDown => (offset + modulus - 1) % modulus / big_step * big_step,
    };
    adjusted + spec.floor
}

/// [`adjust_field`] for a `u8` field with a non-negative floor.
#[must_use]
pub fn adjust_u8(direction: Direction, spec: FieldSpec, value: u8) -> u8 {
    u8::try_from(adjust_field(direction, spec, i32::from(value))).unwrap_or(value)
}

/// Step through the variants of an enum-like field, wrapping at both ends.
///
/// Repeats behave like single steps. A `current` not found in `values` restarts at the first.
#[must_use]
pub fn cycle<T: Copy + PartialEq>(values: &[T], current: T, direction: Direction) -> T {
    let Some(position) = values.iter().position(|value| *value == current) else {
        return values.first().copied().unwrap_or(current);
    };
    let len = values.len();
    let next = if direction.is_up() {
        (position + 1) % len
    } else {
        (position + len - 1) % len
    };
    values.get(next).copied().unwrap_or(current)
}
