use static_assertions as sa;

use super::{MATRIX_COLS, MATRIX_ROWS, NLEDS};
use crate::keyboard::actions::Key;

/// Marks matrix positions without a key (and so without an LED)
pub const NO_LED: u8 = u8::MAX;

/// Matrix coordinates (row, col) of all keys in physical order
///
/// Keys are listed left to right, top to bottom, exactly as in the `iso_110` layout.
/// The RGB matrix is routed in the same order, so the index in this list is also
/// the LED number of the key.
#[rustfmt::skip]
pub const KEY_POSITIONS: [(u8, u8); NLEDS] = [
    // Esc, F-row, knob, print/scroll/pause, 4 extra keys
    (0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8), (0, 9), (0, 10),
    (0, 11), (0, 12), (0, 13), (0, 14), (0, 15), (0, 16), (0, 17), (0, 18), (0, 19), (0, 20),
    // Number row, Ins/Home/PgUp, numpad top
    (1, 0), (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7), (1, 8), (1, 9), (1, 10),
    (1, 11), (1, 12), (1, 13), (1, 14), (1, 15), (1, 16), (1, 17), (1, 18), (1, 19), (1, 20),
    // Tab row (ISO Enter lives in the row below), Del/End/PgDn, numpad 7-9
    (2, 0), (2, 1), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7), (2, 8), (2, 9), (2, 10),
    (2, 11), (2, 12), (2, 14), (2, 15), (2, 16), (2, 17), (2, 18), (2, 19),
    // Caps row, Enter, numpad 4-6 and plus
    (3, 0), (3, 1), (3, 2), (3, 3), (3, 4), (3, 5), (3, 6), (3, 7), (3, 8), (3, 9), (3, 10),
    (3, 11), (3, 12), (3, 13), (3, 17), (3, 18), (3, 19), (3, 20),
    // Shift row with ISO backslash, Up, numpad 1-3
    (4, 0), (4, 1), (4, 2), (4, 3), (4, 4), (4, 5), (4, 6), (4, 7), (4, 8), (4, 9), (4, 10),
    (4, 11), (4, 13), (4, 15), (4, 17), (4, 18), (4, 19),
    // Bottom row, arrows, numpad 0/dot/enter
    (5, 0), (5, 1), (5, 2), (5, 6), (5, 10), (5, 11), (5, 12), (5, 13), (5, 14), (5, 15), (5, 16),
    (5, 18), (5, 19), (5, 20),
];

const fn positions_valid(positions: &[(u8, u8); NLEDS]) -> bool {
    let mut i = 0;
    while i < NLEDS {
        let (row, col) = positions[i];
        if row as usize >= MATRIX_ROWS || col as usize >= MATRIX_COLS {
            return false;
        }
        let mut j = i + 1;
        while j < NLEDS {
            if positions[j].0 == row && positions[j].1 == col {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

sa::const_assert!(positions_valid(&KEY_POSITIONS));
sa::const_assert!(NLEDS < NO_LED as usize);

/// Place keys given in physical order at their matrix positions
///
/// Matrix positions that have no physical key are filled with [`Key::NoOp`].
/// Taking a fixed-size array makes a layer with a wrong number of keys a build error.
pub const fn iso_110(keys: [Key; NLEDS]) -> [[Key; MATRIX_COLS]; MATRIX_ROWS] {
    let mut matrix = [[Key::NoOp; MATRIX_COLS]; MATRIX_ROWS];
    let mut i = 0;
    while i < NLEDS {
        let (row, col) = KEY_POSITIONS[i];
        matrix[row as usize][col as usize] = keys[i];
        i += 1;
    }
    matrix
}

const fn led_map() -> [[u8; MATRIX_COLS]; MATRIX_ROWS] {
    let mut map = [[NO_LED; MATRIX_COLS]; MATRIX_ROWS];
    let mut i = 0;
    while i < NLEDS {
        let (row, col) = KEY_POSITIONS[i];
        map[row as usize][col as usize] = i as u8;
        i += 1;
    }
    map
}

/// LED number for each matrix position, [`NO_LED`] where there is no key
pub const LED_MAP: [[u8; MATRIX_COLS]; MATRIX_ROWS] = led_map();

/// Get RGB LED number of the key at given matrix position
pub const fn led_index(row: u8, col: u8) -> Option<u8> {
    if row as usize >= MATRIX_ROWS || col as usize >= MATRIX_COLS {
        return None;
    }
    match LED_MAP[row as usize][col as usize] {
        NO_LED => None,
        led => Some(led),
    }
}

/// Get matrix position of given RGB LED
pub const fn led_coords(led: u8) -> Option<(u8, u8)> {
    if led as usize >= NLEDS {
        None
    } else {
        Some(KEY_POSITIONS[led as usize])
    }
}
