//! Portable keyboard key enum and scan-code translation table.
//!
//! Grounded on `original_source/.../OS/HID.h`'s `KEYBOARD_KEY_D` X-macro: the
//! same name/scan-code pairs are declared once through a `macro_rules!`
//! table so the enum and its string form cannot drift apart, mirroring the
//! C++ `#define ... FUNCT(name, value)` pattern with Rust macro matching.

macro_rules! keyboard_key_table {
    ($apply:ident) => {
        $apply! {
            NoKey = 0x00,
            Escape = 0x01,
            Key1 = 0x02,
            Key2 = 0x03,
            Key3 = 0x04,
            Key4 = 0x05,
            Key5 = 0x06,
            Key6 = 0x07,
            Key7 = 0x08,
            Key8 = 0x09,
            Key9 = 0x0A,
            Key0 = 0x0B,
            Minus = 0x0C,
            Equals = 0x0D,
            Backspace = 0x0E,
            Tab = 0x0F,
            Q = 0x10,
            W = 0x11,
            E = 0x12,
            R = 0x13,
            T = 0x14,
            Y = 0x15,
            U = 0x16,
            I = 0x17,
            O = 0x18,
            P = 0x19,
            BracketLeft = 0x1A,
            BracketRight = 0x1B,
            Return = 0x1C,
            ControlLeft = 0x1D,
            A = 0x1E,
            S = 0x1F,
            D = 0x20,
            F = 0x21,
            G = 0x22,
            H = 0x23,
            J = 0x24,
            K = 0x25,
            L = 0x26,
            Semicolon = 0x27,
            Apostrophe = 0x28,
            Grave = 0x29,
            ShiftLeft = 0x2A,
            Backslash = 0x2B,
            Z = 0x2C,
            X = 0x2D,
            C = 0x2E,
            V = 0x2F,
            B = 0x30,
            N = 0x31,
            M = 0x32,
            Comma = 0x33,
            Period = 0x34,
            Slash = 0x35,
            ShiftRight = 0x36,
            NumpadMultiply = 0x37,
            AltLeft = 0x38,
            SpaceBar = 0x39,
            CapsLock = 0x3A,
        }
    };
}

macro_rules! declare_keyboard_key {
    ($($name:ident = $value:expr,)*) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        #[repr(u32)]
        pub enum KeyboardKey {
            $($name = $value,)*
        }

        impl KeyboardKey {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(KeyboardKey::$name => stringify!($name),)*
                }
            }

            pub fn from_scan_code(code: u32) -> Option<KeyboardKey> {
                match code {
                    $($value => Some(KeyboardKey::$name),)*
                    _ => None,
                }
            }
        }
    };
}

keyboard_key_table!(declare_keyboard_key);

const SCAN_CODE_TABLE_SIZE: usize = 256;

/// Static 256-entry lookup from a raw OS scan code to the portable key enum,
/// built once at first use. Entries past `0x3A` are `NoKey`, matching the
/// source comment that only a prefix of the real translation table is wired
/// up so far.
pub fn scan_code_table() -> &'static [Option<KeyboardKey>; SCAN_CODE_TABLE_SIZE] {
    static TABLE: std::sync::OnceLock<[Option<KeyboardKey>; SCAN_CODE_TABLE_SIZE]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [None; SCAN_CODE_TABLE_SIZE];
        for (code, slot) in table.iter_mut().enumerate() {
            *slot = KeyboardKey::from_scan_code(code as u32);
        }
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trips_known_codes() {
        let table = scan_code_table();
        assert_eq!(table[0x1E], Some(KeyboardKey::A));
        assert_eq!(table[0x39], Some(KeyboardKey::SpaceBar));
    }

    #[test]
    fn unmapped_code_is_none() {
        let table = scan_code_table();
        assert_eq!(table[0xFF], None);
    }

    #[test]
    fn as_str_matches_enum_name() {
        assert_eq!(KeyboardKey::Escape.as_str(), "Escape");
    }
}
