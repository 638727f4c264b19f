//! Persisted engine configuration: the fixed-layout `engine.config` record.
//!
//! Grounded on `original_source/.../EngineConfig.{hpp,cpp}`:
//! `GetEngineConfigData`'s identity-magic / version-number / size checks,
//! translated from raw pointer casts into `byteorder::LittleEndian` reads.
//! `EngineConfig::default()` stands in for the source's `DEFAULT_CONFIG_FILE`
//! — load falls back to it on anything other than `Success`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub const CONFIG_FILE_NAME: &str = "engine.config";
const CONFIG_IDENTITY: u32 = 0x4247_4345; // "ECGB", matching the source's fixed identity constant in spirit.
const CONFIG_NUMBER: u32 = 1;
const RECORD_SIZE: usize = 25; // 4*6 + 1, per spec §6.1's byte layout.

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub window_size_x: u32,
    pub window_size_y: u32,
    pub window_offset_x: u32,
    pub window_offset_y: u32,
    pub full_screen: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            window_size_x: 1280,
            window_size_y: 720,
            window_offset_x: 0,
            window_offset_y: 0,
            full_screen: false,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigLoadStatus {
    Success,
    NotFound,
    ReadFailed,
    WrongMagic,
    OutOfDate,
}

impl EngineConfig {
    fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        {
            let mut w: &mut [u8] = &mut buf;
            w.write_u32::<LittleEndian>(CONFIG_IDENTITY).unwrap();
            w.write_u32::<LittleEndian>(CONFIG_NUMBER).unwrap();
            w.write_u32::<LittleEndian>(self.window_size_x).unwrap();
            w.write_u32::<LittleEndian>(self.window_size_y).unwrap();
            w.write_u32::<LittleEndian>(self.window_offset_x).unwrap();
            w.write_u32::<LittleEndian>(self.window_offset_y).unwrap();
            w.write_u8(self.full_screen as u8).unwrap();
        }
        buf
    }

    fn decode(bytes: &[u8]) -> io::Result<(u32, u32, EngineConfig)> {
        let mut r = bytes;
        let identity = r.read_u32::<LittleEndian>()?;
        let version = r.read_u32::<LittleEndian>()?;
        let config = EngineConfig {
            window_size_x: r.read_u32::<LittleEndian>()?,
            window_size_y: r.read_u32::<LittleEndian>()?,
            window_offset_x: r.read_u32::<LittleEndian>()?,
            window_offset_y: r.read_u32::<LittleEndian>()?,
            full_screen: r.read_u8()? != 0,
        };
        Ok((identity, version, config))
    }
}

/// Reads `engine.config` from `dir`. On anything other than `Success` the
/// caller should use `EngineConfig::default()`, mirroring
/// `GetEngineConfigData`'s "a_out_config becomes DEFAULT_CONFIG_FILE"
/// contract (the default is returned as part of the tuple so callers never
/// have to remember to substitute it themselves).
pub fn load(dir: &Path) -> (ConfigLoadStatus, EngineConfig) {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return (ConfigLoadStatus::NotFound, EngineConfig::default());
    }

    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(_) => return (ConfigLoadStatus::ReadFailed, EngineConfig::default()),
    };
    if bytes.len() > RECORD_SIZE {
        return (ConfigLoadStatus::ReadFailed, EngineConfig::default());
    }

    let (identity, version, config) = match EngineConfig::decode(&bytes) {
        Ok(parsed) => parsed,
        Err(_) => return (ConfigLoadStatus::ReadFailed, EngineConfig::default()),
    };

    if identity != CONFIG_IDENTITY {
        return (ConfigLoadStatus::WrongMagic, EngineConfig::default());
    }
    if version != CONFIG_NUMBER {
        return (ConfigLoadStatus::OutOfDate, EngineConfig::default());
    }

    (ConfigLoadStatus::Success, config)
}

/// Writes `engine.config` to `dir`, truncating/creating the file.
pub fn write(dir: &Path, config: &EngineConfig) -> io::Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    let mut file = fs::File::create(path)?;
    file.write_all(&config.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_write_and_load() {
        let dir = std::env::temp_dir().join(format!("forge-engine-config-test-{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        let config = EngineConfig {
            window_size_x: 1920,
            window_size_y: 1080,
            window_offset_x: 10,
            window_offset_y: 20,
            full_screen: true,
        };
        write(&dir, &config).unwrap();
        let (status, loaded) = load(&dir);
        assert_eq!(status, ConfigLoadStatus::Success);
        assert_eq!(loaded, config);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_reports_not_found_with_defaults() {
        let dir = std::env::temp_dir().join("forge-engine-config-missing");
        fs::create_dir_all(&dir).unwrap();
        fs::remove_file(dir.join(CONFIG_FILE_NAME)).ok();
        let (status, config) = load(&dir);
        assert_eq!(status, ConfigLoadStatus::NotFound);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = std::env::temp_dir().join(format!("forge-engine-config-badmagic-{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), [0xFFu8; RECORD_SIZE]).unwrap();
        let (status, _) = load(&dir);
        assert_eq!(status, ConfigLoadStatus::WrongMagic);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn out_of_date_version_is_rejected() {
        let dir = std::env::temp_dir().join(format!("forge-engine-config-outofdate-{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        let mut buf = EngineConfig::default().encode();
        buf[4..8].copy_from_slice(&99u32.to_le_bytes());
        fs::write(dir.join(CONFIG_FILE_NAME), buf).unwrap();
        let (status, _) = load(&dir);
        assert_eq!(status, ConfigLoadStatus::OutOfDate);
        fs::remove_dir_all(&dir).ok();
    }
}
