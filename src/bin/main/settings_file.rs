use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use sylabik_core::{
    content::LearningMode,
    settings::{PersistedSettings, SettingsStore},
};

const SETTINGS_MAGIC: u32 = 0x314B_5953; // "SYK1"
const SETTINGS_VERSION: u8 = 1;
const SETTINGS_RECORD_LEN: usize = 16;
const CHECKSUM_OFFSET: usize = SETTINGS_RECORD_LEN - 4;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SettingsFileError {
    Io(ErrorKind),
    Corrupted,
}

/// Settings record kept in a small file next to the working directory.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    type Error = SettingsFileError;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SettingsFileError::Io(err.kind())),
        };
        decode_record(&bytes)
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        let buf = encode_record(settings);

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        fs::write(&staging, buf).map_err(|err| SettingsFileError::Io(err.kind()))?;
        fs::rename(&staging, &self.path).map_err(|err| SettingsFileError::Io(err.kind()))
    }
}

fn encode_record(settings: &PersistedSettings) -> [u8; SETTINGS_RECORD_LEN] {
    let mut buf = [0u8; SETTINGS_RECORD_LEN];
    buf[0..4].copy_from_slice(&SETTINGS_MAGIC.to_le_bytes());
    buf[4] = SETTINGS_VERSION;
    buf[5] = settings.mode.as_u8();
    buf[6..8].copy_from_slice(&settings.set_id.to_le_bytes());
    buf[8..10].copy_from_slice(&settings.resume_page.to_le_bytes());
    let checksum = checksum32(&buf[..CHECKSUM_OFFSET]);
    buf[CHECKSUM_OFFSET..].copy_from_slice(&checksum.to_le_bytes());
    buf
}

/// Unknown magic or version reads as "nothing saved"; a damaged record of the
/// current version is an error.
fn decode_record(buf: &[u8]) -> Result<Option<PersistedSettings>, SettingsFileError> {
    if buf.len() < 5 {
        return Ok(None);
    }

    let magic = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if magic != SETTINGS_MAGIC || buf[4] != SETTINGS_VERSION {
        return Ok(None);
    }
    if buf.len() != SETTINGS_RECORD_LEN {
        return Err(SettingsFileError::Corrupted);
    }

    let expected_checksum = u32::from_le_bytes([
        buf[CHECKSUM_OFFSET],
        buf[CHECKSUM_OFFSET + 1],
        buf[CHECKSUM_OFFSET + 2],
        buf[CHECKSUM_OFFSET + 3],
    ]);
    if checksum32(&buf[..CHECKSUM_OFFSET]) != expected_checksum {
        return Err(SettingsFileError::Corrupted);
    }

    let mode = LearningMode::from_u8(buf[5]).ok_or(SettingsFileError::Corrupted)?;
    Ok(Some(PersistedSettings {
        mode,
        set_id: u16::from_le_bytes([buf[6], buf[7]]),
        resume_page: u16::from_le_bytes([buf[8], buf[9]]),
    }))
}

fn checksum32(bytes: &[u8]) -> u32 {
    let mut hash = 0x811C9DC5u32;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sylabik-{}-{}.settings", std::process::id(), name))
    }

    const SAVED: PersistedSettings = PersistedSettings {
        mode: LearningMode::BookletDiscovery,
        set_id: 5,
        resume_page: 2,
    };

    #[test]
    fn missing_file_loads_as_nothing_saved() {
        let mut store = FileSettingsStore::new(scratch_path("missing"));
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn saved_settings_load_back() {
        let path = scratch_path("saved");
        let mut store = FileSettingsStore::new(&path);
        store.save(&SAVED).unwrap();

        let mut reopened = FileSettingsStore::new(&path);
        assert_eq!(reopened.load(), Ok(Some(SAVED)));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn flipped_byte_is_corrupted() {
        let mut buf = encode_record(&SAVED);
        buf[8] ^= 0x01;
        assert_eq!(decode_record(&buf), Err(SettingsFileError::Corrupted));
    }

    #[test]
    fn unknown_mode_byte_is_corrupted() {
        let mut buf = encode_record(&SAVED);
        buf[5] = 9;
        let checksum = checksum32(&buf[..CHECKSUM_OFFSET]);
        buf[CHECKSUM_OFFSET..].copy_from_slice(&checksum.to_le_bytes());
        assert_eq!(decode_record(&buf), Err(SettingsFileError::Corrupted));
    }

    #[test]
    fn foreign_or_truncated_files() {
        assert_eq!(decode_record(b"hello world, not ours"), Ok(None));
        assert_eq!(decode_record(&[]), Ok(None));

        let buf = encode_record(&SAVED);
        assert_eq!(
            decode_record(&buf[..10]),
            Err(SettingsFileError::Corrupted)
        );
    }

    #[test]
    fn checksum_matches_fnv1a() {
        assert_eq!(checksum32(b""), 0x811C_9DC5);
        assert_eq!(checksum32(b"a"), 0xE40C_292C);
    }
}
