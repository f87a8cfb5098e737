use std::io;
use std::path::Path;

use thiserror::Error;

use crate::mmu::RAM_SIZE;

/// Magic prefix every SPC file starts with. The trailing "v0.30" varies by
/// dumper, so only the format name is matched.
pub const MAGIC: &[u8] = b"SNES-SPC700 Sound File Data";

const TAG_TYPE_OFFSET: usize = 0x23;
const REGISTERS_OFFSET: usize = 0x25;
const ID666_OFFSET: usize = 0x2E;
const RAM_OFFSET: usize = 0x0100;
const DSP_OFFSET: usize = 0x10100;
const MIN_FILE_LEN: usize = DSP_OFFSET + 128;

/// Tag-type byte value indicating an ID666 text tag is present.
const TAG_PRESENT: u8 = 0x1A;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("not an SPC file (bad magic)")]
    BadMagic,
    #[error("file truncated: need at least {MIN_FILE_LEN} bytes, got {0}")]
    Truncated(usize),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// CPU register block stored at offset 0x25 of the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpcRegisters {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub psw: u8,
    pub sp: u8,
}

/// ID666 text tag, when the snapshot carries one.
#[derive(Debug, Clone, Default)]
pub struct IdTag {
    pub song_title: String,
    pub game_title: String,
    pub dumper: String,
    pub comments: String,
}

/// Parsed machine state: everything the core needs to resume playback.
pub struct Snapshot {
    pub registers: SpcRegisters,
    pub ram: Box<[u8; RAM_SIZE]>,
    pub dsp: [u8; 128],
    pub tag: Option<IdTag>,
}

impl Snapshot {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, SnapshotError> {
        if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
            return Err(SnapshotError::BadMagic);
        }
        if data.len() < MIN_FILE_LEN {
            return Err(SnapshotError::Truncated(data.len()));
        }

        let r = &data[REGISTERS_OFFSET..];
        let registers = SpcRegisters {
            pc: u16::from_le_bytes([r[0], r[1]]),
            a: r[2],
            x: r[3],
            y: r[4],
            psw: r[5],
            sp: r[6],
        };

        let mut ram: Box<[u8; RAM_SIZE]> = Box::new([0u8; RAM_SIZE]);
        ram.copy_from_slice(&data[RAM_OFFSET..RAM_OFFSET + RAM_SIZE]);

        let mut dsp = [0u8; 128];
        dsp.copy_from_slice(&data[DSP_OFFSET..DSP_OFFSET + 128]);

        let tag = (data[TAG_TYPE_OFFSET] == TAG_PRESENT).then(|| parse_id666(data));

        Ok(Self {
            registers,
            ram,
            dsp,
            tag,
        })
    }
}

fn parse_id666(data: &[u8]) -> IdTag {
    let field = |offset: usize, len: usize| -> String {
        let bytes = &data[offset..offset + len];
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
        String::from_utf8_lossy(&bytes[..end]).trim_end().to_owned()
    };

    IdTag {
        song_title: field(ID666_OFFSET, 32),
        game_title: field(ID666_OFFSET + 32, 32),
        dumper: field(ID666_OFFSET + 64, 16),
        comments: field(ID666_OFFSET + 80, 32),
    }
}
