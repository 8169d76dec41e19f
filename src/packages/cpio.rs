// src/packages/cpio.rs

//! Reader for the newc CPIO archives carried in RPM payloads

use std::io::{self, Read};

/// CPIO New ASCII Format (newc) header size
const HEADER_SIZE: usize = 110;
/// Magic string for newc format
const MAGIC_NEWC: &[u8] = b"070701";
/// Magic string for CRC format
const MAGIC_CRC: &[u8] = b"070702";
/// Name of the end-of-archive marker entry
const TRAILER: &str = "TRAILER!!!";

pub const S_IFMT: u32 = 0o170000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFLNK: u32 = 0o120000;

/// Header of one archive member
#[derive(Debug, Clone)]
pub struct CpioEntry {
    pub name: String,
    pub size: u64,
    pub mode: u32,
    pub ino: u32,
    pub nlink: u32,
}

impl CpioEntry {
    pub fn is_file(&self) -> bool {
        (self.mode & S_IFMT) == S_IFREG
    }

    pub fn is_dir(&self) -> bool {
        (self.mode & S_IFMT) == S_IFDIR
    }

    pub fn is_symlink(&self) -> bool {
        (self.mode & S_IFMT) == S_IFLNK
    }

    /// Permission bits
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    /// Hard-linked member whose data is carried by a later member
    pub fn is_deferred_link(&self) -> bool {
        self.is_file() && self.nlink > 1 && self.size == 0
    }
}

/// A reader for CPIO (New ASCII) archives
pub struct CpioReader<R: Read> {
    reader: R,
}

impl<R: Read> CpioReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next entry and its data
    ///
    /// Symlink data is the link target. Returns `Ok(None)` at the trailer or
    /// at a clean end of input.
    pub fn next_entry(&mut self) -> io::Result<Option<(CpioEntry, Vec<u8>)>> {
        let mut header_buf = [0u8; HEADER_SIZE];
        if let Err(e) = self.reader.read_exact(&mut header_buf) {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                return Ok(None);
            }
            return Err(e);
        }

        let magic = &header_buf[0..6];
        if magic != MAGIC_NEWC && magic != MAGIC_CRC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid CPIO magic: {:?}", String::from_utf8_lossy(magic)),
            ));
        }

        let parse_hex = |start: usize, len: usize| -> io::Result<u32> {
            let s = std::str::from_utf8(&header_buf[start..start + len])
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            u32::from_str_radix(s, 16).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        };

        let ino = parse_hex(6, 8)?;
        let mode = parse_hex(14, 8)?;
        let nlink = parse_hex(38, 8)?;
        let filesize = parse_hex(54, 8)? as u64;
        let namesize = parse_hex(94, 8)? as usize;

        let mut name_buf = vec![0u8; namesize];
        self.reader.read_exact(&mut name_buf)?;
        if name_buf.last() == Some(&0) {
            name_buf.pop();
        }
        let name = String::from_utf8_lossy(&name_buf).to_string();

        if name == TRAILER {
            return Ok(None);
        }

        // Name and data are each padded to a 4-byte boundary
        self.skip_padding(HEADER_SIZE + namesize)?;

        let mut content = vec![0u8; filesize as usize];
        self.reader.read_exact(&mut content)?;
        self.skip_padding(filesize as usize)?;

        Ok(Some((
            CpioEntry {
                name,
                size: filesize,
                mode,
                ino,
                nlink,
            },
            content,
        )))
    }

    fn skip_padding(&mut self, len: usize) -> io::Result<()> {
        let pad = (4 - (len % 4)) % 4;
        if pad > 0 {
            let mut skip = [0u8; 3];
            self.reader.read_exact(&mut skip[..pad])?;
        }
        Ok(())
    }
}
