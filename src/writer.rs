// std imports
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::RwLock;

// third-party imports
use chrono::Local;

// local imports
use crate::error::{Error, Result};
use crate::strftime::expand_path;

// ---

#[derive(Debug)]
struct Slot {
    name: String,
    file: File,
}

/// An append-only log file whose handle can be swapped out at runtime.
///
/// In pattern mode the file name is re-expanded with [`expand_path`] on every
/// rotation, so a pattern like `app-%Y%m%d.log` lands each day in its own
/// file. Writes take the shared lock while rotation and closing take the
/// exclusive one, so a rotation concurrent with writes never tears a write
/// between two files.
#[derive(Debug)]
pub struct RotatingLogWriter {
    slot: RwLock<Option<Slot>>,
    pattern: String,
    is_pattern: bool,
}

impl RotatingLogWriter {
    pub fn new(pattern: &str, is_pattern: bool) -> Result<Self> {
        let name = if is_pattern {
            expand_path(pattern, &Local::now())
        } else {
            pattern.to_owned()
        };

        let file = open_file(&name)?;

        Ok(Self {
            slot: RwLock::new(Some(Slot { name, file })),
            pattern: pattern.to_owned(),
            is_pattern,
        })
    }

    /// Returns the name of the currently open file, if any.
    pub fn name(&self) -> Option<String> {
        self.slot.read().expect("log writer lock poisoned").as_ref().map(|slot| slot.name.clone())
    }

    /// Re-expands the file name pattern, swaps the new file in and closes the old one.
    pub fn rotate(&self) -> Result<()> {
        let name = if self.is_pattern {
            expand_path(&self.pattern, &Local::now())
        } else {
            self.pattern.clone()
        };

        let file = open_file(&name)?;

        let old = {
            let mut slot = self.slot.write().expect("log writer lock poisoned");
            slot.replace(Slot { name, file })
        };

        match old {
            Some(slot) => close_file(&slot.name, slot.file),
            None => Err(closed_error().into()),
        }
    }

    /// Syncs and closes the current file; subsequent writes fail.
    pub fn close(&self) -> Result<()> {
        let old = self.slot.write().expect("log writer lock poisoned").take();

        match old {
            Some(slot) => close_file(&slot.name, slot.file),
            None => Err(closed_error().into()),
        }
    }
}

impl Write for &RotatingLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let slot = self.slot.read().expect("log writer lock poisoned");
        match slot.as_ref() {
            Some(slot) => (&slot.file).write(buf),
            None => Err(closed_error()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let slot = self.slot.read().expect("log writer lock poisoned");
        match slot.as_ref() {
            Some(slot) => (&slot.file).flush(),
            None => Err(closed_error()),
        }
    }
}

impl Write for RotatingLogWriter {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}

// ---

fn open_file(name: &str) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(name)
        .map_err(|source| Error::OpenFile {
            name: name.to_owned(),
            source,
        })
}

fn close_file(name: &str, file: File) -> Result<()> {
    file.sync_all().map_err(|source| Error::SyncFile {
        name: name.to_owned(),
        source,
    })?;
    // dropping the handle closes it; sync_all has already surfaced write-back errors
    drop(file);
    Ok(())
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "log file is already closed")
}

// ---

#[cfg(test)]
mod tests;
