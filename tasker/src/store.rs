//! Whole-file JSON persistence.
//!
//! A [`JsonFile`] owns one file on disk and always reads or rewrites it in
//! full. There is no locking: two processes writing the same file race and
//! the last writer wins.

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

const EMPTY_OBJECT: &[u8] = b"{}";
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{} is not a JSON file", .path.display())]
    NotJson { path: PathBuf },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A JSON file holding one value of type `T`.
#[derive(Debug)]
pub struct JsonFile<T> {
    path: PathBuf,
    _data: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonFile<T> {
    /// Opens the store at `path`, creating it with an empty object when it
    /// does not exist yet. An existing file is never touched.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if path.extension().is_none_or(|extension| extension != "json") {
            return Err(Error::NotJson { path });
        }
        create_if_not_exist(&path)?;
        Ok(Self {
            path,
            _data: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<T, Error> {
        debug!("loading {}", self.path.display());
        let file = File::open(&self.path).map_err(|source| Error::io(&self.path, source))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            if source.is_io() {
                Error::io(&self.path, source.into())
            } else {
                Error::Decode {
                    path: self.path.clone(),
                    source,
                }
            }
        })
    }

    pub fn save(&self, data: &T) -> Result<(), Error> {
        debug!("saving {}", self.path.display());
        // Encode before truncating the file.
        let mut encoded = serde_json::to_vec_pretty(data).map_err(|source| Error::Encode {
            path: self.path.clone(),
            source,
        })?;
        encoded.push(b'\n');

        let file = File::create(&self.path).map_err(|source| Error::io(&self.path, source))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&encoded)
            .and_then(|_| writer.flush())
            .map_err(|source| Error::io(&self.path, source))
    }
}

fn create_if_not_exist(path: &Path) -> Result<(), Error> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut options, FILE_MODE);
    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(()),
        Err(err) => return Err(Error::io(path, err)),
    };
    debug!("created {}", path.display());
    file.write_all(EMPTY_OBJECT)
        .map_err(|source| Error::io(path, source))
}
