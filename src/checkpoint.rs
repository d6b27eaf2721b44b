//! Checkpoint persistence.
//!
//! A checkpoint is a directory holding the full serialized model state.
//! Saves are synchronous and blocking: the triggering caller does not get
//! control back until the payload is on disk. Payloads are written to a
//! temporary file and atomically renamed into place so a crash mid-save
//! never leaves a truncated checkpoint behind.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Name of the payload file inside a checkpoint directory.
const PAYLOAD_FILE: &str = "model.bin";

/// A model whose full state can be persisted to and restored from a
/// checkpoint directory.
pub trait Checkpoint: Sized {
    /// Persists the model state under `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Checkpoint`] or [`Error::CheckpointEncoding`] on
    /// failure; nothing partial is left behind.
    fn save(&self, dir: &Path) -> Result<()>;

    /// Reconstructs a usable model from a checkpoint directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Checkpoint`] if the directory or payload is
    /// missing, [`Error::CheckpointEncoding`] if the payload does not
    /// decode.
    fn load(dir: &Path) -> Result<Self>;
}

/// Serializes `state` into `dir` via a temporary file and atomic rename.
pub fn save_state<S: Serialize>(state: &S, dir: &Path) -> Result<()> {
    let io_err = |source| Error::Checkpoint { path: dir.to_path_buf(), source };
    fs::create_dir_all(dir).map_err(io_err)?;
    let bytes = bincode::serialize(state)?;
    let path = dir.join(PAYLOAD_FILE);
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes).map_err(io_err)?;
    fs::rename(&tmp, &path).map_err(io_err)?;
    Ok(())
}

/// Deserializes a state payload from a checkpoint directory.
pub fn load_state<S: DeserializeOwned>(dir: &Path) -> Result<S> {
    let path = dir.join(PAYLOAD_FILE);
    let bytes = fs::read(&path).map_err(|source| Error::Checkpoint {
        path: path.clone(),
        source,
    })?;
    Ok(bincode::deserialize(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct State {
        steps: usize,
        counts: Vec<u32>,
    }

    #[test]
    fn state_round_trips_through_a_directory() {
        let dir = std::env::temp_dir().join(format!("word-gpt-ckpt-{}", std::process::id()));
        let state = State { steps: 42, counts: vec![1, 2, 3] };

        save_state(&state, &dir).unwrap();
        let loaded: State = load_state(&dir).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded, state);
    }

    #[test]
    fn load_fails_on_missing_checkpoint() {
        let dir = Path::new("/definitely/not/here/ckpt-epoch-1");
        assert!(matches!(
            load_state::<State>(dir),
            Err(Error::Checkpoint { .. })
        ));
    }
}
