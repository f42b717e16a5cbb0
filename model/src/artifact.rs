//! Artifact IO: the trainer publishes a fitted [`Regressor`] to a fixed
//! path, and the serving process loads it once at startup. Publication goes
//! through a temp file plus rename so a reader never observes a half-written
//! artifact; a missing file means "no model yet", not an error.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{ModelError, Regressor};

pub fn save(model: &Regressor, path: &Path) -> Result<(), ModelError> {
    let bytes = bincode::serialize(model)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Option<Regressor>, ModelError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearModel;
    use std::env;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("monetary-predict-{}-{}", std::process::id(), name))
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = scratch_path("roundtrip.bin");
        let model = Regressor::Linear(LinearModel {
            weights: vec![0.25, -1.0, 2.0],
            intercept: 1.5,
        });

        save(&model, &path).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.predict(&[1.0, 2.0, 3.0]), model.predict(&[1.0, 2.0, 3.0]));

        // No stray temp file after a successful publish.
        assert!(!path.with_extension("tmp").exists());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_loads_as_none() {
        let path = scratch_path("does-not-exist.bin");
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = scratch_path("corrupt.bin");
        fs::write(&path, b"not a model").unwrap();
        assert!(load(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}
