//! JSON profile artifact writer.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use calluna_tree::{ParameterSet, Profile};

use crate::domain::RunName;
use crate::IoError;

/// Writes exported profiles to a JSON file.
///
/// Creates the output directory on construction if it does not exist.
/// The artifact is named `{run}_profiles.json` and carries the parameter
/// set alongside the indexed profile records; further provenance columns
/// (build timestamps, dataset versions) are layered on downstream.
pub struct ProfileWriter {
    output_dir: PathBuf,
    run: RunName,
}

#[derive(Serialize)]
struct ProfileArtifact<'a> {
    run: &'a str,
    parameter_set: &'a ParameterSet,
    n_profiles: usize,
    profiles: BTreeMap<usize, &'a Profile>,
}

impl ProfileWriter {
    /// Create a new writer targeting the given directory and run name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), run = %run))]
    pub fn new(output_dir: &Path, run: RunName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            run,
        })
    }

    /// Return the path of the profile artifact this writer produces.
    #[must_use]
    pub fn profiles_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_profiles.json", self.run.as_str()))
    }

    /// Write the profiles and their parameter set to `{run}_profiles.json`.
    ///
    /// Profiles are keyed by their zero-based export index.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::SerializeProfiles`] if serialization fails, or
    /// [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_profiles(
        &self,
        profiles: &[Profile],
        parameter_set: &ParameterSet,
    ) -> Result<(), IoError> {
        let artifact = ProfileArtifact {
            run: self.run.as_str(),
            parameter_set,
            n_profiles: profiles.len(),
            profiles: profiles.iter().enumerate().collect(),
        };

        let json = serde_json::to_string_pretty(&artifact)
            .map_err(|e| IoError::SerializeProfiles { source: e })?;
        let path = self.profiles_path();
        fs::write(&path, json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(
            path = %path.display(),
            n_profiles = profiles.len(),
            "profiles written"
        );
        Ok(())
    }
}
