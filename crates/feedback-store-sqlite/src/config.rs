use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Where the database lives and where the process is expected to run from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
  /// Directory holding the database file; created on schema initialisation.
  pub folder:  PathBuf,
  /// Database file name inside `folder`.
  pub name:    String,
  /// Suffix the working directory must end with. Empty disables the check.
  #[serde(default)]
  pub root:    PathBuf,
  /// Path of the JSON seed file.
  pub example: PathBuf,
}

impl StoreConfig {
  pub fn db_path(&self) -> PathBuf { self.folder.join(&self.name) }

  /// Refuse to touch the store unless `cwd` ends with the configured root
  /// (compared component-wise).
  pub fn check_working_dir(&self, cwd: &Path) -> Result<()> {
    if self.root.as_os_str().is_empty() || cwd.ends_with(&self.root) {
      return Ok(());
    }
    Err(Error::WorkingDirectory {
      expected: self.root.clone(),
      actual:   cwd.to_path_buf(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(root: &str) -> StoreConfig {
    StoreConfig {
      folder:  "data".into(),
      name:    "feedback.db".into(),
      root:    root.into(),
      example: "assets/example_data.json".into(),
    }
  }

  #[test]
  fn db_path_joins_folder_and_name() {
    assert_eq!(config("").db_path(), PathBuf::from("data/feedback.db"));
  }

  #[test]
  fn working_dir_suffix_is_component_wise() {
    let cfg = config("apps/feedback_api");
    assert!(cfg.check_working_dir(Path::new("/srv/apps/feedback_api")).is_ok());
    assert!(matches!(
      cfg.check_working_dir(Path::new("/srv/apps/other_feedback_api")),
      Err(Error::WorkingDirectory { .. })
    ));
  }

  #[test]
  fn empty_root_accepts_any_directory() {
    assert!(config("").check_working_dir(Path::new("/anywhere")).is_ok());
  }
}
