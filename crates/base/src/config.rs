use std::path::PathBuf;

use directories::BaseDirs;

/// # Panics
/// This function should never panic
#[inline]
#[must_use]
pub fn default_history_dir_path() -> PathBuf {
    let base_dirs = BaseDirs::new().expect("`BaseDirs::new` always success");
    [base_dirs.data_dir().to_path_buf(), PathBuf::from(crate::PROJECT_NAME)].into_iter().collect()
}
