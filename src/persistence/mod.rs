use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use log::debug;
use serde::Serialize;

use crate::core::CihuiError;

const APP_NAME: &str = "cihui";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, file_path: &Path) -> Result<(), CihuiError> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(file_path, json)?;
    debug!("Data saved to: {}", file_path.display());
    Ok(())
}
