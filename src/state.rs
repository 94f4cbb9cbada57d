use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Runs `op` against a copy of the dataset and installs the copy only
    /// after it has been written to disk.
    pub async fn write<T>(
        &self,
        op: impl FnOnce(&mut AppData) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut data = self.data.lock().await;
        let mut draft = data.clone();
        let value = op(&mut draft)?;

        persist_data(&self.data_path, &draft).await?;
        *data = draft;

        Ok(value)
    }

    pub async fn read<T>(&self, op: impl FnOnce(&AppData) -> T) -> T {
        let data = self.data.lock().await;
        op(&data)
    }
}
