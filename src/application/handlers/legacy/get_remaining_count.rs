//! GetRemainingCountHandler - How many licenses are still for sale.

use std::sync::Arc;

use crate::domain::legacy::{LicenseError, LicenseStatus};
use crate::ports::LicenseReader;

/// Counts licenses currently `Available`. Reserved licenses are not
/// counted, so the figure can rise again when a hold is released.
pub struct GetRemainingCountHandler {
    reader: Arc<dyn LicenseReader>,
}

impl GetRemainingCountHandler {
    pub fn new(reader: Arc<dyn LicenseReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self) -> Result<u64, LicenseError> {
        Ok(self.reader.count_by_status(LicenseStatus::Available).await?)
    }
}
