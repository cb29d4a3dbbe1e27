//! GetLicenseStatisticsHandler - Admin dashboard figures.

use std::sync::Arc;

use crate::domain::legacy::LicenseError;
use crate::ports::{LicenseReader, LicenseStatistics};

pub struct GetLicenseStatisticsHandler {
    reader: Arc<dyn LicenseReader>,
}

impl GetLicenseStatisticsHandler {
    pub fn new(reader: Arc<dyn LicenseReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self) -> Result<LicenseStatistics, LicenseError> {
        Ok(self.reader.statistics().await?)
    }
}
