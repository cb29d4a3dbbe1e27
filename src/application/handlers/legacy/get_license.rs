//! GetLicenseHandler - Query handler for one license.

use std::sync::Arc;

use crate::domain::foundation::LicenseId;
use crate::domain::legacy::LicenseError;
use crate::ports::{LicenseReader, LicenseView};

#[derive(Debug, Clone)]
pub struct GetLicenseQuery {
    pub license_id: LicenseId,
}

pub struct GetLicenseHandler {
    reader: Arc<dyn LicenseReader>,
}

impl GetLicenseHandler {
    pub fn new(reader: Arc<dyn LicenseReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetLicenseQuery) -> Result<LicenseView, LicenseError> {
        self.reader
            .get(&query.license_id)
            .await?
            .ok_or_else(|| LicenseError::not_found(query.license_id))
    }
}
