//! ListLicensesHandler - Query handler for the license catalogue.

use std::sync::Arc;

use crate::domain::legacy::LicenseError;
use crate::ports::{LicenseFilter, LicenseReader, LicenseSummary};

pub struct ListLicensesHandler {
    reader: Arc<dyn LicenseReader>,
}

impl ListLicensesHandler {
    pub fn new(reader: Arc<dyn LicenseReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, filter: LicenseFilter) -> Result<Vec<LicenseSummary>, LicenseError> {
        Ok(self.reader.list(&filter).await?)
    }
}
