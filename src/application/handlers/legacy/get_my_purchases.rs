//! GetMyPurchasesHandler - The caller's purchase ledger.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::legacy::LicenseError;
use crate::ports::{LicenseReader, PurchaseView};

pub struct GetMyPurchasesHandler {
    reader: Arc<dyn LicenseReader>,
}

impl GetMyPurchasesHandler {
    pub fn new(reader: Arc<dyn LicenseReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, user_id: &UserId) -> Result<Vec<PurchaseView>, LicenseError> {
        Ok(self.reader.purchases_for_user(user_id).await?)
    }
}
