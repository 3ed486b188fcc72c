use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::gateway::{Filter, Gateway};
use crate::models::{BankAccount, Comprobante, UserProfile};

const RECEIPTS_TABLE: &str = "comprobantes";
const ACCOUNTS_TABLE: &str = "cuentas_bancarias";
const PROFILES_TABLE: &str = "profiles";

/// Data access for the signed-in user's rows. Mutations always re-fetch the
/// full list afterwards; nothing is patched optimistically in memory.
pub struct Repository<'a> {
    gateway: &'a Gateway,
    user_id: Uuid,
}

impl<'a> Repository<'a> {
    pub fn new(gateway: &'a Gateway, user_id: Uuid) -> Self {
        Self { gateway, user_id }
    }

    fn owner(&self) -> Filter {
        Filter::Eq("user_id", self.user_id.to_string())
    }

    // -- receipts -----------------------------------------------------------

    pub async fn fetch_receipts(&self) -> Result<Vec<Comprobante>> {
        self.gateway
            .select(RECEIPTS_TABLE, "*", &[self.owner()], Some("fecha.desc"))
            .await
    }

    pub async fn delete_receipt(&self, id: Uuid) -> Result<Vec<Comprobante>> {
        self.gateway
            .delete(RECEIPTS_TABLE, &[Filter::Eq("id", id.to_string()), self.owner()])
            .await?;
        self.fetch_receipts().await
    }

    pub async fn update_receipt(&self, id: Uuid, patch: &Value) -> Result<Vec<Comprobante>> {
        self.gateway
            .update(
                RECEIPTS_TABLE,
                patch,
                &[Filter::Eq("id", id.to_string()), self.owner()],
            )
            .await?;
        self.fetch_receipts().await
    }

    // -- profile ------------------------------------------------------------

    pub async fn fetch_profile(&self) -> Result<UserProfile> {
        crate::session::fetch_profile(self.gateway, self.user_id).await
    }

    pub async fn complete_onboarding(&self) -> Result<()> {
        self.gateway
            .update(
                PROFILES_TABLE,
                &onboarding_completed_patch(),
                &[Filter::Eq("id", self.user_id.to_string())],
            )
            .await
    }

    // -- bank accounts ------------------------------------------------------

    pub async fn fetch_accounts(&self) -> Result<Vec<BankAccount>> {
        self.gateway
            .select(ACCOUNTS_TABLE, "*", &[self.owner()], Some("created_at.asc"))
            .await
    }

    pub async fn add_account(
        &self,
        nombre: &str,
        numero_cuenta: &str,
        titular: &str,
    ) -> Result<BankAccount> {
        let row = new_account_row(self.user_id, nombre, numero_cuenta, titular);
        self.gateway.insert(ACCOUNTS_TABLE, &row).await
    }

    pub async fn remove_account(&self, id: Uuid) -> Result<()> {
        self.gateway
            .delete(ACCOUNTS_TABLE, &[Filter::Eq("id", id.to_string()), self.owner()])
            .await
    }
}

fn onboarding_completed_patch() -> Value {
    serde_json::json!({ "onboarding_completed": true })
}

fn new_account_row(user_id: Uuid, nombre: &str, numero_cuenta: &str, titular: &str) -> Value {
    serde_json::json!({
        "user_id": user_id,
        "nombre": nombre,
        "numero_cuenta": numero_cuenta,
        "titular": titular,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboarding_patch_shape() {
        let patch = onboarding_completed_patch();
        assert_eq!(patch["onboarding_completed"], true);
        assert_eq!(patch.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_new_account_row_carries_owner() {
        let row = new_account_row(Uuid::nil(), "Principal", "123-456", "Ana Gómez");
        assert_eq!(row["user_id"], Uuid::nil().to_string());
        assert_eq!(row["nombre"], "Principal");
        assert_eq!(row["numero_cuenta"], "123-456");
        assert_eq!(row["titular"], "Ana Gómez");
    }
}
