// Attachment circuit and line carrier endpoints (read-only).

use crate::client::{EXPANDED, IpmClient};
use crate::error::Error;
use crate::types::{Ac, Lc};

impl IpmClient {
    pub async fn get_ac(&self, id: &str) -> Result<Ac, Error> {
        self.get(&["acs", id], &[]).await
    }

    pub async fn list_acs(&self) -> Result<Vec<Ac>, Error> {
        self.get(&["acs"], &[EXPANDED]).await
    }

    pub async fn get_lc(&self, id: &str) -> Result<Lc, Error> {
        self.get(&["lcs", id], &[]).await
    }

    pub async fn list_lcs(&self) -> Result<Vec<Lc>, Error> {
        self.get(&["lcs"], &[EXPANDED]).await
    }
}
