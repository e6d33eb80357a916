// ── Attachment circuits and line carriers ──
//
// The server derives both from a connection. The resources track them:
// create and update read, delete forgets.

use async_trait::async_trait;

use super::{Reconciler, required};
use crate::attr::Attr;
use crate::convert::{project_ac, project_lc};
use crate::error::CoreError;
use crate::model::{Ac, Lc};
use crate::session::Session;

pub struct AcReconciler;

impl AcReconciler {
    async fn fetch(session: &Session, plan: &Ac) -> Result<Ac, CoreError> {
        let id = required(&plan.id, "ac id")?;
        let client = session.client();
        let server = session
            .settings()
            .connection_retry(session.settings().read_attempts)
            .run("ac read", |_| async move {
                client.get_ac(id).await.map_err(CoreError::from)
            })
            .await?;
        Ok(project_ac(plan, &server))
    }
}

#[async_trait]
impl Reconciler for AcReconciler {
    type Model = Ac;

    async fn create(&self, session: &Session, plan: &Ac) -> Result<Ac, CoreError> {
        Self::fetch(session, plan).await
    }

    async fn read(&self, session: &Session, prior: &Ac) -> Result<Ac, CoreError> {
        Self::fetch(session, prior).await
    }

    async fn update(&self, session: &Session, plan: &Ac, _prior: &Ac) -> Result<Ac, CoreError> {
        Self::fetch(session, plan).await
    }

    async fn delete(&self, _session: &Session, _prior: &Ac) -> Result<(), CoreError> {
        Ok(())
    }

    fn importing(&self, id: &str) -> Result<Ac, CoreError> {
        Ok(Ac {
            id: Attr::Known(id.to_owned()),
            href: Attr::Unknown,
            parent_id: Attr::Unknown,
            state: Attr::Unknown,
        })
    }
}

pub struct LcReconciler;

impl LcReconciler {
    async fn fetch(session: &Session, plan: &Lc) -> Result<Lc, CoreError> {
        let id = required(&plan.id, "lc id")?;
        let client = session.client();
        let server = session
            .settings()
            .connection_retry(session.settings().read_attempts)
            .run("lc read", |_| async move {
                client.get_lc(id).await.map_err(CoreError::from)
            })
            .await?;
        Ok(project_lc(plan, &server))
    }
}

#[async_trait]
impl Reconciler for LcReconciler {
    type Model = Lc;

    async fn create(&self, session: &Session, plan: &Lc) -> Result<Lc, CoreError> {
        Self::fetch(session, plan).await
    }

    async fn read(&self, session: &Session, prior: &Lc) -> Result<Lc, CoreError> {
        Self::fetch(session, prior).await
    }

    async fn update(&self, session: &Session, plan: &Lc, _prior: &Lc) -> Result<Lc, CoreError> {
        Self::fetch(session, plan).await
    }

    async fn delete(&self, _session: &Session, _prior: &Lc) -> Result<(), CoreError> {
        Ok(())
    }

    fn importing(&self, id: &str) -> Result<Lc, CoreError> {
        Ok(Lc {
            id: Attr::Known(id.to_owned()),
            href: Attr::Unknown,
            parent_id: Attr::Unknown,
            state: Attr::Unknown,
        })
    }
}
